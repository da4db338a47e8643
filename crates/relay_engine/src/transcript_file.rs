use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcript path has no file name: {0:?}")]
    InvalidPath(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically writes `text` to `path`: temp file in the same directory, then rename.
///
/// Missing parent directories are created; an existing file is replaced.
pub fn save_transcript(path: &Path, text: &str) -> Result<(), TranscriptError> {
    if path.file_name().is_none() {
        return Err(TranscriptError::InvalidPath(path.to_path_buf()));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|err| TranscriptError::Io(err.error))?;
    Ok(())
}
