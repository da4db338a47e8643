/// Append-only accumulation of extracted content fragments.
///
/// Only [`Transcript::clear`] ever shortens it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    text: String,
    fragments: usize,
    clears: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment; empty fragments are ignored. Returns whether anything changed.
    pub fn append(&mut self, fragment: &str) -> bool {
        if fragment.is_empty() {
            return false;
        }
        self.text.push_str(fragment);
        self.fragments += 1;
        true
    }

    /// Empties the transcript. Returns whether it held anything.
    pub fn clear(&mut self) -> bool {
        let had_content = !self.text.is_empty();
        self.text.clear();
        self.fragments = 0;
        if had_content {
            self.clears += 1;
        }
        had_content
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of fragments appended since creation or the last clear.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// How many times non-empty content has been cleared.
    pub fn clears(&self) -> u64 {
        self.clears
    }
}
