use crate::{ConnectionStatus, LogEntry};

/// Borrowed snapshot of everything the terminal renderer shows.
///
/// Building one costs the same regardless of how much content has
/// accumulated: the transcript is lent, not copied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel<'a> {
    pub status: ConnectionStatus,
    pub status_label: &'static str,
    pub content: &'a str,
    pub fragment_count: usize,
    /// Bumped whenever non-empty content is cleared.
    pub clear_count: u64,
    /// Retained entries, oldest first; at most [`crate::LOG_CAPACITY`].
    pub recent_log: Vec<&'a LogEntry>,
    /// Entries ever logged, including dropped ones.
    pub log_total: u64,
    pub can_connect: bool,
    pub can_disconnect: bool,
    pub dirty: bool,
}
