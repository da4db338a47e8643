use std::collections::VecDeque;

use crate::view_model::AppViewModel;
use crate::Transcript;

/// Event whose payloads feed the transcript unless configured otherwise.
pub const DEFAULT_STREAM_EVENT: &str = "stream-by-prompt-object-chunk-sent-event";

/// Maximum number of retained log entries; the oldest are dropped first.
pub const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "DISCONNECTED",
            ConnectionStatus::Connecting => "CONNECTING",
            ConnectionStatus::Connected => "CONNECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Connection,
    Subscription,
    Event,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    status: ConnectionStatus,
    transcript: Transcript,
    log: VecDeque<LogEntry>,
    log_total: u64,
    stream_event: String,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::default(),
            transcript: Transcript::new(),
            log: VecDeque::new(),
            log_total: 0,
            stream_event: DEFAULT_STREAM_EVENT.to_string(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose transcript is fed by events named `event`.
    pub fn with_stream_event(event: impl Into<String>) -> Self {
        Self {
            stream_event: event.into(),
            ..Self::default()
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn stream_event(&self) -> &str {
        &self.stream_event
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn log(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    pub fn view(&self) -> AppViewModel<'_> {
        AppViewModel {
            status: self.status,
            status_label: self.status.label(),
            content: self.transcript.as_str(),
            fragment_count: self.transcript.fragments(),
            clear_count: self.transcript.clears(),
            recent_log: self.log.iter().collect(),
            log_total: self.log_total,
            can_connect: self.status == ConnectionStatus::Disconnected,
            can_disconnect: self.status != ConnectionStatus::Disconnected,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            self.status = status;
            self.dirty = true;
        }
    }

    pub(crate) fn push_log(&mut self, kind: LogKind, message: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            kind,
            message: message.into(),
        });
        self.log_total += 1;
        self.dirty = true;
    }

    pub(crate) fn append_content(&mut self, fragment: &str) {
        if self.transcript.append(fragment) {
            self.dirty = true;
        }
    }

    pub(crate) fn clear_transcript(&mut self) {
        if self.transcript.clear() {
            self.dirty = true;
        }
    }
}
