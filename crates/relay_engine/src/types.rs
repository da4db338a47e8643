use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::TokenError;

/// Everything the engine reports back to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Connected,
    /// `reason` is `None` when the disconnect was requested locally.
    Disconnected {
        reason: Option<String>,
    },
    ConnectError {
        message: String,
    },
    SubscriptionSucceeded {
        channel: String,
    },
    SubscriptionFailed {
        channel: String,
        reason: Option<String>,
    },
    UnsubscribeSucceeded {
        channel: String,
    },
    /// Named event on the configured channel.
    ChannelEvent {
        event: String,
        payload: Value,
    },
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid relay settings: {0}")]
    InvalidSettings(String),
    #[error("token unavailable: {0}")]
    Token(#[from] TokenError),
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
    #[error("relay rejected the connection: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed frame: {0}")]
    Frame(String),
}

impl RelayError {
    /// Whether the session has to end. Malformed frames are skipped instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RelayError::Frame(_))
    }
}
