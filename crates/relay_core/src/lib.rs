//! Relay core: pure state machine, content extraction and view-model helpers.
mod effect;
mod extract;
mod msg;
mod state;
mod transcript;
mod update;
mod view_model;

pub use effect::Effect;
pub use extract::{extract_content, FieldPath, PayloadShape};
pub use msg::Msg;
pub use state::{AppState, ConnectionStatus, LogEntry, LogKind, DEFAULT_STREAM_EVENT, LOG_CAPACITY};
pub use transcript::Transcript;
pub use update::update;
pub use view_model::AppViewModel;
