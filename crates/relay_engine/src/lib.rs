//! Relay engine: token providers, relay transport, session driver and effect execution.
mod engine;
mod protocol;
mod session;
mod settings;
mod tap;
mod token;
mod transcript_file;
mod transport;
mod types;
mod ws;

pub use engine::EngineHandle;
pub use protocol::{parse_frame, InboundFrame, OutboundFrame};
pub use session::{RelaySession, SessionCommand};
pub use settings::RelaySettings;
pub use tap::{FrameTap, LoggingTap};
pub use token::{
    EnvTokenProvider, HttpTokenProvider, SessionToken, StaticTokenProvider, TokenError,
    TokenProvider,
};
pub use transcript_file::{save_transcript, TranscriptError};
pub use transport::{ChannelEventSink, EventSink, RelayConnection, RelayTransport};
pub use types::{RelayError, RelayEvent};
pub use ws::WsTransport;
