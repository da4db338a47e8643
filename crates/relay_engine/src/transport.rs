use crate::{InboundFrame, OutboundFrame, RelayError, RelayEvent, RelaySettings, SessionToken};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: RelayEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<RelayEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<RelayEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: RelayEvent) {
        let _ = self.tx.send(event);
    }
}

/// Opens connections to a relay.
#[async_trait::async_trait]
pub trait RelayTransport: Send + Sync {
    async fn open(
        &self,
        settings: &RelaySettings,
        token: &SessionToken,
    ) -> Result<Box<dyn RelayConnection>, RelayError>;
}

/// One open relay connection.
#[async_trait::async_trait]
pub trait RelayConnection: Send {
    async fn send(&mut self, frame: &OutboundFrame) -> Result<(), RelayError>;

    /// Next inbound frame, or `None` once the relay has closed the connection.
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, RelayError>>;

    async fn close(&mut self) -> Result<(), RelayError>;
}
