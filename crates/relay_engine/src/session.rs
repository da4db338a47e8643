use std::sync::Arc;

use relay_logging::{relay_debug, relay_info, relay_trace, relay_warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crate::{
    EventSink, FrameTap, InboundFrame, LoggingTap, OutboundFrame, RelayConnection, RelayError,
    RelayEvent, RelaySettings, RelayTransport, TokenProvider,
};

/// Requests a running session accepts after it has connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Subscribe,
    Unsubscribe,
}

/// Everything needed to drive one relay connection from token to close.
#[derive(Clone)]
pub struct RelaySession {
    settings: RelaySettings,
    tokens: Arc<dyn TokenProvider>,
    transport: Arc<dyn RelayTransport>,
    tap: Arc<dyn FrameTap>,
}

impl RelaySession {
    pub fn new(
        settings: RelaySettings,
        tokens: Arc<dyn TokenProvider>,
        transport: Arc<dyn RelayTransport>,
    ) -> Self {
        Self {
            settings,
            tokens,
            transport,
            tap: Arc::new(LoggingTap),
        }
    }

    pub fn with_tap(mut self, tap: Arc<dyn FrameTap>) -> Self {
        self.tap = tap;
        self
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Connects, then relays frames to `sink` until cancelled, the command
    /// channel closes, or the relay goes away.
    ///
    /// Always ends with exactly one of `ConnectError` or `Disconnected`.
    pub async fn run(
        &self,
        mut commands: UnboundedReceiver<SessionCommand>,
        cancel: CancellationToken,
        sink: &dyn EventSink,
    ) {
        let mut connection = match self.open(&cancel).await {
            Ok(Some(connection)) => connection,
            Ok(None) => {
                relay_debug!("session cancelled before the connection opened");
                sink.emit(RelayEvent::Disconnected { reason: None });
                return;
            }
            Err(err) => {
                relay_warn!("relay connect failed: {}", err);
                sink.emit(RelayEvent::ConnectError {
                    message: err.to_string(),
                });
                return;
            }
        };

        relay_info!("connected to relay, channel {}", self.settings.channel);
        sink.emit(RelayEvent::Connected);

        let mut subscribed = false;
        let reason = loop {
            tokio::select! {
                _ = cancel.cancelled() => break None,
                command = commands.recv() => match command {
                    Some(command) => match self.dispatch(connection.as_mut(), command).await {
                        Ok(()) => subscribed = command == SessionCommand::Subscribe,
                        Err(err) => {
                            relay_warn!("sending {:?} failed: {}", command, err);
                            if err.is_fatal() {
                                break Some(err.to_string());
                            }
                        }
                    },
                    None => break None,
                },
                frame = connection.next_frame() => match frame {
                    Some(Ok(frame)) => self.deliver(frame, sink),
                    Some(Err(err)) if !err.is_fatal() => relay_warn!("skipping frame: {}", err),
                    Some(Err(err)) => break Some(err.to_string()),
                    None => break Some("closed by server".to_string()),
                },
            }
        };

        if reason.is_none() {
            if subscribed {
                if let Err(err) = self
                    .dispatch(connection.as_mut(), SessionCommand::Unsubscribe)
                    .await
                {
                    relay_debug!("unsubscribe before close failed: {}", err);
                }
            }
            if let Err(err) = connection.close().await {
                relay_debug!("close after disconnect request failed: {}", err);
            }
        }
        relay_info!("relay session ended: {}", reason.as_deref().unwrap_or("requested"));
        sink.emit(RelayEvent::Disconnected { reason });
    }

    async fn open(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Box<dyn RelayConnection>>, RelayError> {
        let token = tokio::select! {
            _ = cancel.cancelled() => return Ok(None),
            token = self.tokens.token() => token?,
        };

        let limit = self.settings.connect_timeout;
        tokio::select! {
            _ = cancel.cancelled() => Ok(None),
            opened = tokio::time::timeout(limit, self.transport.open(&self.settings, &token)) => {
                match opened {
                    Ok(result) => result.map(Some),
                    Err(_) => Err(RelayError::Timeout(limit)),
                }
            }
        }
    }

    async fn dispatch(
        &self,
        connection: &mut dyn RelayConnection,
        command: SessionCommand,
    ) -> Result<(), RelayError> {
        let channel = self.settings.channel.clone();
        let frame = match command {
            SessionCommand::Subscribe => OutboundFrame::Subscribe { channel },
            SessionCommand::Unsubscribe => OutboundFrame::Unsubscribe { channel },
        };
        self.tap.outbound(&frame);
        connection.send(&frame).await
    }

    fn deliver(&self, frame: InboundFrame, sink: &dyn EventSink) {
        self.tap.inbound(&frame);
        let event = match frame {
            InboundFrame::SubscriptionSucceeded { channel } => {
                RelayEvent::SubscriptionSucceeded { channel }
            }
            InboundFrame::SubscriptionFailed { channel, reason } => {
                RelayEvent::SubscriptionFailed { channel, reason }
            }
            InboundFrame::UnsubscribeSucceeded { channel } => {
                RelayEvent::UnsubscribeSucceeded { channel }
            }
            InboundFrame::Event {
                channel,
                event,
                payload,
            } => {
                if channel != self.settings.channel {
                    relay_debug!("dropping {} for foreign channel {}", event, channel);
                    return;
                }
                RelayEvent::ChannelEvent { event, payload }
            }
            InboundFrame::Error { message } => {
                relay_warn!("relay reported an error: {}", message);
                return;
            }
            InboundFrame::Unknown => {
                relay_trace!("ignoring frame of unknown type");
                return;
            }
        };
        sink.emit(event);
    }
}
