use relay_core::{Effect, Msg};
use relay_engine::{EngineHandle, RelayEvent, RelaySession};
use relay_logging::{relay_debug, relay_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(session: RelaySession) -> Self {
        Self {
            engine: EngineHandle::new(session),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            relay_debug!("effect {:?}", effect);
            match effect {
                Effect::Connect => self.engine.connect(),
                Effect::Subscribe => self.engine.subscribe(),
                Effect::Disconnect => self.engine.disconnect(),
            }
        }
    }

    /// Collects every event the engine has produced since the last call.
    pub fn drain(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            inbox.push(map_event(event));
        }
        inbox
    }
}

pub(crate) fn map_event(event: RelayEvent) -> Msg {
    match event {
        RelayEvent::Connected => Msg::Connected,
        RelayEvent::Disconnected { reason } => Msg::Disconnected { reason },
        RelayEvent::ConnectError { message } => {
            relay_warn!("connect failed: {}", message);
            Msg::ConnectFailed { message }
        }
        RelayEvent::SubscriptionSucceeded { channel } => Msg::SubscriptionSucceeded { channel },
        RelayEvent::SubscriptionFailed { channel, reason } => {
            Msg::SubscriptionFailed { channel, reason }
        }
        RelayEvent::UnsubscribeSucceeded { channel } => Msg::UnsubscribeSucceeded { channel },
        RelayEvent::ChannelEvent { event, payload } => Msg::EventReceived { event, payload },
    }
}
