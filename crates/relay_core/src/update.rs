use crate::{extract_content, AppState, ConnectionStatus, Effect, LogKind, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ConnectClicked => {
            if state.status() != ConnectionStatus::Disconnected {
                return (state, Vec::new());
            }
            state.set_status(ConnectionStatus::Connecting);
            state.push_log(LogKind::Connection, "connecting");
            vec![Effect::Connect]
        }
        Msg::DisconnectClicked => {
            if state.status() == ConnectionStatus::Disconnected {
                return (state, Vec::new());
            }
            state.push_log(LogKind::Connection, "disconnect requested");
            vec![Effect::Disconnect]
        }
        Msg::ClearClicked => {
            state.clear_transcript();
            Vec::new()
        }
        Msg::Connected => {
            state.set_status(ConnectionStatus::Connected);
            state.push_log(LogKind::Connection, "connected");
            vec![Effect::Subscribe]
        }
        Msg::Disconnected { reason } => {
            state.set_status(ConnectionStatus::Disconnected);
            let message = match reason {
                Some(reason) => format!("disconnected: {reason}"),
                None => "disconnected".to_string(),
            };
            state.push_log(LogKind::Connection, message);
            Vec::new()
        }
        Msg::ConnectFailed { message } => {
            state.set_status(ConnectionStatus::Disconnected);
            state.push_log(LogKind::Error, format!("connect error: {message}"));
            Vec::new()
        }
        Msg::SubscriptionSucceeded { channel } => {
            state.push_log(LogKind::Subscription, format!("subscribed to {channel}"));
            Vec::new()
        }
        Msg::SubscriptionFailed { channel, reason } => {
            let message = match reason {
                Some(reason) => format!("subscription to {channel} failed: {reason}"),
                None => format!("subscription to {channel} failed"),
            };
            state.push_log(LogKind::Error, message);
            Vec::new()
        }
        Msg::UnsubscribeSucceeded { channel } => {
            state.push_log(LogKind::Subscription, format!("unsubscribed from {channel}"));
            Vec::new()
        }
        Msg::EventReceived { event, payload } => {
            if event == state.stream_event() {
                let fragment = extract_content(&payload);
                state.append_content(&fragment);
                state.push_log(
                    LogKind::Event,
                    format!("{event}: {} bytes of content", fragment.len()),
                );
            } else {
                state.push_log(LogKind::Event, format!("{event}: ignored"));
            }
            Vec::new()
        }
    };

    (state, effects)
}
