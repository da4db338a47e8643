use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to connect.
    ConnectClicked,
    /// User asked to disconnect.
    DisconnectClicked,
    /// User cleared the accumulated content.
    ClearClicked,
    /// Relay connection is open.
    Connected,
    /// Relay connection closed, by request or by the server.
    Disconnected { reason: Option<String> },
    /// Connecting failed (token, transport or timeout).
    ConnectFailed { message: String },
    SubscriptionSucceeded { channel: String },
    SubscriptionFailed {
        channel: String,
        reason: Option<String>,
    },
    UnsubscribeSucceeded { channel: String },
    /// A named event arrived on the subscribed channel.
    EventReceived { event: String, payload: Value },
}
