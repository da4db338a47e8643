/// Side effects requested by [`crate::update`]; executed by the app against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Open a relay connection.
    Connect,
    /// Subscribe to the configured channel on the open connection.
    Subscribe,
    /// Tear down the current connection, if any.
    Disconnect,
}
