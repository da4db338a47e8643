use relay_logging::relay_debug;

use crate::{InboundFrame, OutboundFrame};

/// Observes every frame crossing the relay connection, for diagnostics.
///
/// Registered on [`crate::RelaySession`]; both hooks default to doing nothing.
pub trait FrameTap: Send + Sync {
    fn inbound(&self, _frame: &InboundFrame) {}
    fn outbound(&self, _frame: &OutboundFrame) {}
}

/// Logs each frame at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTap;

impl FrameTap for LoggingTap {
    fn inbound(&self, frame: &InboundFrame) {
        relay_debug!("relay <- {:?}", frame);
    }

    fn outbound(&self, frame: &OutboundFrame) {
        relay_debug!("relay -> {:?}", frame);
    }
}
