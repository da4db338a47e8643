use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RelayError;

/// Frames sent to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}

/// Frames received from the relay. Unrecognised `type`s parse as [`InboundFrame::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    SubscriptionSucceeded {
        channel: String,
    },
    SubscriptionFailed {
        channel: String,
        #[serde(default)]
        reason: Option<String>,
    },
    UnsubscribeSucceeded {
        channel: String,
    },
    Event {
        channel: String,
        event: String,
        #[serde(default)]
        payload: Value,
    },
    Error {
        message: String,
    },
    #[serde(other)]
    Unknown,
}

pub fn parse_frame(text: &str) -> Result<InboundFrame, RelayError> {
    serde_json::from_str(text).map_err(|err| RelayError::Frame(err.to_string()))
}

pub(crate) fn parse_frame_bytes(bytes: &[u8]) -> Result<InboundFrame, RelayError> {
    serde_json::from_slice(bytes).map_err(|err| RelayError::Frame(err.to_string()))
}

pub(crate) fn encode_frame(frame: &OutboundFrame) -> Result<String, RelayError> {
    serde_json::to_string(frame).map_err(|err| RelayError::Frame(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_frame_without_payload_defaults_to_null() {
        let frame = parse_frame(r#"{"type":"event","channel":"c","event":"e"}"#).unwrap();
        assert_eq!(
            frame,
            InboundFrame::Event {
                channel: "c".into(),
                event: "e".into(),
                payload: Value::Null,
            }
        );
    }

    #[test]
    fn unknown_frame_types_are_tolerated() {
        assert_eq!(
            parse_frame(r#"{"type":"presence","who":"x"}"#).unwrap(),
            InboundFrame::Unknown
        );
    }

    #[test]
    fn malformed_frames_are_not_fatal() {
        let err = parse_frame("not json").unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn subscribe_encodes_with_type_tag() {
        let text = encode_frame(&OutboundFrame::Subscribe {
            channel: "chan".into(),
        })
        .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({ "type": "subscribe", "channel": "chan" }));
    }
}
