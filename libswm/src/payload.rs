use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// The `errorType` classification returned for unroutable host messages.
pub const UNKNOWN_MESSAGE_TYPE: &str = "UnknownMessageTypeException";

/// Protocol-level payloads the engine puts on its own response envelopes,
/// discriminated by the `$type` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum ResponsePayload {
    /// Plain success acknowledgment: `{"$type": "base"}`.
    #[serde(rename = "base")]
    Base,
    /// Protocol-level error, answered to the host rather than raised locally.
    #[serde(rename = "error", rename_all = "camelCase")]
    Error { error_message: String, error_type: String },
}

impl ResponsePayload {
    pub fn error(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        ResponsePayload::Error { error_message: message.into(), error_type: error_type.into() }
    }

    /// The error answered to any host message type the dispatcher does not know.
    pub fn unknown_message_type(message_type: &str) -> Self {
        ResponsePayload::error(format!("Unknown message type: {message_type}"), UNKNOWN_MESSAGE_TYPE)
    }
}

impl From<ResponsePayload> for Value {
    fn from(payload: ResponsePayload) -> Self {
        match payload {
            ResponsePayload::Base => json!({"$type": "base"}),
            ResponsePayload::Error { error_message, error_type } => {
                json!({"$type": "error", "errorMessage": error_message, "errorType": error_type})
            }
        }
    }
}

/// An error-shaped payload the host returned on a response envelope.
///
/// `Display` is the host's human-readable message, which is what callers of a
/// failed request see.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub error_type: String,
    pub message: String,
}

/// Inspect a response payload for the error discriminator.
///
/// Anything without `$type == "error"` is treated as a success payload.
pub fn as_remote_error(payload: &Value) -> Option<RemoteError> {
    if payload.get("$type")?.as_str()? != "error" {
        return None;
    }
    let message = payload
        .get("errorMessage")
        .and_then(Value::as_str)
        .unwrap_or("Unspecified remote error")
        .to_string();
    let error_type = payload.get("errorType").and_then(Value::as_str).unwrap_or_default().to_string();
    Some(RemoteError { error_type, message })
}
