use crate::message_id::MessageId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of the wire protocol, in either direction.
///
/// The two shapes share a single JSON object format and are distinguished
/// structurally rather than by an explicit tag: a response carries
/// `responseToMessageId`, a request/event carries `messageType`. An object
/// with neither field fails to deserialize, which is how malformed traffic is
/// rejected at the boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Response(ResponseEnvelope),
    Request(RequestEnvelope),
}

impl Envelope {
    pub fn message_id(&self) -> &MessageId {
        match self {
            Envelope::Response(response) => &response.message_id,
            Envelope::Request(request) => &request.message_id,
        }
    }

    /// A short label for logging: the message type, or `"response"`.
    pub fn kind(&self) -> &str {
        match self {
            Envelope::Response(_) => "response",
            Envelope::Request(request) => &request.message_type,
        }
    }
}

impl From<RequestEnvelope> for Envelope {
    fn from(request: RequestEnvelope) -> Self {
        Envelope::Request(request)
    }
}

impl From<ResponseEnvelope> for Envelope {
    fn from(response: ResponseEnvelope) -> Self {
        Envelope::Response(response)
    }
}

/// A request or event originated by one side, identified by `messageType`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub message_id: MessageId,
    /// Constant tag distinguishing this protocol's traffic on a shared
    /// transport. Always stamped on engine-originated envelopes; hosts may
    /// omit it on their own messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_handle: Option<String>,
    pub message_type: String,
    #[serde(default)]
    pub payload: Value,
}

impl RequestEnvelope {
    pub fn new(messaging_handle: impl Into<String>, message_type: impl Into<String>, payload: Value) -> Self {
        RequestEnvelope {
            message_id: MessageId::new(),
            messaging_handle: Some(messaging_handle.into()),
            message_type: message_type.into(),
            payload,
        }
    }
}

/// An answer to an earlier envelope, identified by `responseToMessageId`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Correlation runs on `responseToMessageId` alone, so hosts may omit this
    /// on their responses; a fresh id is stamped in when they do.
    #[serde(default)]
    pub message_id: MessageId,
    pub response_to_message_id: MessageId,
    /// When true, the request this answers stays live and may receive further
    /// responses later (streaming-reply pattern).
    #[serde(default)]
    pub additional_responses_expected: bool,
    #[serde(default)]
    pub payload: Value,
}

impl ResponseEnvelope {
    pub fn new(response_to: MessageId, payload: Value) -> Self {
        ResponseEnvelope {
            message_id: MessageId::new(),
            response_to_message_id: response_to,
            additional_responses_expected: false,
            payload,
        }
    }

    pub fn with_additional_responses(mut self, expected: bool) -> Self {
        self.additional_responses_expected = expected;
        self
    }
}
