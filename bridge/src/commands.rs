use crate::errors::BridgeError;
use crate::sink::MessageSink;
use futures::channel::oneshot;
use libswm::{Envelope, MessageId, RequestEnvelope};
use serde_json::{Map, Value};
use std::time::Duration;

/// The set of commands the [`crate::BridgeClient`] can send to the event loop.
///
/// There is typically one client method per variant; commands expecting an
/// answer carry a oneshot reply slot.
pub(crate) enum BridgeCommand {
    /// Register the transport adapter. Executed via [`crate::BridgeClient::init`];
    /// ignored if a sink is already configured.
    Configure { sink: Box<dyn MessageSink> },
    /// Register a pending entry and emit the request envelope. A `timeout` of
    /// `None` leaves expiry to the caller (handshake probes answer only to the
    /// overall handshake deadline).
    Request {
        envelope: RequestEnvelope,
        timeout: Option<Duration>,
        sender: oneshot::Sender<Result<Value, BridgeError>>,
    },
    /// Emit a fire-and-forget event envelope. No pending entry, no reply.
    Event { envelope: RequestEnvelope },
    /// Emit a response envelope answering a host-initiated message.
    Respond { response_to: MessageId, payload: Value },
    /// An inbound envelope delivered by the host adapter.
    Deliver { envelope: Envelope },
    /// Drop the given pending entries without resolving them.
    Purge { message_ids: Vec<MessageId> },
    /// Number of requests still awaiting a response.
    OutstandingRequests { sender: oneshot::Sender<usize> },
    /// Snapshot of the last-known host context.
    Context { sender: oneshot::Sender<Map<String, Value>> },
    /// Stop the event loop. Outstanding requests are dropped.
    Shutdown { sender: oneshot::Sender<()> },
}
