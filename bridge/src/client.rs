use crate::commands::BridgeCommand;
use crate::config::BridgeConfig;
use crate::delegate::FormDelegate;
use crate::errors::BridgeError;
use crate::event_loop::EventLoop;
use crate::handshake::Handshake;
use crate::sink::MessageSink;
use futures::channel::{mpsc, oneshot};
use futures::SinkExt;
use libswm::{message_types, Envelope, MessageId, RequestEnvelope};
use log::*;
use serde_json::{Map, Value};
use std::time::Duration;

/// Create the bridge components:
///
/// - the cheaply cloneable [`BridgeClient`] for use anywhere in the application,
/// - the [`EventLoop`] driving the engine itself.
///
/// Spawn the event loop (`tokio::spawn(event_loop.run())`) before using the
/// client.
pub fn new_bridge<D: FormDelegate>(config: BridgeConfig, delegate: D) -> (BridgeClient, EventLoop<D>) {
    let (sender, receiver) = mpsc::channel(0);
    (BridgeClient { sender, config }, EventLoop::new(receiver, delegate))
}

/// A sender interface to the bridge event loop.
///
/// This struct does no protocol work itself: every method forwards a command
/// to the [`EventLoop`] and, where an answer is expected, awaits the oneshot
/// reply. It is thread-safe and can be cloned freely.
#[derive(Clone)]
pub struct BridgeClient {
    sender: mpsc::Sender<BridgeCommand>,
    config: BridgeConfig,
}

impl BridgeClient {
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Register the transport adapter. Idempotent: the first sink wins and
    /// later calls are ignored, tolerating duplicate initialization.
    pub async fn init<S: MessageSink>(&self, sink: S) -> Result<(), BridgeError> {
        self.send_command(BridgeCommand::Configure { sink: Box::new(sink) }).await
    }

    /// Run the startup handshake: probe the host every retry interval until it
    /// answers or the overall deadline elapses. A failed handshake leaves the
    /// engine fully usable for direct request/response traffic.
    pub async fn connect(&self) -> Result<Value, BridgeError> {
        Handshake::new(self.clone()).run().await
    }

    /// Send a request and await the correlated response payload.
    ///
    /// Exactly one of three outcomes eventually occurs: the response payload,
    /// a [`BridgeError::Remote`] carrying the host's error message, or a
    /// [`BridgeError::RequestTimeout`] naming the message type.
    pub async fn send_request(&self, message_type: impl Into<String>, payload: Value) -> Result<Value, BridgeError> {
        let (_, receiver) =
            self.begin_request(message_type.into(), payload, Some(self.config.request_timeout)).await?;
        receiver.await.map_err(|_| BridgeError::EngineStopped)?
    }

    /// Fire-and-forget: emit a request-shaped envelope without registering a
    /// pending entry. No reply is expected or awaited.
    pub async fn send_event(&self, message_type: impl Into<String>, payload: Value) -> Result<(), BridgeError> {
        let envelope = self.request_envelope(message_type.into(), payload);
        self.send_command(BridgeCommand::Event { envelope }).await
    }

    /// Answer a host-initiated message. The response envelope closes the
    /// exchange (`additionalResponsesExpected = false`).
    pub async fn send_response(&self, response_to: MessageId, payload: Value) -> Result<(), BridgeError> {
        self.send_command(BridgeCommand::Respond { response_to, payload }).await
    }

    /// Submit a completed form and await the host's acknowledgment. Shaping
    /// the submission payload is the caller's concern.
    pub async fn submit_form(&self, payload: Value) -> Result<Value, BridgeError> {
        self.send_request(message_types::FORM_SUBMITTED, payload).await
    }

    /// Deliver an inbound envelope from the host adapter. Never raises: if the
    /// engine is gone the message is logged and dropped.
    pub async fn receive(&self, envelope: Envelope) {
        if self.send_command(BridgeCommand::Deliver { envelope }).await.is_err() {
            warn!("Inbound message dropped: the messaging engine is not running");
        }
    }

    /// Inbound entry point for adapters that deliver structured data.
    pub async fn receive_value(&self, message: Value) {
        match serde_json::from_value(message) {
            Ok(envelope) => self.receive(envelope).await,
            Err(err) => error!("Failed to parse inbound message: {err}"),
        }
    }

    /// Inbound entry point for transports that can only carry text. Malformed
    /// text is logged and dropped rather than propagated.
    pub async fn receive_text(&self, message: &str) {
        match serde_json::from_str(message) {
            Ok(envelope) => self.receive(envelope).await,
            Err(err) => error!("Failed to parse inbound message: {err}"),
        }
    }

    /// Number of requests still awaiting a response.
    pub async fn outstanding_requests(&self) -> Result<usize, BridgeError> {
        let (sender, receiver) = oneshot::channel();
        self.send_command(BridgeCommand::OutstandingRequests { sender }).await?;
        receiver.await.map_err(|_| BridgeError::EngineStopped)
    }

    /// Snapshot of the last-known host context.
    pub async fn context(&self) -> Result<Map<String, Value>, BridgeError> {
        let (sender, receiver) = oneshot::channel();
        self.send_command(BridgeCommand::Context { sender }).await?;
        receiver.await.map_err(|_| BridgeError::EngineStopped)
    }

    /// Stop the event loop. Requests still in flight fail with
    /// [`BridgeError::EngineStopped`].
    pub async fn shutdown(&self) -> Result<(), BridgeError> {
        let (sender, receiver) = oneshot::channel();
        self.send_command(BridgeCommand::Shutdown { sender }).await?;
        receiver.await.map_err(|_| BridgeError::EngineStopped)
    }

    /// Register a pending entry and emit the request, returning its id and the
    /// receiver that resolves it. `timeout: None` skips the per-request
    /// deadline; the handshake uses this for its probes.
    pub(crate) async fn begin_request(
        &self,
        message_type: String,
        payload: Value,
        timeout: Option<Duration>,
    ) -> Result<(MessageId, oneshot::Receiver<Result<Value, BridgeError>>), BridgeError> {
        let envelope = self.request_envelope(message_type, payload);
        let message_id = envelope.message_id.clone();
        let (sender, receiver) = oneshot::channel();
        self.send_command(BridgeCommand::Request { envelope, timeout, sender }).await?;
        Ok((message_id, receiver))
    }

    /// Drop pending entries without resolving them (handshake abandonment).
    pub(crate) async fn purge(&self, message_ids: Vec<MessageId>) {
        if message_ids.is_empty() {
            return;
        }
        let _ = self.send_command(BridgeCommand::Purge { message_ids }).await;
    }

    async fn send_command(&self, command: BridgeCommand) -> Result<(), BridgeError> {
        self.sender.clone().send(command).await.map_err(|_| BridgeError::EngineStopped)
    }

    fn request_envelope(&self, message_type: String, payload: Value) -> RequestEnvelope {
        RequestEnvelope::new(self.config.messaging_handle.clone(), message_type, payload)
    }
}
