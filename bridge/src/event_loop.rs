use crate::commands::BridgeCommand;
use crate::delegate::FormDelegate;
use crate::errors::BridgeError;
use crate::sink::MessageSink;
use futures::channel::{mpsc, oneshot};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use libswm::payload::as_remote_error;
use libswm::{message_types, Envelope, HostContext, MessageId, RequestEnvelope, ResponseEnvelope, ResponsePayload};
use log::*;
use serde_json::Value;
use std::collections::HashMap;

/// Bookkeeping for one outstanding request.
struct PendingEntry {
    /// Names the request in timeout errors.
    message_type: String,
    /// Taken on first resolution. While the entry survives (streaming-reply
    /// pattern), later responses find `None` and are no-ops.
    sender: Option<oneshot::Sender<Result<Value, BridgeError>>>,
}

/// The protocol engine proper.
///
/// Owns the pending-request table, the transport sink, the host context and
/// the form delegate, and serializes every state transition: inbound
/// envelopes, outbound sends and timer expirations all pass through
/// [`run`](EventLoop::run) one at a time, so the table needs no locking.
/// Spawn it in its own task and talk to it through a [`crate::BridgeClient`].
pub struct EventLoop<D: FormDelegate> {
    commands: mpsc::Receiver<BridgeCommand>,
    pending: HashMap<MessageId, PendingEntry>,
    expirations: FuturesUnordered<BoxFuture<'static, MessageId>>,
    sink: Option<Box<dyn MessageSink>>,
    context: HostContext,
    delegate: D,
}

impl<D: FormDelegate> EventLoop<D> {
    pub(crate) fn new(commands: mpsc::Receiver<BridgeCommand>, delegate: D) -> Self {
        EventLoop {
            commands,
            pending: HashMap::new(),
            expirations: FuturesUnordered::new(),
            sink: None,
            context: HostContext::new(),
            delegate,
        }
    }

    /// Drive the engine until shutdown or until every client handle is gone.
    /// Pending requests still open at that point fail with
    /// [`BridgeError::EngineStopped`] on the caller's side.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.next() => match command {
                    Some(command) => {
                        if self.handle_command(command) {
                            break;
                        }
                    }
                    None => break,
                },
                Some(message_id) = self.expirations.next(), if !self.expirations.is_empty() => {
                    self.expire_request(message_id);
                }
            }
        }
        debug!("Messaging event loop stopped");
    }

    /// Returns true when the loop should stop.
    fn handle_command(&mut self, command: BridgeCommand) -> bool {
        match command {
            BridgeCommand::Configure { sink } => {
                // Tolerates duplicate initialization in multi-entry environments.
                if self.sink.is_some() {
                    debug!("Transport is already configured. Ignoring.");
                } else {
                    info!("Transport configured");
                    self.sink = Some(sink);
                }
            }
            BridgeCommand::Request { envelope, timeout, sender } => {
                let message_id = envelope.message_id.clone();
                let entry = PendingEntry { message_type: envelope.message_type.clone(), sender: Some(sender) };
                self.pending.insert(message_id.clone(), entry);
                if let Some(timeout) = timeout {
                    self.expirations.push(Box::pin(async move {
                        tokio::time::sleep(timeout).await;
                        message_id
                    }));
                }
                self.emit(&Envelope::Request(envelope));
            }
            BridgeCommand::Event { envelope } => self.emit(&Envelope::Request(envelope)),
            BridgeCommand::Respond { response_to, payload } => {
                self.emit(&Envelope::Response(ResponseEnvelope::new(response_to, payload)));
            }
            BridgeCommand::Deliver { envelope } => self.dispatch(envelope),
            BridgeCommand::Purge { message_ids } => {
                for message_id in message_ids {
                    self.pending.remove(&message_id);
                }
            }
            BridgeCommand::OutstandingRequests { sender } => {
                let _ = sender.send(self.pending.len());
            }
            BridgeCommand::Context { sender } => {
                let _ = sender.send(self.context.values().clone());
            }
            BridgeCommand::Shutdown { sender } => {
                let _ = sender.send(());
                return true;
            }
        }
        false
    }

    fn emit(&self, envelope: &Envelope) {
        match &self.sink {
            Some(sink) => {
                debug!("Sending: {}", envelope.kind());
                sink.send_message(envelope);
            }
            None => warn!("No transport configured. Message dropped: {}", envelope.kind()),
        }
    }

    fn dispatch(&mut self, envelope: Envelope) {
        debug!("Received: {} [{}]", envelope.kind(), envelope.message_id());
        match envelope {
            Envelope::Response(response) => self.resolve_pending(response),
            Envelope::Request(request) => self.handle_host_message(request),
        }
    }

    /// Route a response to its pending entry by `responseToMessageId`.
    fn resolve_pending(&mut self, response: ResponseEnvelope) {
        let Some(entry) = self.pending.get_mut(&response.response_to_message_id) else {
            // Already resolved, timed out, or an abandoned handshake attempt.
            trace!("Discarding response to unknown request {}", response.response_to_message_id);
            return;
        };
        if let Some(sender) = entry.sender.take() {
            let outcome = match as_remote_error(&response.payload) {
                Some(remote) => Err(BridgeError::Remote(remote)),
                None => Ok(response.payload),
            };
            let _ = sender.send(outcome);
        }
        if !response.additional_responses_expected {
            self.pending.remove(&response.response_to_message_id);
        }
    }

    /// Route a host-initiated message and answer it with exactly one response.
    fn handle_host_message(&mut self, request: RequestEnvelope) {
        let payload = match request.message_type.as_str() {
            message_types::SDC_CONFIGURE => {
                debug!("Configuration received");
                ResponsePayload::Base
            }
            message_types::SDC_CONFIGURE_CONTEXT => {
                self.context.merge(&request.payload);
                self.delegate.apply_launch_context(&self.context.launch_context());
                debug!("Host context updated");
                ResponsePayload::Base
            }
            message_types::SDC_DISPLAY_QUESTIONNAIRE => {
                self.display_questionnaire(&request.payload);
                ResponsePayload::Base
            }
            message_types::UI_FORM_REQUEST_SUBMIT => {
                self.delegate.request_submit();
                ResponsePayload::Base
            }
            message_types::UI_FORM_PERSIST => ResponsePayload::Base,
            other => {
                warn!("Unknown message type from host: {other}");
                ResponsePayload::unknown_message_type(other)
            }
        };
        self.emit(&Envelope::Response(ResponseEnvelope::new(request.message_id, payload.into())));
    }

    fn display_questionnaire(&mut self, payload: &Value) {
        if let Some(extra) = payload.get("context") {
            self.context.merge(extra);
        }
        let Some(questionnaire) = payload.get("questionnaire") else {
            error!("No questionnaire in payload");
            return;
        };
        let initial_response = payload.get("questionnaireResponse").cloned();
        self.delegate
            .display_questionnaire(questionnaire.clone(), initial_response, &self.context.launch_context());
    }

    /// A request deadline elapsed. If the entry is still live, fail the caller.
    fn expire_request(&mut self, message_id: MessageId) {
        let Some(entry) = self.pending.remove(&message_id) else {
            return;
        };
        if let Some(sender) = entry.sender {
            warn!("Request timed out: {}", entry.message_type);
            let _ = sender.send(Err(BridgeError::RequestTimeout(entry.message_type)));
        }
    }
}
