//! Scenario tests for the bridge engine, run against a paused tokio clock so
//! deadlines elapse in virtual time.

mod handshake;

use crate::{new_bridge, BridgeClient, BridgeConfig, FormDelegate, MessageSink};
use libswm::{Envelope, RequestEnvelope, ResponseEnvelope};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

/// Records every envelope handed to the transport port.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    sent: Arc<Mutex<Vec<Envelope>>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.sent()
            .into_iter()
            .filter_map(|envelope| match envelope {
                Envelope::Request(request) => Some(request),
                Envelope::Response(_) => None,
            })
            .collect()
    }

    pub fn responses(&self) -> Vec<ResponseEnvelope> {
        self.sent()
            .into_iter()
            .filter_map(|envelope| match envelope {
                Envelope::Response(response) => Some(response),
                Envelope::Request(_) => None,
            })
            .collect()
    }

    pub fn last_request(&self) -> RequestEnvelope {
        self.requests().pop().expect("no request was sent")
    }
}

impl MessageSink for RecordingSink {
    fn send_message(&self, message: &Envelope) {
        self.sent.lock().unwrap().push(message.clone());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DelegateCall {
    LaunchContext(Map<String, Value>),
    Display { questionnaire: Value, initial_response: Option<Value> },
    Submit,
}

/// Records every forward to the UI collaborator port.
#[derive(Clone, Default)]
pub(crate) struct RecordingDelegate {
    calls: Arc<Mutex<Vec<DelegateCall>>>,
}

impl RecordingDelegate {
    pub fn calls(&self) -> Vec<DelegateCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl FormDelegate for RecordingDelegate {
    fn apply_launch_context(&mut self, launch_context: &Map<String, Value>) {
        self.calls.lock().unwrap().push(DelegateCall::LaunchContext(launch_context.clone()));
    }

    fn display_questionnaire(
        &mut self,
        questionnaire: Value,
        initial_response: Option<Value>,
        _launch_context: &Map<String, Value>,
    ) {
        self.calls.lock().unwrap().push(DelegateCall::Display { questionnaire, initial_response });
    }

    fn request_submit(&mut self) {
        self.calls.lock().unwrap().push(DelegateCall::Submit);
    }
}

/// Spawn an engine with a recording sink already configured.
pub(crate) async fn spawn_bridge(config: BridgeConfig) -> (BridgeClient, RecordingSink, RecordingDelegate) {
    let _ = env_logger::builder().is_test(true).try_init();
    let delegate = RecordingDelegate::default();
    let (client, event_loop) = new_bridge(config, delegate.clone());
    tokio::spawn(event_loop.run());
    let sink = RecordingSink::default();
    client.init(sink.clone()).await.expect("event loop is running");
    (client, sink, delegate)
}

/// Let the event loop drain everything already queued.
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// A host response answering the given request.
pub(crate) fn response_to(request: &RequestEnvelope, payload: Value) -> Envelope {
    Envelope::Response(ResponseEnvelope::new(request.message_id.clone(), payload))
}
