use crate::client::BridgeClient;
use crate::errors::BridgeError;
use futures::channel::oneshot;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use libswm::message_types::STATUS_HANDSHAKE;
use libswm::MessageId;
use log::*;
use serde_json::{json, Value};
use std::mem;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

/// Lifecycle of the startup liveness probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    Probing,
    Connected,
    Failed,
}

/// Bounded-retry liveness probe establishing that the host is reachable
/// before normal traffic begins.
///
/// While probing, a fresh `status.handshake` request goes out every retry
/// interval. Probes carry no individual timeout: only the overall deadline can
/// fail the handshake. The first successful reply to *any* attempt wins, and
/// every attempt id is purged together on success, failure or deadline, so an
/// abandoned probe can neither leak a pending entry nor fire a spurious
/// timeout later. A host replying to an early attempt after the controller has
/// moved on hits a purged entry and is discarded.
pub struct Handshake {
    client: BridgeClient,
    state: HandshakeState,
    attempts: Vec<MessageId>,
}

impl Handshake {
    pub fn new(client: BridgeClient) -> Self {
        Handshake { client, state: HandshakeState::Idle, attempts: Vec::new() }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub async fn run(&mut self) -> Result<Value, BridgeError> {
        self.state = HandshakeState::Probing;
        let outcome = self.probe().await;
        match &outcome {
            Ok(_) => {
                self.state = HandshakeState::Connected;
                info!("🤝 Host handshake complete");
            }
            Err(err) => {
                self.state = HandshakeState::Failed;
                warn!("Handshake failed: {err}");
            }
        }
        outcome
    }

    async fn probe(&mut self) -> Result<Value, BridgeError> {
        let config = self.client.config();
        let deadline = Instant::now() + config.handshake_timeout;
        let mut probes = interval(config.handshake_retry_interval);
        probes.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut replies = FuturesUnordered::new();
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => {
                    self.abandon().await;
                    return Err(BridgeError::HandshakeTimeout);
                }
                Some(reply) = replies.next(), if !replies.is_empty() => match reply {
                    Ok(Ok(payload)) => {
                        // First reply wins; purge the other outstanding attempts.
                        self.abandon().await;
                        return Ok(payload);
                    }
                    Ok(Err(err)) => debug!("Handshake probe answered with an error: {err}"),
                    Err(oneshot::Canceled) => {}
                },
                _ = probes.tick() => {
                    match self.client.begin_request(STATUS_HANDSHAKE.into(), json!({}), None).await {
                        Ok((message_id, receiver)) => {
                            trace!("Handshake probe sent: {message_id}");
                            self.attempts.push(message_id);
                            replies.push(receiver);
                        }
                        Err(err) => {
                            self.abandon().await;
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    async fn abandon(&mut self) {
        self.client.purge(mem::take(&mut self.attempts)).await;
    }
}
