//! The startup handshake: retry policy, first-reply-wins, attempt purging.

use super::{response_to, settle, spawn_bridge};
use crate::{BridgeConfig, BridgeError, Handshake, HandshakeState};
use libswm::message_types::STATUS_HANDSHAKE;
use serde_json::json;
use std::time::Duration;

fn quick_config() -> BridgeConfig {
    BridgeConfig::default()
        .with_handshake_retry_interval(Duration::from_millis(100))
        .with_handshake_timeout(Duration::from_secs(10))
}

#[tokio::test(start_paused = true)]
async fn handshake_fails_after_the_overall_deadline() {
    let config = BridgeConfig::default()
        .with_handshake_retry_interval(Duration::from_millis(100))
        .with_handshake_timeout(Duration::from_millis(450));
    let (client, sink, _) = spawn_bridge(config).await;

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, BridgeError::HandshakeTimeout));

    // Every attempt was purged; none survives to fire a timeout later.
    assert_eq!(client.outstanding_requests().await.unwrap(), 0);

    let probes = sink.requests();
    assert!(probes.len() >= 2, "expected repeated probes, got {}", probes.len());
    assert!(probes.iter().all(|probe| probe.message_type == STATUS_HANDSHAKE));
}

#[tokio::test(start_paused = true)]
async fn first_reply_wins_and_purges_the_other_attempts() {
    let (client, sink, _) = spawn_bridge(quick_config()).await;

    let connect = tokio::spawn({
        let client = client.clone();
        async move { client.connect().await }
    });
    settle().await;
    for _ in 0..3 {
        tokio::time::advance(Duration::from_millis(100)).await;
        settle().await;
    }

    let probes = sink.requests();
    assert!(probes.len() >= 3, "expected several probes, got {}", probes.len());

    // The host answers the oldest probe, after later ones already went out.
    client.receive(response_to(&probes[0], json!({"status": "ok"}))).await;
    let payload = connect.await.unwrap().unwrap();
    assert_eq!(payload["status"], "ok");
    assert_eq!(client.outstanding_requests().await.unwrap(), 0);

    // Stragglers answering the purged attempts are no-ops.
    let outbound = sink.sent().len();
    client.receive(response_to(&probes[1], json!({"status": "late"}))).await;
    client.receive(response_to(&probes[2], json!({"status": "later"}))).await;
    settle().await;
    assert_eq!(client.outstanding_requests().await.unwrap(), 0);
    assert_eq!(sink.sent().len(), outbound);
}

#[tokio::test(start_paused = true)]
async fn error_replies_do_not_end_the_probing() {
    let (client, sink, _) = spawn_bridge(quick_config()).await;

    let connect = tokio::spawn({
        let client = client.clone();
        async move { client.connect().await }
    });
    settle().await;

    let first = sink.last_request();
    client
        .receive(response_to(&first, json!({"$type": "error", "errorMessage": "not ready", "errorType": "HostException"})))
        .await;
    settle().await;

    // Still probing: a later attempt goes out and its success resolves the handshake.
    tokio::time::advance(Duration::from_millis(150)).await;
    settle().await;
    let probes = sink.requests();
    assert!(probes.len() >= 2);

    client.receive(response_to(probes.last().unwrap(), json!({"status": "ok"}))).await;
    let payload = connect.await.unwrap().unwrap();
    assert_eq!(payload["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn handshake_reports_its_state_transitions() {
    let config = BridgeConfig::default()
        .with_handshake_retry_interval(Duration::from_millis(100))
        .with_handshake_timeout(Duration::from_millis(300));
    let (client, sink, _) = spawn_bridge(config).await;

    let mut handshake = Handshake::new(client.clone());
    assert_eq!(handshake.state(), HandshakeState::Idle);
    assert!(handshake.run().await.is_err());
    assert_eq!(handshake.state(), HandshakeState::Failed);

    // A failed handshake is not fatal: the engine still serves traffic.
    let mut retry = Handshake::new(client.clone());
    let responder = tokio::spawn({
        let sink = sink.clone();
        let client = client.clone();
        let already_sent = sink.requests().len();
        async move {
            loop {
                let probes = sink.requests();
                if probes.len() > already_sent {
                    client.receive(response_to(probes.last().unwrap(), json!({"status": "ok"}))).await;
                    break;
                }
                tokio::task::yield_now().await;
            }
        }
    });
    let payload = retry.run().await.unwrap();
    assert_eq!(payload["status"], "ok");
    assert_eq!(retry.state(), HandshakeState::Connected);
    responder.await.unwrap();
    assert_eq!(client.outstanding_requests().await.unwrap(), 0);
}
