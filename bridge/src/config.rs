use libswm::message_types::MESSAGING_HANDLE;
use std::time::Duration;

/// Default deadline for a correlated request to receive its response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);
/// Default pause between handshake probes.
pub const DEFAULT_HANDSHAKE_RETRY_INTERVAL: Duration = Duration::from_millis(1_000);
/// Default overall deadline for the startup handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Tunables for the bridge engine.
///
/// The defaults match production hosts; tests compress them via the `with_*`
/// setters rather than waiting out real deadlines.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Stamped on every engine-originated request/event envelope.
    pub messaging_handle: String,
    pub request_timeout: Duration,
    pub handshake_retry_interval: Duration,
    pub handshake_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            messaging_handle: MESSAGING_HANDLE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            handshake_retry_interval: DEFAULT_HANDSHAKE_RETRY_INTERVAL,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    pub fn with_messaging_handle(mut self, handle: impl Into<String>) -> Self {
        self.messaging_handle = handle.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_handshake_retry_interval(mut self, interval: Duration) -> Self {
        self.handshake_retry_interval = interval;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }
}
