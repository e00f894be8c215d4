use libswm::RemoteError;
use thiserror::Error;

/// Faults surfaced to callers awaiting a correlated request.
///
/// Transport misconfiguration and malformed inbound traffic are deliberately
/// absent: those have no interested caller and are logged and swallowed at the
/// point of detection.
#[derive(Clone, Debug, Error)]
pub enum BridgeError {
    /// No matching response arrived within the request deadline.
    #[error("Request timeout: {0}")]
    RequestTimeout(String),
    /// The host explicitly answered with an error-shaped payload.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// The overall handshake deadline elapsed with no reply from the host.
    #[error("Handshake timeout")]
    HandshakeTimeout,
    /// The event loop has stopped and can no longer service commands.
    #[error("The messaging engine is not running")]
    EngineStopped,
}
