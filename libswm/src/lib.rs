//! Wire-level protocol model for SMART Web Messaging.
//!
//! This crate holds the pure data side of the protocol: the [`Envelope`] union
//! exchanged in both directions, collision-resistant [`MessageId`]s, the
//! `$type`-tagged response payloads, and the host-supplied [`HostContext`].
//! The asynchronous engine that moves these types around lives in the
//! `swm-bridge` crate.

pub mod context;
pub mod envelope;
pub mod message_id;
pub mod message_types;
pub mod payload;

pub use context::HostContext;
pub use envelope::{Envelope, RequestEnvelope, ResponseEnvelope};
pub use message_id::MessageId;
pub use payload::{as_remote_error, RemoteError, ResponsePayload};
