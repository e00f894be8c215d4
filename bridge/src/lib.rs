//! Message-correlation engine between a form component and a SMART Web
//! Messaging host.
//!
//! # Architecture
//!
//! The engine is split the usual way for this kind of plumbing:
//!
//! - [`EventLoop`]: owns all mutable protocol state (the pending-request
//!   table, the transport sink, the host context) and serializes every state
//!   transition; run it in its own task.
//!
//! - [`BridgeClient`]: a cheaply cloneable handle that turns fire-and-forget
//!   sends into awaitable request/response pairs by passing commands (each
//!   carrying a oneshot reply slot) to the event loop.
//!
//! - [`Handshake`]: the bounded-retry liveness probe run once at startup via
//!   [`BridgeClient::connect`].
//!
//! Two ports are injected: the transport adapter as a [`MessageSink`] (the
//! engine is inert until [`BridgeClient::init`] configures it, and later
//! configuration attempts are ignored), and the visual form component as a
//! [`FormDelegate`].
//!
//! No fault in this layer terminates the process: transport and parse issues
//! are logged and dropped, correlated request faults surface as a
//! [`BridgeError`] to the caller, and unknown host message types are answered
//! on the wire.

mod client;
mod commands;
mod config;
mod delegate;
mod errors;
mod event_loop;
mod handshake;
mod sink;

#[cfg(test)]
mod tests;

pub use client::{new_bridge, BridgeClient};
pub use config::{
    BridgeConfig, DEFAULT_HANDSHAKE_RETRY_INTERVAL, DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};
pub use delegate::{FormDelegate, NullFormDelegate};
pub use errors::BridgeError;
pub use event_loop::EventLoop;
pub use handshake::{Handshake, HandshakeState};
pub use sink::MessageSink;
