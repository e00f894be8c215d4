use libswm::Envelope;

/// The transport adapter port: the single injected emitter for outbound
/// envelopes.
///
/// Each call receives one complete structured envelope; serializing it to a
/// wire form, if the transport needs one, is the adapter's responsibility.
/// Adapters for native bridges, iframe `postMessage`, WebSockets and the like
/// all reduce to this one function.
pub trait MessageSink: Send + 'static {
    fn send_message(&self, message: &Envelope);
}

impl<F> MessageSink for F
where
    F: Fn(&Envelope) + Send + 'static,
{
    fn send_message(&self, message: &Envelope) {
        self(message)
    }
}
