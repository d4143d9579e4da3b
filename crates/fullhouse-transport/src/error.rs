/// Failures surfaced by the WebSocket transport.
///
/// Each variant maps to one phase of a connection's life: binding the
/// listener and completing handshakes, pushing frames out, and pulling
/// frames in. Peer-initiated closes are not errors; `recv` reports
/// those as end-of-stream.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listener or completing a WebSocket handshake failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// Writing a frame to the peer failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading a frame from the peer failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
