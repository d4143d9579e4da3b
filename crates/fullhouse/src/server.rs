//! `FullhouseServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → rooms. Each
//! accepted connection gets its own handler task; room teardown runs on
//! a background reaper task.

use std::sync::Arc;

use fullhouse_protocol::JsonCodec;
use fullhouse_room::{RoomConfig, RoomRegistry, run_reaper};
use fullhouse_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::FullhouseError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) rooms: Arc<Mutex<RoomRegistry>>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Fullhouse server.
///
/// # Example
///
/// ```rust,ignore
/// let server = FullhouseServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct FullhouseServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl FullhouseServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room defaults (timers, grace period).
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the transport and starts the room reaper.
    pub async fn build(self) -> Result<FullhouseServer, FullhouseError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let grace = self.room_config.finish_grace;
        let (registry, lifecycle) = RoomRegistry::new(self.room_config);
        let rooms = Arc::new(Mutex::new(registry));
        tokio::spawn(run_reaper(Arc::clone(&rooms), lifecycle, grace));

        let state = Arc::new(ServerState {
            rooms,
            codec: JsonCodec,
        });

        Ok(FullhouseServer { transport, state })
    }
}

impl Default for FullhouseServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Fullhouse game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FullhouseServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl FullhouseServer {
    pub fn builder() -> FullhouseServerBuilder {
        FullhouseServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task per connection. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), FullhouseError> {
        tracing::info!("Fullhouse server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
