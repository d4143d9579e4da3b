//! # Fullhouse
//!
//! Server-authoritative multiplayer bingo over WebSockets.
//!
//! The server owns every card, mark, and draw: clients send commands
//! and render the events that come back. Rooms are keyed by shareable
//! six-character codes, fill through matchmaking or direct joins, and
//! tear themselves down when they finish or empty out.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use fullhouse::prelude::*;
//!
//! # async fn run() -> Result<(), FullhouseError> {
//! let server = FullhouseServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::FullhouseError;
pub use server::{FullhouseServer, FullhouseServerBuilder};

pub mod prelude {
    pub use crate::{FullhouseError, FullhouseServer, FullhouseServerBuilder};
    pub use fullhouse_board::{Card, Marks, has_line};
    pub use fullhouse_protocol::{
        ClientCommand, Codec, JsonCodec, PlayerId, RoomCode, RoomSnapshot, ServerEvent,
    };
    pub use fullhouse_room::{GamePhase, RoomConfig, RoomError};
}
