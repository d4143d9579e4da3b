//! Wire protocol for Fullhouse.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`ClientCommand`], [`ServerEvent`], [`RoomCode`], etc.) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding.
//!
//! The protocol layer sits between transport (raw frames) and the room
//! engine. It doesn't know about connections or rooms — it only knows how
//! to serialize and deserialize messages.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientCommand, PlayerId, PlayerSnapshot, PlayerSummary, RoomCode, RoomSnapshot,
    ServerEvent,
};
