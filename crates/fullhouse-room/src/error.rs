use fullhouse_protocol::{PlayerId, RoomCode};
use thiserror::Error;

/// Errors surfaced by room and registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("room {0} not found")]
    NotFound(RoomCode),

    #[error("game already started in room {0}")]
    AlreadyStarted(RoomCode),

    #[error("room {0} is full")]
    Full(RoomCode),

    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomCode),

    #[error("player {0} is not in room {1}")]
    NotInRoom(PlayerId, RoomCode),

    #[error("invalid player count: {0}")]
    InvalidCapacity(usize),

    #[error("room {0} is no longer available")]
    Unavailable(RoomCode),
}
