//! Room configuration and game lifecycle state.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hard cap on room capacity. Requests above this are rejected.
pub const MAX_CAPACITY: usize = 16;

/// Tunable parameters applied to every room a registry spawns.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Number of players that fills the room and starts the game.
    pub capacity: usize,
    /// Delay between the game starting and the first number.
    pub warmup: Duration,
    /// Cadence between numbers once calling has begun.
    pub call_interval: Duration,
    /// How long a finished room lingers before teardown.
    pub finish_grace: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            warmup: Duration::from_secs(3),
            call_interval: Duration::from_secs(4),
            finish_grace: Duration::from_secs(10),
        }
    }
}

impl RoomConfig {
    /// Returns a copy with out-of-range values clamped.
    pub fn validated(&self) -> Self {
        let mut config = self.clone();
        if config.capacity == 0 {
            tracing::warn!("capacity 0 clamped to 1");
            config.capacity = 1;
        }
        if config.capacity > MAX_CAPACITY {
            tracing::warn!(
                capacity = config.capacity,
                "capacity clamped to {MAX_CAPACITY}"
            );
            config.capacity = MAX_CAPACITY;
        }
        config
    }
}

/// Lifecycle of a single room.
///
/// Transitions are one-way: `Waiting` -> `InProgress` -> `Finished`.
/// A room never returns to an earlier phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Seats are open; the game has not begun.
    Waiting,
    /// The room filled and numbers are being called.
    InProgress,
    /// A player completed a line. The room is read-only until teardown.
    Finished { winner: String },
}

impl GamePhase {
    pub fn is_joinable(&self) -> bool {
        matches!(self, GamePhase::Waiting)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, GamePhase::InProgress)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, GamePhase::Finished { .. })
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            GamePhase::Finished { winner } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Waiting => write!(f, "waiting"),
            GamePhase::InProgress => write!(f, "in-progress"),
            GamePhase::Finished { winner } => write!(f, "finished (winner: {winner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoomConfig::default();
        assert_eq!(config.capacity, 2);
        assert_eq!(config.warmup, Duration::from_secs(3));
        assert_eq!(config.call_interval, Duration::from_secs(4));
        assert_eq!(config.finish_grace, Duration::from_secs(10));
    }

    #[test]
    fn test_validated_clamps_zero_capacity() {
        let config = RoomConfig {
            capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validated().capacity, 1);
    }

    #[test]
    fn test_validated_clamps_oversized_capacity() {
        let config = RoomConfig {
            capacity: 100,
            ..Default::default()
        };
        assert_eq!(config.validated().capacity, MAX_CAPACITY);
    }

    #[test]
    fn test_phase_predicates() {
        assert!(GamePhase::Waiting.is_joinable());
        assert!(!GamePhase::InProgress.is_joinable());
        assert!(GamePhase::InProgress.is_in_progress());

        let finished = GamePhase::Finished {
            winner: "alice".to_string(),
        };
        assert!(finished.is_finished());
        assert!(!finished.is_joinable());
        assert_eq!(finished.winner(), Some("alice"));
        assert_eq!(GamePhase::Waiting.winner(), None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(GamePhase::Waiting.to_string(), "waiting");
        assert_eq!(GamePhase::InProgress.to_string(), "in-progress");
        let finished = GamePhase::Finished {
            winner: "bob".to_string(),
        };
        assert_eq!(finished.to_string(), "finished (winner: bob)");
    }
}
