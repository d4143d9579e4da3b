//! Core protocol types for the Fullhouse wire format.
//!
//! The wire shape follows the original event-channel protocol the web
//! client speaks: commands and events are internally tagged objects with
//! kebab-case `type` tags and camelCase fields, e.g.
//! `{ "type": "join-room", "playerId": "alice", "roomId": "AB12CD" }`.

use fullhouse_board::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque per-connection player identity.
///
/// Assigned by the server from the transport connection id; never chosen
/// by clients. Display names are plain strings in payloads and are not
/// unique — all routing keys off this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A short room code: 6 characters, uppercase letters and digits.
///
/// Codes arriving from clients are normalized (trimmed, uppercased) at
/// construction, so `" ab12cd "` and `"AB12CD"` name the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Code length in characters.
    pub const LEN: usize = 6;

    /// The characters codes are drawn from.
    pub const ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Builds a code from client input, normalizing whitespace and case.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    /// The normalized code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Inbound commands
// ---------------------------------------------------------------------------

/// A command sent by a client to the game engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Find an open room with this capacity, or create one.
    JoinMatchmaking { player_id: String, player_count: usize },

    /// Explicitly create a room with the given capacity.
    CreateRoom { player_id: String, max_players: usize },

    /// Join a specific room by its code.
    JoinRoom { player_id: String, room_id: String },

    /// Mark a called number on the sender's card.
    MarkNumber { number: u8 },

    /// Claim a win. The server re-checks the claimant's actual card;
    /// the claim itself never assigns a winner.
    ClaimWin { player: String },
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// A player's id/name pair as sent in the game-started roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
}

/// One player's entry in a room snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub name: String,
    pub board: Card,
}

/// The full room state sent back to a room creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub id: RoomCode,
    pub players: Vec<PlayerSnapshot>,
    /// Display name of the first player to join (informational).
    pub host: String,
    pub max_players: usize,
    pub game_started: bool,
    pub called_numbers: Vec<u8>,
    pub current_number: Option<u8>,
    pub winner: Option<String>,
}

/// An event broadcast by the server to one connection or a whole room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Sent to the requester only after an explicit create-room.
    RoomCreated { room_id: RoomCode, room: RoomSnapshot },

    /// Sent to the whole room (including the joiner) on every join.
    PlayerJoined {
        player: String,
        player_count: usize,
        max_players: usize,
    },

    /// Sent to the whole room when capacity is reached.
    GameStarted {
        players: Vec<PlayerSummary>,
        room_id: RoomCode,
    },

    /// Sent to the whole room on each draw.
    NumberCalled { number: u8 },

    /// Sent to the whole room when a winner is declared.
    PlayerWon { player: String, game_ended: bool },

    /// Sent to the whole room when a player disconnects.
    PlayerLeft {
        player_count: usize,
        max_players: usize,
    },

    /// Sent to the requester only.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The web client depends on exact JSON shapes — kebab-case tags and
    //! camelCase fields. These tests pin the serde attributes down.

    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_room_code_normalizes_case_and_whitespace() {
        assert_eq!(RoomCode::new(" ab12cd "), RoomCode::new("AB12CD"));
        assert_eq!(RoomCode::new(" ab12cd ").as_str(), "AB12CD");
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomCode::new("xy99zz")).unwrap();
        assert_eq!(json, "\"XY99ZZ\"");
    }

    #[test]
    fn test_room_code_display() {
        assert_eq!(RoomCode::new("ab12cd").to_string(), "AB12CD");
    }

    // =====================================================================
    // ClientCommand — wire shape per variant
    // =====================================================================

    #[test]
    fn test_join_matchmaking_json_format() {
        let cmd: ClientCommand = serde_json::from_str(
            r#"{ "type": "join-matchmaking", "playerId": "alice", "playerCount": 4 }"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            ClientCommand::JoinMatchmaking {
                player_id: "alice".into(),
                player_count: 4,
            }
        );
    }

    #[test]
    fn test_create_room_json_format() {
        let cmd: ClientCommand = serde_json::from_str(
            r#"{ "type": "create-room", "playerId": "bob", "maxPlayers": 2 }"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            ClientCommand::CreateRoom {
                player_id: "bob".into(),
                max_players: 2,
            }
        );
    }

    #[test]
    fn test_join_room_json_format() {
        let cmd: ClientCommand = serde_json::from_str(
            r#"{ "type": "join-room", "playerId": "carol", "roomId": " ab12cd " }"#,
        )
        .unwrap();
        // The raw string is preserved; normalization happens at RoomCode
        // construction in the registry.
        assert_eq!(
            cmd,
            ClientCommand::JoinRoom {
                player_id: "carol".into(),
                room_id: " ab12cd ".into(),
            }
        );
    }

    #[test]
    fn test_mark_number_round_trip() {
        let cmd = ClientCommand::MarkNumber { number: 42 };
        let bytes = serde_json::to_vec(&cmd).unwrap();
        let decoded: ClientCommand = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cmd, decoded);
    }

    #[test]
    fn test_claim_win_round_trip() {
        let cmd = ClientCommand::ClaimWin { player: "dave".into() };
        let bytes = serde_json::to_vec(&cmd).unwrap();
        let decoded: ClientCommand = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cmd, decoded);
    }

    // =====================================================================
    // ServerEvent — wire shape per variant
    // =====================================================================

    #[test]
    fn test_player_joined_json_format() {
        let ev = ServerEvent::PlayerJoined {
            player: "alice".into(),
            player_count: 2,
            max_players: 4,
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "player-joined");
        assert_eq!(json["player"], "alice");
        assert_eq!(json["playerCount"], 2);
        assert_eq!(json["maxPlayers"], 4);
    }

    #[test]
    fn test_number_called_json_format() {
        let ev = ServerEvent::NumberCalled { number: 17 };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "number-called");
        assert_eq!(json["number"], 17);
    }

    #[test]
    fn test_player_won_json_format() {
        let ev = ServerEvent::PlayerWon {
            player: "bob".into(),
            game_ended: true,
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "player-won");
        assert_eq!(json["player"], "bob");
        assert_eq!(json["gameEnded"], true);
    }

    #[test]
    fn test_game_started_json_format() {
        let ev = ServerEvent::GameStarted {
            players: vec![PlayerSummary {
                id: "alice".into(),
                name: "alice".into(),
            }],
            room_id: RoomCode::new("AB12CD"),
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "game-started");
        assert_eq!(json["roomId"], "AB12CD");
        assert_eq!(json["players"][0]["name"], "alice");
    }

    #[test]
    fn test_room_created_carries_snapshot() {
        let ev = ServerEvent::RoomCreated {
            room_id: RoomCode::new("AB12CD"),
            room: RoomSnapshot {
                id: RoomCode::new("AB12CD"),
                players: vec![],
                host: "alice".into(),
                max_players: 2,
                game_started: false,
                called_numbers: vec![],
                current_number: None,
                winner: None,
            },
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "room-created");
        assert_eq!(json["room"]["host"], "alice");
        assert_eq!(json["room"]["maxPlayers"], 2);
        assert_eq!(json["room"]["gameStarted"], false);
        assert!(json["room"]["winner"].is_null());
    }

    #[test]
    fn test_error_event_round_trip() {
        let ev = ServerEvent::Error {
            message: "Room not found".into(),
        };
        let bytes = serde_json::to_vec(&ev).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ev, decoded);
    }

    #[test]
    fn test_player_left_round_trip() {
        let ev = ServerEvent::PlayerLeft {
            player_count: 1,
            max_players: 2,
        };
        let bytes = serde_json::to_vec(&ev).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ev, decoded);
    }

    // =====================================================================
    // Error cases — malformed input
    // =====================================================================

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<ClientCommand, _> = serde_json::from_slice(garbage);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_unknown_command_type_returns_error() {
        let unknown = r#"{"type": "teleport", "x": 9000}"#;
        let result: Result<ClientCommand, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_field_returns_error() {
        let missing = r#"{"type": "join-room", "playerId": "alice"}"#;
        let result: Result<ClientCommand, _> = serde_json::from_str(missing);
        assert!(result.is_err());
    }
}
