//! Per-connection handler: command decoding, dispatch, event delivery.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The loop interleaves two sources:
//!   - inbound frames from the socket, decoded into [`ClientCommand`]s
//!     and dispatched to the room registry
//!   - outbound [`ServerEvent`]s from the player's room, encoded and
//!     written back to the socket
//!
//! Player identity is derived from the connection id and never trusted
//! from payloads: `claim-win` and `mark-number` act on the sender's own
//! seat regardless of what the message claims.

use std::sync::Arc;

use fullhouse_protocol::{ClientCommand, Codec, PlayerId, ServerEvent};
use fullhouse_room::EventSender;
use fullhouse_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::FullhouseError;
use crate::server::ServerState;

/// Drop guard that removes the player from their room when the handler
/// exits. Since `Drop` is synchronous, cleanup runs on a spawned task.
struct DisconnectGuard {
    player: PlayerId,
    state: Arc<ServerState>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let player = self.player;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.rooms.lock().await.disconnect(player).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), FullhouseError> {
    let player = PlayerId(conn.id().into_inner());
    tracing::debug!(conn_id = %conn.id(), %player, "handling new connection");

    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let _guard = DisconnectGuard {
        player,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            incoming = conn.recv() => {
                let data = match incoming {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player, error = %e, "recv error");
                        break;
                    }
                };

                match state.codec.decode::<ClientCommand>(&data) {
                    Ok(cmd) => dispatch(&state, player, cmd, &events_tx).await,
                    Err(e) => {
                        tracing::debug!(%player, error = %e, "failed to decode command");
                        let _ = events_tx.send(ServerEvent::Error {
                            message: "invalid message format".to_string(),
                        });
                    }
                }
            }

            event = events_rx.recv() => {
                // The handler holds a sender clone, so this never yields None.
                let Some(event) = event else { break };
                let bytes = state.codec.encode(&event)?;
                if let Err(e) = conn.send(&bytes).await {
                    tracing::debug!(%player, error = %e, "send failed, closing");
                    break;
                }
            }
        }
    }

    // _guard drops here → room leave fires.
    Ok(())
}

/// Routes a decoded command to the registry. Errors become error events
/// on the requester's own channel; in-game commands that cannot be
/// honored are dropped silently.
async fn dispatch(
    state: &Arc<ServerState>,
    player: PlayerId,
    cmd: ClientCommand,
    events_tx: &EventSender,
) {
    match cmd {
        ClientCommand::JoinMatchmaking {
            player_id: name,
            player_count,
        } => {
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms
                    .join_matchmaking(player, name, player_count, events_tx.clone())
                    .await
            };
            if let Err(e) = result {
                send_error(events_tx, &e.to_string());
            }
        }

        ClientCommand::CreateRoom {
            player_id: name,
            max_players,
        } => {
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms
                    .create_room(player, name, max_players, events_tx.clone())
                    .await
            };
            match result {
                Ok((code, room)) => {
                    // Requester only; joins are broadcast separately.
                    let _ = events_tx.send(ServerEvent::RoomCreated {
                        room_id: code,
                        room,
                    });
                }
                Err(e) => send_error(events_tx, &e.to_string()),
            }
        }

        ClientCommand::JoinRoom {
            player_id: name,
            room_id,
        } => {
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms
                    .join_by_code(player, name, &room_id, events_tx.clone())
                    .await
            };
            if let Err(e) = result {
                send_error(events_tx, &e.to_string());
            }
        }

        ClientCommand::MarkNumber { number } => {
            state.rooms.lock().await.route_mark(player, number).await;
        }

        ClientCommand::ClaimWin { .. } => {
            // The payload names a player; the server verifies the
            // sender's seat instead.
            state.rooms.lock().await.route_claim(player).await;
        }
    }
}

fn send_error(events_tx: &EventSender, message: &str) {
    let _ = events_tx.send(ServerEvent::Error {
        message: message.to_string(),
    });
}
