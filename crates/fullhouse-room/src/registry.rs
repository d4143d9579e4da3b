//! Room registry: code allocation, matchmaking, routing, and teardown.
//!
//! The registry owns the `RoomCode -> RoomHandle` map plus a reverse
//! `PlayerId -> RoomCode` index. It holds no game state itself; each
//! room actor is authoritative for its own game.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use fullhouse_protocol::{PlayerId, RoomCode, RoomSnapshot};
use rand::Rng;
use tokio::sync::{Mutex, mpsc};

use crate::config::{MAX_CAPACITY, RoomConfig};
use crate::error::RoomError;
use crate::room::{EventSender, RoomHandle, RoomInfo, RoomLifecycle, spawn_room};

pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
    /// Reverse index: which room each connected player sits in.
    members: HashMap<PlayerId, RoomCode>,
    defaults: RoomConfig,
    lifecycle: mpsc::UnboundedSender<RoomLifecycle>,
}

impl RoomRegistry {
    /// Creates a registry and the lifecycle event stream its rooms will
    /// report into. Feed the receiver to [`run_reaper`].
    pub fn new(defaults: RoomConfig) -> (Self, mpsc::UnboundedReceiver<RoomLifecycle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = Self {
            rooms: HashMap::new(),
            members: HashMap::new(),
            defaults: defaults.validated(),
            lifecycle: tx,
        };
        (registry, rx)
    }

    /// Creates a room with a fresh code and seats the creator in it.
    ///
    /// The creator's own join is silent: they learn about the room from
    /// the returned snapshot, not from a `player-joined` broadcast.
    pub async fn create_room(
        &mut self,
        player: PlayerId,
        name: String,
        capacity: usize,
        sender: EventSender,
    ) -> Result<(RoomCode, RoomSnapshot), RoomError> {
        self.open_room(player, name, capacity, sender, false).await
    }

    /// Shared room-opening path for explicit creates and matchmaking
    /// fallbacks; only the `player-joined` announcement differs.
    async fn open_room(
        &mut self,
        player: PlayerId,
        name: String,
        capacity: usize,
        sender: EventSender,
        announce: bool,
    ) -> Result<(RoomCode, RoomSnapshot), RoomError> {
        self.ensure_unassigned(player)?;
        let capacity = check_capacity(capacity)?;

        let code = self.generate_code();
        let config = RoomConfig {
            capacity,
            ..self.defaults.clone()
        };
        let handle = spawn_room(code.clone(), config, self.lifecycle.clone());
        handle.join(player, name, sender, announce).await?;

        self.rooms.insert(code.clone(), handle.clone());
        self.members.insert(player, code.clone());
        tracing::info!(room = %code, capacity, "room created");

        let snapshot = handle.snapshot().await?;
        Ok((code, snapshot))
    }

    /// First-fit matchmaking: joins the first open room with the
    /// requested capacity, or creates one if none exists.
    pub async fn join_matchmaking(
        &mut self,
        player: PlayerId,
        name: String,
        capacity: usize,
        sender: EventSender,
    ) -> Result<RoomCode, RoomError> {
        self.ensure_unassigned(player)?;
        let capacity = check_capacity(capacity)?;

        let mut candidates = Vec::new();
        for (code, handle) in &self.rooms {
            let Ok(info) = handle.get_info().await else {
                continue;
            };
            if info.phase.is_joinable()
                && info.capacity == capacity
                && info.player_count < capacity
            {
                candidates.push((code.clone(), handle.clone()));
            }
        }

        for (code, handle) in candidates {
            // The room may have filled between the info read and the
            // join; try the next candidate if it did.
            if handle
                .join(player, name.clone(), sender.clone(), true)
                .await
                .is_ok()
            {
                self.members.insert(player, code.clone());
                tracing::info!(room = %code, %player, "matched into existing room");
                return Ok(code);
            }
        }

        let (code, _) = self.open_room(player, name, capacity, sender, true).await?;
        Ok(code)
    }

    /// Joins a room by its shareable code. Input is normalized before
    /// lookup, so lowercase and padded codes work.
    pub async fn join_by_code(
        &mut self,
        player: PlayerId,
        name: String,
        raw_code: &str,
        sender: EventSender,
    ) -> Result<RoomCode, RoomError> {
        self.ensure_unassigned(player)?;
        let code = RoomCode::new(raw_code);
        let handle = self
            .rooms
            .get(&code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.join(player, name, sender, true).await?;
        self.members.insert(player, code.clone());
        Ok(code)
    }

    /// Routes a mark to the player's room. A mark from a player in no
    /// room is dropped: their room may have been torn down moments ago.
    pub async fn route_mark(&self, player: PlayerId, number: u8) {
        let Some(handle) = self.handle_for(player) else {
            tracing::debug!(%player, number, "mark from player with no room");
            return;
        };
        let _ = handle.mark(player, number).await;
    }

    /// Routes a win claim to the player's room, same drop semantics as
    /// [`route_mark`](Self::route_mark).
    pub async fn route_claim(&self, player: PlayerId) {
        let Some(handle) = self.handle_for(player) else {
            tracing::debug!(%player, "win claim from player with no room");
            return;
        };
        let _ = handle.claim_win(player).await;
    }

    /// Removes a disconnected player from their room, if any. Never an
    /// error: disconnects race against everything.
    pub async fn disconnect(&mut self, player: PlayerId) {
        let Some(code) = self.members.remove(&player) else {
            return;
        };
        if let Some(handle) = self.rooms.get(&code) {
            let _ = handle.leave(player).await;
        }
    }

    /// Shuts down a room and drops every index entry pointing at it.
    pub async fn destroy_room(&mut self, code: &RoomCode) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        self.members.retain(|_, c| c != code);
        let _ = handle.shutdown().await;
        tracing::info!(room = %code, "room destroyed");
        Ok(())
    }

    pub async fn room_info(&self, code: &RoomCode) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.get_info().await
    }

    pub async fn room_snapshot(&self, code: &RoomCode) -> Result<RoomSnapshot, RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.snapshot().await
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn player_room(&self, player: PlayerId) -> Option<&RoomCode> {
        self.members.get(&player)
    }

    fn handle_for(&self, player: PlayerId) -> Option<&RoomHandle> {
        self.members
            .get(&player)
            .and_then(|code| self.rooms.get(code))
    }

    fn ensure_unassigned(&self, player: PlayerId) -> Result<(), RoomError> {
        match self.members.get(&player) {
            Some(code) => Err(RoomError::AlreadyInRoom(player, code.clone())),
            None => Ok(()),
        }
    }

    /// Draws random codes until one misses the registry. Collisions are
    /// vanishingly rare (36^6 codes), so the loop is effectively single
    /// iteration.
    fn generate_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let raw: String = (0..RoomCode::LEN)
                .map(|_| {
                    let idx = rng.random_range(0..RoomCode::ALPHABET.len());
                    RoomCode::ALPHABET[idx] as char
                })
                .collect();
            let code = RoomCode::new(&raw);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}

fn check_capacity(capacity: usize) -> Result<usize, RoomError> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return Err(RoomError::InvalidCapacity(capacity));
    }
    Ok(capacity)
}

/// Drives room teardown from lifecycle events.
///
/// Empty rooms are destroyed immediately. Finished rooms linger for
/// `grace` so clients can show the result before the code stops
/// resolving. Runs until every registry clone (and thus every room's
/// lifecycle sender) is gone.
pub async fn run_reaper(
    registry: Arc<Mutex<RoomRegistry>>,
    mut events: mpsc::UnboundedReceiver<RoomLifecycle>,
    grace: Duration,
) {
    while let Some(event) = events.recv().await {
        match event {
            RoomLifecycle::Empty(code) => {
                let mut registry = registry.lock().await;
                if registry.destroy_room(&code).await.is_ok() {
                    tracing::debug!(room = %code, "empty room reaped");
                }
            }
            RoomLifecycle::Finished(code) => {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    tokio::time::sleep(grace).await;
                    let mut registry = registry.lock().await;
                    if registry.destroy_room(&code).await.is_ok() {
                        tracing::debug!(room = %code, "finished room reaped after grace");
                    }
                });
            }
        }
    }
}
