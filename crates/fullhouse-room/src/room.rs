//! The room actor: one tokio task owning all state for a single game.
//!
//! All mutation happens inside the actor loop, so room state needs no
//! locks. Callers interact through [`RoomHandle`], which sends commands
//! over a bounded mpsc channel and awaits replies on oneshots.

use fullhouse_board::{Card, Marks, NumberPool, has_line};
use fullhouse_caller::{CallerConfig, NumberCaller};
use fullhouse_protocol::{
    PlayerId, PlayerSnapshot, PlayerSummary, RoomCode, RoomSnapshot, ServerEvent,
};
use tokio::sync::{mpsc, oneshot};

use crate::config::{GamePhase, RoomConfig};
use crate::error::RoomError;

/// Command channel depth per room. Senders wait when the channel fills.
const COMMAND_CHANNEL_SIZE: usize = 64;

/// Per-player outbound event channel.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Emitted by room actors when they reach a terminal condition.
///
/// The registry's reaper consumes these: `Empty` rooms are destroyed
/// immediately, `Finished` rooms after a grace period so clients can
/// render the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomLifecycle {
    /// The game ended with a winner.
    Finished(RoomCode),
    /// The last player left.
    Empty(RoomCode),
}

/// Summary of a room's current state, cheap to copy out of the actor.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub phase: GamePhase,
    pub player_count: usize,
    pub capacity: usize,
}

pub(crate) enum RoomCommand {
    Join {
        player: PlayerId,
        name: String,
        sender: EventSender,
        /// Whether to broadcast `player-joined` for this seat. The
        /// founding join of an explicitly created room is silent: the
        /// requester gets the room snapshot instead.
        announce: bool,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Mark {
        player: PlayerId,
        number: u8,
    },
    ClaimWin {
        player: PlayerId,
    },
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// Cloneable handle to a room actor.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Seats a player. Fails if the game started or the room is full.
    ///
    /// `announce` controls the `player-joined` broadcast; only the
    /// founding join of an explicitly created room passes `false`.
    pub async fn join(
        &self,
        player: PlayerId,
        name: String,
        sender: EventSender,
        announce: bool,
    ) -> Result<(), RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player,
                name,
                sender,
                announce,
                reply: tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        rx.await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Marks a called number on the player's card. Fire-and-forget:
    /// invalid marks are dropped inside the actor, not reported.
    pub async fn mark(&self, player: PlayerId, number: u8) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Mark { player, number })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Asks the room to verify the player's card for a completed line.
    pub async fn claim_win(&self, player: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::ClaimWin { player })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    pub async fn leave(&self, player: PlayerId) -> Result<(), RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave { player, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        rx.await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Full wire-facing snapshot, including every player's card.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        rx.await.map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        rx.await.map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// One seated player: identity, card, and authoritative marks.
struct Seat {
    player: PlayerId,
    name: String,
    card: Card,
    marks: Marks,
    sender: EventSender,
}

/// What the actor loop should do next.
enum Step {
    Command(Option<RoomCommand>),
    Draw,
}

struct RoomActor {
    code: RoomCode,
    config: RoomConfig,
    phase: GamePhase,
    seats: Vec<Seat>,
    /// Name of the first player seated, carried in snapshots.
    host: Option<String>,
    pool: NumberPool,
    called: Vec<u8>,
    current: Option<u8>,
    caller: NumberCaller,
    lifecycle: mpsc::UnboundedSender<RoomLifecycle>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.code, capacity = self.config.capacity, "room actor started");

        loop {
            let step = tokio::select! {
                cmd = self.receiver.recv() => Step::Command(cmd),
                _ = self.caller.wait_for_call() => Step::Draw,
            };

            match step {
                Step::Command(Some(RoomCommand::Join {
                    player,
                    name,
                    sender,
                    announce,
                    reply,
                })) => {
                    let result = self.handle_join(player, name, sender, announce);
                    let _ = reply.send(result);
                }
                Step::Command(Some(RoomCommand::Mark { player, number })) => {
                    self.handle_mark(player, number);
                }
                Step::Command(Some(RoomCommand::ClaimWin { player })) => {
                    self.handle_claim(player);
                }
                Step::Command(Some(RoomCommand::Leave { player, reply })) => {
                    let result = self.handle_leave(player);
                    let _ = reply.send(result);
                    if self.seats.is_empty() {
                        tracing::info!(room = %self.code, "last player left, room closing");
                        let _ = self.lifecycle.send(RoomLifecycle::Empty(self.code.clone()));
                        break;
                    }
                }
                Step::Command(Some(RoomCommand::Snapshot { reply })) => {
                    let _ = reply.send(self.snapshot());
                }
                Step::Command(Some(RoomCommand::GetInfo { reply })) => {
                    let _ = reply.send(self.info());
                }
                Step::Command(Some(RoomCommand::Shutdown)) | Step::Command(None) => {
                    break;
                }
                Step::Draw => {
                    self.handle_draw();
                }
            }
        }

        tracing::info!(room = %self.code, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player: PlayerId,
        name: String,
        sender: EventSender,
        announce: bool,
    ) -> Result<(), RoomError> {
        if !self.phase.is_joinable() {
            return Err(RoomError::AlreadyStarted(self.code.clone()));
        }
        if self.seats.len() >= self.config.capacity {
            return Err(RoomError::Full(self.code.clone()));
        }
        if self.seats.iter().any(|s| s.player == player) {
            return Err(RoomError::AlreadyInRoom(player, self.code.clone()));
        }

        if self.seats.is_empty() {
            self.host = Some(name.clone());
        }

        let card = Card::generate(&mut rand::rng());
        self.seats.push(Seat {
            player,
            name: name.clone(),
            card,
            marks: Marks::new(),
            sender,
        });

        tracing::info!(
            room = %self.code,
            %player,
            players = self.seats.len(),
            capacity = self.config.capacity,
            "player joined"
        );

        if announce {
            self.broadcast(ServerEvent::PlayerJoined {
                player: name,
                player_count: self.seats.len(),
                max_players: self.config.capacity,
            });
        }

        if self.seats.len() == self.config.capacity {
            self.start_game();
        }
        Ok(())
    }

    fn start_game(&mut self) {
        self.phase = GamePhase::InProgress;
        let players: Vec<PlayerSummary> = self
            .seats
            .iter()
            .map(|s| PlayerSummary {
                id: s.name.clone(),
                name: s.name.clone(),
            })
            .collect();

        tracing::info!(room = %self.code, players = players.len(), "game started");

        self.broadcast(ServerEvent::GameStarted {
            players,
            room_id: self.code.clone(),
        });
        self.caller.start();
    }

    /// Draws the next number and announces it to every seat.
    fn handle_draw(&mut self) {
        if !self.phase.is_in_progress() {
            // Stale timer wakeup after the game ended.
            self.caller.stop();
            return;
        }

        match self.pool.draw(&mut rand::rng()) {
            Some(number) => {
                self.called.push(number);
                self.current = Some(number);
                tracing::debug!(
                    room = %self.code,
                    number,
                    drawn = self.called.len(),
                    "number called"
                );
                self.broadcast(ServerEvent::NumberCalled { number });

                if self.pool.is_empty() {
                    tracing::info!(room = %self.code, "number pool exhausted, calling stops");
                    self.caller.stop();
                }
            }
            None => {
                self.caller.stop();
            }
        }
    }

    /// Applies a mark if the number was actually called and appears on
    /// the player's card. Everything else is a silent no-op: marks race
    /// against game-over and player-leave, so stale ones are expected.
    fn handle_mark(&mut self, player: PlayerId, number: u8) {
        if !self.phase.is_in_progress() {
            tracing::debug!(room = %self.code, %player, number, "mark ignored: game not in progress");
            return;
        }
        let Some(idx) = self.seats.iter().position(|s| s.player == player) else {
            tracing::debug!(room = %self.code, %player, "mark ignored: player not seated");
            return;
        };
        if !self.called.contains(&number) {
            tracing::debug!(room = %self.code, %player, number, "mark ignored: number not called");
            return;
        }

        let seat = &mut self.seats[idx];
        if let Some((row, col)) = seat.card.position_of(number) {
            seat.marks.mark(row, col);
            if has_line(&seat.marks) {
                let winner = seat.name.clone();
                self.declare_winner(winner);
            }
        }
    }

    /// Re-checks the claimant's marks against the win rule. The claim
    /// itself carries no authority; a claim without a completed line is
    /// dropped.
    fn handle_claim(&mut self, player: PlayerId) {
        if !self.phase.is_in_progress() {
            tracing::debug!(room = %self.code, %player, "win claim ignored: game not in progress");
            return;
        }
        let Some(seat) = self.seats.iter().find(|s| s.player == player) else {
            tracing::debug!(room = %self.code, %player, "win claim ignored: player not seated");
            return;
        };
        if has_line(&seat.marks) {
            let winner = seat.name.clone();
            self.declare_winner(winner);
        } else {
            tracing::debug!(room = %self.code, %player, "win claim without a completed line");
        }
    }

    fn declare_winner(&mut self, winner: String) {
        // First winner is final.
        if !self.phase.is_in_progress() {
            return;
        }
        self.phase = GamePhase::Finished {
            winner: winner.clone(),
        };
        self.caller.stop();

        tracing::info!(room = %self.code, %winner, "player won");

        self.broadcast(ServerEvent::PlayerWon {
            player: winner,
            game_ended: true,
        });
        let _ = self
            .lifecycle
            .send(RoomLifecycle::Finished(self.code.clone()));
    }

    fn handle_leave(&mut self, player: PlayerId) -> Result<(), RoomError> {
        let Some(idx) = self.seats.iter().position(|s| s.player == player) else {
            return Err(RoomError::NotInRoom(player, self.code.clone()));
        };
        let seat = self.seats.remove(idx);

        tracing::info!(
            room = %self.code,
            %player,
            name = %seat.name,
            remaining = self.seats.len(),
            "player left"
        );

        self.broadcast(ServerEvent::PlayerLeft {
            player_count: self.seats.len(),
            max_players: self.config.capacity,
        });
        Ok(())
    }

    fn broadcast(&self, event: ServerEvent) {
        for seat in &self.seats {
            // A closed channel means the player is mid-disconnect;
            // their Leave command is already in flight.
            let _ = seat.sender.send(event.clone());
        }
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.code.clone(),
            players: self
                .seats
                .iter()
                .map(|s| PlayerSnapshot {
                    name: s.name.clone(),
                    board: s.card.clone(),
                })
                .collect(),
            host: self.host.clone().unwrap_or_default(),
            max_players: self.config.capacity,
            game_started: !self.phase.is_joinable(),
            called_numbers: self.called.clone(),
            current_number: self.current,
            winner: self.phase.winner().map(str::to_string),
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code.clone(),
            phase: self.phase.clone(),
            player_count: self.seats.len(),
            capacity: self.config.capacity,
        }
    }
}

/// Spawns a room actor task and returns a handle to communicate with it.
pub(crate) fn spawn_room(
    code: RoomCode,
    config: RoomConfig,
    lifecycle: mpsc::UnboundedSender<RoomLifecycle>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

    let caller = NumberCaller::new(CallerConfig {
        warmup: config.warmup,
        interval: config.call_interval,
    });

    let actor = RoomActor {
        code: code.clone(),
        config,
        phase: GamePhase::Waiting,
        seats: Vec::new(),
        host: None,
        pool: NumberPool::new(),
        called: Vec::new(),
        current: None,
        caller,
        lifecycle,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
