//! Number-call scheduler for Fullhouse rooms.
//!
//! One [`NumberCaller`] per room drives the draw cadence: a warm-up delay
//! after game start, then a fixed repeat interval between draws. The
//! scheduler is positively cancellable — when a room finishes or is torn
//! down the actor calls [`NumberCaller::stop`], so no timer ever fires
//! against a dead room.
//!
//! # Integration
//!
//! The caller sits inside the room actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         info = caller.wait_for_call() => {
//!             // draw a number, broadcast it
//!         }
//!     }
//! }
//! ```
//!
//! Until [`NumberCaller::start`] is called (and after `stop`), the
//! `wait_for_call` future pends forever, which is exactly what `select!`
//! wants for a room still waiting for players.

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Draw cadence for a room.
#[derive(Debug, Clone)]
pub struct CallerConfig {
    /// Delay between game start and the first draw.
    pub warmup: Duration,
    /// Fixed delay between consecutive draws.
    pub interval: Duration,
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            warmup: Duration::from_secs(3),
            interval: Duration::from_secs(4),
        }
    }
}

impl CallerConfig {
    /// Shortest supported repeat interval.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(50);

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called by [`NumberCaller::new`]. A zero interval would busy-loop
    /// the room actor, so it is floored at [`Self::MIN_INTERVAL`].
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                min_ms = Self::MIN_INTERVAL.as_millis() as u64,
                "call interval below minimum — clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Call info
// ---------------------------------------------------------------------------

/// Information about a due call, returned by [`NumberCaller::wait_for_call`].
#[derive(Debug, Clone)]
pub struct CallInfo {
    /// Monotonically increasing call number for this room (starts at 1).
    pub call: u64,
    /// `true` if this call fired noticeably late.
    pub late: bool,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Drives the draw cadence for a single room.
pub struct NumberCaller {
    config: CallerConfig,
    /// When the next call is due. `None` while idle or stopped.
    next_call: Option<TokioInstant>,
    calls_made: u64,
}

impl NumberCaller {
    /// Creates an idle caller. [`wait_for_call`](Self::wait_for_call)
    /// pends until [`start`](Self::start).
    pub fn new(config: CallerConfig) -> Self {
        let config = config.validated();
        debug!(
            warmup_ms = config.warmup.as_millis() as u64,
            interval_ms = config.interval.as_millis() as u64,
            "number caller created"
        );
        Self {
            config,
            next_call: None,
            calls_made: 0,
        }
    }

    /// Arms the schedule: the first call fires after the warm-up delay.
    ///
    /// Calling `start` on a running caller resets the schedule.
    pub fn start(&mut self) {
        self.next_call = Some(TokioInstant::now() + self.config.warmup);
        debug!(
            warmup_ms = self.config.warmup.as_millis() as u64,
            "number calling started"
        );
    }

    /// Cancels the schedule. No further calls fire until `start`.
    ///
    /// Idempotent; safe to call on an idle caller.
    pub fn stop(&mut self) {
        if self.next_call.take().is_some() {
            debug!(calls = self.calls_made, "number calling stopped");
        }
    }

    /// Waits until the next call is due.
    ///
    /// Pends forever while idle or stopped — `tokio::select!` still
    /// services the other branches.
    pub async fn wait_for_call(&mut self) -> CallInfo {
        let next = match self.next_call {
            Some(next) => next,
            None => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(next).await;

        let now = TokioInstant::now();
        self.calls_made += 1;

        // A tick can fire late if the actor was busy; log it and resume
        // the cadence from now rather than piling up catch-up calls.
        let late_by = now.saturating_duration_since(next);
        let late = late_by > self.config.interval / 10;
        if late {
            warn!(
                call = self.calls_made,
                late_ms = late_by.as_millis() as u64,
                "call fired late — rescheduling from now"
            );
        }
        self.next_call = Some(now + self.config.interval);

        CallInfo {
            call: self.calls_made,
            late,
        }
    }

    /// Whether the schedule is currently armed.
    pub fn is_running(&self) -> bool {
        self.next_call.is_some()
    }

    /// Total calls fired since creation.
    pub fn calls_made(&self) -> u64 {
        self.calls_made
    }

    /// The configured repeat interval.
    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}
