//! Room coordination for Fullhouse.
//!
//! Each game runs inside its own actor task ([`room`]); the
//! [`RoomRegistry`] allocates shareable codes, matches players into
//! open rooms, routes in-game messages, and tears rooms down once they
//! finish or empty out.
//!
//! ```ignore
//! let (registry, lifecycle) = RoomRegistry::new(RoomConfig::default());
//! let registry = Arc::new(Mutex::new(registry));
//! tokio::spawn(run_reaper(Arc::clone(&registry), lifecycle, grace));
//! ```

mod config;
mod error;
mod registry;
mod room;

pub use config::{GamePhase, MAX_CAPACITY, RoomConfig};
pub use error::RoomError;
pub use registry::{RoomRegistry, run_reaper};
pub use room::{EventSender, RoomHandle, RoomInfo, RoomLifecycle};
