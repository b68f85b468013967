//! # Tally Event System
//!
//! Typed event routing for the build tally plugin. The game server delivers
//! four kinds of lifecycle events (player joined, player quit, player moved,
//! block placed) and this crate provides the bus they travel over:
//! serde-backed event types, a handler seam, and an [`EventSystem`] that
//! dispatches each emission to its subscribers in priority order.
//!
//! Handlers subscribe at an [`EventPriority`]; `Monitor` handlers always run
//! after every other observer of the same event, which is how a consumer can
//! guarantee it sees the world only after the rest of the server has reacted
//! to a join.
//!
//! ```rust,no_run
//! use tally_events::{EventSystem, EventPriority, PlayerJoinedEvent};
//!
//! # async fn demo() -> Result<(), tally_events::EventError> {
//! let events = EventSystem::new();
//! events
//!     .on(
//!         tally_events::PLAYER_JOINED,
//!         EventPriority::Normal,
//!         |event: PlayerJoinedEvent| {
//!             tracing::info!("{} joined", event.display_name);
//!             Ok(())
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod system;
pub mod types;
pub mod utils;

pub use events::{
    BlockPlacedEvent, Event, EventError, EventHandler, PlayerJoinedEvent, PlayerMovedEvent,
    PlayerQuitEvent, TypedEventHandler, BLOCK_PLACED, PLAYER_JOINED, PLAYER_MOVED, PLAYER_QUIT,
};
pub use system::{EventPriority, EventSystem, EventSystemStats};
pub use types::{Location, PlayerId, Position};
pub use utils::current_timestamp;
