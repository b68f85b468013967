//! Event traits and the four server lifecycle events.
//!
//! Events are plain serde structs; the blanket [`Event`] impl gives every
//! such struct a JSON wire form so the bus can hand one serialized payload
//! to any number of handlers. Handlers deserialize back to the concrete
//! type they subscribed for.

use crate::types::{Location, PlayerId};
use crate::utils::current_timestamp;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors that can occur during event routing.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Serialization failed when converting an event to bytes.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Deserialization failed when converting bytes back to an event.
    #[error("deserialization error: {0}")]
    Deserialization(serde_json::Error),
    /// Handler execution failed during event processing.
    #[error("handler execution error: {0}")]
    HandlerExecution(String),
}

/// Core trait all events implement.
///
/// Implemented automatically for any `Serialize + DeserializeOwned + Debug`
/// type through the blanket impl below; event authors only derive serde.
pub trait Event: Send + Sync + std::fmt::Debug {
    /// Stable name of this event type, for logging.
    fn type_name() -> &'static str
    where
        Self: Sized;

    /// Serializes the event for dispatch.
    fn serialize(&self) -> Result<Vec<u8>, EventError>;

    /// Deserializes an event from dispatch bytes.
    fn deserialize(data: &[u8]) -> Result<Self, EventError>
    where
        Self: Sized;
}

impl<T> Event for T
where
    T: Serialize + DeserializeOwned + Send + Sync + std::fmt::Debug + 'static,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn serialize(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(EventError::Serialization)
    }

    fn deserialize(data: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(data).map_err(EventError::Deserialization)
    }
}

/// Uniform handler interface the event system calls.
///
/// Most subscribers either implement this directly on a handler struct or
/// wrap a closure in [`TypedEventHandler`].
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles one serialized event.
    async fn handle(&self, data: &[u8]) -> Result<(), EventError>;

    /// Human-readable name for logging.
    fn handler_name(&self) -> &str;
}

/// Bridges a typed sync closure onto the erased [`EventHandler`] seam.
pub struct TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    handler: F,
    name: String,
    _phantom: std::marker::PhantomData<fn(T)>,
}

impl<T, F> TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    pub fn new(name: String, handler: F) -> Self {
        Self {
            handler,
            name,
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> EventHandler for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        let event = T::deserialize(data)?;
        (self.handler)(event)
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Server lifecycle events
// ============================================================================

/// Event name a [`PlayerJoinedEvent`] is emitted under.
pub const PLAYER_JOINED: &str = "player_joined";
/// Event name a [`PlayerQuitEvent`] is emitted under.
pub const PLAYER_QUIT: &str = "player_quit";
/// Event name a [`PlayerMovedEvent`] is emitted under.
pub const PLAYER_MOVED: &str = "player_moved";
/// Event name a [`BlockPlacedEvent`] is emitted under.
pub const BLOCK_PLACED: &str = "block_placed";

/// A player connected to the server.
///
/// Carries the spawn location so observers can react to where the player
/// appeared without a follow-up movement event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoinedEvent {
    pub player_id: PlayerId,
    /// Display name at join time. Not a stable identity.
    pub display_name: String,
    /// Where the player entered the world.
    pub location: Location,
    /// Unix timestamp of the join.
    pub timestamp: u64,
}

impl PlayerJoinedEvent {
    pub fn new(player_id: PlayerId, display_name: impl Into<String>, location: Location) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            location,
            timestamp: current_timestamp(),
        }
    }
}

/// A player disconnected from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerQuitEvent {
    pub player_id: PlayerId,
    pub timestamp: u64,
}

impl PlayerQuitEvent {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            timestamp: current_timestamp(),
        }
    }
}

/// A player moved between two locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMovedEvent {
    pub player_id: PlayerId,
    pub display_name: String,
    pub from: Location,
    pub to: Location,
    pub timestamp: u64,
}

impl PlayerMovedEvent {
    pub fn new(
        player_id: PlayerId,
        display_name: impl Into<String>,
        from: Location,
        to: Location,
    ) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            from,
            to,
            timestamp: current_timestamp(),
        }
    }
}

/// A player placed a block.
///
/// `location` is the placed block's location, which is not necessarily the
/// player's own position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockPlacedEvent {
    pub player_id: PlayerId,
    pub display_name: String,
    pub location: Location,
    pub timestamp: u64,
}

impl BlockPlacedEvent {
    pub fn new(player_id: PlayerId, display_name: impl Into<String>, location: Location) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            location,
            timestamp: current_timestamp(),
        }
    }
}
