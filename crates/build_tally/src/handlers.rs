//! Event handlers wiring the service onto the event system.
//!
//! One handler struct per event kind, each sharing the service behind a
//! mutex so every operation runs atomically with respect to the others.
//! The join handler registers at `Monitor` priority: the board must only
//! attach after every other join observer (spawn relocation, permission
//! plugins, ...) has had its say about where the player actually is.

use crate::service::RegionCounterService;
use async_trait::async_trait;
use std::sync::Arc;
use tally_events::{
    BlockPlacedEvent, Event, EventError, EventHandler, EventPriority, EventSystem,
    PlayerJoinedEvent, PlayerMovedEvent, PlayerQuitEvent, BLOCK_PLACED, PLAYER_JOINED,
    PLAYER_MOVED, PLAYER_QUIT,
};

type SharedService = Arc<tokio::sync::Mutex<RegionCounterService>>;

pub struct JoinHandler {
    service: SharedService,
}

#[async_trait]
impl EventHandler for JoinHandler {
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        let event = PlayerJoinedEvent::deserialize(data)?;
        let mut service = self.service.lock().await;
        service.on_player_joined(event.player_id, &event.location).await;
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "build_tally:player_joined"
    }
}

pub struct QuitHandler {
    service: SharedService,
}

#[async_trait]
impl EventHandler for QuitHandler {
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        let event = PlayerQuitEvent::deserialize(data)?;
        let mut service = self.service.lock().await;
        service.on_player_quit(event.player_id).await;
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "build_tally:player_quit"
    }
}

pub struct MoveHandler {
    service: SharedService,
}

#[async_trait]
impl EventHandler for MoveHandler {
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        let event = PlayerMovedEvent::deserialize(data)?;
        let mut service = self.service.lock().await;
        service
            .on_player_moved(event.player_id, &event.from, &event.to)
            .await;
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "build_tally:player_moved"
    }
}

pub struct PlaceHandler {
    service: SharedService,
}

#[async_trait]
impl EventHandler for PlaceHandler {
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        let event = BlockPlacedEvent::deserialize(data)?;
        let mut service = self.service.lock().await;
        service
            .on_block_placed(&event.display_name, &event.location)
            .await;
        Ok(())
    }

    fn handler_name(&self) -> &str {
        "build_tally:block_placed"
    }
}

/// Registers the four handlers: joins at `Monitor`, the rest at `Normal`.
pub async fn register_handlers(
    events: &EventSystem,
    service: SharedService,
) -> Result<(), EventError> {
    events
        .on_handler(
            PLAYER_JOINED,
            EventPriority::Monitor,
            Arc::new(JoinHandler {
                service: Arc::clone(&service),
            }),
        )
        .await?;
    events
        .on_handler(
            PLAYER_QUIT,
            EventPriority::Normal,
            Arc::new(QuitHandler {
                service: Arc::clone(&service),
            }),
        )
        .await?;
    events
        .on_handler(
            PLAYER_MOVED,
            EventPriority::Normal,
            Arc::new(MoveHandler {
                service: Arc::clone(&service),
            }),
        )
        .await?;
    events
        .on_handler(
            BLOCK_PLACED,
            EventPriority::Normal,
            Arc::new(PlaceHandler { service }),
        )
        .await?;
    Ok(())
}
