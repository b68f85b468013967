//! # Build Tally
//!
//! Tracks, per player display-name, how many blocks have been placed inside
//! a configured region of one world, shows a live leaderboard on the
//! sidebar of every player currently in that region, and persists the
//! counts to a flat `counts.txt` with debounced writes.
//!
//! The plugin reacts to four server events (join, quit, move, block place)
//! delivered over a [`tally_events::EventSystem`] and renders through the
//! [`SidebarApi`] seam; it has no process entry point of its own.
//!
//! ```rust,no_run
//! use build_tally::{BuildTallyPlugin, InMemorySidebarApi};
//! use std::sync::Arc;
//! use tally_events::EventSystem;
//!
//! # async fn demo() -> Result<(), build_tally::PluginError> {
//! let events = EventSystem::new();
//! let sidebar = Arc::new(InMemorySidebarApi::new());
//! let plugin = BuildTallyPlugin::load("plugins/build_tally", &events, sidebar).await?;
//! // ... server emits events ...
//! plugin.unload().await;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod region;
pub mod service;
pub mod sidebar;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AreaConfig, TallyConfig};
pub use error::{ConfigError, PluginError, SidebarError, StorageError};
pub use region::Region;
pub use service::{RegionCounterService, LEADERBOARD_TITLE, SAVE_INTERVAL_MS};
pub use sidebar::{BoardState, InMemorySidebarApi, SidebarApi, SidebarHandle};
pub use storage::{CountStore, COUNTS_FILE};

use crate::handlers::register_handlers;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tally_events::EventSystem;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// File name of the plugin configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// The loaded plugin: owns the service and keeps it reachable for the
/// final save on unload.
pub struct BuildTallyPlugin {
    service: Arc<Mutex<RegionCounterService>>,
}

impl BuildTallyPlugin {
    /// Loads the plugin with the wall clock.
    ///
    /// Reads (or writes the default) `config.toml` under `data_dir`, loads
    /// persisted counts, and registers the four event handlers. A missing
    /// count file is logged and tracking starts empty.
    pub async fn load(
        data_dir: impl Into<PathBuf>,
        events: &EventSystem,
        sidebar: Arc<dyn SidebarApi>,
    ) -> Result<Self, PluginError> {
        Self::load_with_clock(data_dir, events, sidebar, Arc::new(SystemClock)).await
    }

    /// Same as [`load`](Self::load) with an injected clock, so embedders
    /// and tests can drive the save throttle deterministically.
    pub async fn load_with_clock(
        data_dir: impl Into<PathBuf>,
        events: &EventSystem,
        sidebar: Arc<dyn SidebarApi>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PluginError> {
        let data_dir = data_dir.into();
        let config = TallyConfig::load(&data_dir.join(CONFIG_FILE))?;
        let region = Region::from_config(&config.area);
        let store = CountStore::new(&data_dir);

        let mut service = RegionCounterService::new(region, sidebar, store, clock);
        if let Err(e) = service.load().await {
            warn!("cannot read count file: {e}");
        }
        info!(
            "build_tally checking {} from {}",
            service.region().world(),
            service.region().describe_bounds()
        );

        let service = Arc::new(Mutex::new(service));
        register_handlers(events, Arc::clone(&service)).await?;

        Ok(Self { service })
    }

    /// Unloads the plugin: unconditionally flushes the counts.
    pub async fn unload(&self) {
        self.service.lock().await.shutdown().await;
    }

    /// Snapshot of the current counts, for embedders.
    pub async fn counts(&self) -> HashMap<String, u64> {
        self.service.lock().await.counts()
    }

    /// Whether `player` currently has a leaderboard attached.
    pub async fn is_tracking(&self, player: tally_events::PlayerId) -> bool {
        self.service.lock().await.is_tracking(player)
    }
}
