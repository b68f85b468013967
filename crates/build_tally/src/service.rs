//! The core service: region-gated placement counting, viewer tracking,
//! and debounced persistence.

use crate::clock::Clock;
use crate::error::StorageError;
use crate::region::Region;
use crate::sidebar::{SidebarApi, SidebarHandle};
use crate::storage::CountStore;
use std::collections::HashMap;
use std::sync::Arc;
use tally_events::{Location, PlayerId};
use tracing::{debug, info, warn};

/// Title of the per-viewer leaderboard objective.
pub const LEADERBOARD_TITLE: &str = "Blocks placed";

/// Minimum interval between non-forced saves, in milliseconds.
pub const SAVE_INTERVAL_MS: u64 = 10_000;

/// Tracks per-display-name placement counts inside one region and mirrors
/// them onto the sidebars of viewers currently in that region.
///
/// Each player is in one of two states: `Absent` (no sidebar attached) or
/// `Tracked` (owns exactly one sidebar handle). Joining or moving into the
/// region while absent attaches a board seeded from the full count
/// snapshot; moving out or quitting detaches it. Counts are authoritative
/// in memory; boards are pure presentation and are rebuilt from the counts
/// whenever created.
pub struct RegionCounterService {
    region: Region,
    counts: HashMap<String, u64>,
    boards: HashMap<PlayerId, Box<dyn SidebarHandle>>,
    sidebar: Arc<dyn SidebarApi>,
    store: CountStore,
    clock: Arc<dyn Clock>,
    last_saved_ms: u64,
}

impl RegionCounterService {
    pub fn new(
        region: Region,
        sidebar: Arc<dyn SidebarApi>,
        store: CountStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            region,
            counts: HashMap::new(),
            boards: HashMap::new(),
            sidebar,
            store,
            clock,
            last_saved_ms: 0,
        }
    }

    /// True iff `location` lies inside the tracked region.
    pub fn is_in_region(&self, location: &Location) -> bool {
        self.region.contains(location)
    }

    /// The tracked region.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Whether `player` currently owns a sidebar.
    pub fn is_tracking(&self, player: PlayerId) -> bool {
        self.boards.contains_key(&player)
    }

    /// Snapshot of the current counts.
    pub fn counts(&self) -> HashMap<String, u64> {
        self.counts.clone()
    }

    /// Replaces in-memory counts with the persisted ones.
    ///
    /// A missing count file is surfaced as [`StorageError::NotFound`] so
    /// the caller can log it and continue with the (now empty) map;
    /// malformed lines were already skipped by the store.
    pub async fn load(&mut self) -> Result<(), StorageError> {
        self.counts.clear();
        self.counts = self.store.load().await?;
        Ok(())
    }

    /// A player connected at `location`.
    pub async fn on_player_joined(&mut self, player: PlayerId, location: &Location) {
        if self.region.contains(location) {
            self.create_board(player);
        }
    }

    /// A player disconnected. Drops their board if they had one; never
    /// touches storage.
    pub async fn on_player_quit(&mut self, player: PlayerId) {
        if self.boards.remove(&player).is_some() {
            debug!("dropped board for departed viewer {player}");
        }
    }

    /// A player moved. Only the destination matters: entering the region
    /// attaches a board exactly like a join, leaving clears and detaches
    /// it. Repeating a transition is a no-op: no double-create, no
    /// double-clear.
    pub async fn on_player_moved(&mut self, player: PlayerId, _from: &Location, to: &Location) {
        if self.region.contains(to) {
            if !self.boards.contains_key(&player) {
                self.create_board(player);
            }
        } else if let Some(mut handle) = self.boards.remove(&player) {
            if let Err(e) = handle.clear() {
                warn!("failed to clear sidebar for {player}: {e}");
            }
            debug!("cleared board for {player} leaving the region");
        }
    }

    /// A block was placed at `location` by the player displaying as
    /// `display_name`. Placements outside the region are ignored entirely.
    ///
    /// Inside the region: the name's count goes up by one, every active
    /// viewer's board is updated (a viewer whose sidebar rejects the update
    /// is logged and skipped, the rest still get it), and a throttled save
    /// runs.
    pub async fn on_block_placed(&mut self, display_name: &str, location: &Location) {
        if !self.region.contains(location) {
            return;
        }

        let total = {
            let count = self.counts.entry(display_name.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        for (viewer, handle) in self.boards.iter_mut() {
            if let Err(e) = handle.set_entry(display_name, total) {
                info!("can't update score for viewer {viewer}: {e}");
            }
        }

        self.persist(false).await;
    }

    /// Writes the counts to storage, rate-limited to one write per
    /// [`SAVE_INTERVAL_MS`] unless `force` is set.
    ///
    /// The throttle timestamp is stamped before the write, whether or not
    /// the write succeeds; a failure is logged and swallowed, and the
    /// in-memory counts stay authoritative for a later attempt.
    pub async fn persist(&mut self, force: bool) {
        let now = self.clock.now_millis();
        if !force && self.last_saved_ms + SAVE_INTERVAL_MS > now {
            return;
        }
        self.last_saved_ms = now;

        if let Err(e) = self.store.save(&self.counts).await {
            warn!("can't save block placement counts: {e}");
        }
    }

    /// Final save on plugin unload: resets the throttle and writes
    /// unconditionally.
    pub async fn shutdown(&mut self) {
        self.last_saved_ms = 0;
        self.persist(true).await;
    }

    fn create_board(&mut self, viewer: PlayerId) {
        match self.sidebar.create_sidebar(viewer, LEADERBOARD_TITLE) {
            Ok(mut handle) => {
                for (name, count) in &self.counts {
                    if let Err(e) = handle.set_entry(name, *count) {
                        info!("can't seed score for viewer {viewer}: {e}");
                    }
                }
                self.boards.insert(viewer, handle);
                debug!("attached board to {viewer}");
            }
            Err(e) => warn!("failed to create sidebar for {viewer}: {e}"),
        }
    }
}
