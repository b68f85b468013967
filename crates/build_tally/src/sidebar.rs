//! The presentation seam: per-viewer sidebar leaderboards.
//!
//! The host environment owns actual rendering; the service only ever talks
//! to these two traits. [`InMemorySidebarApi`] is the reference
//! implementation used by tests and headless embedders.

use crate::error::SidebarError;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tally_events::PlayerId;

/// One viewer's attached leaderboard.
///
/// Entries map display names to scores. A handle stays owned by the service
/// for as long as its viewer is tracked. Dropping it does not clear the
/// display; callers that want the slot emptied call [`clear`](Self::clear)
/// first.
pub trait SidebarHandle: Send {
    /// Sets (or inserts) one leaderboard entry.
    fn set_entry(&mut self, name: &str, value: u64) -> Result<(), SidebarError>;

    /// Empties the viewer's sidebar slot.
    fn clear(&mut self) -> Result<(), SidebarError>;
}

/// Factory for per-viewer sidebars.
pub trait SidebarApi: Send + Sync {
    /// Creates a fresh sidebar for `viewer` with the given title and
    /// attaches it, replacing whatever the viewer had displayed.
    fn create_sidebar(
        &self,
        viewer: PlayerId,
        title: &str,
    ) -> Result<Box<dyn SidebarHandle>, SidebarError>;
}

/// Rendered state of one in-memory board, inspectable from tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub title: String,
    /// Sorted by name so assertions are deterministic.
    pub entries: BTreeMap<String, u64>,
}

#[derive(Default)]
struct SharedBoards {
    boards: HashMap<PlayerId, BoardState>,
    failing: HashMap<PlayerId, bool>,
}

/// In-memory [`SidebarApi`] with per-viewer fault injection.
#[derive(Default, Clone)]
pub struct InMemorySidebarApi {
    shared: Arc<Mutex<SharedBoards>>,
}

impl InMemorySidebarApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current board for `viewer`, if one is attached.
    pub fn board(&self, viewer: PlayerId) -> Option<BoardState> {
        self.shared.lock().unwrap().boards.get(&viewer).cloned()
    }

    /// Marks updates for `viewer` as failing (or not). Lets tests exercise
    /// the swallow-and-continue path without a real backend.
    pub fn set_failing(&self, viewer: PlayerId, failing: bool) {
        self.shared.lock().unwrap().failing.insert(viewer, failing);
    }
}

impl SidebarApi for InMemorySidebarApi {
    fn create_sidebar(
        &self,
        viewer: PlayerId,
        title: &str,
    ) -> Result<Box<dyn SidebarHandle>, SidebarError> {
        let mut shared = self.shared.lock().unwrap();
        shared.boards.insert(
            viewer,
            BoardState {
                title: title.to_string(),
                entries: BTreeMap::new(),
            },
        );
        Ok(Box::new(InMemorySidebar {
            viewer,
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct InMemorySidebar {
    viewer: PlayerId,
    shared: Arc<Mutex<SharedBoards>>,
}

impl SidebarHandle for InMemorySidebar {
    fn set_entry(&mut self, name: &str, value: u64) -> Result<(), SidebarError> {
        let mut shared = self.shared.lock().unwrap();
        if shared.failing.get(&self.viewer).copied().unwrap_or(false) {
            return Err(SidebarError::MissingObjective(self.viewer));
        }
        match shared.boards.get_mut(&self.viewer) {
            Some(board) => {
                board.entries.insert(name.to_string(), value);
                Ok(())
            }
            None => Err(SidebarError::ViewerGone(self.viewer)),
        }
    }

    fn clear(&mut self) -> Result<(), SidebarError> {
        let mut shared = self.shared.lock().unwrap();
        shared.boards.remove(&self.viewer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_board_starts_empty() {
        let api = InMemorySidebarApi::new();
        let viewer = PlayerId::new();

        let _handle = api.create_sidebar(viewer, "Blocks placed").unwrap();
        let board = api.board(viewer).unwrap();
        assert_eq!(board.title, "Blocks placed");
        assert!(board.entries.is_empty());
    }

    #[test]
    fn entries_are_visible_through_the_api() {
        let api = InMemorySidebarApi::new();
        let viewer = PlayerId::new();

        let mut handle = api.create_sidebar(viewer, "Blocks placed").unwrap();
        handle.set_entry("Alice", 2).unwrap();
        handle.set_entry("Alice", 3).unwrap();

        let board = api.board(viewer).unwrap();
        assert_eq!(board.entries["Alice"], 3);
    }

    #[test]
    fn clear_removes_the_board() {
        let api = InMemorySidebarApi::new();
        let viewer = PlayerId::new();

        let mut handle = api.create_sidebar(viewer, "Blocks placed").unwrap();
        handle.clear().unwrap();
        assert!(api.board(viewer).is_none());
    }

    #[test]
    fn failing_viewers_reject_updates() {
        let api = InMemorySidebarApi::new();
        let viewer = PlayerId::new();

        let mut handle = api.create_sidebar(viewer, "Blocks placed").unwrap();
        api.set_failing(viewer, true);
        assert!(handle.set_entry("Alice", 1).is_err());
    }
}
