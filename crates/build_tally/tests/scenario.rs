//! End-to-end scenarios driven through the event system, the way a host
//! server would drive the plugin.

use build_tally::{BuildTallyPlugin, InMemorySidebarApi, ManualClock, LEADERBOARD_TITLE};
use std::sync::Arc;
use tally_events::{
    BlockPlacedEvent, EventSystem, Location, PlayerId, PlayerJoinedEvent, PlayerMovedEvent,
    PlayerQuitEvent, BLOCK_PLACED, PLAYER_JOINED, PLAYER_MOVED, PLAYER_QUIT,
};

fn nether_config() -> &'static str {
    r#"
[area]
world = "nether"
minX = -100
maxX = 100
minY = -100
maxY = 100
minZ = -100
maxZ = 100
"#
}

async fn load_plugin(
    data_dir: &std::path::Path,
    events: &EventSystem,
    sidebar: Arc<InMemorySidebarApi>,
) -> BuildTallyPlugin {
    std::fs::write(data_dir.join("config.toml"), nether_config()).unwrap();
    let clock = Arc::new(ManualClock::new(1_000_000));
    BuildTallyPlugin::load_with_clock(data_dir, events, sidebar, clock)
        .await
        .expect("plugin load")
}

#[tokio::test]
async fn alice_walks_the_full_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventSystem::new();
    let sidebar = Arc::new(InMemorySidebarApi::new());
    let plugin = load_plugin(dir.path(), &events, Arc::clone(&sidebar)).await;

    let alice = PlayerId::new();
    let spawn = Location::new("nether", 10.0, 10.0, 10.0);
    let origin = Location::new("nether", 0.0, 0.0, 0.0);
    let far_away = Location::new("nether", 500.0, 0.0, 0.0);

    // Joins inside the region: gets a leaderboard with zero entries.
    events
        .emit(PLAYER_JOINED, &PlayerJoinedEvent::new(alice, "Alice", spawn.clone()))
        .await
        .unwrap();
    let board = sidebar.board(alice).expect("board attached on join");
    assert_eq!(board.title, LEADERBOARD_TITLE);
    assert!(board.entries.is_empty());

    // Places a block at the origin: her own entry becomes 1.
    events
        .emit(BLOCK_PLACED, &BlockPlacedEvent::new(alice, "Alice", origin.clone()))
        .await
        .unwrap();
    assert_eq!(sidebar.board(alice).unwrap().entries["Alice"], 1);

    // Moves out: board cleared and removed.
    events
        .emit(
            PLAYER_MOVED,
            &PlayerMovedEvent::new(alice, "Alice", spawn.clone(), far_away.clone()),
        )
        .await
        .unwrap();
    assert!(sidebar.board(alice).is_none());
    assert!(!plugin.is_tracking(alice).await);

    // Places another block inside: counted, but no viewer to update.
    events
        .emit(BLOCK_PLACED, &BlockPlacedEvent::new(alice, "Alice", origin.clone()))
        .await
        .unwrap();
    assert_eq!(plugin.counts().await["Alice"], 2);
    assert!(sidebar.board(alice).is_none());

    // Moves back in: fresh board showing Alice = 2.
    events
        .emit(
            PLAYER_MOVED,
            &PlayerMovedEvent::new(alice, "Alice", far_away, origin),
        )
        .await
        .unwrap();
    let board = sidebar.board(alice).expect("board reattached");
    assert_eq!(board.entries["Alice"], 2);
}

#[tokio::test]
async fn counts_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let alice = PlayerId::new();
    let origin = Location::new("nether", 0.0, 0.0, 0.0);

    {
        let events = EventSystem::new();
        let sidebar = Arc::new(InMemorySidebarApi::new());
        let plugin = load_plugin(dir.path(), &events, sidebar).await;
        for _ in 0..3 {
            events
                .emit(BLOCK_PLACED, &BlockPlacedEvent::new(alice, "Alice", origin.clone()))
                .await
                .unwrap();
        }
        plugin.unload().await;
    }

    // Second life: counts come back from disk and seed new boards.
    let events = EventSystem::new();
    let sidebar = Arc::new(InMemorySidebarApi::new());
    let plugin = load_plugin(dir.path(), &events, Arc::clone(&sidebar)).await;
    assert_eq!(plugin.counts().await["Alice"], 3);

    let bob = PlayerId::new();
    events
        .emit(
            PLAYER_JOINED,
            &PlayerJoinedEvent::new(bob, "Bob", Location::new("nether", 1.0, 1.0, 1.0)),
        )
        .await
        .unwrap();
    assert_eq!(sidebar.board(bob).unwrap().entries["Alice"], 3);
}

#[tokio::test]
async fn quitting_detaches_without_touching_counts() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventSystem::new();
    let sidebar = Arc::new(InMemorySidebarApi::new());
    let plugin = load_plugin(dir.path(), &events, Arc::clone(&sidebar)).await;

    let alice = PlayerId::new();
    let origin = Location::new("nether", 0.0, 0.0, 0.0);
    events
        .emit(PLAYER_JOINED, &PlayerJoinedEvent::new(alice, "Alice", origin.clone()))
        .await
        .unwrap();
    events
        .emit(BLOCK_PLACED, &BlockPlacedEvent::new(alice, "Alice", origin.clone()))
        .await
        .unwrap();

    events
        .emit(PLAYER_QUIT, &PlayerQuitEvent::new(alice))
        .await
        .unwrap();
    assert!(!plugin.is_tracking(alice).await);
    assert_eq!(plugin.counts().await["Alice"], 1);
}

#[tokio::test]
async fn events_in_other_worlds_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventSystem::new();
    let sidebar = Arc::new(InMemorySidebarApi::new());
    let plugin = load_plugin(dir.path(), &events, Arc::clone(&sidebar)).await;

    let alice = PlayerId::new();
    let overworld = Location::new("overworld", 0.0, 0.0, 0.0);
    events
        .emit(
            PLAYER_JOINED,
            &PlayerJoinedEvent::new(alice, "Alice", overworld.clone()),
        )
        .await
        .unwrap();
    events
        .emit(BLOCK_PLACED, &BlockPlacedEvent::new(alice, "Alice", overworld))
        .await
        .unwrap();

    assert!(sidebar.board(alice).is_none());
    assert!(plugin.counts().await.is_empty());
}

#[tokio::test]
async fn missing_data_directory_contents_start_the_plugin_empty() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventSystem::new();
    let sidebar = Arc::new(InMemorySidebarApi::new());

    // No config, no counts file: defaults are written, counts start empty.
    let clock = Arc::new(ManualClock::new(1_000_000));
    let plugin = BuildTallyPlugin::load_with_clock(
        dir.path().join("build_tally"),
        &events,
        sidebar,
        clock,
    )
    .await
    .expect("plugin load");

    assert!(plugin.counts().await.is_empty());
    assert!(dir.path().join("build_tally/config.toml").exists());
}
