//! The event system: registration and priority-ordered dispatch.

use crate::events::{Event, EventError, EventHandler, TypedEventHandler};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Dispatch ordering for handlers of one event.
///
/// Handlers run from `Highest` down to `Monitor`; within one priority they
/// run in registration order. `Monitor` is reserved for observers that must
/// see an event only after every other subscriber has reacted to it, and
/// such handlers must not act as gatekeepers for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    Highest,
    High,
    Normal,
    Low,
    Monitor,
}

struct HandlerEntry {
    priority: EventPriority,
    seq: u64,
    handler: Arc<dyn EventHandler>,
}

/// Counters exposed for monitoring.
#[derive(Debug, Default, Clone)]
pub struct EventSystemStats {
    /// Total number of registered event handlers.
    pub total_handlers: usize,
    /// Total number of events emitted since system start.
    pub events_emitted: u64,
}

/// Central hub routing emitted events to their registered handlers.
///
/// Thread-safe behind `Arc`; registration and emission are async. Events of
/// one kind are delivered to all subscribers sequentially, so a handler
/// observes every effect of the higher-priority handlers that ran before it.
/// A failing handler is logged and skipped; it never hides the event from
/// the handlers after it.
pub struct EventSystem {
    handlers: RwLock<HashMap<String, Vec<HandlerEntry>>>,
    stats: RwLock<EventSystemStats>,
    next_seq: AtomicU64,
}

impl EventSystem {
    /// Creates a new event system with no registered handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            stats: RwLock::new(EventSystemStats::default()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Registers an erased handler for `event_name` at `priority`.
    pub async fn on_handler(
        &self,
        event_name: &str,
        priority: EventPriority,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), EventError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut handlers = self.handlers.write().await;
        let entries = handlers.entry(event_name.to_string()).or_default();
        entries.push(HandlerEntry {
            priority,
            seq,
            handler,
        });
        entries.sort_by_key(|entry| (entry.priority, entry.seq));

        let mut stats = self.stats.write().await;
        stats.total_handlers += 1;

        debug!("registered handler for {event_name} at {priority:?}");
        Ok(())
    }

    /// Registers a typed sync closure for `event_name` at `priority`.
    pub async fn on<T, F>(
        &self,
        event_name: &str,
        priority: EventPriority,
        handler: F,
    ) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let name = format!("{}:{}", event_name, T::type_name());
        self.on_handler(
            event_name,
            priority,
            Arc::new(TypedEventHandler::new(name, handler)),
        )
        .await
    }

    /// Registers a typed closure that runs after all other observers.
    pub async fn on_monitor<T, F>(&self, event_name: &str, handler: F) -> Result<(), EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.on(event_name, EventPriority::Monitor, handler).await
    }

    /// Emits an event to every handler registered for `event_name`.
    ///
    /// The event is serialized once; handlers receive it in priority order.
    /// Individual handler failures are logged and do not fail the emission.
    pub async fn emit<T>(&self, event_name: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        let data = event.serialize()?;

        // Snapshot the handler list so a handler registering new handlers
        // cannot deadlock against the dispatch pass.
        let entries: Vec<Arc<dyn EventHandler>> = {
            let handlers = self.handlers.read().await;
            handlers
                .get(event_name)
                .map(|entries| entries.iter().map(|e| Arc::clone(&e.handler)).collect())
                .unwrap_or_default()
        };

        {
            let mut stats = self.stats.write().await;
            stats.events_emitted += 1;
        }

        for handler in entries {
            if let Err(e) = handler.handle(&data).await {
                warn!(
                    "handler {} failed on {event_name}: {e}",
                    handler.handler_name()
                );
            }
        }

        Ok(())
    }

    /// Returns a snapshot of the system counters.
    pub async fn get_stats(&self) -> EventSystemStats {
        self.stats.read().await.clone()
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PlayerQuitEvent, PLAYER_QUIT};
    use crate::types::PlayerId;
    use std::sync::Mutex;

    fn recorder(
        log: &Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    ) -> impl Fn(PlayerQuitEvent) -> Result<(), EventError> + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |_event| {
            log.lock().unwrap().push(tag);
            Ok(())
        }
    }

    #[tokio::test]
    async fn handlers_run_in_priority_order_with_monitor_last() {
        let events = EventSystem::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        events
            .on_monitor(PLAYER_QUIT, recorder(&log, "monitor"))
            .await
            .unwrap();
        events
            .on(PLAYER_QUIT, EventPriority::Normal, recorder(&log, "normal"))
            .await
            .unwrap();
        events
            .on(PLAYER_QUIT, EventPriority::Highest, recorder(&log, "highest"))
            .await
            .unwrap();

        events
            .emit(PLAYER_QUIT, &PlayerQuitEvent::new(PlayerId::new()))
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["highest", "normal", "monitor"]);
    }

    #[tokio::test]
    async fn same_priority_handlers_keep_registration_order() {
        let events = EventSystem::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        events
            .on(PLAYER_QUIT, EventPriority::Normal, recorder(&log, "first"))
            .await
            .unwrap();
        events
            .on(PLAYER_QUIT, EventPriority::Normal, recorder(&log, "second"))
            .await
            .unwrap();

        events
            .emit(PLAYER_QUIT, &PlayerQuitEvent::new(PlayerId::new()))
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn failing_handler_does_not_block_later_handlers() {
        let events = EventSystem::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        events
            .on(
                PLAYER_QUIT,
                EventPriority::Normal,
                |_event: PlayerQuitEvent| {
                    Err(EventError::HandlerExecution("boom".to_string()))
                },
            )
            .await
            .unwrap();
        events
            .on_monitor(PLAYER_QUIT, recorder(&log, "after"))
            .await
            .unwrap();

        events
            .emit(PLAYER_QUIT, &PlayerQuitEvent::new(PlayerId::new()))
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["after"]);
    }

    #[tokio::test]
    async fn emitting_with_no_handlers_is_fine() {
        let events = EventSystem::new();
        events
            .emit(PLAYER_QUIT, &PlayerQuitEvent::new(PlayerId::new()))
            .await
            .unwrap();

        let stats = events.get_stats().await;
        assert_eq!(stats.events_emitted, 1);
        assert_eq!(stats.total_handlers, 0);
    }
}
