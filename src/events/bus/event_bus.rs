// events/bus/event_bus.rs
//
// Core event bus implementation.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - handlers execute immediately in subscription order
// 2. Deterministic - same events → same result
// 3. Observable - every emission is logged
// 4. Type-safe - events are strongly typed

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error};

use crate::events::types::{CatalogEvent, DomainEvent};

/// Type-erased event handler function
type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// In-process dispatcher for domain events recorded by aggregates
///
/// Key characteristics:
/// - Synchronous execution (no async, no threads)
/// - Handlers execute in subscription order
/// - A panicking handler never stops the others
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,
    event_log: Arc<RwLock<Vec<EventLogEntry>>>,
}

/// A logged event for debugging and tracing
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub aggregate_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to a specific event type
    ///
    /// ```ignore
    /// bus.subscribe::<VideoCreated, _>(|event| {
    ///     log::info!("video created: {}", event.title);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<E>();

        let wrapped: EventHandler = Box::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                error!(
                    "Failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_default()
            .push(wrapped);
    }

    /// Log the event, then run every handler subscribed to its type
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let type_id = TypeId::of::<E>();
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let event_handlers = handlers.get(&type_id);

        let log_entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            aggregate_id: event.aggregate_id(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: event_handlers.map(Vec::len).unwrap_or(0),
        };

        debug!(
            "[EVENT] {} (id: {}, aggregate: {}) | {} handlers",
            log_entry.event_type, log_entry.event_id, log_entry.aggregate_id, log_entry.handler_count
        );

        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(log_entry);

        if let Some(handlers) = event_handlers {
            for (idx, handler) in handlers.iter().enumerate() {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler(&event as &dyn Any);
                }));

                if let Err(e) = result {
                    error!("Handler {} for {} panicked: {:?}", idx, event.event_type(), e);
                }
            }
        }
    }

    /// Route a recorded catalog event to the handlers of its concrete type
    pub fn dispatch(&self, event: &CatalogEvent) {
        match event {
            CatalogEvent::VideoCreated(event) => self.emit(event.clone()),
            CatalogEvent::VideoAudioMediaReplaced(event) => self.emit(event.clone()),
        }
    }

    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_event_log(&self) {
        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        let type_id = TypeId::of::<E>();
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same handlers and log
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::{
        AudioVideoField, AudioVideoMedia, Rating, VideoAudioMediaReplaced, VideoCreated, VideoId,
    };
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn video_created() -> VideoCreated {
        VideoCreated {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            video_id: VideoId::new(),
            title: "Alien".to_string(),
            year_launched: 1979,
            duration: 117,
            rating: Rating::R16,
            categories_id: vec![],
            genres_id: vec![],
            cast_members_id: vec![],
        }
    }

    fn media_replaced() -> VideoAudioMediaReplaced {
        VideoAudioMediaReplaced::new(
            VideoId::new(),
            AudioVideoField::Video,
            AudioVideoMedia::create("v.mp4", "raw"),
        )
    }

    #[test]
    fn test_subscribe_and_emit() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        bus.subscribe::<VideoCreated, _>(move |_event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(video_created());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_multiple_handlers_execute_in_order() {
        let bus = EventBus::new();
        let sequence = Arc::new(RwLock::new(Vec::new()));

        for n in 1..=3 {
            let seq = Arc::clone(&sequence);
            bus.subscribe::<VideoCreated, _>(move |_| {
                seq.write().unwrap().push(n);
            });
        }

        bus.emit(video_created());

        assert_eq!(*sequence.read().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_dispatch_routes_by_variant() {
        let bus = EventBus::new();
        let created = Arc::new(AtomicUsize::new(0));
        let replaced = Arc::new(AtomicUsize::new(0));

        let created_clone = Arc::clone(&created);
        bus.subscribe::<VideoCreated, _>(move |_| {
            created_clone.fetch_add(1, Ordering::SeqCst);
        });
        let replaced_clone = Arc::clone(&replaced);
        bus.subscribe::<VideoAudioMediaReplaced, _>(move |_| {
            replaced_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.dispatch(&CatalogEvent::VideoAudioMediaReplaced(media_replaced()));

        assert_eq!(created.load(Ordering::SeqCst), 0);
        assert_eq!(replaced.load(Ordering::SeqCst), 1);

        let log = bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_type, "VideoAudioMediaReplaced");
    }

    #[test]
    fn test_subscriber_count() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count::<VideoCreated>(), 0);

        bus.subscribe::<VideoCreated, _>(|_| {});
        bus.subscribe::<VideoCreated, _>(|_| {});
        assert_eq!(bus.subscriber_count::<VideoCreated>(), 2);
        assert_eq!(bus.subscriber_count::<VideoAudioMediaReplaced>(), 0);
    }

    #[test]
    fn test_handler_panic_doesnt_break_bus() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));

        bus.subscribe::<VideoCreated, _>(|_| {
            panic!("Intentional panic");
        });

        let counter_clone = Arc::clone(&counter);
        bus.subscribe::<VideoCreated, _>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(video_created());

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_event_log() {
        let bus = EventBus::new();
        bus.emit(video_created());
        bus.clear_event_log();
        assert!(bus.get_event_log().is_empty());
    }
}
