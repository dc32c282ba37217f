// events/message_broker.rs
//
// Outbound port for integration events. Delivery semantics belong to the
// broker behind it; the catalog only hands events over.

use std::sync::{Arc, PoisonError, RwLock};

use log::info;

use crate::error::AppResult;
use crate::events::types::IntegrationEvent;

pub trait MessageBroker: Send + Sync {
    fn publish_event(&self, event: &IntegrationEvent) -> AppResult<()>;
}

/// Records published events in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageBroker {
    published: Arc<RwLock<Vec<IntegrationEvent>>>,
}

impl InMemoryMessageBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<IntegrationEvent> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MessageBroker for InMemoryMessageBroker {
    fn publish_event(&self, event: &IntegrationEvent) -> AppResult<()> {
        info!(
            "Publishing {} v{} ({})",
            event.event_name, event.event_version, event.payload
        );
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_records_published_events_in_order() {
        let broker = InMemoryMessageBroker::new();
        let shared = broker.clone();

        broker
            .publish_event(&IntegrationEvent::new("First", serde_json::json!({}), Utc::now()))
            .unwrap();
        broker
            .publish_event(&IntegrationEvent::new("Second", serde_json::json!({}), Utc::now()))
            .unwrap();

        let names: Vec<_> = shared.published().into_iter().map(|e| e.event_name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
