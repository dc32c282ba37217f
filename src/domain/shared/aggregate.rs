// src/domain/shared/aggregate.rs

use crate::error::{AppError, AppResult};
use crate::events::CatalogEvent;

use super::identifier::EntityId;
use super::notification::Notification;

/// An entity with a typed identity
pub trait Entity {
    type Id: EntityId;

    fn id(&self) -> Self::Id;
}

/// Consistency boundary. Owns a private Notification and the domain events
/// recorded since it was loaded.
///
/// Object safe, so a unit of work can track aggregates of different kinds.
pub trait AggregateRoot: Send + Sync {
    fn aggregate_id(&self) -> String;

    fn notification(&self) -> &Notification;

    fn notification_mut(&mut self) -> &mut Notification;

    /// Events recorded but not yet dispatched
    fn uncommitted_events(&self) -> Vec<CatalogEvent> {
        Vec::new()
    }

    fn mark_events_dispatched(&mut self) {}

    /// Convert accumulated validation errors into a hard failure
    fn ensure_valid(&self) -> AppResult<()> {
        if self.notification().has_errors() {
            return Err(AppError::EntityValidation(
                self.notification().entries().to_vec(),
            ));
        }
        Ok(())
    }
}

/// Event log embedded in aggregates that publish domain events
#[derive(Debug, Clone, Default)]
pub struct AggregateEvents {
    recorded: Vec<CatalogEvent>,
    dispatched: usize,
}

impl AggregateEvents {
    pub fn record(&mut self, event: CatalogEvent) {
        self.recorded.push(event);
    }

    pub fn uncommitted(&self) -> &[CatalogEvent] {
        &self.recorded[self.dispatched..]
    }

    pub fn all(&self) -> &[CatalogEvent] {
        &self.recorded
    }

    pub fn mark_dispatched(&mut self) {
        self.dispatched = self.recorded.len();
    }

    pub fn clear(&mut self) {
        self.recorded.clear();
        self.dispatched = 0;
    }
}

/// Events are transient: two aggregates with the same state are equal
/// regardless of what they recorded
impl PartialEq for AggregateEvents {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
