// src/events/mod.rs
//
// Internal Event System - Public API
//
// Domain events stay in process and go through the EventBus; integration
// events leave through the MessageBroker port.

pub mod bus;
pub mod message_broker;
pub mod types;

pub use bus::{EventBus, EventLogEntry};
pub use message_broker::{InMemoryMessageBroker, MessageBroker};
pub use types::{CatalogEvent, DomainEvent, IntegrationEvent};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
