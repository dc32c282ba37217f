// events/types.rs
//
// Event contracts shared by the catalog.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - Only integration events leave the process

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::video::{VideoAudioMediaReplaced, VideoCreated};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;

    /// Id of the aggregate that recorded the event
    fn aggregate_id(&self) -> String;

    fn event_version(&self) -> u32 {
        1
    }
}

// ============================================================================
// CATALOG EVENTS
// ============================================================================

/// Every domain event an aggregate can record. A closed set, so a unit of
/// work can carry events of any aggregate without type erasure.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    VideoCreated(VideoCreated),
    VideoAudioMediaReplaced(VideoAudioMediaReplaced),
}

impl CatalogEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::VideoCreated(event) => event.event_type(),
            CatalogEvent::VideoAudioMediaReplaced(event) => event.event_type(),
        }
    }

    pub fn aggregate_id(&self) -> String {
        match self {
            CatalogEvent::VideoCreated(event) => event.aggregate_id(),
            CatalogEvent::VideoAudioMediaReplaced(event) => event.aggregate_id(),
        }
    }

    /// The message published outside the process, if this event has one
    pub fn integration_event(&self) -> Option<IntegrationEvent> {
        match self {
            CatalogEvent::VideoCreated(_) => None,
            CatalogEvent::VideoAudioMediaReplaced(event) => Some(event.integration_event()),
        }
    }
}

// ============================================================================
// INTEGRATION EVENTS
// ============================================================================

/// Named, versioned message handed to the message broker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationEvent {
    pub event_name: String,
    pub event_version: u32,
    pub occurred_on: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl IntegrationEvent {
    pub fn new(
        event_name: impl Into<String>,
        payload: serde_json::Value,
        occurred_on: DateTime<Utc>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            event_version: 1,
            occurred_on,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::{AudioVideoField, AudioVideoMedia, VideoId};

    #[test]
    fn test_media_replaced_maps_to_upload_message() {
        let video_id = VideoId::new();
        let event = CatalogEvent::VideoAudioMediaReplaced(VideoAudioMediaReplaced::new(
            video_id,
            AudioVideoField::Trailer,
            AudioVideoMedia::create("t.mp4", format!("videos/{video_id}/videos")),
        ));

        let integration = event.integration_event().unwrap();
        assert_eq!(integration.event_name, "VideoAudioMediaUploaded");
        assert_eq!(integration.event_version, 1);
        assert_eq!(
            integration.payload["resource_id"],
            serde_json::json!(format!("{video_id}.trailer"))
        );
        assert_eq!(
            integration.payload["file_path"],
            serde_json::json!(format!("videos/{video_id}/videos/t.mp4"))
        );
        assert_eq!(event.aggregate_id(), video_id.to_string());
    }
}
