// src/domain/video/events.rs
//
// Domain events recorded by the Video aggregate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::entity::VideoId;
use super::media::{AudioVideoField, AudioVideoMedia};
use super::rating::Rating;
use crate::events::{DomainEvent, IntegrationEvent};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub video_id: VideoId,
    pub title: String,
    pub year_launched: i32,
    pub duration: u32,
    pub rating: Rating,
    pub categories_id: Vec<String>,
    pub genres_id: Vec<String>,
    pub cast_members_id: Vec<String>,
}

impl DomainEvent for VideoCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "VideoCreated" }
    fn aggregate_id(&self) -> String { self.video_id.to_string() }
}

/// A trailer or video file was replaced by a fresh upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoAudioMediaReplaced {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub video_id: VideoId,
    pub media: AudioVideoMedia,
    pub field: AudioVideoField,
}

impl VideoAudioMediaReplaced {
    pub fn new(video_id: VideoId, field: AudioVideoField, media: AudioVideoMedia) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            video_id,
            media,
            field,
        }
    }

    /// The encoder is told which slot to pick up through `resource_id`
    pub fn integration_event(&self) -> IntegrationEvent {
        IntegrationEvent::new(
            "VideoAudioMediaUploaded",
            serde_json::json!({
                "resource_id": format!("{}.{}", self.video_id, self.field),
                "file_path": self.media.raw_url(),
            }),
            self.occurred_at,
        )
    }
}

impl DomainEvent for VideoAudioMediaReplaced {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "VideoAudioMediaReplaced" }
    fn aggregate_id(&self) -> String { self.video_id.to_string() }
}
