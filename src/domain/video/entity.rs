use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::events::{VideoAudioMediaReplaced, VideoCreated};
use super::invariants::validate_video;
use super::media::{AudioVideoField, AudioVideoMedia, ImageField, ImageMedia};
use super::rating::Rating;
use crate::domain::cast_member::CastMemberId;
use crate::domain::category::CategoryId;
use crate::domain::genre::GenreId;
use crate::domain::shared::identifier::entity_id;
use crate::domain::shared::{
    contains_ignore_case, AggregateEvents, AggregateRoot, Entity, Notification, RelatedIds,
    Searchable, SortDirection, SortValue,
};
use crate::error::AppResult;
use crate::events::CatalogEvent;

entity_id!(
    /// Identity of a Video
    VideoId,
    "Video"
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub video_id: VideoId,
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: u32,
    pub rating: Rating,
    pub is_opened: bool,
    pub is_published: bool,
    pub banner: Option<ImageMedia>,
    pub thumbnail: Option<ImageMedia>,
    pub thumbnail_half: Option<ImageMedia>,
    pub trailer: Option<AudioVideoMedia>,
    pub video: Option<AudioVideoMedia>,
    pub categories_id: RelatedIds<CategoryId>,
    pub genres_id: RelatedIds<GenreId>,
    pub cast_members_id: RelatedIds<CastMemberId>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    notification: Notification,
    #[serde(skip)]
    events: AggregateEvents,
}

#[derive(Debug, Clone, Default)]
pub struct VideoCreateCommand {
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: u32,
    pub rating: Rating,
    pub is_opened: bool,
    pub categories_id: Vec<CategoryId>,
    pub genres_id: Vec<GenreId>,
    pub cast_members_id: Vec<CastMemberId>,
}

/// Every present dimension must match; id lists match when any id is related
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFilter {
    pub title: Option<String>,
    pub categories_id: Option<Vec<CategoryId>>,
    pub genres_id: Option<Vec<GenreId>>,
    pub cast_members_id: Option<Vec<CastMemberId>>,
}

/// Persisted state of a video, used to rebuild it without validation or events
#[derive(Debug, Clone)]
pub struct VideoSnapshot {
    pub video_id: VideoId,
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: u32,
    pub rating: Rating,
    pub is_opened: bool,
    pub is_published: bool,
    pub banner: Option<ImageMedia>,
    pub thumbnail: Option<ImageMedia>,
    pub thumbnail_half: Option<ImageMedia>,
    pub trailer: Option<AudioVideoMedia>,
    pub video: Option<AudioVideoMedia>,
    pub categories_id: RelatedIds<CategoryId>,
    pub genres_id: RelatedIds<GenreId>,
    pub cast_members_id: RelatedIds<CastMemberId>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    pub fn restore(snapshot: VideoSnapshot) -> Self {
        Self {
            video_id: snapshot.video_id,
            title: snapshot.title,
            description: snapshot.description,
            year_launched: snapshot.year_launched,
            duration: snapshot.duration,
            rating: snapshot.rating,
            is_opened: snapshot.is_opened,
            is_published: snapshot.is_published,
            banner: snapshot.banner,
            thumbnail: snapshot.thumbnail,
            thumbnail_half: snapshot.thumbnail_half,
            trailer: snapshot.trailer,
            video: snapshot.video,
            categories_id: snapshot.categories_id,
            genres_id: snapshot.genres_id,
            cast_members_id: snapshot.cast_members_id,
            created_at: snapshot.created_at,
            notification: Notification::new(),
            events: AggregateEvents::default(),
        }
    }

    /// Build, validate and record `VideoCreated`. Errors stay in the
    /// notification so callers can merge in their own.
    pub fn draft(command: VideoCreateCommand) -> Self {
        let mut video = Self::restore(VideoSnapshot {
            video_id: VideoId::new(),
            title: command.title,
            description: command.description,
            year_launched: command.year_launched,
            duration: command.duration,
            rating: command.rating,
            is_opened: command.is_opened,
            is_published: false,
            banner: None,
            thumbnail: None,
            thumbnail_half: None,
            trailer: None,
            video: None,
            categories_id: command.categories_id.into_iter().collect(),
            genres_id: command.genres_id.into_iter().collect(),
            cast_members_id: command.cast_members_id.into_iter().collect(),
            created_at: Utc::now(),
        });
        video.validate(None);
        video.events.record(CatalogEvent::VideoCreated(VideoCreated {
            event_id: Uuid::new_v4(),
            occurred_at: video.created_at,
            video_id: video.video_id,
            title: video.title.clone(),
            year_launched: video.year_launched,
            duration: video.duration,
            rating: video.rating,
            categories_id: video.categories_id.to_strings(),
            genres_id: video.genres_id.to_strings(),
            cast_members_id: video.cast_members_id.to_strings(),
        }));
        video
    }

    pub fn create(command: VideoCreateCommand) -> AppResult<Self> {
        let video = Self::draft(command);
        video.ensure_valid()?;
        Ok(video)
    }

    pub fn change_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.validate(Some(&["title"][..]));
    }

    pub fn change_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.validate(Some(&["description"][..]));
    }

    pub fn change_year_launched(&mut self, year_launched: i32) {
        self.year_launched = year_launched;
        self.validate(Some(&["year_launched"][..]));
    }

    pub fn change_duration(&mut self, duration: u32) {
        self.duration = duration;
        self.validate(Some(&["duration"][..]));
    }

    pub fn change_rating(&mut self, rating: Rating) {
        self.rating = rating;
    }

    pub fn mark_as_opened(&mut self) {
        self.is_opened = true;
    }

    pub fn mark_as_not_opened(&mut self) {
        self.is_opened = false;
    }

    // ========================================================================
    // MEDIA
    // ========================================================================

    pub fn image(&self, field: ImageField) -> Option<&ImageMedia> {
        match field {
            ImageField::Banner => self.banner.as_ref(),
            ImageField::Thumbnail => self.thumbnail.as_ref(),
            ImageField::ThumbnailHalf => self.thumbnail_half.as_ref(),
        }
    }

    pub fn replace_image(&mut self, field: ImageField, media: ImageMedia) {
        let slot = match field {
            ImageField::Banner => &mut self.banner,
            ImageField::Thumbnail => &mut self.thumbnail,
            ImageField::ThumbnailHalf => &mut self.thumbnail_half,
        };
        *slot = Some(media);
    }

    pub fn replace_banner(&mut self, banner: ImageMedia) {
        self.replace_image(ImageField::Banner, banner);
    }

    pub fn replace_thumbnail(&mut self, thumbnail: ImageMedia) {
        self.replace_image(ImageField::Thumbnail, thumbnail);
    }

    pub fn replace_thumbnail_half(&mut self, thumbnail_half: ImageMedia) {
        self.replace_image(ImageField::ThumbnailHalf, thumbnail_half);
    }

    pub fn audio_video(&self, field: AudioVideoField) -> Option<&AudioVideoMedia> {
        match field {
            AudioVideoField::Trailer => self.trailer.as_ref(),
            AudioVideoField::Video => self.video.as_ref(),
        }
    }

    fn audio_video_slot(&mut self, field: AudioVideoField) -> &mut Option<AudioVideoMedia> {
        match field {
            AudioVideoField::Trailer => &mut self.trailer,
            AudioVideoField::Video => &mut self.video,
        }
    }

    /// Store a fresh upload and record `VideoAudioMediaReplaced` so the
    /// encoder gets notified
    pub fn replace_audio_video(&mut self, field: AudioVideoField, media: AudioVideoMedia) {
        *self.audio_video_slot(field) = Some(media.clone());
        self.events
            .record(CatalogEvent::VideoAudioMediaReplaced(VideoAudioMediaReplaced::new(
                self.video_id,
                field,
                media,
            )));
    }

    pub fn replace_trailer(&mut self, trailer: AudioVideoMedia) {
        self.replace_audio_video(AudioVideoField::Trailer, trailer);
    }

    pub fn replace_video(&mut self, video: AudioVideoMedia) {
        self.replace_audio_video(AudioVideoField::Video, video);
    }

    /// Apply an encoding status change to an existing media. Returns false
    /// when the slot is empty.
    pub fn update_audio_video<F>(&mut self, field: AudioVideoField, update: F) -> bool
    where
        F: FnOnce(&AudioVideoMedia) -> AudioVideoMedia,
    {
        let slot = self.audio_video_slot(field);
        match slot.as_ref().map(update) {
            Some(updated) => {
                *slot = Some(updated);
                self.mark_as_published();
                true
            }
            None => false,
        }
    }

    /// Published once both trailer and video finished encoding
    pub fn mark_as_published(&mut self) {
        let trailer_done = self.trailer.as_ref().is_some_and(AudioVideoMedia::is_completed);
        let video_done = self.video.as_ref().is_some_and(AudioVideoMedia::is_completed);
        if trailer_done && video_done {
            self.is_published = true;
        }
    }

    // ========================================================================
    // RELATIONS
    // ========================================================================

    pub fn add_category_id(&mut self, category_id: CategoryId) {
        self.categories_id.add(category_id);
    }

    pub fn remove_category_id(&mut self, category_id: &CategoryId) {
        self.categories_id.remove(category_id);
    }

    pub fn sync_categories_id(&mut self, categories_id: Vec<CategoryId>) {
        self.categories_id.sync(categories_id);
    }

    pub fn add_genre_id(&mut self, genre_id: GenreId) {
        self.genres_id.add(genre_id);
    }

    pub fn remove_genre_id(&mut self, genre_id: &GenreId) {
        self.genres_id.remove(genre_id);
    }

    pub fn sync_genres_id(&mut self, genres_id: Vec<GenreId>) {
        self.genres_id.sync(genres_id);
    }

    pub fn add_cast_member_id(&mut self, cast_member_id: CastMemberId) {
        self.cast_members_id.add(cast_member_id);
    }

    pub fn remove_cast_member_id(&mut self, cast_member_id: &CastMemberId) {
        self.cast_members_id.remove(cast_member_id);
    }

    pub fn sync_cast_members_id(&mut self, cast_members_id: Vec<CastMemberId>) {
        self.cast_members_id.sync(cast_members_id);
    }

    pub fn validate(&mut self, fields: Option<&[&str]>) -> bool {
        let mut notification = std::mem::take(&mut self.notification);
        let valid = validate_video(&mut notification, self, fields);
        self.notification = notification;
        valid
    }

    pub fn recorded_events(&self) -> &[CatalogEvent] {
        self.events.all()
    }
}

impl Entity for Video {
    type Id = VideoId;

    fn id(&self) -> VideoId {
        self.video_id
    }
}

impl AggregateRoot for Video {
    fn aggregate_id(&self) -> String {
        self.video_id.to_string()
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }

    fn notification_mut(&mut self) -> &mut Notification {
        &mut self.notification
    }

    fn uncommitted_events(&self) -> Vec<CatalogEvent> {
        self.events.uncommitted().to_vec()
    }

    fn mark_events_dispatched(&mut self) {
        self.events.mark_dispatched();
    }
}

impl Searchable for Video {
    type Filter = VideoFilter;

    const SORTABLE_FIELDS: &'static [&'static str] = &["title", "created_at"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "title" => Some(SortValue::Text(self.title.clone())),
            "created_at" => Some(SortValue::Timestamp(self.created_at)),
            _ => None,
        }
    }

    fn matches(&self, filter: &VideoFilter) -> bool {
        let title_matches = filter
            .title
            .as_deref()
            .map_or(true, |title| contains_ignore_case(&self.title, title));
        let categories_match = filter
            .categories_id
            .as_deref()
            .map_or(true, |ids| self.categories_id.contains_any(ids));
        let genres_match = filter
            .genres_id
            .as_deref()
            .map_or(true, |ids| self.genres_id.contains_any(ids));
        let cast_members_match = filter
            .cast_members_id
            .as_deref()
            .map_or(true, |ids| self.cast_members_id.contains_any(ids));
        title_matches && categories_match && genres_match && cast_members_match
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("created_at", SortDirection::Desc))
    }
}
