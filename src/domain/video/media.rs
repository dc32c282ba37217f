// src/domain/video/media.rs
//
// Media value objects owned by a Video, plus upload file validation.
// Media slots are closed enums: each slot fixes its size limit, accepted mime
// types and storage folder at compile time.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use super::entity::VideoId;

const MB: u64 = 1024 * 1024;
const GB: u64 = 1024 * MB;

const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];
const VIDEO_MIME_TYPES: &[&str] = &["video/mp4"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaFileError {
    #[error("Invalid media file size: {actual} > {max}")]
    InvalidMediaFileSize { actual: u64, max: u64 },

    #[error("Invalid media file mime: {actual} not in {}", .valid.join(", "))]
    InvalidMediaFileMimeType {
        actual: String,
        valid: Vec<String>,
    },
}

/// Size and mime-type rules for one media slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFileValidator {
    pub max_size: u64,
    pub valid_mime_types: &'static [&'static str],
}

impl MediaFileValidator {
    pub const fn new(max_size: u64, valid_mime_types: &'static [&'static str]) -> Self {
        Self {
            max_size,
            valid_mime_types,
        }
    }

    /// Check the upload and return the hashed name it will be stored under
    pub fn validate(&self, raw_name: &str, mime_type: &str, size: u64) -> Result<String, MediaFileError> {
        if size > self.max_size {
            return Err(MediaFileError::InvalidMediaFileSize {
                actual: size,
                max: self.max_size,
            });
        }

        if !self.valid_mime_types.contains(&mime_type) {
            return Err(MediaFileError::InvalidMediaFileMimeType {
                actual: mime_type.to_string(),
                valid: self.valid_mime_types.iter().map(|m| m.to_string()).collect(),
            });
        }

        Ok(hashed_file_name(raw_name))
    }
}

/// sha256 of the raw name salted with a random uuid and the current time,
/// keeping the original extension
fn hashed_file_name(raw_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_name.as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    let digest = format!("{:x}", hasher.finalize());

    match raw_name.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => format!("{digest}.{extension}"),
        _ => digest,
    }
}

// ============================================================================
// IMAGE MEDIA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMedia {
    pub name: String,
    pub location: String,
}

impl ImageMedia {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/{}", self.location, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageField {
    Banner,
    Thumbnail,
    ThumbnailHalf,
}

impl ImageField {
    pub const ALL: [ImageField; 3] = [ImageField::Banner, ImageField::Thumbnail, ImageField::ThumbnailHalf];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageField::Banner => "banner",
            ImageField::Thumbnail => "thumbnail",
            ImageField::ThumbnailHalf => "thumbnail_half",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }

    pub fn validator(&self) -> MediaFileValidator {
        MediaFileValidator::new(2 * MB, IMAGE_MIME_TYPES)
    }

    /// Validate an upload and build the media value for this slot
    pub fn create_media(
        &self,
        raw_name: &str,
        mime_type: &str,
        size: u64,
        video_id: &VideoId,
    ) -> Result<ImageMedia, MediaFileError> {
        let name = self.validator().validate(raw_name, mime_type, size)?;
        Ok(ImageMedia::new(name, format!("videos/{video_id}/images")))
    }
}

impl std::fmt::Display for ImageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// AUDIO / VIDEO MEDIA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioVideoMediaStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AudioVideoMediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioVideoMediaStatus::Pending => "pending",
            AudioVideoMediaStatus::Processing => "processing",
            AudioVideoMediaStatus::Completed => "completed",
            AudioVideoMediaStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AudioVideoMediaStatus::Pending),
            "processing" => Some(AudioVideoMediaStatus::Processing),
            "completed" => Some(AudioVideoMediaStatus::Completed),
            "failed" => Some(AudioVideoMediaStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioVideoMedia {
    pub name: String,
    pub raw_location: String,
    pub encoded_location: Option<String>,
    pub status: AudioVideoMediaStatus,
}

impl AudioVideoMedia {
    /// A freshly uploaded, not yet encoded media
    pub fn create(name: impl Into<String>, raw_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_location: raw_location.into(),
            encoded_location: None,
            status: AudioVideoMediaStatus::Pending,
        }
    }

    pub fn raw_url(&self) -> String {
        format!("{}/{}", self.raw_location, self.name)
    }

    pub fn process(&self) -> Self {
        Self {
            status: AudioVideoMediaStatus::Processing,
            ..self.clone()
        }
    }

    pub fn complete(&self, encoded_location: impl Into<String>) -> Self {
        Self {
            encoded_location: Some(encoded_location.into()),
            status: AudioVideoMediaStatus::Completed,
            ..self.clone()
        }
    }

    pub fn fail(&self) -> Self {
        Self {
            status: AudioVideoMediaStatus::Failed,
            ..self.clone()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AudioVideoMediaStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioVideoField {
    Trailer,
    Video,
}

impl AudioVideoField {
    pub const ALL: [AudioVideoField; 2] = [AudioVideoField::Trailer, AudioVideoField::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioVideoField::Trailer => "trailer",
            AudioVideoField::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }

    pub fn validator(&self) -> MediaFileValidator {
        match self {
            AudioVideoField::Trailer => MediaFileValidator::new(500 * MB, VIDEO_MIME_TYPES),
            AudioVideoField::Video => MediaFileValidator::new(50 * GB, VIDEO_MIME_TYPES),
        }
    }

    pub fn create_media(
        &self,
        raw_name: &str,
        mime_type: &str,
        size: u64,
        video_id: &VideoId,
    ) -> Result<AudioVideoMedia, MediaFileError> {
        let name = self.validator().validate(raw_name, mime_type, size)?;
        Ok(AudioVideoMedia::create(name, format!("videos/{video_id}/videos")))
    }
}

impl std::fmt::Display for AudioVideoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_oversized_file() {
        let validator = MediaFileValidator::new(10, IMAGE_MIME_TYPES);
        let err = validator.validate("a.png", "image/png", 11).unwrap_err();
        assert_eq!(err, MediaFileError::InvalidMediaFileSize { actual: 11, max: 10 });
    }

    #[test]
    fn test_rejects_unknown_mime_type() {
        let validator = MediaFileValidator::new(10, IMAGE_MIME_TYPES);
        let err = validator.validate("a.txt", "text/plain", 1).unwrap_err();
        assert!(err.to_string().contains("text/plain"));
        assert!(err.to_string().contains("image/jpeg"));
    }

    #[test]
    fn test_hashed_name_keeps_extension() {
        let validator = MediaFileValidator::new(10, IMAGE_MIME_TYPES);
        let first = validator.validate("cover.png", "image/png", 1).unwrap();
        let second = validator.validate("cover.png", "image/png", 1).unwrap();
        assert!(first.ends_with(".png"));
        assert_eq!(first.len(), 64 + 4);
        assert_ne!(first, second);
    }

    #[test]
    fn test_image_slot_builds_media_under_video_folder() {
        let video_id = VideoId::new();
        let media = ImageField::Banner
            .create_media("banner.jpg", "image/jpeg", 100, &video_id)
            .unwrap();
        assert_eq!(media.location, format!("videos/{video_id}/images"));
        assert!(media.url().starts_with(&media.location));
    }

    #[test]
    fn test_audio_video_status_transitions() {
        let media = AudioVideoMedia::create("trailer.mp4", "videos/x/videos");
        assert_eq!(media.status, AudioVideoMediaStatus::Pending);
        assert_eq!(media.process().status, AudioVideoMediaStatus::Processing);

        let completed = media.complete("encoded/trailer.mp4");
        assert!(completed.is_completed());
        assert_eq!(completed.encoded_location.as_deref(), Some("encoded/trailer.mp4"));

        assert_eq!(media.fail().status, AudioVideoMediaStatus::Failed);
        assert_eq!(media.raw_url(), "videos/x/videos/trailer.mp4");
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!(ImageField::parse("thumbnail_half"), Some(ImageField::ThumbnailHalf));
        assert_eq!(ImageField::parse("trailer"), None);
        assert_eq!(AudioVideoField::parse("trailer"), Some(AudioVideoField::Trailer));
        assert!(AudioVideoField::Trailer.validator().max_size < AudioVideoField::Video.validator().max_size);
    }
}
