//! Critical Video Invariants:
//!
//! 1. Title is required and at most 255 characters
//! 2. Rating is one of L, 10, 12, 14, 16, 18
//! 3. A video is published only when both trailer and video are encoded
//! 4. Each media slot has its own size limit and accepted mime types
//! 5. Replacing a trailer or video records `VideoAudioMediaReplaced`

pub mod entity;
pub mod events;
#[cfg(test)]
pub mod fake;
pub mod invariants;
pub mod media;
pub mod rating;

pub use entity::{Video, VideoCreateCommand, VideoFilter, VideoId, VideoSnapshot};
pub use events::{VideoAudioMediaReplaced, VideoCreated};
pub use invariants::{validate_video, VideoValidator};
pub use media::{
    AudioVideoField, AudioVideoMedia, AudioVideoMediaStatus, ImageField, ImageMedia,
    MediaFileError, MediaFileValidator,
};
pub use rating::{InvalidRating, Rating};
