// Test data builder for Video

use chrono::{DateTime, Duration, Utc};

use super::entity::{Video, VideoId, VideoSnapshot};
use super::rating::Rating;
use crate::domain::cast_member::CastMemberId;
use crate::domain::category::CategoryId;
use crate::domain::genre::GenreId;

pub struct VideoFakeBuilder {
    video_id: Option<VideoId>,
    title: String,
    rating: Rating,
    categories_id: Vec<CategoryId>,
    genres_id: Vec<GenreId>,
    cast_members_id: Vec<CastMemberId>,
    created_at: Option<DateTime<Utc>>,
}

impl Video {
    pub fn fake() -> VideoFakeBuilder {
        VideoFakeBuilder {
            video_id: None,
            title: "Movie".to_string(),
            rating: Rating::RL,
            categories_id: Vec::new(),
            genres_id: Vec::new(),
            cast_members_id: Vec::new(),
            created_at: None,
        }
    }
}

impl VideoFakeBuilder {
    pub fn with_id(mut self, video_id: VideoId) -> Self {
        self.video_id = Some(video_id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    pub fn add_category_id(mut self, category_id: CategoryId) -> Self {
        self.categories_id.push(category_id);
        self
    }

    pub fn add_genre_id(mut self, genre_id: GenreId) -> Self {
        self.genres_id.push(genre_id);
        self
    }

    pub fn add_cast_member_id(mut self, cast_member_id: CastMemberId) -> Self {
        self.cast_members_id.push(cast_member_id);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn build(self) -> Video {
        Video::restore(VideoSnapshot {
            video_id: self.video_id.unwrap_or_default(),
            title: self.title,
            description: "Some description".to_string(),
            year_launched: 2001,
            duration: 90,
            rating: self.rating,
            is_opened: false,
            is_published: false,
            banner: None,
            thumbnail: None,
            thumbnail_half: None,
            trailer: None,
            video: None,
            categories_id: self.categories_id.into_iter().collect(),
            genres_id: self.genres_id.into_iter().collect(),
            cast_members_id: self.cast_members_id.into_iter().collect(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }

    pub fn build_many(self, count: usize) -> Vec<Video> {
        let base = self.created_at.unwrap_or_else(Utc::now);
        (0..count)
            .map(|i| {
                Video::fake()
                    .with_title(format!("{} {}", self.title, i))
                    .with_rating(self.rating)
                    .with_created_at(base + Duration::seconds(i as i64))
                    .build()
            })
            .collect()
    }
}
