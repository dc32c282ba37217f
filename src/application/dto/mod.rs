// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// PRINCIPLES:
// - Outputs are flat, serializable views of aggregates
// - Ids are strings, related aggregates appear as summaries
// - Conversion FROM domain entities only (never TO)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CastMember, Category, Genre, SearchParams, SearchResult, SortDirection, Video,
};

// ============================================================================
// CATEGORY DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOutput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.category_id.to_string(),
            name: category.name.clone(),
            description: category.description.clone(),
            is_active: category.is_active,
            created_at: category.created_at,
        }
    }
}

// ============================================================================
// GENRE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCategoryOutput {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for GenreCategoryOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.category_id.to_string(),
            name: category.name.clone(),
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreOutput {
    pub id: String,
    pub name: String,
    pub categories_id: Vec<String>,
    pub categories: Vec<GenreCategoryOutput>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl GenreOutput {
    /// `categories` are the loaded related categories; ids the genre points
    /// at but that no longer resolve are listed in `categories_id` only
    pub fn new(genre: &Genre, categories: &[Category]) -> Self {
        Self {
            id: genre.genre_id.to_string(),
            name: genre.name.clone(),
            categories_id: genre.categories_id.to_strings(),
            categories: categories
                .iter()
                .filter(|c| genre.categories_id.contains(&c.category_id))
                .map(GenreCategoryOutput::from)
                .collect(),
            is_active: genre.is_active,
            created_at: genre.created_at,
        }
    }
}

// ============================================================================
// CAST MEMBER DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMemberOutput {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cast_member_type: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&CastMember> for CastMemberOutput {
    fn from(cast_member: &CastMember) -> Self {
        Self {
            id: cast_member.cast_member_id.to_string(),
            name: cast_member.name.clone(),
            cast_member_type: cast_member.cast_member_type.code(),
            created_at: cast_member.created_at,
        }
    }
}

// ============================================================================
// VIDEO DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCategoryOutput {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for VideoCategoryOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.category_id.to_string(),
            name: category.name.clone(),
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoGenreOutput {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub categories_id: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Genre> for VideoGenreOutput {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.genre_id.to_string(),
            name: genre.name.clone(),
            is_active: genre.is_active,
            categories_id: genre.categories_id.to_strings(),
            created_at: genre.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCastMemberOutput {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cast_member_type: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&CastMember> for VideoCastMemberOutput {
    fn from(cast_member: &CastMember) -> Self {
        Self {
            id: cast_member.cast_member_id.to_string(),
            name: cast_member.name.clone(),
            cast_member_type: cast_member.cast_member_type.code(),
            created_at: cast_member.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoOutput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: u32,
    pub rating: String,
    pub is_opened: bool,
    pub is_published: bool,
    pub banner_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_half_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_url: Option<String>,
    pub categories_id: Vec<String>,
    pub categories: Vec<VideoCategoryOutput>,
    pub genres_id: Vec<String>,
    pub genres: Vec<VideoGenreOutput>,
    pub cast_members_id: Vec<String>,
    pub cast_members: Vec<VideoCastMemberOutput>,
    pub created_at: DateTime<Utc>,
}

/// Related aggregates loaded alongside a video
#[derive(Debug, Clone, Default)]
pub struct VideoRelations {
    pub categories: Vec<Category>,
    pub genres: Vec<Genre>,
    pub cast_members: Vec<CastMember>,
}

impl VideoOutput {
    pub fn new(video: &Video, relations: &VideoRelations) -> Self {
        Self {
            id: video.video_id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            year_launched: video.year_launched,
            duration: video.duration,
            rating: video.rating.as_str().to_string(),
            is_opened: video.is_opened,
            is_published: video.is_published,
            banner_url: video.banner.as_ref().map(|m| m.url()),
            thumbnail_url: video.thumbnail.as_ref().map(|m| m.url()),
            thumbnail_half_url: video.thumbnail_half.as_ref().map(|m| m.url()),
            // Encoded file once available, raw upload before that
            trailer_url: video.trailer.as_ref().map(|m| {
                m.encoded_location.clone().unwrap_or_else(|| m.raw_url())
            }),
            video_url: video.video.as_ref().map(|m| {
                m.encoded_location.clone().unwrap_or_else(|| m.raw_url())
            }),
            categories_id: video.categories_id.to_strings(),
            categories: relations
                .categories
                .iter()
                .filter(|c| video.categories_id.contains(&c.category_id))
                .map(VideoCategoryOutput::from)
                .collect(),
            genres_id: video.genres_id.to_strings(),
            genres: relations
                .genres
                .iter()
                .filter(|g| video.genres_id.contains(&g.genre_id))
                .map(VideoGenreOutput::from)
                .collect(),
            cast_members_id: video.cast_members_id.to_strings(),
            cast_members: relations
                .cast_members
                .iter()
                .filter(|m| video.cast_members_id.contains(&m.cast_member_id))
                .map(VideoCastMemberOutput::from)
                .collect(),
            created_at: video.created_at,
        }
    }
}

// ============================================================================
// LISTING DTOs
// ============================================================================

/// Raw listing query as it arrives from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListInput<F> {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub filter: Option<F>,
}

impl<F> Default for ListInput<F> {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

impl<F> ListInput<F> {
    /// Convert the raw filter, keeping paging and sort as they are
    pub fn try_map_filter<G, E, M>(self, map: M) -> Result<ListInput<G>, E>
    where
        M: FnOnce(F) -> Result<G, E>,
    {
        Ok(ListInput {
            page: self.page,
            per_page: self.per_page,
            sort: self.sort,
            sort_dir: self.sort_dir,
            filter: self.filter.map(map).transpose()?,
        })
    }

    /// Normalize into search params; missing or zero values take defaults
    pub fn into_params(self, default_per_page: usize) -> SearchParams<F> {
        let mut params = SearchParams::new()
            .with_page(self.page.unwrap_or(1))
            .with_per_page(self.per_page.unwrap_or(default_per_page))
            .with_optional_filter(self.filter);
        if let Some(sort) = self.sort {
            params = params.with_sort(sort);
        }
        if let Some(sort_dir) = self.sort_dir.as_deref() {
            params = params.with_sort_dir(SortDirection::parse(sort_dir));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationOutput<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub current_page: usize,
    pub per_page: usize,
    pub last_page: usize,
}

impl<T> From<SearchResult<T>> for PaginationOutput<T> {
    fn from(result: SearchResult<T>) -> Self {
        Self {
            items: result.items,
            total: result.total,
            current_page: result.current_page,
            per_page: result.per_page,
            last_page: result.last_page,
        }
    }
}
