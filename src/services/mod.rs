// src/services/mod.rs
//
// Services Module - Use Case Orchestration
//
// RULES:
// - One service per aggregate, holding its repository ports
// - Every write goes through ApplicationService::run
// - Services return DTOs, never aggregates

pub mod application_service;
pub mod cast_member_service;
pub mod category_service;
pub mod genre_service;
pub mod ids_exist_validator;
pub mod video_service;

// Re-export all services and their types
pub use application_service::ApplicationService;

pub use category_service::{CategoryService, CreateCategoryRequest, UpdateCategoryRequest};

pub use genre_service::{CreateGenreRequest, GenreListFilter, GenreService, UpdateGenreRequest};

pub use cast_member_service::{
    CastMemberListFilter,
    CastMemberService,
    CreateCastMemberRequest,
    UpdateCastMemberRequest,
};

pub use video_service::{
    CreateVideoRequest,
    EncodingOutcome,
    ProcessAudioVideoMediaRequest,
    UpdateVideoRequest,
    UploadAudioVideoMediaRequest,
    UploadImageMediaRequest,
    UploadedFile,
    VideoListFilter,
    VideoService,
};

pub use ids_exist_validator::{
    validate_ids_exist,
    CastMembersIdExistsValidator,
    CategoriesIdExistsValidator,
    GenresIdExistsValidator,
    IdsExistResult,
};

/// Distinct ids in first-seen order
pub(crate) fn unique_ids<'a, I>(ids: impl Iterator<Item = &'a I>) -> Vec<I>
where
    I: Copy + PartialEq + 'a,
{
    let mut unique: Vec<I> = Vec::new();
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}
