// src/services/video_service.rs
//
// Video use cases: CRUD with related-aggregate checks, media uploads and
// encoding results.
//
// RULES:
// - Rating and every related-id check land in ONE notification before failing
// - Uploaded bytes are stored under the media url inside the same unit of work
// - Trailer/video uploads track the aggregate so its events get published

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::application::dto::{ListInput, PaginationOutput, VideoOutput, VideoRelations};
use crate::domain::{
    parse_ids, AggregateRoot, AudioVideoField, AudioVideoMedia, DomainError, ImageField,
    Notification, Rating, Video, VideoCreateCommand, VideoFilter, VideoId, DEFAULT_PER_PAGE,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{Storage, StoreObject};
use crate::repositories::{
    CastMemberRepository, CategoryRepository, GenreRepository, VideoRepository,
};
use crate::services::ids_exist_validator::{
    take_existing, CastMembersIdExistsValidator, CategoriesIdExistsValidator,
    GenresIdExistsValidator,
};
use crate::services::{unique_ids, ApplicationService};

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: u32,
    pub rating: String,
    pub is_opened: bool,
    pub categories_id: Vec<String>,
    pub genres_id: Vec<String>,
    pub cast_members_id: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVideoRequest {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub year_launched: Option<i32>,
    pub duration: Option<u32>,
    pub rating: Option<String>,
    pub is_opened: Option<bool>,
    pub categories_id: Option<Vec<String>>,
    pub genres_id: Option<Vec<String>>,
    pub cast_members_id: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoListFilter {
    pub title: Option<String>,
    pub categories_id: Option<Vec<String>>,
    pub genres_id: Option<Vec<String>>,
    pub cast_members_id: Option<Vec<String>>,
}

/// File as received from the caller
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub raw_name: String,
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[derive(Debug, Clone)]
pub struct UploadImageMediaRequest {
    pub video_id: String,
    pub field: ImageField,
    pub file: UploadedFile,
}

#[derive(Debug, Clone)]
pub struct UploadAudioVideoMediaRequest {
    pub video_id: String,
    pub field: AudioVideoField,
    pub file: UploadedFile,
}

/// Result reported by the encoder for one trailer/video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EncodingOutcome {
    Completed { encoded_location: String },
    Failed,
}

#[derive(Debug, Clone)]
pub struct ProcessAudioVideoMediaRequest {
    pub video_id: String,
    pub field: AudioVideoField,
    pub outcome: EncodingOutcome,
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct VideoService {
    video_repo: Arc<dyn VideoRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    cast_member_repo: Arc<dyn CastMemberRepository>,
    categories_validator: CategoriesIdExistsValidator,
    genres_validator: GenresIdExistsValidator,
    cast_members_validator: CastMembersIdExistsValidator,
    storage: Arc<dyn Storage>,
    app_service: Arc<ApplicationService>,
    default_per_page: usize,
}

impl VideoService {
    pub fn new(
        video_repo: Arc<dyn VideoRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        genre_repo: Arc<dyn GenreRepository>,
        cast_member_repo: Arc<dyn CastMemberRepository>,
        storage: Arc<dyn Storage>,
        app_service: Arc<ApplicationService>,
    ) -> Self {
        Self {
            categories_validator: CategoriesIdExistsValidator::new(Arc::clone(&category_repo)),
            genres_validator: GenresIdExistsValidator::new(Arc::clone(&genre_repo)),
            cast_members_validator: CastMembersIdExistsValidator::new(Arc::clone(
                &cast_member_repo,
            )),
            video_repo,
            category_repo,
            genre_repo,
            cast_member_repo,
            storage,
            app_service,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page;
        self
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    pub fn create_video(&self, request: CreateVideoRequest) -> AppResult<VideoOutput> {
        let mut errors = Notification::new();

        let (rating, rating_error) = Rating::create(&request.rating).as_array();
        if let Some(error) = rating_error {
            errors.set_error(error.to_string(), Some("rating"));
        }
        let categories_id = take_existing(
            self.categories_validator.validate(&request.categories_id)?,
            &mut errors,
            "categories_id",
        );
        let genres_id = take_existing(
            self.genres_validator.validate(&request.genres_id)?,
            &mut errors,
            "genres_id",
        );
        let cast_members_id = take_existing(
            self.cast_members_validator.validate(&request.cast_members_id)?,
            &mut errors,
            "cast_members_id",
        );

        let mut video = Video::draft(VideoCreateCommand {
            title: request.title,
            description: request.description,
            year_launched: request.year_launched,
            duration: request.duration,
            rating: rating.unwrap_or_default(),
            is_opened: request.is_opened,
            categories_id,
            genres_id,
            cast_members_id,
        });
        video.notification_mut().copy_errors(&errors);
        video.ensure_valid()?;

        self.app_service.run(|uow| {
            self.video_repo.insert(&video)?;
            uow.add_aggregate_root(&video);
            Ok(())
        })?;

        info!("Video created: {} ({})", video.video_id, video.title);
        self.to_output(&video)
    }

    pub fn update_video(&self, request: UpdateVideoRequest) -> AppResult<VideoOutput> {
        let id = VideoId::parse(&request.id)?;
        let mut video = self.load(&id)?;

        if let Some(title) = request.title {
            video.change_title(title);
        }
        if let Some(description) = request.description {
            video.change_description(description);
        }
        if let Some(year_launched) = request.year_launched {
            video.change_year_launched(year_launched);
        }
        if let Some(duration) = request.duration {
            video.change_duration(duration);
        }
        if let Some(raw_rating) = request.rating {
            match Rating::create(&raw_rating).into_result() {
                Ok(rating) => video.change_rating(rating),
                Err(error) => video
                    .notification_mut()
                    .set_error(error.to_string(), Some("rating")),
            }
        }
        match request.is_opened {
            Some(true) => video.mark_as_opened(),
            Some(false) => video.mark_as_not_opened(),
            None => {}
        }

        if let Some(raw_ids) = request.categories_id {
            let checked = self.categories_validator.validate(&raw_ids)?;
            let all_exist = checked.is_ok();
            let ids = take_existing(checked, video.notification_mut(), "categories_id");
            if all_exist {
                video.sync_categories_id(ids);
            }
        }
        if let Some(raw_ids) = request.genres_id {
            let checked = self.genres_validator.validate(&raw_ids)?;
            let all_exist = checked.is_ok();
            let ids = take_existing(checked, video.notification_mut(), "genres_id");
            if all_exist {
                video.sync_genres_id(ids);
            }
        }
        if let Some(raw_ids) = request.cast_members_id {
            let checked = self.cast_members_validator.validate(&raw_ids)?;
            let all_exist = checked.is_ok();
            let ids = take_existing(checked, video.notification_mut(), "cast_members_id");
            if all_exist {
                video.sync_cast_members_id(ids);
            }
        }
        video.ensure_valid()?;

        self.app_service.run(|_| self.video_repo.update(&video))?;

        self.to_output(&video)
    }

    pub fn get_video(&self, id: &str) -> AppResult<VideoOutput> {
        let id = VideoId::parse(id)?;
        let video = self.load(&id)?;
        self.to_output(&video)
    }

    pub fn list_videos(
        &self,
        input: ListInput<VideoListFilter>,
    ) -> AppResult<PaginationOutput<VideoOutput>> {
        let params = input
            .try_map_filter(|raw| -> AppResult<VideoFilter> {
                Ok(VideoFilter {
                    title: raw.title,
                    categories_id: raw.categories_id.as_deref().map(parse_ids).transpose()?,
                    genres_id: raw.genres_id.as_deref().map(parse_ids).transpose()?,
                    cast_members_id: raw.cast_members_id.as_deref().map(parse_ids).transpose()?,
                })
            })?
            .into_params(self.default_per_page);
        let result = self.video_repo.search(&params)?;
        let relations = self.load_relations(&result.items)?;

        Ok(result
            .map_items(|video| VideoOutput::new(&video, &relations))
            .into())
    }

    pub fn delete_video(&self, id: &str) -> AppResult<()> {
        let id = VideoId::parse(id)?;
        self.app_service.run(|_| self.video_repo.delete(&id))?;
        info!("Video deleted: {}", id);
        Ok(())
    }

    // ========================================================================
    // MEDIA
    // ========================================================================

    pub fn upload_image_media(&self, request: UploadImageMediaRequest) -> AppResult<VideoOutput> {
        let id = VideoId::parse(&request.video_id)?;
        let mut video = self.load(&id)?;
        let UploadImageMediaRequest { field, file, .. } = request;

        let media = field
            .create_media(&file.raw_name, &file.mime_type, file.size(), &video.video_id)
            .map_err(|error| AppError::field_validation(field.as_str(), error.to_string()))?;
        let object_id = media.url();
        video.replace_image(field, media);

        self.app_service.run(|_| {
            self.video_repo.update(&video)?;
            self.storage.store(StoreObject {
                id: object_id.clone(),
                data: file.data,
                mime_type: Some(file.mime_type),
            })
        })?;

        info!("Stored {} for video {} at {}", field, video.video_id, object_id);
        self.to_output(&video)
    }

    pub fn upload_audio_video_media(
        &self,
        request: UploadAudioVideoMediaRequest,
    ) -> AppResult<VideoOutput> {
        let id = VideoId::parse(&request.video_id)?;
        let mut video = self.load(&id)?;
        let UploadAudioVideoMediaRequest { field, file, .. } = request;

        let media = field
            .create_media(&file.raw_name, &file.mime_type, file.size(), &video.video_id)
            .map_err(|error| AppError::field_validation(field.as_str(), error.to_string()))?;
        let object_id = media.raw_url();
        video.replace_audio_video(field, media);

        self.app_service.run(|uow| {
            self.video_repo.update(&video)?;
            self.storage.store(StoreObject {
                id: object_id.clone(),
                data: file.data,
                mime_type: Some(file.mime_type),
            })?;
            uow.add_aggregate_root(&video);
            Ok(())
        })?;

        info!("Stored {} for video {} at {}", field, video.video_id, object_id);
        self.to_output(&video)
    }

    /// Apply the encoder's result. A slot that already finished encoding is
    /// left as is.
    pub fn process_audio_video_media(
        &self,
        request: ProcessAudioVideoMediaRequest,
    ) -> AppResult<VideoOutput> {
        let id = VideoId::parse(&request.video_id)?;
        let mut video = self.load(&id)?;
        let field = request.field;

        if video
            .audio_video(field)
            .is_some_and(AudioVideoMedia::is_completed)
        {
            debug!("{} of video {} already encoded, ignoring result", field, id);
            return self.to_output(&video);
        }

        let processed = video.update_audio_video(field, |media| match &request.outcome {
            EncodingOutcome::Completed { encoded_location } => media.complete(encoded_location),
            EncodingOutcome::Failed => media.fail(),
        });
        if !processed {
            return Err(DomainError::InvalidStateTransition(format!(
                "video {id} has no {field} to process"
            ))
            .into());
        }

        self.app_service.run(|_| self.video_repo.update(&video))?;

        info!(
            "Processed {} of video {}: {:?} (published: {})",
            field, id, request.outcome, video.is_published
        );
        self.to_output(&video)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn load(&self, id: &VideoId) -> AppResult<Video> {
        self.video_repo
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found(id, "Video"))
    }

    fn to_output(&self, video: &Video) -> AppResult<VideoOutput> {
        let relations = self.load_relations(std::slice::from_ref(video))?;
        Ok(VideoOutput::new(video, &relations))
    }

    /// One lookup per related aggregate type for the whole batch
    fn load_relations(&self, videos: &[Video]) -> AppResult<VideoRelations> {
        let categories_id = unique_ids(videos.iter().flat_map(|v| v.categories_id.iter()));
        let genres_id = unique_ids(videos.iter().flat_map(|v| v.genres_id.iter()));
        let cast_members_id = unique_ids(videos.iter().flat_map(|v| v.cast_members_id.iter()));

        Ok(VideoRelations {
            categories: self.category_repo.find_by_ids(&categories_id)?,
            genres: self.genre_repo.find_by_ids(&genres_id)?,
            cast_members: self.cast_member_repo.find_by_ids(&cast_members_id)?,
        })
    }
}
