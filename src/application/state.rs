// src/application/state.rs
//
// Composition root. Owns every service plus the shared infrastructure they
// were wired with.

use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::events::{EventBus, MessageBroker};
use crate::infrastructure::Storage;
use crate::repositories::{
    CastMemberRepository, CategoryRepository, GenreRepository, SqliteCastMemberRepository,
    SqliteCategoryRepository, SqliteGenreRepository, SqliteUnitOfWork, SqliteVideoRepository,
    VideoRepository,
};
use crate::services::{
    ApplicationService, CastMemberService, CategoryService, GenreService, VideoService,
};

/// All fields are Arc-wrapped so callers can share them across threads
pub struct CatalogState {
    pub event_bus: Arc<EventBus>,
    pub message_broker: Arc<dyn MessageBroker>,
    pub storage: Arc<dyn Storage>,
    pub category_service: Arc<CategoryService>,
    pub genre_service: Arc<GenreService>,
    pub cast_member_service: Arc<CastMemberService>,
    pub video_service: Arc<VideoService>,
}

impl CatalogState {
    /// Wire the SQLite repositories, sharing one unit of work, behind the
    /// services. The schema must already be initialized.
    pub fn sqlite(
        pool: Arc<ConnectionPool>,
        storage: Arc<dyn Storage>,
        message_broker: Arc<dyn MessageBroker>,
        default_per_page: usize,
    ) -> Self {
        let uow = Arc::new(SqliteUnitOfWork::new(pool));
        let event_bus = Arc::new(EventBus::new());

        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(SqliteCategoryRepository::new(Arc::clone(&uow)));
        let genre_repo: Arc<dyn GenreRepository> =
            Arc::new(SqliteGenreRepository::new(Arc::clone(&uow)));
        let cast_member_repo: Arc<dyn CastMemberRepository> =
            Arc::new(SqliteCastMemberRepository::new(Arc::clone(&uow)));
        let video_repo: Arc<dyn VideoRepository> =
            Arc::new(SqliteVideoRepository::new(Arc::clone(&uow)));

        let app_service = Arc::new(ApplicationService::new(
            uow,
            Arc::clone(&event_bus),
            Arc::clone(&message_broker),
        ));

        let category_service = Arc::new(
            CategoryService::new(
                Arc::clone(&category_repo),
                Arc::clone(&genre_repo),
                Arc::clone(&app_service),
            )
            .with_default_per_page(default_per_page),
        );
        let genre_service = Arc::new(
            GenreService::new(
                Arc::clone(&genre_repo),
                Arc::clone(&category_repo),
                Arc::clone(&app_service),
            )
            .with_default_per_page(default_per_page),
        );
        let cast_member_service = Arc::new(
            CastMemberService::new(Arc::clone(&cast_member_repo), Arc::clone(&app_service))
                .with_default_per_page(default_per_page),
        );
        let video_service = Arc::new(
            VideoService::new(
                video_repo,
                category_repo,
                genre_repo,
                cast_member_repo,
                Arc::clone(&storage),
                app_service,
            )
            .with_default_per_page(default_per_page),
        );

        Self {
            event_bus,
            message_broker,
            storage,
            category_service,
            genre_service,
            cast_member_service,
            video_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::ListInput;
    use crate::db::{create_test_pool, initialize_database};
    use crate::events::InMemoryMessageBroker;
    use crate::infrastructure::InMemoryStorage;
    use crate::services::{
        CreateCastMemberRequest, CreateCategoryRequest, CreateGenreRequest, CreateVideoRequest,
        EncodingOutcome, ProcessAudioVideoMediaRequest, UploadAudioVideoMediaRequest,
        UploadedFile, VideoListFilter,
    };
    use crate::domain::AudioVideoField;

    fn state() -> (CatalogState, InMemoryMessageBroker) {
        let pool = create_test_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        let broker = InMemoryMessageBroker::new();
        let state = CatalogState::sqlite(
            Arc::new(pool),
            Arc::new(InMemoryStorage::new()),
            Arc::new(broker.clone()),
            10,
        );
        (state, broker)
    }

    #[test]
    fn test_video_lifecycle_on_sqlite() {
        let (state, broker) = state();

        let category = state
            .category_service
            .create_category(CreateCategoryRequest {
                name: "Movie".into(),
                ..Default::default()
            })
            .unwrap();
        let genre = state
            .genre_service
            .create_genre(CreateGenreRequest {
                name: "Crime".into(),
                categories_id: vec![category.id.clone()],
                is_active: None,
            })
            .unwrap();
        let director = state
            .cast_member_service
            .create_cast_member(CreateCastMemberRequest {
                name: "Joel Coen".into(),
                cast_member_type: 1,
            })
            .unwrap();

        let video = state
            .video_service
            .create_video(CreateVideoRequest {
                title: "Fargo".into(),
                description: "Snow and crime".into(),
                year_launched: 1996,
                duration: 98,
                rating: "16".into(),
                is_opened: true,
                categories_id: vec![category.id.clone()],
                genres_id: vec![genre.id.clone()],
                cast_members_id: vec![director.id.clone()],
            })
            .unwrap();
        assert_eq!(video.genres[0].name, "Crime");

        for field in AudioVideoField::ALL {
            state
                .video_service
                .upload_audio_video_media(UploadAudioVideoMediaRequest {
                    video_id: video.id.clone(),
                    field,
                    file: UploadedFile {
                        raw_name: format!("{field}.mp4"),
                        data: vec![1, 2, 3],
                        mime_type: "video/mp4".into(),
                    },
                })
                .unwrap();
            state
                .video_service
                .process_audio_video_media(ProcessAudioVideoMediaRequest {
                    video_id: video.id.clone(),
                    field,
                    outcome: EncodingOutcome::Completed {
                        encoded_location: format!("encoded/{field}"),
                    },
                })
                .unwrap();
        }

        let published: Vec<String> = broker
            .published()
            .into_iter()
            .map(|event| event.event_name)
            .collect();
        assert_eq!(
            published,
            vec!["VideoAudioMediaUploaded", "VideoAudioMediaUploaded"]
        );

        let page = state
            .video_service
            .list_videos(ListInput {
                filter: Some(VideoListFilter {
                    cast_members_id: Some(vec![director.id.clone()]),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.per_page, 10);
        assert!(page.items[0].is_published);
        assert_eq!(page.items[0].video_url.as_deref(), Some("encoded/video"));
        assert_eq!(state.event_bus.get_event_log().len(), 3);
    }

    #[test]
    fn test_upload_for_unknown_video_is_not_found() {
        let (state, broker) = state();

        let err = state
            .video_service
            .upload_audio_video_media(UploadAudioVideoMediaRequest {
                video_id: crate::domain::VideoId::new().to_string(),
                field: AudioVideoField::Trailer,
                file: UploadedFile {
                    raw_name: "t.mp4".into(),
                    data: vec![0],
                    mime_type: "video/mp4".into(),
                },
            })
            .unwrap_err();

        assert!(matches!(err, crate::error::AppError::NotFound(_)));
        assert!(broker.published().is_empty());
    }
}
