// src/repositories/video_repository.rs
//
// Video persistence. A video row is rebuilt from the `videos` table, its three
// relation tables and the two media tables.

use std::sync::Arc;

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    AudioVideoField, AudioVideoMedia, AudioVideoMediaStatus, CastMemberId, CategoryId, GenreId,
    ImageField, ImageMedia, Rating, RelatedIds, SearchParams, SearchResult, Searchable, Video,
    VideoFilter, VideoId, VideoSnapshot,
};
use crate::error::{AppError, AppResult};
use crate::repositories::sql::{self, WhereClause};
use crate::repositories::unit_of_work::SqliteUnitOfWork;
use crate::repositories::ExistsResult;

#[cfg_attr(test, mockall::automock)]
pub trait VideoRepository: Send + Sync {
    fn insert(&self, video: &Video) -> AppResult<()>;
    fn bulk_insert(&self, videos: &[Video]) -> AppResult<()>;
    fn update(&self, video: &Video) -> AppResult<()>;
    fn delete(&self, id: &VideoId) -> AppResult<()>;
    fn find_by_id(&self, id: &VideoId) -> AppResult<Option<Video>>;
    fn find_all(&self) -> AppResult<Vec<Video>>;
    fn find_by_ids(&self, ids: &[VideoId]) -> AppResult<Vec<Video>>;
    fn exists_by_id(&self, ids: &[VideoId]) -> AppResult<ExistsResult<VideoId>>;
    fn search(&self, params: &SearchParams<VideoFilter>) -> AppResult<SearchResult<Video>>;
    fn sortable_fields(&self) -> &'static [&'static str] {
        Video::SORTABLE_FIELDS
    }
}

const SELECT_VIDEO: &str = "SELECT video_id, title, description, year_launched, duration, \
     rating, is_opened, is_published, created_at FROM videos";

pub struct SqliteVideoRepository {
    uow: Arc<SqliteUnitOfWork>,
}

impl SqliteVideoRepository {
    pub fn new(uow: Arc<SqliteUnitOfWork>) -> Self {
        Self { uow }
    }

    /// Scalar columns only; `hydrate` loads relations and media
    fn row_to_video(row: &Row) -> rusqlite::Result<Video> {
        let id: String = row.get("video_id")?;
        let rating: String = row.get("rating")?;
        let created_at: String = row.get("created_at")?;

        let rating = Rating::create(&rating)
            .into_result()
            .map_err(|e| sql::conversion_error(e.to_string()))?;

        Ok(Video::restore(VideoSnapshot {
            video_id: sql::parse_id(&id)?,
            title: row.get("title")?,
            description: row.get("description")?,
            year_launched: row.get("year_launched")?,
            duration: row.get("duration")?,
            rating,
            is_opened: row.get("is_opened")?,
            is_published: row.get("is_published")?,
            banner: None,
            thumbnail: None,
            thumbnail_half: None,
            trailer: None,
            video: None,
            categories_id: RelatedIds::new(),
            genres_id: RelatedIds::new(),
            cast_members_id: RelatedIds::new(),
            created_at: sql::parse_timestamp(&created_at)?,
        }))
    }

    fn hydrate(conn: &Connection, mut video: Video) -> AppResult<Video> {
        let video_id = video.video_id.to_string();

        video.categories_id = sql::load_related::<CategoryId>(
            conn,
            "video_categories",
            "video_id",
            &video_id,
            "category_id",
        )?;
        video.genres_id =
            sql::load_related::<GenreId>(conn, "video_genres", "video_id", &video_id, "genre_id")?;
        video.cast_members_id = sql::load_related::<CastMemberId>(
            conn,
            "video_cast_members",
            "video_id",
            &video_id,
            "cast_member_id",
        )?;

        for field in ImageField::ALL {
            if let Some(media) = Self::load_image(conn, &video_id, field)? {
                video.replace_image(field, media);
            }
        }
        // Assigned directly: replace_audio_video would record a new event
        video.trailer = Self::load_audio_video(conn, &video_id, AudioVideoField::Trailer)?;
        video.video = Self::load_audio_video(conn, &video_id, AudioVideoField::Video)?;

        Ok(video)
    }

    fn hydrate_all(conn: &Connection, videos: Vec<Video>) -> AppResult<Vec<Video>> {
        videos
            .into_iter()
            .map(|video| Self::hydrate(conn, video))
            .collect()
    }

    fn load_image(
        conn: &Connection,
        video_id: &str,
        field: ImageField,
    ) -> AppResult<Option<ImageMedia>> {
        let media = conn
            .query_row(
                "SELECT name, location FROM image_medias WHERE video_id = ?1 AND video_field = ?2",
                [video_id, field.as_str()],
                |row| Ok(ImageMedia::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(media)
    }

    fn load_audio_video(
        conn: &Connection,
        video_id: &str,
        field: AudioVideoField,
    ) -> AppResult<Option<AudioVideoMedia>> {
        let media = conn
            .query_row(
                "SELECT name, raw_location, encoded_location, status FROM audio_video_medias
                 WHERE video_id = ?1 AND video_field = ?2",
                [video_id, field.as_str()],
                |row| {
                    let status: String = row.get(3)?;
                    let status = AudioVideoMediaStatus::parse(&status).ok_or_else(|| {
                        sql::conversion_error(format!("Invalid media status '{}'", status))
                    })?;
                    Ok(AudioVideoMedia {
                        name: row.get(0)?,
                        raw_location: row.get(1)?,
                        encoded_location: row.get(2)?,
                        status,
                    })
                },
            )
            .optional()?;
        Ok(media)
    }

    /// Rewrite every child row of the video: relations and media slots
    fn save_children(conn: &Connection, video: &Video) -> AppResult<()> {
        let video_id = video.video_id.to_string();

        sql::replace_related(
            conn,
            "video_categories",
            "video_id",
            &video_id,
            "category_id",
            &video.categories_id,
        )?;
        sql::replace_related(
            conn,
            "video_genres",
            "video_id",
            &video_id,
            "genre_id",
            &video.genres_id,
        )?;
        sql::replace_related(
            conn,
            "video_cast_members",
            "video_id",
            &video_id,
            "cast_member_id",
            &video.cast_members_id,
        )?;

        conn.execute("DELETE FROM image_medias WHERE video_id = ?1", [&video_id])?;
        for field in ImageField::ALL {
            if let Some(media) = video.image(field) {
                conn.execute(
                    "INSERT INTO image_medias (video_id, video_field, name, location)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![video_id, field.as_str(), media.name, media.location],
                )?;
            }
        }

        conn.execute("DELETE FROM audio_video_medias WHERE video_id = ?1", [&video_id])?;
        for field in AudioVideoField::ALL {
            if let Some(media) = video.audio_video(field) {
                conn.execute(
                    "INSERT INTO audio_video_medias
                     (video_id, video_field, name, raw_location, encoded_location, status)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        video_id,
                        field.as_str(),
                        media.name,
                        media.raw_location,
                        media.encoded_location,
                        media.status.as_str(),
                    ],
                )?;
            }
        }
        Ok(())
    }

    fn insert_with(conn: &Connection, video: &Video) -> AppResult<()> {
        conn.execute(
            "INSERT INTO videos (video_id, title, description, year_launched, duration, rating,
                                 is_opened, is_published, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                video.video_id.to_string(),
                video.title,
                video.description,
                video.year_launched,
                video.duration,
                video.rating.as_str(),
                video.is_opened,
                video.is_published,
                sql::format_timestamp(&video.created_at),
            ],
        )?;
        Self::save_children(conn, video)
    }
}

impl VideoRepository for SqliteVideoRepository {
    fn insert(&self, video: &Video) -> AppResult<()> {
        self.uow.with_connection(|conn| Self::insert_with(conn, video))
    }

    fn bulk_insert(&self, videos: &[Video]) -> AppResult<()> {
        self.uow.with_connection(|conn| {
            for video in videos {
                Self::insert_with(conn, video)?;
            }
            Ok(())
        })
    }

    fn update(&self, video: &Video) -> AppResult<()> {
        self.uow.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE videos SET title = ?2, description = ?3, year_launched = ?4,
                        duration = ?5, rating = ?6, is_opened = ?7, is_published = ?8
                 WHERE video_id = ?1",
                params![
                    video.video_id.to_string(),
                    video.title,
                    video.description,
                    video.year_launched,
                    video.duration,
                    video.rating.as_str(),
                    video.is_opened,
                    video.is_published,
                ],
            )?;
            if changed == 0 {
                return Err(AppError::not_found(video.video_id, "Video"));
            }
            Self::save_children(conn, video)
        })
    }

    fn delete(&self, id: &VideoId) -> AppResult<()> {
        let changed = self.uow.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM videos WHERE video_id = ?1", [id.to_string()])?)
        })?;

        if changed == 0 {
            return Err(AppError::not_found(id, "Video"));
        }
        Ok(())
    }

    fn find_by_id(&self, id: &VideoId) -> AppResult<Option<Video>> {
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_VIDEO} WHERE video_id = ?1"))?;
            match stmt.query_row([id.to_string()], Self::row_to_video) {
                Ok(video) => Ok(Some(Self::hydrate(conn, video)?)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(AppError::Database(e)),
            }
        })
    }

    fn find_all(&self) -> AppResult<Vec<Video>> {
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_VIDEO} ORDER BY rowid ASC"))?;
            let videos = stmt
                .query_map([], Self::row_to_video)?
                .collect::<Result<Vec<_>, _>>()?;
            Self::hydrate_all(conn, videos)
        })
    }

    fn find_by_ids(&self, ids: &[VideoId]) -> AppResult<Vec<Video>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.uow.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_VIDEO} WHERE video_id IN ({}) ORDER BY rowid ASC",
                sql::placeholders(ids.len())
            ))?;
            let videos = stmt
                .query_map(
                    rusqlite::params_from_iter(ids.iter().map(|id| id.to_string())),
                    Self::row_to_video,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Self::hydrate_all(conn, videos)
        })
    }

    fn exists_by_id(&self, ids: &[VideoId]) -> AppResult<ExistsResult<VideoId>> {
        self.uow
            .with_connection(|conn| sql::exists_by_id(conn, "videos", "video_id", ids))
    }

    fn search(&self, params: &SearchParams<VideoFilter>) -> AppResult<SearchResult<Video>> {
        let mut filter = WhereClause::new();
        if let Some(video_filter) = params.filter() {
            if let Some(title) = &video_filter.title {
                filter.contains_ignore_case("title", title);
            }
            if let Some(ids) = &video_filter.categories_id {
                filter.related_to_any("video_categories", "video_id", "videos.video_id", "category_id", ids);
            }
            if let Some(ids) = &video_filter.genres_id {
                filter.related_to_any("video_genres", "video_id", "videos.video_id", "genre_id", ids);
            }
            if let Some(ids) = &video_filter.cast_members_id {
                filter.related_to_any(
                    "video_cast_members",
                    "video_id",
                    "videos.video_id",
                    "cast_member_id",
                    ids,
                );
            }
        }
        let order = sql::order_by::<Video>(params);
        debug!("Searching videos{}{}", filter.sql(), order);

        let (items, total) = self.uow.with_connection(|conn| {
            let (rows, total) = sql::search_rows(
                conn,
                SELECT_VIDEO,
                "videos",
                &filter,
                &order,
                params,
                Self::row_to_video,
            )?;
            Ok((Self::hydrate_all(conn, rows)?, total))
        })?;

        Ok(SearchResult::new(items, total, params.page(), params.per_page()))
    }
}
