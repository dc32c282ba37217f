// src/services/ids_exist_validator.rs
//
// Existence checks for related aggregate ids. Missing ids come back as data
// (Either::Fail) so the caller can merge them into its notification; a
// malformed id is a hard error.

use std::sync::Arc;

use log::debug;

use crate::domain::{
    parse_ids, CastMemberId, CategoryId, Either, EntityId, GenreId, NotFoundError, Notification,
};
use crate::error::AppResult;
use crate::repositories::{
    CastMemberRepository, CategoryRepository, ExistsResult, GenreRepository,
};

pub type IdsExistResult<I> = AppResult<Either<Vec<I>, Vec<NotFoundError>>>;

/// Parse `raw_ids`, then ask the store once which of them exist
pub fn validate_ids_exist<I, F>(raw_ids: &[String], exists_by_id: F) -> IdsExistResult<I>
where
    I: EntityId,
    F: FnOnce(&[I]) -> AppResult<ExistsResult<I>>,
{
    let ids: Vec<I> = parse_ids(raw_ids)?;
    let result = exists_by_id(&ids)?;

    if result.not_exists.is_empty() {
        return Ok(Either::ok(ids));
    }

    debug!(
        "{} of {} {} ids not found",
        result.not_exists.len(),
        ids.len(),
        I::ENTITY
    );
    Ok(Either::fail(
        result
            .not_exists
            .iter()
            .map(|id| NotFoundError::new(id, I::ENTITY))
            .collect(),
    ))
}

/// Unwrap an existence check: the ids when all exist, otherwise an empty
/// list with every miss recorded under `field`
pub fn take_existing<I>(
    result: Either<Vec<I>, Vec<NotFoundError>>,
    notification: &mut Notification,
    field: &str,
) -> Vec<I> {
    match result {
        Either::Ok(ids) => ids,
        Either::Fail(errors) => {
            notification.set_errors(errors.iter().map(ToString::to_string), Some(field));
            Vec::new()
        }
    }
}

pub struct CategoriesIdExistsValidator {
    category_repo: Arc<dyn CategoryRepository>,
}

impl CategoriesIdExistsValidator {
    pub fn new(category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { category_repo }
    }

    pub fn validate(&self, raw_ids: &[String]) -> IdsExistResult<CategoryId> {
        validate_ids_exist(raw_ids, |ids| self.category_repo.exists_by_id(ids))
    }
}

pub struct GenresIdExistsValidator {
    genre_repo: Arc<dyn GenreRepository>,
}

impl GenresIdExistsValidator {
    pub fn new(genre_repo: Arc<dyn GenreRepository>) -> Self {
        Self { genre_repo }
    }

    pub fn validate(&self, raw_ids: &[String]) -> IdsExistResult<GenreId> {
        validate_ids_exist(raw_ids, |ids| self.genre_repo.exists_by_id(ids))
    }
}

pub struct CastMembersIdExistsValidator {
    cast_member_repo: Arc<dyn CastMemberRepository>,
}

impl CastMembersIdExistsValidator {
    pub fn new(cast_member_repo: Arc<dyn CastMemberRepository>) -> Self {
        Self { cast_member_repo }
    }

    pub fn validate(&self, raw_ids: &[String]) -> IdsExistResult<CastMemberId> {
        validate_ids_exist(raw_ids, |ids| self.cast_member_repo.exists_by_id(ids))
    }
}
