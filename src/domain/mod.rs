// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// Declares every aggregate module and re-exports its public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod cast_member;
pub mod category;
pub mod genre;
pub mod shared;
pub mod video;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Shared building blocks
pub use shared::{
    contains_ignore_case, fold_case, parse_ids, AggregateEvents, AggregateRoot, Either, Entity,
    EntityId, Notification, NotificationEntry, RelatedIds, SearchParams, SearchResult, Searchable, Slot,
    SortDirection, SortValue, ValidatorFields, DEFAULT_PER_PAGE,
};

// Category Domain
pub use category::{Category, CategoryCreateCommand, CategoryFilter, CategoryId};

// Genre Domain
pub use genre::{Genre, GenreCreateCommand, GenreFilter, GenreId};

// CastMember Domain
pub use cast_member::{
    CastMember, CastMemberCreateCommand, CastMemberFilter, CastMemberId, CastMemberType,
    InvalidCastMemberType,
};

// Video Domain
pub use video::{
    AudioVideoField, AudioVideoMedia, AudioVideoMediaStatus, ImageField, ImageMedia,
    InvalidRating, MediaFileError, Rating, Video, VideoCreateCommand, VideoFilter, VideoId,
    VideoSnapshot,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

/// A lookup by id found nothing. `id` may list several ids joined by `, `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} Not Found using ID {id}")]
pub struct NotFoundError {
    pub id: String,
    pub entity: &'static str,
}

impl NotFoundError {
    pub fn new(id: impl ToString, entity: &'static str) -> Self {
        Self {
            id: id.to_string(),
            entity,
        }
    }

    /// One error covering every missing id of a batch
    pub fn many<I: ToString>(ids: &[I], entity: &'static str) -> Self {
        let joined = ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        Self::new(joined, entity)
    }
}

/// A raw string that is not a valid identifier for `entity`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ID must be a valid {entity} id: {value}")]
pub struct InvalidIdentifier {
    pub value: String,
    pub entity: &'static str,
}

impl InvalidIdentifier {
    pub fn new(value: impl Into<String>, entity: &'static str) -> Self {
        Self {
            value: value.into(),
            entity,
        }
    }
}
