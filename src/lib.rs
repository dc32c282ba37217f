// src/lib.rs
// catalog_admin - administration core of a video catalog
//
// Architecture:
// - Domain-centric: aggregates own their validation and events
// - Ports and adapters: repositories, unit of work, storage and broker are traits
// - Explicit: every write runs inside ApplicationService::run
// - Application layer: DTOs, error responses and wiring

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    AggregateRoot, AudioVideoField, AudioVideoMedia, CastMember, CastMemberId, CastMemberType,
    Category, CategoryId, DomainError, Either, Genre, GenreId, ImageField, ImageMedia,
    NotFoundError, Notification, Rating, SearchParams, SearchResult, SortDirection, Video,
    VideoId,
};

// ============================================================================
// PUBLIC API - Errors and configuration
// ============================================================================

pub use config::CatalogConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    CatalogEvent, DomainEvent, EventBus, EventLogEntry, InMemoryMessageBroker, IntegrationEvent,
    MessageBroker,
};

// ============================================================================
// PUBLIC API - Database and repositories
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{
    CastMemberRepository, CategoryRepository, GenreRepository, InMemoryUnitOfWork,
    SqliteUnitOfWork, UnitOfWork, VideoRepository,
};

// ============================================================================
// PUBLIC API - Infrastructure
// ============================================================================

pub use infrastructure::{InMemoryStorage, LocalStorage, Storage};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    ApplicationService, CastMemberService, CategoryService, GenreService, VideoService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{CatalogState, ErrorResponse};
pub use application::dto;
