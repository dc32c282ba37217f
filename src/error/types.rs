// src/error/types.rs
use crate::domain::video::MediaFileError;
use crate::domain::{
    DomainError, InvalidIdentifier, NotFoundError, Notification, NotificationEntry,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Every field error accumulated by the aggregate, never only the first
    #[error("Entity Validation Error")]
    EntityValidation(Vec<NotificationEntry>),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    #[error(transparent)]
    Media(#[from] MediaFileError),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    pub fn not_found(id: impl ToString, entity: &'static str) -> Self {
        AppError::NotFound(NotFoundError::new(id, entity))
    }

    /// Validation failure carrying a single field message
    pub fn field_validation(field: &str, message: impl Into<String>) -> Self {
        let mut notification = Notification::new();
        notification.set_error(message, Some(field));
        AppError::EntityValidation(notification.into_entries())
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
