// src/application/error_handling.rs
//
// Error Responses for Callers
//
// ARCHITECTURE:
// - Maps internal errors → caller-facing responses
// - Validation failures carry every field message as details
// - Persistence internals are logged, never returned

use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Standard error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Invalid input or entity validation (422)
    Validation,

    /// Rejected state change (409)
    DomainError,

    /// Database/persistence error (500)
    Database,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound(not_found) => {
                Self::new(ErrorType::NotFound, not_found.to_string(), None)
            }

            AppError::EntityValidation(entries) => {
                let details = serde_json::to_value(&entries).ok();
                Self::new(ErrorType::Validation, "Entity Validation Error", details)
            }

            AppError::InvalidIdentifier(invalid) => {
                Self::new(ErrorType::Validation, invalid.to_string(), None)
            }

            AppError::Media(media) => Self::new(ErrorType::Validation, media.to_string(), None),

            AppError::Domain(domain_error) => {
                warn!("Domain rule rejected request: {}", domain_error);
                Self::new(
                    ErrorType::DomainError,
                    "Domain validation failed",
                    Some(Value::String(domain_error.to_string())),
                )
            }

            AppError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                Self::new(ErrorType::Database, "Database operation failed", None)
            }

            AppError::Pool(pool_error) => {
                error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Serialization(serde_error) => {
                error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                error!("IO error: {:?}", io_error);
                Self::new(ErrorType::Internal, "Storage operation failed", None)
            }

            AppError::Other(message) => {
                error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

/// Convert a use case result into its serialized error form
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryId, DomainError, Notification};

    #[test]
    fn test_not_found_error() {
        let id = CategoryId::new();
        let response = ErrorResponse::from_app_error(AppError::not_found(id, "Category"));

        assert!(!response.success);
        assert_eq!(response.error_type, ErrorType::NotFound);
        assert_eq!(response.message, format!("Category Not Found using ID {id}"));
    }

    #[test]
    fn test_validation_details_list_every_field() {
        let mut notification = Notification::new();
        notification.set_error("title is required", Some("title"));
        notification.set_error("Invalid rating: 99", Some("rating"));

        let response = ErrorResponse::from_app_error(AppError::EntityValidation(
            notification.entries().to_vec(),
        ));

        assert_eq!(response.error_type, ErrorType::Validation);
        assert_eq!(response.details, Some(notification.to_json()));
    }

    #[test]
    fn test_malformed_id_is_a_validation_error() {
        let err = CategoryId::parse("nope").unwrap_err();
        let response: ErrorResponse = AppError::from(err).into();
        assert_eq!(response.error_type, ErrorType::Validation);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = ErrorResponse::from_app_error(AppError::Pool("timed out".into()));
        assert_eq!(response.error_type, ErrorType::Database);
        assert_eq!(response.details, None);

        let response = ErrorResponse::from_app_error(AppError::Domain(
            DomainError::InvalidStateTransition("no trailer".into()),
        ));
        assert_eq!(response.error_type, ErrorType::DomainError);
    }

    #[test]
    fn test_to_error_response_keeps_ok_values() {
        let ok: Result<u8, AppError> = Ok(7);
        assert_eq!(ok.to_error_response().unwrap(), 7);

        let failed: Result<u8, AppError> = Err(AppError::Other("boom".into()));
        let response = failed.to_error_response().unwrap_err();
        assert_eq!(response.message, "boom");
        assert_eq!(
            serde_json::to_value(&response).unwrap()["error_type"],
            "internal"
        );
    }
}
