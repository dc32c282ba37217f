// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between callers and the use case services
// - Translates aggregates into DTOs and errors into responses
// - Wires the concrete adapters behind the service ports

pub mod dto;
pub mod error_handling;
pub mod state;

pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::CatalogState;
