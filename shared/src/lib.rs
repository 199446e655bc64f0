//! Shared types for the temple hall booking system
//!
//! Common types used by the server and by API clients: error codes,
//! response envelopes, domain models and request payloads.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use response::{PaginatedResponse, Pagination};
pub use serde::{Deserialize, Serialize};
