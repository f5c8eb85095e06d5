//! API error types with IntoResponse
//!
//! Errors become JSON string bodies with the matching status code, the same
//! shape the success messages use.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::db::StoreError;
use crate::models::ValidationError;

pub const NOT_FOUND_MESSAGE: &str = "No such deadline found";
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to the database";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request input failed validation (400)
    Validation(ValidationError),

    /// No row matched the id (404)
    NotFound,

    /// Request framing rejected before decoding, e.g. a missing JSON
    /// content type (415); keeps the extractor's status
    Rejected { status: StatusCode, message: String },

    /// Could not open a store connection (500, logged)
    Unavailable(StoreError),

    /// A statement failed (500, logged); `message` names the operation
    Store {
        message: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    /// Map a store error for an operation whose failure message is `message`.
    ///
    /// ```ignore
    /// store.add(&new).await.map_err(ApiError::store("Failed to add deadline"))?;
    /// ```
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| match source {
            StoreError::Connect(_) => ApiError::Unavailable(source),
            StoreError::Query(_) => ApiError::Store { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } => *status,
            Self::Unavailable(_) | Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => {
                tracing::debug!("Rejected request: {}", e);
                e.to_string()
            }
            Self::NotFound => NOT_FOUND_MESSAGE.to_string(),
            Self::Rejected { message, .. } => {
                tracing::debug!("Rejected request: {}", message);
                message
            }
            Self::Unavailable(e) => {
                tracing::error!("Database connection error: {}", e);
                CONNECT_FAILED_MESSAGE.to_string()
            }
            Self::Store { message, source } => {
                tracing::error!("{}: {}", message, source);
                message.to_string()
            }
        };

        (status, Json(message)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
