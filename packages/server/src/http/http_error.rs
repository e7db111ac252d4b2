//! HTTP error handling
//!
//! Maps service-layer errors onto the wire convention: every error response
//! carries a `detail` string and a status code describing the failure class.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use taxonomy_core::services::CategoryServiceError;

/// HTTP error response body.
///
/// `detail` is the user-facing description of what went wrong.
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpError {
    pub detail: String,

    #[serde(skip)]
    status: StatusCode,
}

impl HttpError {
    /// Create a new HTTP error with an explicit status
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            status,
        }
    }

    /// Internal server error with the given detail
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<CategoryServiceError> for HttpError {
    fn from(err: CategoryServiceError) -> Self {
        let status = match &err {
            CategoryServiceError::MissingField { .. }
            | CategoryServiceError::UnknownFields { .. }
            | CategoryServiceError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CategoryServiceError::DuplicateNameInRequest { .. }
            | CategoryServiceError::DuplicateNameInStore { .. } => StatusCode::CONFLICT,
            CategoryServiceError::CategoryNotFound { .. } => StatusCode::NOT_FOUND,
            CategoryServiceError::Database(_) => {
                tracing::error!("Database failure: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self::new(status, err.to_string())
    }
}
