use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use facdoc_core::ListingId;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;

/// Errors returned by HTTP handlers, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Listing not found")]
    NotFound(ListingId),

    #[error("Internal server error")]
    Internal(String),
}

impl From<facdoc_core::Error> for ApiError {
    fn from(err: facdoc_core::Error) -> Self {
        match err {
            facdoc_core::Error::ListingNotFound(id) => ApiError::NotFound(id),
            facdoc_core::Error::InvalidListing(msg) => ApiError::BadRequest(msg),
            other => {
                error!(error = %other, "listing store failure");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(err) => err.status_code(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
