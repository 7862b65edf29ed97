mod analyze;
mod documents;
mod health;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use doctriage_core::{OcrError, RecoveryError};
use serde::Serialize;
use thiserror::Error;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/analyze", analyze::router())
        .nest("/documents", documents::router())
        .nest("/health", health::router())
}

/// Request-level failures, rendered as `{"error": "..."}` payloads.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("multipart upload is missing a 'file' field")]
    MissingFile,

    #[error("document not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("could not determine document format for {0}")]
    UnknownFormat(String),

    #[error("invalid multipart request: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnknownFormat(_) | Self::Recovery(RecoveryError::UnsupportedFormat(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Recovery(RecoveryError::Ocr(OcrError::EngineMissing(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Recovery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(%status, error = %self, "request failed");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
