//! Unified error handling
//!
//! Every failure leaving the HTTP surface becomes
//! `{"success": false, "error": "..."}` with the matching status code.
//! Discovery errors never reach this type; that path degrades to a
//! placeholder record instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use sari_pdf::RenderError;
use sari_printer::TransportError;
use shared::ValidationError;

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Payload rejected before any print work (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Every transport in the fallback chain failed (500)
    #[error("Print failed: {0}")]
    Transport(#[from] TransportError),

    /// Headless engine launch or page failure (500)
    #[error("Receipt rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Failure body shared by all endpoints
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Transport(_) | ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(ErrorBody {
            success: false,
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
