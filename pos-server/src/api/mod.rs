//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`print`] - thermal printing and printer discovery
//! - [`receipt`] - PDF receipt rendering
//!
//! The PDF endpoint's `Content-Disposition`/`Content-Length` headers
//! are CORS-exposed so cross-origin frontends can read the filename.

pub mod health;
pub mod print;
pub mod receipt;

use axum::http::header;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::AppState;

/// Assemble the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION, header::CONTENT_LENGTH]);

    Router::new()
        .route("/health", get(health::check))
        .route("/print/receipt", post(print::print_receipt))
        .route("/print/printers", get(print::list_printers))
        .route("/receipt", post(receipt::receipt_pdf))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
