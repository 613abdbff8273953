//! Error types for headless rendering

use thiserror::Error;

/// Rendering error types
#[derive(Debug, Error)]
pub enum RenderError {
    /// The browser binary could not be found or failed to start
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// A page-level failure (navigation, measurement, PDF emission).
    /// The shared browser instance survives these.
    #[error("Page render failed: {0}")]
    Page(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
