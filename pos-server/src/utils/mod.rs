//! Utility functions

pub mod error;
pub mod logger;

pub use error::{ApiError, ApiResult};
pub use logger::init_logger;
