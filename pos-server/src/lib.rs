//! sari POS print server
//!
//! HTTP surface over the receipt output core. The interesting work
//! lives in the workspace libraries; this crate wires them to routes:
//!
//! - **Thermal path** (`printing`): canonical receipt → ESC/POS bytes →
//!   transport dispatch with network→local fallback (sari-printer)
//! - **Document path** (`api::receipt`): canonical receipt →
//!   content-sized PDF through the shared headless browser (sari-pdf)
//! - **Discovery** (`api::print`): printer enumeration for UI choices
//!
//! # Module structure
//!
//! ```text
//! pos-server/src/
//! ├── core/          # Config, shared state
//! ├── api/           # HTTP routes and handlers
//! ├── printing/      # Receipt rendering + dispatch orchestration
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod utils;

// Re-export common types
pub use crate::core::{AppState, Config};
pub use crate::printing::{PrintService, ReceiptRenderer};
pub use crate::utils::{init_logger, ApiError, ApiResult};
