//! # sari-pdf
//!
//! Receipt-to-PDF rendering through a shared headless Chromium.
//!
//! ## Scope
//!
//! - One browser process per host process, lazily launched on first use
//!   and reused until shutdown; pages/tabs are per-request
//! - 80mm receipt layout as styled markup
//! - Content-driven page sizing: the rendered height is measured in the
//!   DOM and the PDF page is emitted at exactly that height
//!
//! ## Example
//!
//! ```ignore
//! use sari_pdf::BrowserManager;
//!
//! let manager = BrowserManager::new(None);
//! let pdf = manager.render_receipt(&receipt, "P").await?;
//! // ... serve pdf bytes ...
//! manager.shutdown().await; // on process exit
//! ```

mod browser;
mod error;
pub mod layout;

pub use browser::BrowserManager;
pub use error::{RenderError, RenderResult};
