//! Receipt rendering and dispatch orchestration
//!
//! WHAT a receipt says lives here; HOW bytes reach a printer lives in
//! sari-printer.

pub mod renderer;
pub mod service;

pub use renderer::ReceiptRenderer;
pub use service::{PrintOutcome, PrintService};
