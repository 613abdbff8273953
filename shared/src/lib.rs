//! Shared types for the sari POS receipt pipeline
//!
//! Printer-agnostic domain types used across multiple crates:
//! the canonical receipt model, its builder, and validation errors.
//!
//! The canonical model is the single payload both output paths consume:
//! - ESC/POS encoding → sari-printer + pos-server
//! - PDF rendering → sari-pdf

pub mod error;
pub mod receipt;

// Re-exports
pub use error::ValidationError;
pub use receipt::{
    CanonicalReceipt, CustomerInfo, LineItem, ReceiptBuilder, StoreInfo, MAX_RECEIPT_ITEMS,
};
