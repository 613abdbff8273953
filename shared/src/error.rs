//! Validation errors for inbound print payloads

use thiserror::Error;

/// Rejection reasons for a raw transaction payload
///
/// Raised before any encoding or dispatch work happens. Amount/total
/// consistency is enforced upstream and deliberately not re-checked here.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Payload has no `items` field
    #[error("Receipt has no items")]
    MissingItems,

    /// `items` is present but not an array
    #[error("Receipt items must be a list")]
    InvalidItems,

    /// `items` is an empty array
    #[error("Receipt must contain at least one item")]
    EmptyItems,
}
