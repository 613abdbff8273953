//! Error types for the printer library

use thiserror::Error;

/// Transport error types
///
/// A single failed hop is not terminal; the dispatcher converts the last
/// hop's failure into [`TransportError::Exhausted`] once every configured
/// transport has been attempted.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Print spooler rejected the job (non-zero exit)
    #[error("Spooler error: {0}")]
    Spooler(String),

    /// Spooler command is not installed on this host
    #[error("Spooler unavailable: {0}")]
    Unavailable(String),

    /// Printer is offline or unreachable
    #[error("Printer offline: {0}")]
    Offline(String),

    /// Windows-specific raw printing error
    #[cfg(windows)]
    #[error("Windows printer error: {0}")]
    WindowsPrinter(String),

    /// Every configured transport failed; no further fallback exists
    #[error("All transports failed ({0})")]
    Exhausted(String),
}

impl TransportError {
    /// True when the transport's backing tool is missing entirely,
    /// as opposed to present-but-failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TransportError::Unavailable(_))
    }
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Printer enumeration errors
///
/// Never surfaced to callers; discovery degrades to a placeholder record.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Enumeration tool exited non-zero
    #[error("Enumeration command failed: {0}")]
    Command(String),

    /// Enumeration tool could not be spawned
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
