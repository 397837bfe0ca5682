//! Error types for the edge scanner core.
//!
//! Statistical inputs that would silently corrupt a score are rejected with
//! `InvalidArgument`; a configuration that cannot produce a valid score at
//! all is rejected with `InvalidConfiguration` before any wallet is
//! processed. Degenerate-but-valid data (empty history, zero stake, zero
//! variance) is not an error and maps to documented neutral values instead.

use thiserror::Error;

/// Errors produced by the scoring core.
#[derive(Debug, Error)]
pub enum EdgeScanError {
    /// Malformed statistical input (mismatched lengths, all-zero weights).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration that invalidates the entire run.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl EdgeScanError {
    /// Creates an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, EdgeScanError>;
