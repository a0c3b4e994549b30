//! Provisioning Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A provisioning error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No release is pinned for this OS/architecture pair.
    #[display("unknown platform '{_0}'")]
    UnsupportedPlatform(#[error(not(source))] String),
    /// The HTTP request could not be sent or its body could not be read.
    #[display("failed to download '{_0}'")]
    Network(#[error(not(source))] String),
    /// The server answered with a non-success status.
    #[display("failed to download '{url}' (HTTP {status})")]
    HttpStatus { url: String, status: u16 },
    /// The downloaded bytes are not the pinned release. Never retry blindly:
    /// this is either corruption in transit or a tampered artifact.
    #[display("failed to validate '{url}', expected SHA256 hash {expected} (got {actual})")]
    DigestMismatch { url: String, expected: String, actual: String },
    /// The archive was verified but the binary could not be extracted.
    #[display("failed to extract '{_0}' from the release archive")]
    Extract(#[error(not(source))] String),
    /// A path can't be represented as a pipeline value.
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// Handing values to the pipeline failed.
    Pipeline,
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. } | Self::Io(_))
    }
}
