//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Names must be non-empty and contain neither `=` nor line breaks.
    #[display("invalid pipeline variable name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// The value cannot be represented in the runner's file format.
    #[display("invalid pipeline value for {_0}")]
    InvalidValue(#[error(not(source))] String),
    /// Appending to one of the runner's command files failed.
    #[display("failed to write runner file: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
