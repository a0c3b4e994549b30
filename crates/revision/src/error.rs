//! Revision Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A revision lookup error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for revision lookups.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// None of these are retryable: a broken checkout or a missing git binary
/// won't fix itself between attempts.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("git executable not found in PATH")]
    GitNotFound,
    /// Git ran but exited unsuccessfully.
    #[display("git exited with code {code:?}: {stderr}")]
    GitFailed { code: Option<i32>, stderr: String },
    /// Git's output did not look like a submodule status line.
    #[display("malformed git output: '{_0}'")]
    MalformedOutput(#[error(not(source))] String),
    /// Building the status pattern for the submodule path failed.
    #[display("invalid submodule path: {_0}")]
    InvalidPath(#[error(not(source))] String),
    /// Handing the revision to the pipeline failed.
    Pipeline,
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
