//! Archive Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not a readable tarball, or corrupt after decompression.
    #[display("invalid or corrupted archive")]
    InvalidData,
    #[display("member not found in archive: {_0}")]
    MemberNotFound(#[error(not(source))] String),
    /// The member exists but is a directory, link or other special entry.
    #[display("archive member is not a regular file: {_0}")]
    NotAFile(#[error(not(source))] String),
    /// Writing the extracted or compressed bytes failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}
