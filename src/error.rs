//! Top-level Error Types
//!
//! Each variant wraps the error tree of the crate that failed.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not determine working directory")]
    WorkingDirectory,
    #[display("could not load configuration")]
    Config,
    #[display("could not resolve submodule revision")]
    Revision,
    #[display("could not provision sccache")]
    Provision,
}
