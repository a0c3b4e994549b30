//! Release tarball handling.
//!
//! Tool releases ship as compressed tarballs. The provisioner only ever needs
//! one file out of them, so [`extract_member`] streams the archive from memory
//! and copies that single member out, leaving the rest untouched.

mod codec;
pub mod error;
mod tarball;

pub use crate::tarball::extract_member;

/// Compression layer wrapped around a tarball.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    #[default]
    None,
    Bzip2,
    Gzip,
}
