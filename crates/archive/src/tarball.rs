//! Single-member tarball extraction.

use crate::Compression;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::{Cursor, Write};
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::instrument;

/// Copy the contents of one member of an in-memory tarball into `output`.
///
/// The compression layer is detected from the archive's magic bytes, so plain,
/// gzip and bzip2 tarballs are all accepted. Member paths are compared
/// component-wise, ignoring `.` components (`./dir/tool` matches `dir/tool`).
/// Nothing is written to `output` unless the member is found, and it is the
/// only entry whose contents are read.
///
/// Returns the number of bytes copied.
///
/// # Examples
///
/// ```
/// use ciprep_archive::{Compression, extract_member};
///
/// let mut builder = tar::Builder::new(Vec::new());
/// let mut header = tar::Header::new_gnu();
/// header.set_size(5);
/// header.set_mode(0o644);
/// builder.append_data(&mut header, "dir/tool", &b"hello"[..]).unwrap();
/// let tarball = Compression::Gzip.compress(&builder.into_inner().unwrap()).unwrap();
///
/// let mut output = Vec::new();
/// assert_eq!(extract_member(&tarball, "dir/tool", &mut output).unwrap(), 5);
/// assert_eq!(output, b"hello");
/// ```
#[instrument(skip_all, fields(archive_size = archive.len(), member = %member.as_ref().display()))]
pub fn extract_member(archive: &[u8], member: impl AsRef<Path>, output: &mut impl Write) -> Result<u64> {
    let wanted = normalize(member.as_ref());
    let compression = Compression::sniff(archive);
    tracing::debug!(%compression, "Detected tarball compression");

    let mut tarball = Archive::new(compression.decoder(Cursor::new(archive)));
    for entry in tarball.entries().or_raise(|| ErrorKind::InvalidData)? {
        let mut entry = entry.or_raise(|| ErrorKind::InvalidData)?;
        let path = entry.path().or_raise(|| ErrorKind::InvalidData)?;
        if normalize(&path) != wanted {
            tracing::trace!(path = %path.display(), "Skipping tarball entry");
            continue;
        }
        if !entry.header().entry_type().is_file() {
            exn::bail!(ErrorKind::NotAFile(wanted.display().to_string()));
        }
        let size = std::io::copy(&mut entry, output).or_raise(|| ErrorKind::Io)?;
        tracing::debug!(size, "Extracted tarball member");
        return Ok(size);
    }
    exn::bail!(ErrorKind::MemberNotFound(wanted.display().to_string()))
}

fn normalize(path: &Path) -> PathBuf {
    path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}
