use crate::error::{ErrorKind, Result};
use crate::platform::Profile;
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// On-disk locations for one pinned release.
///
/// The binary lives in a directory named after the archive digest, so bumping
/// the version or digest never reuses a binary left behind by an older run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    /// `SCCACHE_DIR`: shared by every release.
    pub cache_dir: PathBuf,
    pub log_file: PathBuf,
    pub binary_dir: PathBuf,
    pub binary: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, profile: &Profile) -> Self {
        let root = root.into();
        let binary_dir = root.join(&profile.digest);
        Self {
            cache_dir: root.join("cache"),
            log_file: root.join("sccache.log"),
            binary: binary_dir.join(&profile.binary),
            binary_dir,
            root,
        }
    }

    /// Create the binary and cache directories.
    pub fn create(&self) -> Result<()> {
        for dir in [&self.binary_dir, &self.cache_dir] {
            std::fs::create_dir_all(dir).or_raise(|| ErrorKind::Io(dir.to_path_buf()))?;
        }
        Ok(())
    }

    pub fn is_installed(&self) -> Result<bool> {
        self.binary.try_exists().or_raise(|| ErrorKind::Io(self.binary.clone()))
    }
}

/// Pipeline values are strings; refuse paths that aren't valid UTF-8 rather
/// than emitting a lossy approximation.
pub(crate) fn as_str(path: &Path) -> Result<&str> {
    match path.to_str() {
        Some(s) => Ok(s),
        None => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
    }
}
