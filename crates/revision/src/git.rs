use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A git executable bound to a working copy.
#[derive(Clone, Debug)]
pub struct Git {
    executable: PathBuf,
    directory: PathBuf,
}
impl Git {
    /// Find `git` on `PATH` and bind it to `directory`.
    pub fn discover(directory: impl Into<PathBuf>) -> Result<Self> {
        let executable = which::which("git").or_raise(|| ErrorKind::GitNotFound)?;
        tracing::trace!(git = %executable.display(), "Discovered git executable");
        Ok(Self::new(executable, directory))
    }

    pub fn new(executable: impl Into<PathBuf>, directory: impl Into<PathBuf>) -> Self {
        Self { executable: executable.into(), directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Run `git submodule status -- <path>` and return its standard output.
    pub fn submodule_status(&self, path: &str) -> Result<String> {
        let output = Command::new(&self.executable)
            .args(["submodule", "status", "--", path])
            .current_dir(&self.directory)
            .output()
            .or_raise(|| ErrorKind::Io)?;
        if !output.status.success() {
            exn::bail!(ErrorKind::GitFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        match String::from_utf8(output.stdout) {
            Ok(stdout) => Ok(stdout),
            Err(e) => exn::bail!(ErrorKind::MalformedOutput(String::from_utf8_lossy(e.as_bytes()).into_owned())),
        }
    }
}
