//! GitHub Actions workflow commands.
//!
//! The runner exposes one file per command (`GITHUB_OUTPUT`, `GITHUB_ENV`,
//! `GITHUB_PATH`); each step appends to them and the runner reads them back
//! once the step exits.

use crate::error::{ErrorKind, Result};
use crate::{Pipeline, validate_name};
use exn::{OptionExt, ResultExt};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";
const ENV_FILE_VAR: &str = "GITHUB_ENV";
const PATH_FILE_VAR: &str = "GITHUB_PATH";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitHubActions {
    output_file: PathBuf,
    env_file: PathBuf,
    path_file: PathBuf,
}

impl GitHubActions {
    pub fn new(output_file: impl Into<PathBuf>, env_file: impl Into<PathBuf>, path_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            env_file: env_file.into(),
            path_file: path_file.into(),
        }
    }

    /// Read the command file locations from the runner's environment.
    ///
    /// Returns `None` unless `GITHUB_ACTIONS=true` and all three command files
    /// are advertised.
    pub fn from_env() -> Option<Self> {
        if std::env::var("GITHUB_ACTIONS").ok()? != "true" {
            return None;
        }
        let file = |var: &str| std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from);
        Some(Self::new(file(OUTPUT_FILE_VAR)?, file(ENV_FILE_VAR)?, file(PATH_FILE_VAR)?))
    }

    fn append(file: &Path, contents: &str) -> Result<()> {
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .or_raise(|| ErrorKind::Io(file.to_path_buf()))?;
        handle.write_all(contents.as_bytes()).or_raise(|| ErrorKind::Io(file.to_path_buf()))
    }
}

/// Render a `name=value` entry, switching to the heredoc form when the value
/// spans multiple lines.
pub(crate) fn key_value(name: &str, value: &str) -> Result<String> {
    validate_name(name)?;
    if !value.contains(['\n', '\r']) {
        return Ok(format!("{name}={value}\n"));
    }
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    if value.contains(&delimiter) {
        exn::bail!(ErrorKind::InvalidValue(name.to_string()));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

impl Pipeline for GitHubActions {
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        tracing::debug!(name, value, "Setting step output");
        Self::append(&self.output_file, &key_value(name, value)?)
    }

    fn set_environment_variable(&self, name: &str, value: &str) -> Result<()> {
        tracing::debug!(name, value, "Exporting environment variable");
        Self::append(&self.env_file, &key_value(name, value)?)
    }

    fn add_path(&self, directory: &Path) -> Result<()> {
        tracing::debug!(directory = %directory.display(), "Adding directory to PATH");
        let line = directory
            .to_str()
            .filter(|s| !s.contains(['\n', '\r']))
            .ok_or_raise(|| ErrorKind::InvalidValue(directory.display().to_string()))?;
        Self::append(&self.path_file, &format!("{line}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> (tempfile::TempDir, GitHubActions) {
        let dir = tempfile::tempdir().unwrap();
        let github = GitHubActions::new(dir.path().join("output"), dir.path().join("env"), dir.path().join("path"));
        (dir, github)
    }

    #[test]
    fn test_single_line_values() {
        let (dir, github) = runner();
        github.set_output("revision", "0123abcd").unwrap();
        github.set_output("root-directory", "/work/bin/tools/sccache").unwrap();
        github.set_environment_variable("SCCACHE_LOG", "info").unwrap();
        let output = std::fs::read_to_string(dir.path().join("output")).unwrap();
        assert_eq!(output, "revision=0123abcd\nroot-directory=/work/bin/tools/sccache\n");
        let env = std::fs::read_to_string(dir.path().join("env")).unwrap();
        assert_eq!(env, "SCCACHE_LOG=info\n");
    }

    #[test]
    fn test_multi_line_value_uses_heredoc() {
        let rendered = key_value("notes", "first\nsecond").unwrap();
        let mut lines = rendered.lines();
        let header = lines.next().unwrap();
        let delimiter = header.strip_prefix("notes<<").unwrap();
        assert!(delimiter.starts_with("ghadelimiter_"));
        assert_eq!(lines.next(), Some("first"));
        assert_eq!(lines.next(), Some("second"));
        assert_eq!(lines.next(), Some(delimiter));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_add_path() {
        let (dir, github) = runner();
        github.add_path(Path::new("/work/bin/tools/sccache/abc")).unwrap();
        github.add_path(Path::new("/opt/other")).unwrap();
        let path = std::fs::read_to_string(dir.path().join("path")).unwrap();
        assert_eq!(path, "/work/bin/tools/sccache/abc\n/opt/other\n");
    }

    #[test]
    fn test_invalid_name_writes_nothing() {
        let (dir, github) = runner();
        assert!(github.set_output("bad=name", "value").is_err());
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_unwritable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing/output");
        let github = GitHubActions::new(&missing, dir.path().join("env"), dir.path().join("path"));
        let err = github.set_output("revision", "abc").unwrap_err();
        assert_eq!(*err, ErrorKind::Io(missing));
    }
}
