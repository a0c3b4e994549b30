//! Parsing of `git submodule status` lines.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use regex::Regex;

/// Checkout state of a submodule, from the first character of its status
/// line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// ` `: checked out at the recorded commit.
    Current,
    /// `-`: not initialized.
    Uninitialized,
    /// `+`: checked out commit differs from the recorded one.
    Modified,
    /// `U`: merge conflicts.
    Conflict,
}
impl State {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            " " => Some(Self::Current),
            "-" => Some(Self::Uninitialized),
            "+" => Some(Self::Modified),
            "U" => Some(Self::Conflict),
            _ => None,
        }
    }
}

/// One parsed `git submodule status` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmoduleStatus {
    pub state: State,
    /// 40-character lowercase hex commit hash.
    pub revision: String,
    pub path: String,
    /// Trailing `git describe` output, e.g. `(heads/main)`.
    pub description: Option<String>,
}

impl SubmoduleStatus {
    /// Parse the status output for the submodule at `path`.
    ///
    /// The output must be exactly one line: a status flag, the 40-character
    /// commit hash, a space, `path`, then optionally whitespace and a
    /// description. Only trailing whitespace is ignored because the leading
    /// character is the flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use ciprep_revision::{State, SubmoduleStatus};
    ///
    /// let line = " 0123456789abcdef0123456789abcdef01234567 external/llvm-project (heads/main)\n";
    /// let status = SubmoduleStatus::parse(line, "external/llvm-project").unwrap();
    /// assert_eq!(status.state, State::Current);
    /// assert_eq!(status.revision, "0123456789abcdef0123456789abcdef01234567");
    /// ```
    pub fn parse(output: &str, path: &str) -> Result<Self> {
        let line = output.trim_end();
        let pattern = Regex::new(&format!(
            r"^(?P<flag>[ +\-U])(?P<revision>[0-9a-f]{{40}}) {}(?:[ \t]+(?P<description>.*))?$",
            regex::escape(path)
        ))
        .or_raise(|| ErrorKind::InvalidPath(path.to_string()))?;

        let Some(captures) = pattern.captures(line) else {
            exn::bail!(ErrorKind::MalformedOutput(line.to_string()));
        };
        let state = captures
            .name("flag")
            .and_then(|m| State::from_flag(m.as_str()))
            .ok_or_raise(|| ErrorKind::MalformedOutput(line.to_string()))?;
        let Some(revision) = captures.name("revision") else {
            exn::bail!(ErrorKind::MalformedOutput(line.to_string()));
        };
        Ok(Self {
            state,
            revision: revision.as_str().to_string(),
            path: path.to_string(),
            description: captures
                .name("description")
                .map(|m| m.as_str().trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }
}
