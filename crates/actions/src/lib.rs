//! Pipeline wiring for CI runners.
//!
//! A [`Pipeline`] is how one CI step hands values to the steps after it:
//! named outputs, exported environment variables and additions to the
//! executable search path. [`detect`] picks the implementation for the runner
//! the process is executing under.

pub mod error;
mod github;
mod local;
#[cfg(any(test, feature = "mock"))]
mod recorder;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::github::GitHubActions;
pub use crate::local::Local;
#[cfg(any(test, feature = "mock"))]
pub use crate::recorder::{Command, Recorder};
use std::path::Path;

/// Side-channel into the CI runner for subsequent steps of the same job.
pub trait Pipeline {
    /// Record a named string result visible to subsequent steps.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Export an environment variable into subsequent steps.
    fn set_environment_variable(&self, name: &str, value: &str) -> Result<()>;

    /// Prepend a directory to the executable search path of subsequent steps.
    fn add_path(&self, directory: &Path) -> Result<()>;
}

/// Select the pipeline for the current runner.
///
/// Falls back to [`Local`], which only logs, when not running inside GitHub
/// Actions.
pub fn detect() -> Box<dyn Pipeline + Send + Sync> {
    match GitHubActions::from_env() {
        Some(github) => {
            tracing::debug!("Detected GitHub Actions runner");
            Box::new(github)
        },
        None => {
            tracing::warn!("Not running under GitHub Actions; pipeline values will only be logged");
            Box::new(Local)
        },
    }
}

/// Names are shared by every runner format: `name=value` lines can't carry an
/// `=` or a line break in the name.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['=', '\n', '\r']) {
        exn::bail!(ErrorKind::InvalidName(name.to_string()));
    }
    Ok(())
}
