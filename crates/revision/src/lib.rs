//! Resolve the commit a git submodule is pinned to, and hand it to the CI
//! pipeline as a step output.

pub mod error;
mod git;
mod status;

use crate::error::{ErrorKind, Result};
pub use crate::git::Git;
pub use crate::status::{State, SubmoduleStatus};
use ciprep_actions::Pipeline;
use exn::ResultExt;
use tracing::instrument;

pub struct RevisionResolver {
    git: Git,
    submodule: String,
}
impl RevisionResolver {
    /// `submodule` may be spelled with a leading `./` or a trailing `/`; git
    /// reports the path without either.
    pub fn new(git: Git, submodule: impl AsRef<str>) -> Self {
        Self { git, submodule: canonical_path(submodule.as_ref()) }
    }

    pub fn submodule(&self) -> &str {
        &self.submodule
    }

    /// Query git for the submodule's status line and parse it.
    #[instrument(skip(self), fields(submodule = %self.submodule, directory = %self.git.directory().display()))]
    pub fn resolve(&self) -> Result<SubmoduleStatus> {
        let output = self.git.submodule_status(&self.submodule)?;
        let status = SubmoduleStatus::parse(&output, &self.submodule)?;
        if status.state != State::Current {
            tracing::warn!(state = ?status.state, "Submodule is not checked out at its recorded commit");
        }
        tracing::info!(revision = %status.revision, "Resolved submodule revision");
        Ok(status)
    }

    /// Resolve the revision and emit it as the step output `output`.
    ///
    /// Nothing is emitted unless the status line parsed cleanly.
    pub fn emit(&self, pipeline: &dyn Pipeline, output: &str) -> Result<String> {
        let status = self.resolve()?;
        pipeline.set_output(output, &status.revision).or_raise(|| ErrorKind::Pipeline)?;
        Ok(status.revision)
    }
}

fn canonical_path(path: &str) -> String {
    let mut path = path.trim_end_matches('/');
    while let Some(rest) = path.strip_prefix("./") {
        path = rest.trim_start_matches('/');
    }
    path.to_string()
}
