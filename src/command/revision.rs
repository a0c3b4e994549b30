use crate::error::{ErrorKind, Result};
use ciprep_actions::Pipeline;
use ciprep_revision::{Git, RevisionResolver};
use exn::ResultExt;
use std::path::Path;

pub fn run(directory: &Path, submodule: &str, output: &str, pipeline: &dyn Pipeline) -> Result<()> {
    let git = Git::discover(directory).or_raise(|| ErrorKind::Revision)?;
    RevisionResolver::new(git, submodule).emit(pipeline, output).or_raise(|| ErrorKind::Revision)?;
    Ok(())
}
