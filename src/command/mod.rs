mod revision;
mod sccache;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use ciprep_config::Loader;
use exn::ResultExt;
use std::path::{Path, PathBuf};

pub fn run(cli: Cli) -> Result<()> {
    let directory = working_directory(cli.directory.as_deref())?;
    let mut loader = Loader::new(&directory);
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let config = loader.load().or_raise(|| ErrorKind::Config)?;
    let pipeline = ciprep_actions::detect();

    match cli.command {
        Command::Revision { submodule, output } => {
            let submodule = submodule.unwrap_or(config.revision.submodule);
            let output = output.unwrap_or(config.revision.output);
            revision::run(&directory, &submodule, &output, pipeline.as_ref())
        },
        Command::Sccache { platform } => sccache::run(&directory, platform.as_deref(), config.sccache, pipeline.as_ref()),
    }
}

fn working_directory(requested: Option<&Path>) -> Result<PathBuf> {
    match requested {
        Some(path) => std::path::absolute(path).or_raise(|| ErrorKind::WorkingDirectory),
        None => std::env::current_dir().or_raise(|| ErrorKind::WorkingDirectory),
    }
}
