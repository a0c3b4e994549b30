//! `ciprep`: CI job setup helpers.
//!
//! ```text
//! ciprep revision            # emit the pinned LLVM submodule revision
//! ciprep sccache             # provision the pinned sccache release
//! ```

mod cli;
mod command;
mod error;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli::init_tracing(cli.verbose);
    match command::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}
