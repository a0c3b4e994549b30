//! Command-line interface.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ciprep", version, about = "CI setup helpers")]
pub struct Cli {
    /// Increase log verbosity (`-v` debug, `-vv` trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML or YAML) used instead of ./ciprep.toml
    #[arg(long, global = true, env = "CIPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Emit the commit a submodule is pinned to as a step output
    Revision {
        /// Submodule path relative to the repository root
        #[arg(long)]
        submodule: Option<String>,

        /// Name of the step output
        #[arg(long)]
        output: Option<String>,
    },
    /// Download, verify and install the pinned sccache release
    Sccache {
        /// Platform identifier, e.g. `Linux-x86_64` (detected when omitted)
        #[arg(long)]
        platform: Option<String>,
    },
}

/// Log to stderr; stdout is left alone for tools that parse it.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
