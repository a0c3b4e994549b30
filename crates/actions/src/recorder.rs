//! In-memory pipeline for testing.

use crate::error::Result;
use crate::{Pipeline, validate_name};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A single call made against a [`Recorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Output { name: String, value: String },
    Environment { name: String, value: String },
    Path(PathBuf),
}

/// Pipeline that records every call, in order, so tests can assert on what a
/// step would have handed to the runner.
#[derive(Debug, Default)]
pub struct Recorder {
    commands: Mutex<Vec<Command>>,
}

impl Recorder {
    fn push(&self, command: Command) {
        // A poisoned lock means another test thread panicked already.
        self.commands.lock().unwrap_or_else(|e| e.into_inner()).push(command);
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Latest value set for the output `name`.
    pub fn output(&self, name: &str) -> Option<String> {
        self.commands().into_iter().rev().find_map(|c| match c {
            Command::Output { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    /// Latest value exported for the environment variable `name`.
    pub fn environment(&self, name: &str) -> Option<String> {
        self.commands().into_iter().rev().find_map(|c| match c {
            Command::Environment { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::Path(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl Pipeline for Recorder {
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        self.push(Command::Output { name: name.to_string(), value: value.to_string() });
        Ok(())
    }

    fn set_environment_variable(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        self.push(Command::Environment { name: name.to_string(), value: value.to_string() });
        Ok(())
    }

    fn add_path(&self, directory: &Path) -> Result<()> {
        self.push(Command::Path(directory.to_path_buf()));
        Ok(())
    }
}
