use crate::Pipeline;
use crate::error::Result;
use crate::validate_name;
use std::path::Path;

/// Pipeline for running outside a CI runner: values are logged, nothing else
/// changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Local;

impl Pipeline for Local {
    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        tracing::info!(name, value, "Step output");
        Ok(())
    }

    fn set_environment_variable(&self, name: &str, value: &str) -> Result<()> {
        validate_name(name)?;
        tracing::info!(name, value, "Environment variable");
        Ok(())
    }

    fn add_path(&self, directory: &Path) -> Result<()> {
        tracing::info!(directory = %directory.display(), "PATH entry");
        Ok(())
    }
}
