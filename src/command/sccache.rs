use crate::error::{ErrorKind, Result};
use ciprep_actions::Pipeline;
use ciprep_config::SccacheConfig;
use ciprep_provision::{Options, Platform, Provisioned, Provisioner};
use exn::ResultExt;
use std::path::Path;

pub fn run(directory: &Path, platform: Option<&str>, config: SccacheConfig, pipeline: &dyn Pipeline) -> Result<()> {
    let platform = match platform {
        Some(identifier) => identifier.parse::<Platform>(),
        None => Platform::detect(),
    }
    .or_raise(|| ErrorKind::Provision)?;
    tracing::debug!(%platform, "Resolved platform");

    let options = Options {
        url_base: config.url_base,
        root: config.root,
        log_level: config.log_level,
    };
    let provisioner = Provisioner::for_platform(platform, directory, options);
    match provisioner.run(pipeline).or_raise(|| ErrorKind::Provision)? {
        Provisioned::Cached(path) => tracing::info!(path = %path.display(), "Using cached sccache"),
        Provisioned::Downloaded(path) => tracing::info!(path = %path.display(), "Installed sccache"),
    }
    Ok(())
}
