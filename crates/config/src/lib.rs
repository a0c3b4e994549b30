//! Layered configuration.
//!
//! Sources, each overriding the ones before it:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `config.toml` in the user's configuration directory
//! 3. `ciprep.toml` / `ciprep.yaml` in the working directory, or a file passed
//!    explicitly
//! 4. `CIPREP_`-prefixed environment variables, nested with `__`
//!    (`CIPREP_SCCACHE__LOG_LEVEL=debug`)

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CIPREP_";
const PROJECT_FILES: [&str; 3] = ["ciprep.toml", "ciprep.yaml", "ciprep.yml"];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub revision: RevisionConfig,
    pub sccache: SccacheConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionConfig {
    /// Submodule path, relative to the repository root.
    pub submodule: String,
    /// Name of the step output receiving the revision.
    pub output: String,
}
impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            submodule: "external/llvm-project".to_string(),
            output: "revision".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SccacheConfig {
    /// Release download prefix; point at a mirror to avoid GitHub.
    pub url_base: String,
    /// Tools root, relative to the working directory unless absolute.
    pub root: PathBuf,
    /// Exported as `SCCACHE_LOG`.
    pub log_level: String,
}
impl Default for SccacheConfig {
    fn default() -> Self {
        Self {
            url_base: "https://github.com/mozilla/sccache/releases/download".to_string(),
            root: PathBuf::from("bin/tools/sccache"),
            log_level: "info".to_string(),
        }
    }
}

/// Where to look for configuration.
#[derive(Clone, Debug)]
pub struct Loader {
    user_file: Option<PathBuf>,
    directory: PathBuf,
    explicit: Option<PathBuf>,
}

impl Loader {
    /// Look in the user's config directory and in `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let user_file = ProjectDirs::from("", "", "ciprep").map(|dirs| dirs.config_dir().join("config.toml"));
        Self { user_file, directory: directory.into(), explicit: None }
    }

    /// Use `path` instead of the project files in the working directory.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    pub fn without_user_config(mut self) -> Self {
        self.user_file = None;
        self
    }

    pub fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user_file) = &self.user_file {
            tracing::trace!(path = %user_file.display(), "Checking user config file");
            figment = figment.merge(Toml::file(user_file));
        }
        match &self.explicit {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.clone()));
                }
                figment = merge_file(figment, path);
            },
            None => {
                for name in PROJECT_FILES {
                    let path = self.directory.join(name);
                    if path.is_file() {
                        tracing::debug!(path = %path.display(), "Using project config file");
                        figment = merge_file(figment, &path);
                    }
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn load(&self) -> Result<Config> {
        let config: Config = self.figment()?.extract().map_err(|e| ErrorKind::Invalid(e.to_string()))?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn load(jail: &Jail) -> Result<Config> {
        Loader::new(jail.directory()).without_user_config().load()
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            let config = load(jail).unwrap();
            assert_eq!(config, Config::default());
            assert_eq!(config.revision.submodule, "external/llvm-project");
            assert_eq!(config.sccache.root, Path::new("bin/tools/sccache"));
            Ok(())
        });
    }

    #[test]
    fn test_project_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ciprep.toml",
                r#"
                    [revision]
                    submodule = "third_party/llvm"

                    [sccache]
                    log_level = "debug"
                "#,
            )?;
            let config = load(jail).unwrap();
            assert_eq!(config.revision.submodule, "third_party/llvm");
            assert_eq!(config.revision.output, "revision");
            assert_eq!(config.sccache.log_level, "debug");
            assert_eq!(config.sccache.url_base, SccacheConfig::default().url_base);
            Ok(())
        });
    }

    #[rstest]
    #[case("ciprep.yaml")]
    #[case("ciprep.yml")]
    fn test_project_yaml(#[case] name: &str) {
        Jail::expect_with(|jail| {
            jail.create_file(name, "sccache:\n  root: /cache/sccache\n")?;
            let config = load(jail).unwrap();
            assert_eq!(config.sccache.root, Path::new("/cache/sccache"));
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("ciprep.toml", "[sccache]\nlog_level = \"debug\"\n")?;
            jail.set_env("CIPREP_SCCACHE__LOG_LEVEL", "trace");
            jail.set_env("CIPREP_REVISION__OUTPUT", "llvm-revision");
            let config = load(jail).unwrap();
            assert_eq!(config.sccache.log_level, "trace");
            assert_eq!(config.revision.output, "llvm-revision");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("ciprep.toml", "[revision]\nsubmodule = \"ignored\"\n")?;
            jail.create_file("ci.yaml", "revision:\n  submodule: deps/llvm\n")?;
            let config = Loader::new(jail.directory())
                .without_user_config()
                .with_file(jail.directory().join("ci.yaml"))
                .load()
                .unwrap();
            assert_eq!(config.revision.submodule, "deps/llvm");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_missing() {
        Jail::expect_with(|jail| {
            let missing = jail.directory().join("missing.toml");
            let err = Loader::new(jail.directory()).with_file(&missing).load().unwrap_err();
            assert_eq!(*err, ErrorKind::NotFound(missing));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value() {
        Jail::expect_with(|jail| {
            jail.create_file("ciprep.toml", "[sccache]\nlog_level = [1, 2]\n")?;
            let err = load(jail).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
            Ok(())
        });
    }
}
