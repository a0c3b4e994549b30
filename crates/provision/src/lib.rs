//! Provision a pinned sccache release for a CI job.
//!
//! [`Provisioner::run`] resolves the on-disk layout for the selected
//! [`Platform`], wires the pipeline (outputs, `SCCACHE_*` variables, `PATH`),
//! and then either reuses a binary already present in the digest-qualified
//! directory or downloads the release archive, verifies its SHA-256 against
//! the pinned digest, and installs the single executable it contains.
//!
//! Every failure is fatal. The archive digest is the only trust boundary: no
//! byte of a download is written to disk before it has been verified.

pub mod error;
mod fetch;
mod install;
mod layout;
mod platform;
mod verify;

use crate::error::{ErrorKind, Result};
pub use crate::fetch::{Fetch, HttpFetcher};
pub use crate::layout::Layout;
pub use crate::platform::{Platform, Profile, VERSION};
pub use crate::verify::sha256_hex;
use ciprep_actions::Pipeline;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provisioned {
    /// The binary was already present; nothing was downloaded.
    Cached(PathBuf),
    /// The release was downloaded, verified and installed.
    Downloaded(PathBuf),
}
impl Provisioned {
    pub fn path(&self) -> &Path {
        match self {
            Self::Cached(path) | Self::Downloaded(path) => path,
        }
    }
}

/// Tunables that don't affect which release is installed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Prefix of the release asset URLs, up to and excluding the version.
    pub url_base: String,
    /// Tools root, resolved against the working directory when relative.
    pub root: PathBuf,
    /// Value of `SCCACHE_LOG`.
    pub log_level: String,
}

pub struct Provisioner<F: Fetch = HttpFetcher> {
    profile: Profile,
    layout: Layout,
    url: String,
    log_level: String,
    fetcher: F,
}

impl<F: Fetch> Provisioner<F> {
    pub fn new(profile: Profile, working_dir: &Path, options: Options, fetcher: F) -> Self {
        let layout = Layout::new(working_dir.join(&options.root), &profile);
        let url = profile.url(&options.url_base);
        Self { profile, layout, url, log_level: options.log_level, fetcher }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[instrument(skip_all, fields(version = %self.profile.version, target = %self.profile.target))]
    pub fn run(&self, pipeline: &dyn Pipeline) -> Result<Provisioned> {
        self.layout.create()?;
        self.wire(pipeline)?;

        // Presence alone is trusted: the directory is named after the digest
        // and only ever receives a verified binary.
        if self.layout.is_installed()? {
            tracing::info!(path = %self.layout.binary.display(), "sccache already downloaded, won't download again");
            return Ok(Provisioned::Cached(self.layout.binary.clone()));
        }

        tracing::info!(url = %self.url, "Downloading sccache");
        let archive = self.fetcher.fetch(&self.url)?;
        verify::verify(&self.url, &archive, &self.profile.digest)?;
        install::install(&archive, &self.profile.member(), &self.layout.binary)?;
        tracing::info!(path = %self.layout.binary.display(), "sccache downloaded");
        Ok(Provisioned::Downloaded(self.layout.binary.clone()))
    }

    /// Emitted on every run, whether or not a download follows.
    fn wire(&self, pipeline: &dyn Pipeline) -> Result<()> {
        let layout = &self.layout;
        let log_file = layout::as_str(&layout.log_file)?;
        pipeline.set_output("root-directory", layout::as_str(&layout.root)?).or_raise(|| ErrorKind::Pipeline)?;
        pipeline.set_output("log-file-path", log_file).or_raise(|| ErrorKind::Pipeline)?;
        pipeline
            .set_environment_variable("SCCACHE_DIR", layout::as_str(&layout.cache_dir)?)
            .or_raise(|| ErrorKind::Pipeline)?;
        pipeline.set_environment_variable("SCCACHE_ERROR_LOG", log_file).or_raise(|| ErrorKind::Pipeline)?;
        pipeline.set_environment_variable("SCCACHE_LOG", &self.log_level).or_raise(|| ErrorKind::Pipeline)?;
        pipeline.add_path(&layout.binary_dir).or_raise(|| ErrorKind::Pipeline)
    }
}

impl Provisioner<HttpFetcher> {
    /// Provision the pinned release for `platform` over HTTPS.
    ///
    /// The HTTP client is only set up once a download is actually needed.
    pub fn for_platform(platform: Platform, working_dir: &Path, options: Options) -> Self {
        Self::new(platform.profile(), working_dir, options, HttpFetcher::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciprep_actions::{Command, Recorder};
    use ciprep_archive::Compression;
    use std::cell::RefCell;

    /// Serves one archive from memory and records every requested URL.
    struct StaticFetcher {
        archive: Vec<u8>,
        requests: RefCell<Vec<String>>,
    }
    impl StaticFetcher {
        fn new(archive: Vec<u8>) -> Self {
            Self { archive, requests: RefCell::new(Vec::new()) }
        }
        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }
    impl Fetch for &StaticFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            Ok(self.archive.clone())
        }
    }

    /// Values `ciprep-config` ships as defaults.
    fn options() -> Options {
        Options {
            url_base: "https://github.com/mozilla/sccache/releases/download".to_string(),
            root: PathBuf::from("bin/tools/sccache"),
            log_level: "info".to_string(),
        }
    }

    /// Fails every request.
    struct OfflineFetcher;
    impl Fetch for OfflineFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            exn::bail!(ErrorKind::Network(url.to_string()))
        }
    }

    const BINARY: &[u8] = b"\x7fELF pretend sccache";

    fn release(profile: &Profile) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, data) in [("README.md", &b"readme"[..]), (profile.binary.as_str(), BINARY)] {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, format!("{}/{}", profile.stem(), name), data).unwrap();
        }
        Compression::Gzip.compress(&builder.into_inner().unwrap()).unwrap()
    }

    /// The Linux profile with its digest swapped for that of a local fixture.
    fn fixture() -> (Profile, Vec<u8>) {
        let mut profile = Platform::LinuxX86_64.profile();
        let archive = release(&profile);
        profile.digest = sha256_hex(&archive);
        (profile, archive)
    }

    #[test]
    fn test_downloads_verifies_and_installs() {
        let dir = tempfile::tempdir().unwrap();
        let (profile, archive) = fixture();
        let fetcher = StaticFetcher::new(archive);
        let provisioner = Provisioner::new(profile.clone(), dir.path(), options(), &fetcher);
        let recorder = Recorder::default();

        let outcome = provisioner.run(&recorder).unwrap();
        let expected = dir.path().join("bin/tools/sccache").join(&profile.digest).join("sccache");
        assert_eq!(outcome, Provisioned::Downloaded(expected.clone()));
        assert_eq!(std::fs::read(&expected).unwrap(), BINARY);
        assert_eq!(
            fetcher.requests(),
            vec![
                "https://github.com/mozilla/sccache/releases/download/v0.10.0/sccache-v0.10.0-x86_64-unknown-linux-musl.tar.gz"
            ]
        );
        assert!(dir.path().join("bin/tools/sccache/cache").is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&expected).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn test_pipeline_wiring() {
        let dir = tempfile::tempdir().unwrap();
        let (profile, archive) = fixture();
        let fetcher = StaticFetcher::new(archive);
        let provisioner = Provisioner::new(profile.clone(), dir.path(), options(), &fetcher);
        let recorder = Recorder::default();
        provisioner.run(&recorder).unwrap();

        let root = dir.path().join("bin/tools/sccache");
        let text = |p: PathBuf| p.to_str().unwrap().to_string();
        assert_eq!(
            recorder.commands(),
            vec![
                Command::Output { name: "root-directory".into(), value: text(root.clone()) },
                Command::Output { name: "log-file-path".into(), value: text(root.join("sccache.log")) },
                Command::Environment { name: "SCCACHE_DIR".into(), value: text(root.join("cache")) },
                Command::Environment { name: "SCCACHE_ERROR_LOG".into(), value: text(root.join("sccache.log")) },
                Command::Environment { name: "SCCACHE_LOG".into(), value: "info".into() },
                Command::Path(root.join(&profile.digest)),
            ]
        );
    }

    #[test]
    fn test_second_run_uses_cached_binary() {
        let dir = tempfile::tempdir().unwrap();
        let (profile, archive) = fixture();
        let fetcher = StaticFetcher::new(archive);
        let provisioner = Provisioner::new(profile, dir.path(), options(), &fetcher);

        let first = provisioner.run(&Recorder::default()).unwrap();
        let modified = std::fs::metadata(first.path()).unwrap().modified().unwrap();
        let recorder = Recorder::default();
        let second = provisioner.run(&recorder).unwrap();

        assert_eq!(second, Provisioned::Cached(first.path().to_path_buf()));
        assert_eq!(fetcher.requests().len(), 1);
        assert_eq!(std::fs::read(second.path()).unwrap(), BINARY);
        assert_eq!(std::fs::metadata(second.path()).unwrap().modified().unwrap(), modified);
        // Wiring still happens on the fast path.
        assert_eq!(recorder.commands().len(), 6);
    }

    #[test]
    fn test_cached_binary_needs_no_network() {
        let dir = tempfile::tempdir().unwrap();
        let (profile, archive) = fixture();
        let fetcher = StaticFetcher::new(archive);
        let online = Provisioner::new(profile.clone(), dir.path(), options(), &fetcher);
        online.run(&Recorder::default()).unwrap();

        let offline = Provisioner::new(profile.clone(), dir.path(), options(), OfflineFetcher);
        let outcome = offline.run(&Recorder::default()).unwrap();
        assert!(matches!(outcome, Provisioned::Cached(_)));

        let fresh = tempfile::tempdir().unwrap();
        let uncached = Provisioner::new(profile, fresh.path(), options(), OfflineFetcher);
        let err = uncached.run(&Recorder::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
    }

    #[test]
    fn test_http_fetcher_is_lazy() {
        let dir = tempfile::tempdir().unwrap();
        let provisioner = Provisioner::for_platform(Platform::LinuxX86_64, dir.path(), options());
        assert!(!provisioner.fetcher.is_connected());
    }

    #[test]
    fn test_digest_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Platform::LinuxX86_64.profile();
        let fetcher = StaticFetcher::new(release(&profile));
        let provisioner = Provisioner::new(profile, dir.path(), options(), &fetcher);

        let err = provisioner.run(&Recorder::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::DigestMismatch { .. }));
        assert!(!provisioner.layout().binary.exists());
        assert_eq!(std::fs::read_dir(&provisioner.layout().binary_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_wrong_member_fails_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let (mut profile, _) = fixture();
        profile.binary = "sccache.exe".to_string();
        // Archive built for the Linux name, digest pinned to match it.
        let archive = release(&Platform::LinuxX86_64.profile());
        profile.digest = sha256_hex(&archive);
        let fetcher = StaticFetcher::new(archive);
        let provisioner = Provisioner::new(profile, dir.path(), options(), &fetcher);

        let err = provisioner.run(&Recorder::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Extract(_)));
        assert!(!provisioner.layout().binary.exists());
    }

    #[test]
    fn test_options() {
        let dir = tempfile::tempdir().unwrap();
        let (profile, archive) = fixture();
        let fetcher = StaticFetcher::new(archive);
        let options = Options {
            url_base: "https://mirror.example.invalid/sccache/".to_string(),
            root: PathBuf::from("tools"),
            log_level: "debug".to_string(),
        };
        let provisioner = Provisioner::new(profile, dir.path(), options, &fetcher);
        let recorder = Recorder::default();
        let outcome = provisioner.run(&recorder).unwrap();
        assert!(outcome.path().starts_with(dir.path().join("tools")));
        assert_eq!(recorder.environment("SCCACHE_LOG").as_deref(), Some("debug"));
        assert_eq!(
            fetcher.requests(),
            vec!["https://mirror.example.invalid/sccache/v0.10.0/sccache-v0.10.0-x86_64-unknown-linux-musl.tar.gz"]
        );
    }
}
