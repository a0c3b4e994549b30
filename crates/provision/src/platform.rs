//! Supported platforms and the sccache release pinned for each.

use crate::error::{Error, ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Pinned sccache release.
pub const VERSION: &str = "v0.10.0";

/// An OS/architecture pair with a pinned sccache release.
///
/// Identifiers follow the `<System>-<machine>` convention used by CI runner
/// images, e.g. `Linux-x86_64` or `Windows-AMD64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    WindowsAmd64,
    WindowsArm64,
    LinuxX86_64,
    LinuxAarch64,
    DarwinX86_64,
    DarwinArm64,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Self::WindowsAmd64,
        Self::WindowsArm64,
        Self::LinuxX86_64,
        Self::LinuxAarch64,
        Self::DarwinX86_64,
        Self::DarwinArm64,
    ];

    /// The platform this binary is running on.
    pub fn detect() -> Result<Self> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map an OS and machine name onto a platform.
    ///
    /// Accepts both runner-style names (`Darwin`, `AMD64`, `arm64`) and Rust's
    /// own (`macos`, `x86_64`, `aarch64`), case-insensitively.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let platform = match (os.to_lowercase().as_str(), arch.to_lowercase().as_str()) {
            ("windows", "amd64" | "x86_64") => Self::WindowsAmd64,
            ("windows", "arm64" | "aarch64") => Self::WindowsArm64,
            ("linux", "x86_64" | "amd64") => Self::LinuxX86_64,
            ("linux", "aarch64" | "arm64") => Self::LinuxAarch64,
            ("darwin" | "macos", "x86_64" | "amd64") => Self::DarwinX86_64,
            ("darwin" | "macos", "arm64" | "aarch64") => Self::DarwinArm64,
            _ => exn::bail!(ErrorKind::UnsupportedPlatform(format!("{os}-{arch}"))),
        };
        Ok(platform)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WindowsAmd64 => "Windows-AMD64",
            Self::WindowsArm64 => "Windows-ARM64",
            Self::LinuxX86_64 => "Linux-x86_64",
            Self::LinuxAarch64 => "Linux-aarch64",
            Self::DarwinX86_64 => "Darwin-x86_64",
            Self::DarwinArm64 => "Darwin-arm64",
        }
    }

    #[must_use]
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::WindowsAmd64 | Self::WindowsArm64)
    }

    /// The pinned release for this platform.
    #[must_use]
    pub fn profile(&self) -> Profile {
        let (target, digest) = match self {
            Self::WindowsAmd64 => (
                "x86_64-pc-windows-msvc",
                "0d499d0f73fa575f805df014af6ece49b840195fb7de0c552230899d77186ceb",
            ),
            Self::WindowsArm64 => (
                "aarch64-pc-windows-msvc",
                "5fd6cd6dd474e91c37510719bf27cfe1826f929e40dd383c22a7b96da9a5458d",
            ),
            Self::LinuxX86_64 => (
                "x86_64-unknown-linux-musl",
                "1fbb35e135660d04a2d5e42b59c7874d39b3deb17de56330b25b713ec59f849b",
            ),
            Self::LinuxAarch64 => (
                "aarch64-unknown-linux-musl",
                "d6a1ce4acd02b937cd61bc675a8be029a60f7bc167594c33d75732bbc0a07400",
            ),
            Self::DarwinX86_64 => (
                "x86_64-apple-darwin",
                "6d4a77802ec83607478df7b6338be28171e65e58a38a49497ebec1fbb300fce4",
            ),
            Self::DarwinArm64 => (
                "aarch64-apple-darwin",
                "5aba39252e2efa26bd76144f87ac59787d60fe567ab785e27e2a8c8190892eac",
            ),
        };
        let binary = if self.is_windows() { "sccache.exe" } else { "sccache" };
        Profile::new(VERSION, target, digest, binary)
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((os, arch)) => Self::from_parts(os, arch),
            None => exn::bail!(ErrorKind::UnsupportedPlatform(s.to_string())),
        }
    }
}

/// Download metadata for one release asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub version: String,
    /// Rust target triple the asset was built for.
    pub target: String,
    /// Lowercase hex SHA-256 of the release archive.
    pub digest: String,
    /// File name of the executable, inside the archive and on disk.
    pub binary: String,
}

impl Profile {
    pub fn new(
        version: impl Into<String>,
        target: impl Into<String>,
        digest: impl Into<String>,
        binary: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            target: target.into(),
            digest: digest.into(),
            binary: binary.into(),
        }
    }

    /// Asset name without extension, also the top-level directory inside the
    /// archive.
    #[must_use]
    pub fn stem(&self) -> String {
        format!("sccache-{}-{}", self.version, self.target)
    }

    /// Release asset URL below `base` (the `releases/download` prefix).
    #[must_use]
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}/{}.tar.gz", base.trim_end_matches('/'), self.version, self.stem())
    }

    /// Path of the executable inside the archive.
    #[must_use]
    pub fn member(&self) -> String {
        format!("{}/{}", self.stem(), self.binary)
    }
}
