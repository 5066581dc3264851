//! Configuration schema for osci.toml
//!
//! ```toml
//! version = "1.29.7"
//! repository = "jean-emmanuel/open-stage-control"
//! staging_dir = "/Users/me/Downloads"
//! install_root = "/Applications/Open Stage Control"
//! npm = "npm"
//! platform = "darwin"
//! arch = "arm64"
//! keep_staging = false
//! ```

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::release::parse_repository;
use crate::target::{Arch, Platform};
use crate::version::ReleaseVersion;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OsciConfig {
    /// Release to install; `latest` resolves the newest GitHub release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// GitHub repository (`owner/name`) the source archive comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Where the archive is downloaded and extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,

    /// Parent of the versioned install directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_root: Option<PathBuf>,

    /// npm-compatible executable used for install/build/package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,

    /// Leave the archive and extracted tree in place after installing
    #[serde(default)]
    pub keep_staging: bool,
}

impl OsciConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(version) = &self.version {
            if !is_latest(version) {
                ReleaseVersion::parse(version).context("Invalid 'version'")?;
            }
        }
        if let Some(repository) = &self.repository {
            parse_repository(repository).context("Invalid 'repository'")?;
        }
        if let Some(npm) = &self.npm {
            if npm.trim().is_empty() {
                anyhow::bail!("Invalid 'npm': executable name cannot be empty");
            }
        }
        if let Some(platform) = &self.platform {
            platform
                .parse::<Platform>()
                .context("Invalid 'platform'")?;
        }
        if let Some(arch) = &self.arch {
            arch.parse::<Arch>().context("Invalid 'arch'")?;
        }
        Ok(())
    }
}

/// Whether a version string asks for the newest release.
pub fn is_latest(version: &str) -> bool {
    version.trim().eq_ignore_ascii_case("latest")
}
