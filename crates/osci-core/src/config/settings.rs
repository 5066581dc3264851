//! Effective settings: command-line overrides over osci.toml over defaults.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use super::schema::{OsciConfig, is_latest};
use crate::context::AppContext;
use crate::layout::StagingLayout;
use crate::pipeline::InstallPlan;
use crate::process::DEFAULT_NPM;
use crate::release::{DEFAULT_REPOSITORY, ReleaseClient, archive_url, parse_repository};
use crate::target::{Arch, Platform, Target};
use crate::version::ReleaseVersion;

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub version: Option<String>,
    pub repository: Option<String>,
    pub staging_dir: Option<PathBuf>,
    pub install_root: Option<PathBuf>,
    pub npm: Option<String>,
    pub platform: Option<String>,
    pub arch: Option<String>,
    pub keep_staging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionRequest {
    Exact(ReleaseVersion),
    Latest,
}

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub version: VersionRequest,
    pub repository: String,
    pub target: Target,
    pub staging_dir: PathBuf,
    pub install_root: PathBuf,
    pub npm: String,
    pub keep_staging: bool,
}

impl Settings {
    pub fn resolve(
        config: &OsciConfig,
        overrides: &Overrides,
        ctx: &AppContext,
    ) -> anyhow::Result<Self> {
        let version = match overrides.version.as_ref().or(config.version.as_ref()) {
            Some(v) if is_latest(v) => VersionRequest::Latest,
            Some(v) => VersionRequest::Exact(ReleaseVersion::parse(v)?),
            None => VersionRequest::Exact(ReleaseVersion::default_release()),
        };

        let repository = overrides
            .repository
            .clone()
            .or_else(|| config.repository.clone())
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        parse_repository(&repository)?;

        let target = resolve_target(
            overrides.platform.as_ref().or(config.platform.as_ref()),
            overrides.arch.as_ref().or(config.arch.as_ref()),
        )?;

        let staging_dir = overrides
            .staging_dir
            .clone()
            .or_else(|| config.staging_dir.clone())
            .unwrap_or_else(|| ctx.default_staging_dir());
        let install_root = overrides
            .install_root
            .clone()
            .or_else(|| config.install_root.clone())
            .unwrap_or_else(|| ctx.default_install_root(target.platform));

        let npm = overrides
            .npm
            .clone()
            .or_else(|| config.npm.clone())
            .unwrap_or_else(|| DEFAULT_NPM.to_string());

        Ok(Self {
            version,
            repository,
            target,
            staging_dir,
            install_root,
            npm,
            keep_staging: overrides.keep_staging || config.keep_staging,
        })
    }

    /// The requested version, asking GitHub when `latest` was requested.
    pub fn resolve_version(&self, client: &ReleaseClient) -> anyhow::Result<ReleaseVersion> {
        match &self.version {
            VersionRequest::Exact(version) => Ok(version.clone()),
            VersionRequest::Latest => client
                .latest_version(&self.repository)
                .context("Failed to resolve the latest release"),
        }
    }

    pub fn layout(&self, version: &ReleaseVersion) -> StagingLayout {
        StagingLayout::new(&self.staging_dir, &self.install_root, version, self.target)
    }

    /// Build the install plan for a concrete version.
    pub fn plan(&self, version: &ReleaseVersion) -> anyhow::Result<InstallPlan> {
        version.ensure_supported()?;
        Ok(InstallPlan {
            version: version.clone(),
            target: self.target,
            source_url: archive_url(&self.repository, version)?,
            npm: self.npm.clone(),
            layout: self.layout(version),
        })
    }
}

/// Explicit values win; anything unset follows the host, falling back to
/// darwin/arm64 on hosts the packager has no name for.
fn resolve_target(platform: Option<&String>, arch: Option<&String>) -> anyhow::Result<Target> {
    let host = Target::host().unwrap_or_default();
    let platform = match platform {
        Some(p) => p.parse::<Platform>()?,
        None => host.platform,
    };
    let arch = match arch {
        Some(a) => a.parse::<Arch>()?,
        None => host.arch,
    };
    Ok(Target::new(platform, arch))
}
