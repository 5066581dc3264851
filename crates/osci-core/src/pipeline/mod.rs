//! The install pipeline.
//!
//! Download, extract, install dependencies, build, package, install, clean up.
//!
//! Pre-install steps (download through package) are all attempted even when
//! an earlier one fails; their failures are collected and reported together.
//! Install and cleanup failures stop the run immediately.

mod error;

pub use error::{PipelineError, Step, StepFailure};

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::extract::{ExtractOutcome, extract_archive};
use crate::fetch::{FetchOutcome, archive_digest, fetch_archive};
use crate::fs::{remove_path, replace_tree};
use crate::layout::StagingLayout;
use crate::process::{CommandRunner, CommandSpec, npm_build, npm_install, npm_package};
use crate::receipt::InstallReceipt;
use crate::release::ReleaseClient;
use crate::target::Target;
use crate::version::ReleaseVersion;

/// Everything resolved before the pipeline starts.
#[derive(Debug, Clone, Serialize)]
pub struct InstallPlan {
    pub version: ReleaseVersion,
    pub target: Target,
    pub source_url: Url,
    pub npm: String,
    pub layout: StagingLayout,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PreInstallReport {
    pub download: Option<FetchOutcome>,
    pub extract: Option<ExtractOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub version: ReleaseVersion,
    pub install_dir: PathBuf,
    pub installed_bundle: PathBuf,
    /// An earlier install at the same location was removed first.
    pub replaced: bool,
    pub receipt: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub pre_install: PreInstallReport,
    pub install: InstallReport,
    pub cleanup: Option<CleanupReport>,
}

pub struct Pipeline<'a> {
    plan: InstallPlan,
    runner: &'a dyn CommandRunner,
    client: &'a ReleaseClient,
}

impl<'a> Pipeline<'a> {
    pub fn new(plan: InstallPlan, runner: &'a dyn CommandRunner, client: &'a ReleaseClient) -> Self {
        Self {
            plan,
            runner,
            client,
        }
    }

    pub fn plan(&self) -> &InstallPlan {
        &self.plan
    }

    /// Whether a bundle already sits at the install destination.
    pub fn has_existing_install(&self) -> bool {
        self.plan.layout.installed_bundle.exists()
    }

    /// Full run: pre-install, install, then cleanup unless `keep_staging`.
    pub fn run(&self, keep_staging: bool) -> Result<RunReport, PipelineError> {
        let pre_install = self.pre_install()?;
        let install = self.install()?;
        let cleanup = if keep_staging {
            info!(
                staging = %self.plan.layout.staging_dir.display(),
                "keeping staging files"
            );
            None
        } else {
            Some(self.post_install()?)
        };

        Ok(RunReport {
            pre_install,
            install,
            cleanup,
        })
    }

    /// Download, extract, install dependencies, build and package.
    pub fn pre_install(&self) -> Result<PreInstallReport, PipelineError> {
        let layout = &self.plan.layout;
        let npm = self.plan.npm.as_str();
        let mut failures = Vec::new();

        let download = attempt(Step::Download, &mut failures, || {
            fetch_archive(self.client, &self.plan.source_url, layout)
        });
        let extract = attempt(Step::Extract, &mut failures, || extract_archive(layout));
        attempt(Step::InstallDependencies, &mut failures, || {
            self.run_in_source(&npm_install(npm, &layout.extracted_dir))
        });
        attempt(Step::Build, &mut failures, || {
            self.run_in_source(&npm_build(npm, &layout.extracted_dir))
        });
        attempt(Step::Package, &mut failures, || {
            self.run_in_source(&npm_package(npm, &layout.extracted_dir, self.plan.target))
        });

        if !failures.is_empty() {
            return Err(PipelineError::PreInstall(failures));
        }
        Ok(PreInstallReport { download, extract })
    }

    /// Copy the packaged bundle into the install directory, replacing any
    /// existing install, and write the receipt.
    pub fn install(&self) -> Result<InstallReport, PipelineError> {
        info!(step = %Step::Install, "starting");
        self.install_bundle().map_err(PipelineError::Install)
    }

    /// Remove the extracted tree and the archive.
    pub fn post_install(&self) -> Result<CleanupReport, PipelineError> {
        info!(step = %Step::Cleanup, "starting");
        self.cleanup().map_err(PipelineError::Cleanup)
    }

    fn run_in_source(&self, spec: &CommandSpec) -> anyhow::Result<()> {
        let source = &self.plan.layout.extracted_dir;
        if !source.is_dir() {
            anyhow::bail!("Extracted source tree missing: {}", source.display());
        }
        self.runner.run(spec)
    }

    fn install_bundle(&self) -> anyhow::Result<InstallReport> {
        let layout = &self.plan.layout;
        if !layout.packaged_bundle.exists() {
            anyhow::bail!(
                "Packaged application not found: {}",
                layout.packaged_bundle.display()
            );
        }

        std::fs::create_dir_all(&layout.install_dir).with_context(|| {
            format!(
                "Failed to create install directory: {}",
                layout.install_dir.display()
            )
        })?;

        let replaced = replace_tree(&layout.packaged_bundle, &layout.installed_bundle)?;
        if replaced {
            warn!(
                bundle = %layout.installed_bundle.display(),
                "replaced existing install"
            );
        }
        info!(
            bundle = %layout.installed_bundle.display(),
            "installed"
        );

        let digest = if layout.archive.is_file() {
            Some(archive_digest(layout)?)
        } else {
            None
        };
        let receipt = InstallReceipt::new(
            self.plan.version.clone(),
            self.plan.source_url.as_str(),
            digest,
            self.plan.target,
        )
        .save(&layout.install_dir)?;

        Ok(InstallReport {
            version: self.plan.version.clone(),
            install_dir: layout.install_dir.clone(),
            installed_bundle: layout.installed_bundle.clone(),
            replaced,
            receipt,
        })
    }

    fn cleanup(&self) -> anyhow::Result<CleanupReport> {
        cleanup_staging(&self.plan.layout)
    }
}

/// Remove staged artifacts for `layout`. Missing items are not errors.
pub fn cleanup_staging(layout: &StagingLayout) -> anyhow::Result<CleanupReport> {
    let mut removed = Vec::new();
    for path in [&layout.extracted_dir, &layout.archive] {
        if remove_path(path)? {
            info!(path = %path.display(), "removed");
            removed.push(path.clone());
        }
    }
    Ok(CleanupReport { removed })
}

fn attempt<T>(
    step: Step,
    failures: &mut Vec<StepFailure>,
    f: impl FnOnce() -> anyhow::Result<T>,
) -> Option<T> {
    info!(step = %step, "starting");
    match f() {
        Ok(value) => Some(value),
        Err(error) => {
            let message = format!("{:#}", error);
            warn!(step = %step, error = %message, "step failed");
            failures.push(StepFailure { step, error });
            None
        }
    }
}
