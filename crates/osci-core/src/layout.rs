//! Staging and destination paths for one install.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::target::{Platform, Target};
use crate::version::ReleaseVersion;

/// Name used by the upstream archive and the packager output.
pub const APP_SLUG: &str = "open-stage-control";

/// Human-facing application name.
pub const APP_NAME: &str = "Open Stage Control";

/// Every path touched by the pipeline, computed once up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingLayout {
    pub staging_dir: PathBuf,
    pub archive: PathBuf,
    pub extracted_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub package_dir: PathBuf,
    pub packaged_bundle: PathBuf,
    pub install_dir: PathBuf,
    pub installed_bundle: PathBuf,
}

impl StagingLayout {
    pub fn new(
        staging_dir: &Path,
        install_root: &Path,
        version: &ReleaseVersion,
        target: Target,
    ) -> Self {
        let archive = staging_dir.join(format!("{}.zip", version.tag()));
        let extracted_dir = staging_dir.join(format!("{}-{}", APP_SLUG, version));
        let dist_dir = extracted_dir.join("dist");
        let package_dir = dist_dir.join(target.package_dir_name(APP_SLUG));
        let install_dir = install_root.join(version.tag());

        let (packaged_bundle, installed_bundle) = match target.platform {
            Platform::Darwin => (
                package_dir.join(format!("{}.app", APP_SLUG)),
                install_dir.join(format!("{}.app", APP_NAME)),
            ),
            Platform::Linux | Platform::Win32 => {
                (package_dir.clone(), install_dir.join(APP_SLUG))
            }
        };

        Self {
            staging_dir: staging_dir.to_path_buf(),
            archive,
            extracted_dir,
            dist_dir,
            package_dir,
            packaged_bundle,
            install_dir,
            installed_bundle,
        }
    }
}

/// Default parent of versioned install directories for a platform.
///
/// macOS installs go to `/Applications`; elsewhere the user's local data
/// directory under `home_dir` is used when the platform has no better answer.
pub fn default_install_root(platform: Platform, home_dir: &Path) -> PathBuf {
    match platform {
        Platform::Darwin => PathBuf::from("/Applications").join(APP_NAME),
        Platform::Linux | Platform::Win32 => dirs::data_local_dir()
            .unwrap_or_else(|| home_dir.join(".local").join("share"))
            .join(APP_SLUG),
    }
}

/// Default staging directory: the user's Downloads folder.
pub fn default_staging_dir(home_dir: &Path) -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| home_dir.join("Downloads"))
}
