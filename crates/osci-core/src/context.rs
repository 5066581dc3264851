//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::config::ConfigStore;
use crate::layout::{default_install_root, default_staging_dir};
use crate::target::Platform;

/// User-level paths the installer derives its defaults from.
///
/// Frontends create this once; tests build one over a temp directory.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    config_dir: PathBuf,
}

impl AppContext {
    pub fn new(home_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            home_dir,
            config_dir,
        }
    }

    /// Resolve paths for the current user.
    pub fn from_env() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let config_dir = dirs::config_dir()
            .map(|p| p.join("osci"))
            .unwrap_or_else(|| home_dir.join(".config").join("osci"));
        Ok(Self::new(home_dir, config_dir))
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::from_dir(&self.config_dir)
    }

    pub fn default_staging_dir(&self) -> PathBuf {
        default_staging_dir(&self.home_dir)
    }

    pub fn default_install_root(&self, platform: Platform) -> PathBuf {
        default_install_root(platform, &self.home_dir)
    }
}
