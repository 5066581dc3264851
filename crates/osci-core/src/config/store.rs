//! Config store for loading and saving osci.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{OsciConfig, parser, paths::config_path};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn from_default_location() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("osci");
        Ok(Self::from_dir(&config_dir))
    }

    pub fn from_dir(config_dir: &Path) -> Self {
        Self {
            config_path: config_path(config_dir),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> anyhow::Result<OsciConfig> {
        if !self.config_path.exists() {
            return Ok(OsciConfig::new());
        }
        parser::parse_osci_toml(&self.config_path)
    }

    pub fn save(&self, config: &OsciConfig) -> anyhow::Result<()> {
        let content = parser::to_toml(config).context("Failed to serialize config to TOML")?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
