//! Install receipts.
//!
//! A small TOML file written next to the installed bundle recording what was
//! installed, from where, and when.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::target::Target;
use crate::version::ReleaseVersion;

pub const RECEIPT_FILE: &str = "osci-receipt.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub version: ReleaseVersion,
    pub source_url: String,
    /// blake3 of the source archive, when it was still staged at install time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_blake3: Option<String>,
    pub target: Target,
    pub installed_at: chrono::DateTime<chrono::Utc>,
}

impl InstallReceipt {
    pub fn new(
        version: ReleaseVersion,
        source_url: impl Into<String>,
        archive_blake3: Option<String>,
        target: Target,
    ) -> Self {
        Self {
            version,
            source_url: source_url.into(),
            archive_blake3,
            target,
            installed_at: chrono::Utc::now(),
        }
    }

    pub fn path_in(install_dir: &Path) -> PathBuf {
        install_dir.join(RECEIPT_FILE)
    }

    /// Load the receipt from `install_dir`, if one was written.
    pub fn load(install_dir: &Path) -> anyhow::Result<Option<Self>> {
        let path = Self::path_in(install_dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read receipt: {}", path.display()))?;
        let receipt = toml::from_str(&content)
            .with_context(|| format!("Failed to parse receipt: {}", path.display()))?;
        Ok(Some(receipt))
    }

    pub fn save(&self, install_dir: &Path) -> anyhow::Result<PathBuf> {
        let path = Self::path_in(install_dir);
        let content = toml::to_string_pretty(self).context("Failed to serialize receipt")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write receipt: {}", path.display()))?;
        Ok(path)
    }
}
