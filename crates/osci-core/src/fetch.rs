//! Release archive download into the staging directory.

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::layout::StagingLayout;
use crate::release::ReleaseClient;

/// What the download step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The archive was already staged; nothing was fetched.
    AlreadyPresent,
    /// The archive was downloaded and written to disk.
    Downloaded { bytes: u64, blake3: String },
}

/// Download the release archive unless it is already staged.
pub fn fetch_archive(
    client: &ReleaseClient,
    url: &Url,
    layout: &StagingLayout,
) -> anyhow::Result<FetchOutcome> {
    if layout.archive.exists() {
        info!(
            archive = %layout.archive.display(),
            "archive already downloaded"
        );
        return Ok(FetchOutcome::AlreadyPresent);
    }

    client.probe(url)?;

    info!(%url, "downloading release archive");
    let data = client.download(url)?;

    std::fs::create_dir_all(&layout.staging_dir).with_context(|| {
        format!(
            "Failed to create staging directory: {}",
            layout.staging_dir.display()
        )
    })?;
    std::fs::write(&layout.archive, &data)
        .with_context(|| format!("Failed to write archive: {}", layout.archive.display()))?;

    if !layout.archive.is_file() {
        anyhow::bail!(
            "Archive not found after download: {}",
            layout.archive.display()
        );
    }

    let digest = blake3::hash(&data).to_hex().to_string();
    debug!(bytes = data.len(), blake3 = %digest, "archive written");

    Ok(FetchOutcome::Downloaded {
        bytes: data.len() as u64,
        blake3: digest,
    })
}

/// blake3 digest of an archive already on disk.
pub fn archive_digest(layout: &StagingLayout) -> anyhow::Result<String> {
    let data = std::fs::read(&layout.archive)
        .with_context(|| format!("Failed to read archive: {}", layout.archive.display()))?;
    Ok(blake3::hash(&data).to_hex().to_string())
}
