//! Blocking HTTP access to GitHub.
//!
//! reqwest is async; the pipeline is not. Each call blocks on a private
//! current-thread runtime.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{GITHUB_API, latest_release_url_at};
use crate::version::ReleaseVersion;

const USER_AGENT: &str = concat!("osci/", env!("CARGO_PKG_VERSION"));

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// HTTP client for release lookups and archive downloads.
#[derive(Debug)]
pub struct ReleaseClient {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    api_base: String,
}

impl ReleaseClient {
    pub fn new() -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;
        Ok(Self {
            http,
            runtime,
            api_base: GITHUB_API.to_string(),
        })
    }

    /// Query releases from another API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Resolve the newest published release of `repository`.
    pub fn latest_version(&self, repository: &str) -> anyhow::Result<ReleaseVersion> {
        let url = latest_release_url_at(&self.api_base, repository)?;
        debug!(%url, "querying latest release");

        let release: LatestRelease = self.runtime.block_on(async {
            let response = self
                .http
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                .send()
                .await
                .with_context(|| format!("Failed to query {}", url))?;

            if !response.status().is_success() {
                anyhow::bail!(
                    "Failed to query latest release: HTTP {} from {}",
                    response.status(),
                    url
                );
            }

            response
                .json::<LatestRelease>()
                .await
                .context("Failed to parse latest release response")
        })?;

        ReleaseVersion::parse(&release.tag_name).with_context(|| {
            format!(
                "Latest release tag is not a plain version: {}",
                release.tag_name
            )
        })
    }

    /// Check that `url` answers with a 2xx or 3xx status.
    pub fn probe(&self, url: &Url) -> anyhow::Result<()> {
        self.runtime.block_on(async {
            let response = self
                .http
                .head(url.clone())
                .timeout(PROBE_TIMEOUT)
                .send()
                .await
                .with_context(|| format!("Error reaching URL {}", url))?;

            let status = response.status();
            if status.is_success() || status.is_redirection() {
                Ok::<_, anyhow::Error>(())
            } else {
                anyhow::bail!("URL {} answered HTTP {}", url, status)
            }
        })
    }

    /// Download the body of `url` into memory.
    pub fn download(&self, url: &Url) -> anyhow::Result<Vec<u8>> {
        self.runtime.block_on(async {
            let response = self
                .http
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("Failed to download {}", url))?;

            if !response.status().is_success() {
                anyhow::bail!(
                    "Failed to download archive: HTTP {} from {}",
                    response.status(),
                    url
                );
            }

            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read response body from {}", url))?;
            Ok::<_, anyhow::Error>(bytes.to_vec())
        })
    }
}
