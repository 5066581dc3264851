//! GitHub release addressing.
//!
//! Source archives come from GitHub's tag archive endpoint, and the newest
//! release is looked up through the REST API.

mod client;

pub use client::ReleaseClient;

use url::Url;

use crate::version::ReleaseVersion;

/// Upstream repository for Open Stage Control.
pub const DEFAULT_REPOSITORY: &str = "jean-emmanuel/open-stage-control";

/// Split `owner/name` into its two components.
pub fn parse_repository(repository: &str) -> anyhow::Result<(&str, &str)> {
    let mut parts = repository.trim().split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if is_segment(owner) && is_segment(name) => {
            Ok((owner, name))
        }
        _ => anyhow::bail!(
            "Invalid GitHub repository: {} (expected owner/name)",
            repository
        ),
    }
}

fn is_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && s != "."
        && s != ".."
}

/// Source archive URL for a tagged release.
///
/// `https://github.com/{owner}/{name}/archive/refs/tags/v{version}.zip`
pub fn archive_url(repository: &str, version: &ReleaseVersion) -> anyhow::Result<Url> {
    let (owner, name) = parse_repository(repository)?;
    let raw = format!(
        "https://github.com/{}/{}/archive/refs/tags/{}.zip",
        owner,
        name,
        version.tag()
    );
    Url::parse(&raw).map_err(|e| anyhow::anyhow!("Invalid archive URL {}: {}", raw, e))
}

/// GitHub REST API root.
pub const GITHUB_API: &str = "https://api.github.com";

/// REST endpoint describing the newest published release.
pub fn latest_release_url(repository: &str) -> anyhow::Result<Url> {
    latest_release_url_at(GITHUB_API, repository)
}

/// Same as [`latest_release_url`] against another API root (GitHub
/// Enterprise, mirrors).
pub fn latest_release_url_at(api_base: &str, repository: &str) -> anyhow::Result<Url> {
    let (owner, name) = parse_repository(repository)?;
    let raw = format!(
        "{}/repos/{}/{}/releases/latest",
        api_base.trim_end_matches('/'),
        owner,
        name
    );
    Url::parse(&raw).map_err(|e| anyhow::anyhow!("Invalid release URL {}: {}", raw, e))
}
