//! Release version parsing.
//!
//! Open Stage Control tags its releases `vMAJOR.MINOR.PATCH`. Only plain
//! three-part versions are accepted; pre-release and build suffixes are not
//! published upstream and are rejected here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Version installed when nothing else is requested.
pub const DEFAULT_VERSION: &str = "1.29.7";

/// First release that packages for Apple Silicon.
pub const MINIMUM_VERSION: &str = "1.29.6";

/// A plain `MAJOR.MINOR.PATCH` release version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion(semver::Version);

impl ReleaseVersion {
    /// Parse a version string, accepting an optional leading `v`.
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            anyhow::bail!("version cannot be empty");
        }
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let parts: Vec<&str> = bare.split('.').collect();
        if parts.len() != 3 {
            anyhow::bail!("Version should contain exactly 3 parts: {}", input);
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                anyhow::bail!("Version should only contain numbers: {}", part);
            }
            *slot = part
                .parse()
                .map_err(|_| anyhow::anyhow!("Version part out of range: {}", part))?;
        }

        Ok(Self(semver::Version::new(numbers[0], numbers[1], numbers[2])))
    }

    /// The version installed when nothing else is requested.
    pub fn default_release() -> Self {
        Self(semver::Version::new(1, 29, 7))
    }

    /// The oldest release this installer accepts.
    pub fn minimum() -> Self {
        Self(semver::Version::new(1, 29, 6))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Git tag name for this release (`v1.29.7`).
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }

    pub fn is_supported(&self) -> bool {
        *self >= Self::minimum()
    }

    /// Fail unless this release can be packaged by the installer.
    pub fn ensure_supported(&self) -> anyhow::Result<()> {
        if !self.is_supported() {
            anyhow::bail!(
                "Open Stage Control {} is not supported; the oldest supported release is {}",
                self,
                MINIMUM_VERSION
            );
        }
        Ok(())
    }
}

impl Default for ReleaseVersion {
    fn default() -> Self {
        Self::default_release()
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReleaseVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ReleaseVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
