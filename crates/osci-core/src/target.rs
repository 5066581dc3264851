//! Packaging targets.
//!
//! The packager reads `PLATFORM` and `ARCH` from its environment and uses
//! Electron's spellings for both (`darwin`, `win32`, `x64`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
    Win32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Arm64,
    X64,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Win32 => "win32",
        }
    }

    /// Map a `std::env::consts::OS` value.
    pub fn from_rust_os(os: &str) -> anyhow::Result<Self> {
        match os {
            "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Win32),
            other => anyhow::bail!("Unsupported operating system: {}", other),
        }
    }
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X64 => "x64",
        }
    }

    /// Map a `std::env::consts::ARCH` value.
    pub fn from_rust_arch(arch: &str) -> anyhow::Result<Self> {
        match arch {
            "aarch64" => Ok(Arch::Arm64),
            "x86_64" => Ok(Arch::X64),
            other => anyhow::bail!("Unsupported architecture: {}", other),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "darwin" | "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            "win32" | "windows" => Ok(Platform::Win32),
            other => anyhow::bail!(
                "Unknown platform: {}. Use 'darwin', 'linux' or 'win32'",
                other
            ),
        }
    }
}

impl FromStr for Arch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            "x64" | "x86_64" => Ok(Arch::X64),
            other => anyhow::bail!("Unknown architecture: {}. Use 'arm64' or 'x64'", other),
        }
    }
}

/// Platform/architecture pair handed to the packager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub platform: Platform,
    pub arch: Arch,
}

impl Target {
    pub fn new(platform: Platform, arch: Arch) -> Self {
        Self { platform, arch }
    }

    /// Target matching the machine the installer runs on.
    pub fn host() -> anyhow::Result<Self> {
        Ok(Self {
            platform: Platform::from_rust_os(std::env::consts::OS)?,
            arch: Arch::from_rust_arch(std::env::consts::ARCH)?,
        })
    }

    /// Directory name the packager writes under `dist/`.
    pub fn package_dir_name(&self, app: &str) -> String {
        format!("{}-{}-{}", app, self.platform, self.arch)
    }

    /// Environment passed to `npm run package`.
    pub fn env(&self) -> [(&'static str, &'static str); 2] {
        [
            ("PLATFORM", self.platform.as_str()),
            ("ARCH", self.arch.as_str()),
        ]
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new(Platform::Darwin, Arch::Arm64)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.arch)
    }
}
