//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "osci.toml";

pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE)
}
