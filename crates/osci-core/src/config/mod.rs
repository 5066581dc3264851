//! Installer configuration.
//!
//! A single optional `osci.toml` in the user's config directory. Every key is
//! optional; command-line flags override file values, which override
//! built-in defaults.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod settings;
pub mod store;

pub use parser::{parse_osci_toml, parse_osci_toml_str, to_toml};
pub use paths::{CONFIG_FILE, config_path};
pub use schema::OsciConfig;
pub use settings::{Overrides, Settings};
pub use store::ConfigStore;
