//! Configuration loading.
//!
//! Two layers: a TOML process config with named profiles (which vault to
//! index, what to exclude, scheduler tuning), and an optional vault-local
//! `.notegraph.json` consulted by tools built on top of the core.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path, load_vault_config};
pub use types::{
    ConfigFile, IndexTuning, LoggingConfig, Profile, ResolvedConfig, VaultLocalConfig,
};
