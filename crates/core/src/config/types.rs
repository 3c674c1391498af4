use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub index: IndexTuning,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Folders to exclude from indexing (relative to vault_root).
    /// These folders and their contents are invisible to the scanner,
    /// the watcher, and every query built on the index.
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Scheduler tuning. All values have working defaults; a zero
/// `refresh_interval_secs` disables the periodic fallback rebuild.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexTuning {
    /// Quiet period after the last file change before rebuilding (ms).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Periodic fallback rebuild interval (s); 0 disables.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Snapshot age (s) above which health reports the index as stale.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
}

impl Default for IndexTuning {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            refresh_interval_secs: default_refresh_interval_secs(),
            stale_after_secs: default_stale_after_secs(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    2000
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_stale_after_secs() -> u64 {
    300
}

/// Vault-local configuration (`.notegraph.json` at the vault root).
/// Loaded once at startup; consulted by tools on top of the core, never
/// mutated by the core itself.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct VaultLocalConfig {
    #[serde(default)]
    pub exclude_task_tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    /// Excluded folders, relative to the vault root.
    pub excluded_folders: Vec<PathBuf>,
    pub logging: LoggingConfig,
    pub index: IndexTuning,
}
