//! Subcommand implementations.

pub mod broken;
pub mod doctor;
pub mod health;
pub mod links;
pub mod output;
pub mod reindex;
pub mod stats;
pub mod watch;

use std::path::{Path, PathBuf};
use std::time::Duration;

use notegraph_core::config::{
    ConfigError, ConfigLoader, IndexTuning, LoggingConfig, ResolvedConfig,
};
use notegraph_core::index::VaultIndex;
use notegraph_core::scheduler::RefreshOptions;

/// Everything a command needs to know about the target vault.
pub struct VaultContext {
    pub vault_root: PathBuf,
    pub excluded_folders: Vec<PathBuf>,
    pub tuning: IndexTuning,
    pub logging: LoggingConfig,
}

impl VaultContext {
    pub fn refresh_options(&self) -> RefreshOptions {
        RefreshOptions {
            debounce: Duration::from_millis(self.tuning.debounce_ms),
            refresh_interval: Duration::from_secs(self.tuning.refresh_interval_secs),
        }
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.tuning.stale_after_secs)
    }
}

/// Resolve the target vault from config and/or an explicit override.
///
/// An explicit `--vault` works without any config file; without one, a
/// loadable config with an active profile is required.
pub fn resolve_context(
    config: Option<&Path>,
    profile: Option<&str>,
    vault_override: Option<PathBuf>,
) -> VaultContext {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => from_resolved(rc, vault_override),
        Err(e) => match vault_override {
            Some(vault_root) => {
                if !matches!(e, ConfigError::NotFound(_)) {
                    eprintln!("Warning: ignoring unusable config: {e}");
                }
                VaultContext {
                    vault_root,
                    excluded_folders: Vec::new(),
                    tuning: IndexTuning::default(),
                    logging: LoggingConfig::default(),
                }
            }
            None => {
                eprintln!("Error loading config: {e}");
                eprintln!("Hint: pass --vault <path> or create a config file.");
                std::process::exit(1);
            }
        },
    }
}

fn from_resolved(rc: ResolvedConfig, vault_override: Option<PathBuf>) -> VaultContext {
    let vault_root = vault_override.unwrap_or(rc.vault_root);
    VaultContext {
        vault_root,
        excluded_folders: rc.excluded_folders,
        tuning: rc.index,
        logging: rc.logging,
    }
}

/// One-shot snapshot build for query commands.
pub fn build_index_or_exit(ctx: &VaultContext) -> VaultIndex {
    match notegraph_core::index::build_snapshot(&ctx.vault_root, &ctx.excluded_folders, 1)
    {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error building index: {e}");
            std::process::exit(1);
        }
    }
}
