//! Doctor command implementation.

use std::path::{Path, PathBuf};

use notegraph_core::config::{ConfigLoader, default_config_path, load_vault_config};

pub fn run(config: Option<&Path>, profile: Option<&str>, vault_override: Option<PathBuf>) {
    let looked_at = config
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            let vault_root = vault_override.unwrap_or(rc.vault_root);

            println!("OK   notegraph doctor");
            println!("config: {}", looked_at.display());
            println!("profile: {}", rc.active_profile);
            println!("vault_root: {}", vault_root.display());
            for folder in &rc.excluded_folders {
                println!("excluded: {}", folder.display());
            }
            println!("index.debounce_ms: {}", rc.index.debounce_ms);
            println!("index.refresh_interval_secs: {}", rc.index.refresh_interval_secs);
            println!("index.stale_after_secs: {}", rc.index.stale_after_secs);

            let local = load_vault_config(&vault_root);
            if !local.exclude_task_tags.is_empty() {
                println!("exclude_task_tags: {}", local.exclude_task_tags.join(", "));
            }

            if !vault_root.is_dir() {
                println!("warning: vault_root does not exist yet");
            }
        }
        Err(e) => match vault_override {
            Some(vault_root) => {
                println!("OK   notegraph doctor (no config, using --vault)");
                println!("vault_root: {}", vault_root.display());
                if !vault_root.is_dir() {
                    println!("warning: vault_root does not exist yet");
                }
            }
            None => {
                println!("FAIL notegraph doctor");
                println!("{e}");
                if config.is_none() {
                    println!("looked for: {}", default_config_path().display());
                }
                std::process::exit(1);
            }
        },
    }
}
