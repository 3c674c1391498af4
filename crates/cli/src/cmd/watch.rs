//! Watch command: keep the index live until interrupted.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notegraph_core::scheduler::IndexService;
use notegraph_core::vault::VaultWalker;
use notegraph_core::watch::VaultWatcher;

use super::resolve_context;
use crate::logging;

pub fn run(config: Option<&Path>, profile: Option<&str>, vault_override: Option<PathBuf>) {
    let ctx = resolve_context(config, profile, vault_override);
    logging::init(&ctx.logging);

    let service = IndexService::spawn(
        ctx.vault_root.clone(),
        ctx.excluded_folders.clone(),
        ctx.refresh_options(),
    );

    // Watcher failure is non-fatal; the periodic fallback keeps rebuilding
    let _watcher =
        match VaultWalker::with_exclusions(&ctx.vault_root, ctx.excluded_folders.clone())
        {
            Ok(walker) => match VaultWatcher::spawn(walker, service.event_sender()) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    tracing::warn!("file watcher unavailable: {e}");
                    None
                }
            },
            Err(e) => {
                eprintln!("Error opening vault: {e}");
                std::process::exit(1);
            }
        };

    if service.wait_for_builds(1, Duration::from_secs(300)) {
        let status = service.status();
        match service.snapshot() {
            Some(snapshot) => tracing::info!(
                "index ready: {} notes, generation {}",
                snapshot.notes.len(),
                snapshot.generation
            ),
            None => tracing::warn!(
                "initial build failed: {}",
                status.last_error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    println!("Watching {} (Ctrl-C to stop)", ctx.vault_root.display());

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    }) {
        eprintln!("Error installing Ctrl-C handler: {e}");
        std::process::exit(1);
    }

    let _ = stop_rx.recv();
    let status = service.status();
    println!(
        "Stopping after {} builds (last state: {})",
        status.builds_completed,
        status.lifecycle.as_str()
    );
}
