//! Reindex command implementation.

use std::path::{Path, PathBuf};

use notegraph_core::index::build_with_stats;

use super::resolve_context;
use crate::logging;

pub fn run(config: Option<&Path>, profile: Option<&str>, vault_override: Option<PathBuf>) {
    let ctx = resolve_context(config, profile, vault_override);
    logging::init(&ctx.logging);

    println!("Indexing vault: {}", ctx.vault_root.display());

    match build_with_stats(&ctx.vault_root, &ctx.excluded_folders, 1) {
        Ok((index, stats)) => {
            println!();
            println!("Indexing complete:");
            println!("  Files found:    {}", stats.files_found);
            println!("  Notes indexed:  {}", stats.notes_indexed);
            if stats.files_skipped > 0 {
                println!("  Files skipped:  {}", stats.files_skipped);
            }
            println!("  Links indexed:  {}", stats.links_indexed);
            println!("  Entities:       {}", stats.entities);
            println!("  Tags:           {}", stats.tags);
            println!("  Duration:       {}ms", stats.duration_ms);
            println!();
            println!("Built at: {}", index.built_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        Err(e) => {
            eprintln!("Error during indexing: {e}");
            std::process::exit(1);
        }
    }
}
