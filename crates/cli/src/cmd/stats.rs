//! Stats command implementation.

use std::path::{Path, PathBuf};

use notegraph_core::diagnostics::collect_stats;

use super::output::print_json;
use super::{build_index_or_exit, resolve_context};
use crate::FormatArgs;
use crate::logging;

pub fn run(
    config: Option<&Path>,
    profile: Option<&str>,
    vault_override: Option<PathBuf>,
    args: FormatArgs,
) {
    let ctx = resolve_context(config, profile, vault_override);
    logging::init(&ctx.logging);

    let index = build_index_or_exit(&ctx);
    let stats = collect_stats(&index);

    if args.json {
        print_json(&stats);
        return;
    }

    println!("Vault statistics for {}", ctx.vault_root.display());
    println!();
    println!("  Notes:           {}", stats.total_notes);
    println!("  Links:           {}", stats.total_links);
    println!("  Tags:            {}", stats.total_tags);
    println!("  Broken links:    {}", stats.broken_links);
    println!("  Avg links/note:  {:.2}", stats.average_links_per_note);
    println!(
        "  Orphans:         {} ({} periodic, {} content)",
        stats.orphan_notes.total, stats.orphan_notes.periodic, stats.orphan_notes.content
    );

    if !stats.most_backlinked.is_empty() {
        println!();
        println!("Most backlinked:");
        for entry in &stats.most_backlinked {
            println!("  {:>4}  {}", entry.backlinks, entry.path);
        }
    }

    if !stats.top_tags.is_empty() {
        println!();
        println!("Top tags:");
        for entry in &stats.top_tags {
            println!("  {:>4}  #{}", entry.count, entry.tag);
        }
    }

    if !stats.folders.is_empty() {
        println!();
        println!("Notes by folder:");
        for entry in &stats.folders {
            println!("  {:>4}  {}", entry.note_count, entry.folder);
        }
    }
}
