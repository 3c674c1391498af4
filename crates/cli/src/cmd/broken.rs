//! Broken-links command implementation.

use std::path::{Path, PathBuf};

use notegraph_core::diagnostics::find_broken_links;

use super::output::print_json;
use super::{build_index_or_exit, resolve_context};
use crate::BrokenArgs;
use crate::logging;

pub fn run(
    config: Option<&Path>,
    profile: Option<&str>,
    vault_override: Option<PathBuf>,
    args: BrokenArgs,
) {
    let ctx = resolve_context(config, profile, vault_override);
    logging::init(&ctx.logging);

    let index = build_index_or_exit(&ctx);
    let report =
        find_broken_links(&index, args.folder.as_deref(), args.limit, args.offset);

    if args.json {
        print_json(&report);
        return;
    }

    println!(
        "{} broken links in scope \"{}\" ({} notes affected, showing {})",
        report.total, report.scope, report.affected_notes, report.returned
    );

    if report.items.is_empty() {
        return;
    }

    println!();
    let width =
        report.items.iter().map(|l| l.source.len()).max().unwrap_or(6).clamp(6, 60);
    println!("{:<width$}  LINE  TARGET", "SOURCE", width = width);
    for item in &report.items {
        println!(
            "{:<width$}  {:<4}  {}",
            item.source, item.line, item.target,
            width = width
        );
    }
}
