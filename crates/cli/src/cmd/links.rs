//! Links command implementation.

use std::path::{Path, PathBuf};

use notegraph_core::index::resolve_target;
use serde::Serialize;

use super::output::{OutlinkRow, print_backlinks_table, print_json, print_outlinks_table};
use super::{build_index_or_exit, resolve_context};
use crate::LinksArgs;
use crate::logging;

#[derive(Debug, Serialize)]
struct LinksReport<'a> {
    path: &'a str,
    title: &'a str,
    backlinks: &'a [notegraph_core::index::Backlink],
    outlinks: Vec<OutlinkRow>,
}

pub fn run(
    config: Option<&Path>,
    profile: Option<&str>,
    vault_override: Option<PathBuf>,
    args: LinksArgs,
) {
    let ctx = resolve_context(config, profile, vault_override);
    logging::init(&ctx.logging);

    let index = build_index_or_exit(&ctx);

    // Normalize the note path (strip leading ./)
    let note_path = args.note.strip_prefix("./").unwrap_or(&args.note);

    let Some(note) = index.notes.get(note_path) else {
        eprintln!("Note not found in index: {note_path}");
        eprintln!("Hint: paths are vault-relative, e.g. \"projects/plan.md\".");
        std::process::exit(1);
    };

    // Both shown by default
    let show_backlinks = args.backlinks || !args.outlinks;
    let show_outlinks = args.outlinks || !args.backlinks;

    let backlinks = index.get_backlinks(note_path);
    let outlinks: Vec<OutlinkRow> = note
        .outlinks
        .iter()
        .map(|l| OutlinkRow {
            target: l.target.clone(),
            line: l.line,
            resolved: resolve_target(&index, note_path, &l.target),
        })
        .collect();

    if args.json {
        let report = LinksReport {
            path: note_path,
            title: &note.title,
            backlinks,
            outlinks,
        };
        print_json(&report);
        return;
    }

    if show_backlinks {
        println!("=== Backlinks (notes linking to {note_path}) ===");
        print_backlinks_table(backlinks);
    }

    if show_outlinks {
        if show_backlinks {
            println!();
        }
        println!("=== Outgoing links ({note_path} links to) ===");
        print_outlinks_table(&outlinks);
    }
}
