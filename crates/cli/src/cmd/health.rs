//! Health command implementation.

use std::path::{Path, PathBuf};

use notegraph_core::diagnostics::evaluate_health;
use notegraph_core::index::build_snapshot;
use notegraph_core::scheduler::Lifecycle;

use super::output::print_json;
use super::resolve_context;
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

    // One-shot build; a failure is exactly what health should report on
    let (snapshot, lifecycle, error) =
        match build_snapshot(&ctx.vault_root, &ctx.excluded_folders, 1) {
            Ok(index) => (Some(index), Lifecycle::Ready, None),
            Err(e) => (None, Lifecycle::Error, Some(e.to_string())),
        };

    let report = evaluate_health(
        snapshot.as_ref(),
        lifecycle,
        error.as_deref(),
        &ctx.vault_root,
        ctx.stale_after(),
    );

    if args.json {
        print_json(&report);
        return;
    }

    println!("Status: {}", report.status.as_str());
    println!("  vault_accessible: {}", report.vault_accessible);
    println!("  index_built:      {}", report.index_built);
    println!("  notes:            {}", report.note_count);
    println!("  entities:         {}", report.entity_count);
    println!("  tags:             {}", report.tag_count);
    for rec in &report.recommendations {
        println!("  ! {rec}");
    }

    if report.status != notegraph_core::diagnostics::HealthStatus::Healthy {
        std::process::exit(1);
    }
}
