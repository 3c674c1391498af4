//! Shared output formatting for query commands.

use notegraph_core::index::Backlink;
use serde::Serialize;

/// Print any serializable report as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            std::process::exit(1);
        }
    }
}

/// An outgoing link with its resolution outcome, for display.
#[derive(Debug, Serialize)]
pub struct OutlinkRow {
    pub target: String,
    pub line: u32,
    /// Resolved note path, absent for broken links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
}

pub fn print_backlinks_table(links: &[Backlink]) {
    if links.is_empty() {
        println!("(no backlinks)");
        return;
    }
    let width = links.iter().map(|l| l.source.len()).max().unwrap_or(6).clamp(6, 60);
    println!("{:<width$}  LINE", "SOURCE", width = width);
    for link in links {
        println!("{:<width$}  {}", link.source, link.line, width = width);
    }
}

pub fn print_outlinks_table(links: &[OutlinkRow]) {
    if links.is_empty() {
        println!("(no outgoing links)");
        return;
    }
    let width = links.iter().map(|l| l.target.len()).max().unwrap_or(6).clamp(6, 60);
    println!("{:<width$}  LINE  RESOLVED", "TARGET", width = width);
    for link in links {
        println!(
            "{:<width$}  {:<4}  {}",
            link.target,
            link.line,
            link.resolved.as_deref().unwrap_or("(broken)"),
            width = width
        );
    }
}
