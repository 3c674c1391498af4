//! Broken-link enumeration.

use std::collections::HashSet;

use serde::Serialize;

use crate::index::{VaultIndex, resolve_target};

/// One outlink whose target resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    /// Path of the note containing the link.
    pub source: String,
    /// The raw link target, as written.
    pub target: String,
    /// Line number where the link appears (1-based).
    pub line: u32,
}

/// Paginated broken-link report.
#[derive(Debug, Clone, Serialize)]
pub struct BrokenLinkReport {
    /// Folder searched, or "all" for the entire vault.
    pub scope: String,
    /// Total broken links in scope.
    pub total: usize,
    /// Number of links in `items` (after limit/offset).
    pub returned: usize,
    /// Number of distinct notes with broken links in scope.
    pub affected_notes: usize,
    pub items: Vec<BrokenLink>,
}

/// Enumerate outlinks for which resolution returns nothing, sorted by source
/// path then line number.
pub fn find_broken_links(
    index: &VaultIndex,
    folder: Option<&str>,
    limit: usize,
    offset: usize,
) -> BrokenLinkReport {
    let mut all = Vec::new();
    let mut affected = HashSet::new();

    for note in index.notes.values() {
        if let Some(folder) = folder
            && !note.path.starts_with(folder)
        {
            continue;
        }

        for outlink in &note.outlinks {
            if resolve_target(index, &note.path, &outlink.target).is_none() {
                all.push(BrokenLink {
                    source: note.path.clone(),
                    target: outlink.target.clone(),
                    line: outlink.line,
                });
                affected.insert(note.path.clone());
            }
        }
    }

    all.sort_by(|a, b| a.source.cmp(&b.source).then(a.line.cmp(&b.line)));

    let items: Vec<BrokenLink> = all.iter().skip(offset).take(limit).cloned().collect();

    BrokenLinkReport {
        scope: folder.unwrap_or("all").to_string(),
        total: all.len(),
        returned: items.len(),
        affected_notes: affected.len(),
        items,
    }
}
