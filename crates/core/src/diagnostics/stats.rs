//! Aggregate vault statistics.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::index::{VaultIndex, resolve_target};

/// Date-patterned filename stems of periodic notes:
/// daily, weekly, monthly, quarterly, yearly.
static PERIODIC_STEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4}-\d{2}-\d{2}|\d{4}-W\d{2}|\d{4}-\d{2}|\d{4}-Q[1-4]|\d{4})$")
        .unwrap()
});

const PERIODIC_FOLDERS: &[&str] =
    &["daily", "weekly", "monthly", "quarterly", "yearly", "journal", "journals"];

/// Orphan (zero-backlink) breakdown. Periodic notes are expected to be
/// orphaned by nature, so they are counted apart from content notes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrphanStats {
    pub total: usize,
    pub periodic: usize,
    pub content: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderCount {
    pub folder: String,
    pub note_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacklinkCount {
    pub path: String,
    pub backlinks: usize,
}

/// Aggregate statistics over one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct VaultStats {
    pub total_notes: usize,
    pub total_links: usize,
    pub total_tags: usize,
    pub broken_links: usize,
    pub average_links_per_note: f64,
    pub orphan_notes: OrphanStats,
    /// Top 10 most backlinked notes.
    pub most_backlinked: Vec<BacklinkCount>,
    /// Top 20 tags by usage.
    pub top_tags: Vec<TagCount>,
    /// Note counts by top-level folder, descending.
    pub folders: Vec<FolderCount>,
}

/// Whether a note path follows a periodic (date-based) naming convention.
pub fn is_periodic_note(path: &str) -> bool {
    let filename = path.rsplit('/').next().unwrap_or(path);
    let stem = filename.strip_suffix(".md").unwrap_or(filename);

    if PERIODIC_STEM_RE.is_match(stem) {
        return true;
    }

    match path.split_once('/') {
        Some((folder, _)) => PERIODIC_FOLDERS.contains(&folder.to_lowercase().as_str()),
        None => false,
    }
}

/// Compute aggregate statistics for a snapshot.
pub fn collect_stats(index: &VaultIndex) -> VaultStats {
    let total_notes = index.notes.len();
    let total_links = index.total_outlinks();

    let mut broken_links = 0;
    for note in index.notes.values() {
        for outlink in &note.outlinks {
            if resolve_target(index, &note.path, &outlink.target).is_none() {
                broken_links += 1;
            }
        }
    }

    let mut orphan_notes = OrphanStats::default();
    for note in index.notes.values() {
        if index.get_backlinks(&note.path).is_empty() {
            orphan_notes.total += 1;
            if is_periodic_note(&note.path) {
                orphan_notes.periodic += 1;
            } else {
                orphan_notes.content += 1;
            }
        }
    }

    let mut most_backlinked: Vec<BacklinkCount> = index
        .notes
        .keys()
        .map(|path| BacklinkCount {
            path: path.clone(),
            backlinks: index.get_backlinks(path).len(),
        })
        .filter(|c| c.backlinks > 0)
        .collect();
    most_backlinked
        .sort_by(|a, b| b.backlinks.cmp(&a.backlinks).then_with(|| a.path.cmp(&b.path)));
    most_backlinked.truncate(10);

    let mut top_tags: Vec<TagCount> = index
        .tags
        .iter()
        .map(|(tag, notes)| TagCount { tag: tag.clone(), count: notes.len() })
        .collect();
    top_tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    top_tags.truncate(20);

    let mut folder_counts: HashMap<String, usize> = HashMap::new();
    for path in index.notes.keys() {
        let folder = match path.split_once('/') {
            Some((folder, _)) => folder.to_string(),
            None => "(root)".to_string(),
        };
        *folder_counts.entry(folder).or_default() += 1;
    }
    let mut folders: Vec<FolderCount> = folder_counts
        .into_iter()
        .map(|(folder, note_count)| FolderCount { folder, note_count })
        .collect();
    folders.sort_by(|a, b| {
        b.note_count.cmp(&a.note_count).then_with(|| a.folder.cmp(&b.folder))
    });

    let average_links_per_note = if total_notes > 0 {
        (total_links as f64 / total_notes as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };

    VaultStats {
        total_notes,
        total_links,
        total_tags: index.tags.len(),
        broken_links,
        average_links_per_note,
        orphan_notes,
        most_backlinked,
        top_tags,
        folders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_snapshot;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("daily-notes/2025-01-15.md", true)] // daily stem
    #[case("2025-W03.md", true)] // weekly stem
    #[case("notes/2025-01.md", true)] // monthly stem
    #[case("2025-Q1.md", true)] // quarterly stem
    #[case("archive/2024.md", true)] // yearly stem
    #[case("journal/thoughts.md", true)] // periodic folder
    #[case("Daily/standup.md", true)] // folder match is case-insensitive
    #[case("notes/project-plan.md", false)]
    #[case("2025-01-15-meeting.md", false)] // date prefix alone is not periodic
    #[case("topics.md", false)]
    fn periodic_detection(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_periodic_note(path), expected, "{path}");
    }

    fn create_test_vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(
            root.join("A.md"),
            "---\ntags:\n  - project\n---\nLinks [[B]] and [[Missing]].\n",
        )
        .unwrap();
        fs::write(root.join("B.md"), "---\ntags:\n  - project\n  - area\n---\n# B\n")
            .unwrap();

        fs::create_dir(root.join("daily")).unwrap();
        fs::write(root.join("daily/2025-01-15.md"), "Reviewed [[B]].\n").unwrap();

        dir
    }

    #[test]
    fn computes_totals_and_orphans() {
        let vault = create_test_vault();
        let index = build_snapshot(vault.path(), &[], 1).unwrap();
        let stats = collect_stats(&index);

        assert_eq!(stats.total_notes, 3);
        assert_eq!(stats.total_links, 3);
        assert_eq!(stats.total_tags, 2);
        assert_eq!(stats.broken_links, 1);
        assert_eq!(stats.average_links_per_note, 1.0);

        // A and the daily have no backlinks; the daily is periodic
        assert_eq!(stats.orphan_notes.total, 2);
        assert_eq!(stats.orphan_notes.periodic, 1);
        assert_eq!(stats.orphan_notes.content, 1);
    }

    #[test]
    fn ranks_backlinks_tags_and_folders() {
        let vault = create_test_vault();
        let index = build_snapshot(vault.path(), &[], 1).unwrap();
        let stats = collect_stats(&index);

        assert_eq!(stats.most_backlinked.len(), 1);
        assert_eq!(stats.most_backlinked[0].path, "B.md");
        assert_eq!(stats.most_backlinked[0].backlinks, 2);

        assert_eq!(stats.top_tags[0].tag, "project");
        assert_eq!(stats.top_tags[0].count, 2);

        assert_eq!(stats.folders[0].folder, "(root)");
        assert_eq!(stats.folders[0].note_count, 2);
        assert_eq!(stats.folders[1].folder, "daily");
    }
}
