//! Index data types for vault notes and links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A note in the vault index: one source file and its extracted facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Path relative to vault root, with `/` separators. Unique key.
    pub path: String,
    /// Note title (from frontmatter, first heading, or filename).
    pub title: String,
    /// Alternate names the note may be addressed by.
    pub aliases: Vec<String>,
    /// Tags declared in frontmatter or inline in the body.
    pub tags: Vec<String>,
    /// Outgoing link references, in order of appearance.
    pub outlinks: Vec<Outlink>,
    /// File modification time. Diagnostics only, not used for correctness.
    pub modified: DateTime<Utc>,
}

impl Note {
    /// Filename without the `.md` extension.
    pub fn file_stem(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        name.strip_suffix(".md").unwrap_or(name)
    }

    /// Every name this note is addressable by: title, aliases, file stem.
    pub fn addressable_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .chain(std::iter::once(self.file_stem()))
    }
}

/// A link reference found inside a note's body, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlink {
    /// Target path/name, raw, as written in the link.
    pub target: String,
    /// Display text, if the link carried one.
    pub text: Option<String>,
    /// Line number where the link appears (1-based).
    pub line: u32,
}

/// A resolved incoming reference from another note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlink {
    /// Path of the note containing the link.
    pub source: String,
    /// Line number of the link in the source note (1-based).
    pub line: u32,
}

/// Owner(s) of a case-normalized addressable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// The name belongs to exactly one note.
    Unique(String),
    /// Two or more notes claim the name; all claimants are tracked.
    Ambiguous(Vec<String>),
}

impl Entity {
    /// All candidate paths for this entity.
    pub fn candidates(&self) -> &[String] {
        match self {
            Entity::Unique(path) => std::slice::from_ref(path),
            Entity::Ambiguous(paths) => paths,
        }
    }
}

/// One immutable, fully-built instance of the vault index.
///
/// Constructed once per rebuild and published by reference swap; readers
/// hold an `Arc<VaultIndex>` and use it consistently for a whole operation.
#[derive(Debug, Clone)]
pub struct VaultIndex {
    /// All notes, keyed by vault-relative path.
    pub notes: BTreeMap<String, Note>,
    /// Case-normalized addressable name -> owning note(s).
    pub entities: HashMap<String, Entity>,
    /// Tag -> set of note paths declaring it.
    pub tags: BTreeMap<String, BTreeSet<String>>,
    /// Target path -> incoming references, eager-built per snapshot.
    pub backlinks: HashMap<String, Vec<Backlink>>,
    /// When this snapshot was built.
    pub built_at: DateTime<Utc>,
    /// Monotonically increasing snapshot counter.
    pub generation: u64,
}

impl VaultIndex {
    /// Incoming links for a note. Empty for unknown paths or notes nobody
    /// links to; never an error.
    pub fn get_backlinks(&self, path: &str) -> &[Backlink] {
        self.backlinks.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of outgoing link references across all notes.
    pub fn total_outlinks(&self) -> usize {
        self.notes.values().map(|n| n.outlinks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(path: &str, title: &str) -> Note {
        Note {
            path: path.to_string(),
            title: title.to_string(),
            aliases: vec!["Alt".to_string()],
            tags: Vec::new(),
            outlinks: Vec::new(),
            modified: Utc::now(),
        }
    }

    #[test]
    fn file_stem_strips_extension_and_folders() {
        assert_eq!(note("projects/Plan.md", "Plan").file_stem(), "Plan");
        assert_eq!(note("Top.md", "Top").file_stem(), "Top");
    }

    #[test]
    fn addressable_names_cover_title_aliases_stem() {
        let n = note("a/b/Note.md", "A Title");
        let names: Vec<_> = n.addressable_names().collect();
        assert_eq!(names, vec!["A Title", "Alt", "Note"]);
    }
}
