//! Reverse-link (backlink) index construction.
//!
//! Built eagerly at snapshot-construction time: queries vastly outnumber
//! rebuilds, so a little build latency buys O(1) backlink lookups for the
//! snapshot's lifetime.

use std::collections::{BTreeMap, HashMap};

use super::entities::resolve_with;
use super::types::{Backlink, Entity, Note};

/// Derive, for every note, the notes that link to it.
///
/// Every outlink of every note is resolved; each successful resolution
/// appends an entry to the target's reverse list. Broken outlinks contribute
/// nothing.
pub fn build_reverse_index(
    notes: &BTreeMap<String, Note>,
    entities: &HashMap<String, Entity>,
) -> HashMap<String, Vec<Backlink>> {
    let mut reverse: HashMap<String, Vec<Backlink>> = HashMap::new();

    for note in notes.values() {
        for outlink in &note.outlinks {
            if let Some(target) =
                resolve_with(notes, entities, &note.path, &outlink.target).into_path()
            {
                reverse
                    .entry(target)
                    .or_default()
                    .push(Backlink { source: note.path.clone(), line: outlink.line });
            }
        }
    }

    reverse
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::entities::{build_entities, resolve_target};
    use crate::index::types::VaultIndex;
    use chrono::Utc;

    fn note_with_links(path: &str, title: &str, links: &[(&str, u32)]) -> Note {
        Note {
            path: path.to_string(),
            title: title.to_string(),
            aliases: Vec::new(),
            tags: Vec::new(),
            outlinks: links
                .iter()
                .map(|(target, line)| crate::index::Outlink {
                    target: target.to_string(),
                    text: None,
                    line: *line,
                })
                .collect(),
            modified: Utc::now(),
        }
    }

    fn index_of(notes: Vec<Note>) -> VaultIndex {
        let notes: BTreeMap<String, Note> =
            notes.into_iter().map(|n| (n.path.clone(), n)).collect();
        let entities = build_entities(&notes);
        let backlinks = build_reverse_index(&notes, &entities);
        VaultIndex {
            notes,
            entities,
            tags: BTreeMap::new(),
            backlinks,
            built_at: Utc::now(),
            generation: 1,
        }
    }

    #[test]
    fn backlinks_record_source_and_line() {
        let index = index_of(vec![
            note_with_links("A.md", "A", &[("B", 3), ("Missing", 5)]),
            note_with_links("B.md", "B", &[]),
        ]);

        let backlinks = index.get_backlinks("B.md");
        assert_eq!(backlinks, &[Backlink { source: "A.md".to_string(), line: 3 }]);

        // Broken outlinks contribute nothing; unknown paths are empty
        assert!(index.get_backlinks("Missing.md").is_empty());
        assert!(index.get_backlinks("A.md").is_empty());
    }

    #[test]
    fn reverse_index_round_trips_against_resolution() {
        let index = index_of(vec![
            note_with_links("hub.md", "Hub", &[("spoke one", 2), ("Spoke Two", 4)]),
            note_with_links("a/spoke one.md", "Spoke One", &[("Hub", 1)]),
            note_with_links("b/spoke two.md", "Spoke Two", &[("Hub", 9), ("spoke one", 10)]),
        ]);

        // Recompute the reverse index from resolve_target and compare
        let mut expected: HashMap<String, Vec<Backlink>> = HashMap::new();
        for note in index.notes.values() {
            for outlink in &note.outlinks {
                if let Some(target) = resolve_target(&index, &note.path, &outlink.target) {
                    expected
                        .entry(target)
                        .or_default()
                        .push(Backlink { source: note.path.clone(), line: outlink.line });
                }
            }
        }

        assert_eq!(index.backlinks, expected);
        assert_eq!(index.get_backlinks("hub.md").len(), 2);
    }
}
