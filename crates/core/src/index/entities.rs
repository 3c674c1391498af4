//! Entity lookup construction and link-target resolution.
//!
//! Every note is addressable by its title, each alias, and its bare
//! filename. Names are case-normalized; a name claimed by two or more notes
//! becomes ambiguous and is settled by a deterministic tie-break, so that
//! resolution is a pure function of a snapshot and its inputs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::types::{Entity, Note, VaultIndex};

/// Outcome of resolving a raw link target against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A single note owns the target.
    Unique(String),
    /// The target name was ambiguous; the tie-break picked a winner.
    AmbiguousResolved { winner: String, candidates: Vec<String> },
    /// No candidate exists. This is the definition of a broken link.
    None,
}

impl Resolution {
    /// The resolved path, if any.
    pub fn into_path(self) -> Option<String> {
        match self {
            Resolution::Unique(path) => Some(path),
            Resolution::AmbiguousResolved { winner, .. } => Some(winner),
            Resolution::None => None,
        }
    }
}

/// Build the entity lookup for a set of notes.
///
/// Registers title, every alias, and the bare filename of each note under
/// their case-normalized form. A key claimed by more than one note is marked
/// ambiguous and tracks all claimants.
pub fn build_entities(notes: &BTreeMap<String, Note>) -> HashMap<String, Entity> {
    let mut claims: HashMap<String, BTreeSet<String>> = HashMap::new();

    for note in notes.values() {
        for name in note.addressable_names() {
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            claims.entry(key).or_default().insert(note.path.clone());
        }
    }

    claims
        .into_iter()
        .map(|(key, owners)| {
            let entity = if owners.len() == 1 {
                Entity::Unique(owners.into_iter().next().unwrap_or_default())
            } else {
                Entity::Ambiguous(owners.into_iter().collect())
            };
            (key, entity)
        })
        .collect()
}

/// Resolve a raw link target from a source note. `None` means broken link.
pub fn resolve_target(
    index: &VaultIndex,
    source_path: &str,
    raw_target: &str,
) -> Option<String> {
    resolution(index, source_path, raw_target).into_path()
}

/// Resolve a raw link target, keeping the ambiguity outcome inspectable.
pub fn resolution(index: &VaultIndex, source_path: &str, raw_target: &str) -> Resolution {
    resolve_with(&index.notes, &index.entities, source_path, raw_target)
}

/// Resolution over the bare maps, usable before a snapshot is assembled.
///
/// Resolution order, first match wins:
/// 1. Exact path match relative to vault root.
/// 2. Exact path match relative to the source note's folder.
/// 3. Entity lookup on the case-normalized name.
pub(crate) fn resolve_with(
    notes: &BTreeMap<String, Note>,
    entities: &HashMap<String, Entity>,
    source_path: &str,
    raw_target: &str,
) -> Resolution {
    let cleaned = clean_target(raw_target);
    if cleaned.is_empty() {
        return Resolution::None;
    }

    // 1. Vault-root path match
    let as_file = with_md_extension(&cleaned);
    if notes.contains_key(&as_file) {
        return Resolution::Unique(as_file);
    }

    // 2. Path match relative to the source note's folder
    let source_dir = source_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    if let Some(joined) = join_relative(source_dir, &as_file)
        && notes.contains_key(&joined)
    {
        return Resolution::Unique(joined);
    }

    // 3. Entity lookup
    match entities.get(&cleaned.to_lowercase()) {
        Some(Entity::Unique(path)) => Resolution::Unique(path.clone()),
        Some(Entity::Ambiguous(candidates)) => {
            let winner = break_tie(notes, candidates, &cleaned);
            Resolution::AmbiguousResolved { winner, candidates: candidates.clone() }
        }
        None => Resolution::None,
    }
}

/// Strip a trailing heading/block suffix and the `.md` extension.
fn clean_target(raw: &str) -> String {
    let no_fragment = raw.split('#').next().unwrap_or("").trim();
    no_fragment.strip_suffix(".md").unwrap_or(no_fragment).trim().to_string()
}

fn with_md_extension(target: &str) -> String {
    format!("{target}.md")
}

/// Join a target onto a source folder, normalizing `.` and `..` segments.
/// Returns `None` when `..` would escape the vault root.
fn join_relative(source_dir: &str, target: &str) -> Option<String> {
    let mut parts: Vec<&str> =
        source_dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    Some(parts.join("/"))
}

/// Deterministic tie-break among ambiguous candidates:
/// exact-case name match first, then shortest path, then lexicographic.
fn break_tie(
    notes: &BTreeMap<String, Note>,
    candidates: &[String],
    cleaned: &str,
) -> String {
    let exact_case: Vec<&String> = candidates
        .iter()
        .filter(|path| {
            notes
                .get(*path)
                .is_some_and(|n| n.addressable_names().any(|name| name == cleaned))
        })
        .collect();

    let pool: Vec<&String> =
        if exact_case.is_empty() { candidates.iter().collect() } else { exact_case };

    pool.into_iter()
        .min_by(|a, b| a.chars().count().cmp(&b.chars().count()).then_with(|| a.cmp(b)))
        .cloned()
        .unwrap_or_default()
}
