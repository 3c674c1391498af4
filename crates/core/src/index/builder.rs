//! Snapshot building orchestration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use super::types::{Note, VaultIndex};
use crate::vault::{VaultWalker, VaultWalkerError, scan_vault};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("vault walker error: {0}")]
    Walker(#[from] VaultWalkerError),
}

/// Statistics from one snapshot build.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Number of files discovered.
    pub files_found: usize,
    /// Number of files skipped due to read errors.
    pub files_skipped: usize,
    /// Number of notes in the snapshot.
    pub notes_indexed: usize,
    /// Number of outgoing link references indexed.
    pub links_indexed: usize,
    /// Number of addressable entities.
    pub entities: usize,
    /// Number of unique tags.
    pub tags: usize,
    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Build one immutable snapshot of the vault.
///
/// Orchestrates walk -> scan -> entity lookup -> reverse index, stamps
/// `built_at`, and assigns the caller-provided generation number. Fails only
/// if the vault root itself is inaccessible; individual file errors are
/// absorbed by the scanner.
pub fn build_snapshot(
    vault_root: &Path,
    excluded_folders: &[PathBuf],
    generation: u64,
) -> Result<VaultIndex, BuildError> {
    build_with_stats(vault_root, excluded_folders, generation).map(|(index, _)| index)
}

/// Build a snapshot and report build statistics alongside it.
pub fn build_with_stats(
    vault_root: &Path,
    excluded_folders: &[PathBuf],
    generation: u64,
) -> Result<(VaultIndex, IndexStats), BuildError> {
    let start = std::time::Instant::now();

    let walker = VaultWalker::with_exclusions(vault_root, excluded_folders.to_vec())?;
    let outcome = scan_vault(&walker)?;

    let mut notes: BTreeMap<String, Note> = BTreeMap::new();
    for note in outcome.notes {
        notes.insert(note.path.clone(), note);
    }

    let entities = super::entities::build_entities(&notes);
    let backlinks = super::backlinks::build_reverse_index(&notes, &entities);

    let mut tags: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for note in notes.values() {
        for tag in &note.tags {
            tags.entry(tag.clone()).or_default().insert(note.path.clone());
        }
    }

    let index = VaultIndex {
        notes,
        entities,
        tags,
        backlinks,
        built_at: Utc::now(),
        generation,
    };

    let stats = IndexStats {
        files_found: outcome.files_found,
        files_skipped: outcome.files_skipped,
        notes_indexed: index.notes.len(),
        links_indexed: index.total_outlinks(),
        entities: index.entities.len(),
        tags: index.tags.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    tracing::debug!(
        generation,
        notes = stats.notes_indexed,
        links = stats.links_indexed,
        skipped = stats.files_skipped,
        duration_ms = stats.duration_ms,
        "vault index built"
    );

    Ok((index, stats))
}
