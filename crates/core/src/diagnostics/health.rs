//! Index health and staleness evaluation.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::index::VaultIndex;
use crate::scheduler::Lifecycle;

/// Age above which a snapshot is considered stale.
pub const STALE_THRESHOLD: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Health evaluation result for the current index.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub lifecycle: String,
    pub vault_accessible: bool,
    pub vault_path: String,
    pub index_built: bool,
    /// Seconds since the snapshot was built, -1 when none exists.
    pub index_age_seconds: i64,
    pub index_stale: bool,
    pub note_count: usize,
    pub entity_count: usize,
    pub tag_count: usize,
    pub recommendations: Vec<String>,
}

/// Evaluate health for a (possibly absent) snapshot and lifecycle state.
///
/// `unhealthy` when the vault is inaccessible or no snapshot exists,
/// `degraded` when the snapshot is stale or any warning holds, else
/// `healthy`. A failed rebuild surfaces through the stored error while the
/// previous snapshot keeps serving.
pub fn evaluate_health(
    snapshot: Option<&VaultIndex>,
    lifecycle: Lifecycle,
    last_error: Option<&str>,
    vault_root: &Path,
    stale_after: Duration,
) -> HealthReport {
    let mut recommendations = Vec::new();

    let vault_accessible = std::fs::read_dir(vault_root).is_ok();
    if !vault_accessible {
        recommendations
            .push("Vault root is not accessible. Check the configured vault path.".to_string());
    }

    let index_built = snapshot.is_some();
    let index_age_seconds = snapshot
        .map(|s| (Utc::now() - s.built_at).num_seconds().max(0))
        .unwrap_or(-1);
    let index_stale = index_age_seconds > stale_after.as_secs() as i64;

    if index_stale {
        recommendations.push(format!(
            "Index is {} minutes old. Consider requesting a refresh.",
            index_age_seconds / 60
        ));
    }

    if lifecycle == Lifecycle::Booting {
        recommendations.push("Index is still building; retry shortly.".to_string());
    }

    if let Some(err) = last_error {
        recommendations.push(format!("Last rebuild failed: {err}"));
    }

    let note_count = snapshot.map(|s| s.notes.len()).unwrap_or(0);
    let entity_count = snapshot.map(|s| s.entities.len()).unwrap_or(0);
    let tag_count = snapshot.map(|s| s.tags.len()).unwrap_or(0);

    if note_count == 0 && vault_accessible && index_built {
        recommendations
            .push("No notes found in vault. Is the vault root pointing at your notes?".to_string());
    }

    let status = if !vault_accessible || !index_built {
        HealthStatus::Unhealthy
    } else if index_stale || !recommendations.is_empty() {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    HealthReport {
        status,
        lifecycle: lifecycle.as_str().to_string(),
        vault_accessible,
        vault_path: vault_root.display().to_string(),
        index_built,
        index_age_seconds,
        index_stale,
        note_count,
        entity_count,
        tag_count,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::collections::{BTreeMap, HashMap};
    use tempfile::TempDir;

    fn snapshot_with_age(age_secs: i64) -> VaultIndex {
        let mut notes = BTreeMap::new();
        notes.insert(
            "a.md".to_string(),
            crate::index::Note {
                path: "a.md".to_string(),
                title: "A".to_string(),
                aliases: Vec::new(),
                tags: Vec::new(),
                outlinks: Vec::new(),
                modified: Utc::now(),
            },
        );
        let entities = crate::index::build_entities(&notes);
        VaultIndex {
            notes,
            entities,
            tags: BTreeMap::new(),
            backlinks: HashMap::new(),
            built_at: Utc::now() - ChronoDuration::seconds(age_secs),
            generation: 1,
        }
    }

    #[test]
    fn fresh_snapshot_is_healthy() {
        let vault = TempDir::new().unwrap();
        let index = snapshot_with_age(1);

        let report = evaluate_health(
            Some(&index),
            Lifecycle::Ready,
            None,
            vault.path(),
            STALE_THRESHOLD,
        );

        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(!report.index_stale);
        assert_eq!(report.note_count, 1);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn stale_snapshot_is_degraded() {
        let vault = TempDir::new().unwrap();
        let index = snapshot_with_age(600);

        let report = evaluate_health(
            Some(&index),
            Lifecycle::Ready,
            None,
            vault.path(),
            STALE_THRESHOLD,
        );

        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(report.index_stale);
        assert!(report.recommendations.iter().any(|r| r.contains("minutes old")));
    }

    #[test]
    fn missing_snapshot_is_unhealthy() {
        let vault = TempDir::new().unwrap();

        let report =
            evaluate_health(None, Lifecycle::Booting, None, vault.path(), STALE_THRESHOLD);

        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert!(!report.index_built);
        assert_eq!(report.index_age_seconds, -1);
    }

    #[test]
    fn inaccessible_vault_is_unhealthy() {
        let index = snapshot_with_age(1);

        let report = evaluate_health(
            Some(&index),
            Lifecycle::Ready,
            None,
            Path::new("/nonexistent/vault"),
            STALE_THRESHOLD,
        );

        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert!(!report.vault_accessible);
    }

    #[test]
    fn stored_error_degrades_but_still_serves() {
        let vault = TempDir::new().unwrap();
        let index = snapshot_with_age(1);

        let report = evaluate_health(
            Some(&index),
            Lifecycle::Error,
            Some("vault root does not exist: /gone"),
            vault.path(),
            STALE_THRESHOLD,
        );

        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(report.index_built);
        assert!(report.recommendations.iter().any(|r| r.contains("Last rebuild failed")));
    }
}
