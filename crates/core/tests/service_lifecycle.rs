//! The live index service over a real vault directory.

use notegraph_core::scheduler::{IndexService, Lifecycle, RefreshOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn fast_options() -> RefreshOptions {
    RefreshOptions {
        debounce: Duration::from_millis(50),
        refresh_interval: Duration::ZERO,
    }
}

#[test]
fn spawn_builds_in_background_and_publishes() {
    let vault = TempDir::new().unwrap();
    fs::write(vault.path().join("A.md"), "See [[B]].\n").unwrap();
    fs::write(vault.path().join("B.md"), "# B\n").unwrap();

    let service =
        IndexService::spawn(vault.path().to_path_buf(), Vec::new(), fast_options());

    assert!(service.wait_for_builds(1, Duration::from_secs(10)));

    let status = service.status();
    assert_eq!(status.lifecycle, Lifecycle::Ready);
    assert_eq!(status.generation, 1);

    let snapshot = service.snapshot().expect("snapshot should be published");
    assert_eq!(snapshot.notes.len(), 2);
    assert_eq!(snapshot.get_backlinks("B.md").len(), 1);
}

#[test]
fn manual_refresh_picks_up_new_notes() {
    let vault = TempDir::new().unwrap();
    fs::write(vault.path().join("A.md"), "Only note.\n").unwrap();

    let service =
        IndexService::spawn(vault.path().to_path_buf(), Vec::new(), fast_options());
    assert!(service.wait_for_builds(1, Duration::from_secs(10)));
    assert_eq!(service.snapshot().unwrap().notes.len(), 1);

    fs::write(vault.path().join("B.md"), "Second note linking [[A]].\n").unwrap();

    service.request_rebuild();
    assert!(service.wait_for_builds(2, Duration::from_secs(10)));

    let snapshot = service.snapshot().unwrap();
    assert_eq!(snapshot.notes.len(), 2);
    assert_eq!(snapshot.get_backlinks("A.md").len(), 1);
    assert!(snapshot.generation > 1);
}

#[test]
fn readers_keep_their_snapshot_across_rebuilds() {
    let vault = TempDir::new().unwrap();
    fs::write(vault.path().join("A.md"), "First.\n").unwrap();

    let service =
        IndexService::spawn(vault.path().to_path_buf(), Vec::new(), fast_options());
    assert!(service.wait_for_builds(1, Duration::from_secs(10)));

    // A reader grabs a reference and keeps using it
    let held = service.snapshot().unwrap();
    let held_generation = held.generation;
    assert_eq!(held.notes.len(), 1);

    fs::write(vault.path().join("B.md"), "Second.\n").unwrap();
    service.request_rebuild();
    assert!(service.wait_for_builds(2, Duration::from_secs(10)));

    // The held snapshot is unchanged; the new one supersedes it
    assert_eq!(held.generation, held_generation);
    assert_eq!(held.notes.len(), 1);

    let fresh = service.snapshot().unwrap();
    assert!(fresh.generation > held_generation);
    assert_eq!(fresh.notes.len(), 2);
}
