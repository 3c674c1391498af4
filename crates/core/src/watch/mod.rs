//! Change-notification source for the refresh scheduler.
//!
//! Wraps the platform file watcher, filters events down to eligible note
//! files, and forwards them into the scheduler's debounce channel. Watcher
//! errors are logged and non-fatal: the periodic fallback rebuild remains
//! the backstop.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::vault::VaultWalker;

/// What happened to an eligible file under the vault root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultEventKind {
    Add,
    Change,
    Remove,
}

impl VaultEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Change => "change",
            Self::Remove => "remove",
        }
    }
}

/// A change notification for one eligible file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEvent {
    pub kind: VaultEventKind,
    /// Path relative to the vault root.
    pub path: PathBuf,
}

/// Subscribes to filesystem notifications under the vault root.
///
/// Holds the underlying watcher alive; dropping the handle stops the
/// subscription. The watcher never mutates files.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
}

impl VaultWatcher {
    /// Start watching the walker's root, forwarding eligible events into
    /// `events` (typically an [`IndexService::event_sender`] channel).
    ///
    /// [`IndexService::event_sender`]: crate::scheduler::IndexService::event_sender
    pub fn spawn(
        walker: VaultWalker,
        events: Sender<VaultEvent>,
    ) -> Result<Self, notify::Error> {
        let root = walker.root().to_path_buf();
        let handler_root = root.clone();

        let mut watcher = notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    let Some(kind) = map_kind(&event.kind) else {
                        return;
                    };
                    for path in &event.paths {
                        let Ok(relative) = path.strip_prefix(&handler_root) else {
                            continue;
                        };
                        if !walker.is_eligible(relative) {
                            continue;
                        }
                        let _ = events.send(VaultEvent {
                            kind,
                            path: relative.to_path_buf(),
                        });
                    }
                }
                Err(e) => tracing::warn!("vault watcher error: {e}"),
            },
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::info!("vault watcher started on {}", root.display());

        Ok(Self { _watcher: watcher })
    }
}

fn map_kind(kind: &EventKind) -> Option<VaultEventKind> {
    match kind {
        EventKind::Create(_) => Some(VaultEventKind::Add),
        EventKind::Modify(_) => Some(VaultEventKind::Change),
        EventKind::Remove(_) => Some(VaultEventKind::Remove),
        _ => None,
    }
}
