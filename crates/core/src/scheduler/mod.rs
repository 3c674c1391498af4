//! Refresh scheduling: the live index lifecycle.
//!
//! One background worker performs rebuilds; any number of readers query the
//! currently published snapshot. The only mutable shared state is the
//! published-snapshot slot, the lifecycle flag, and the single-flight guard,
//! all behind one mutex. Readers never block on a rebuild.
//!
//! All triggers (debounced file events, the periodic fallback timer, manual
//! refresh requests) funnel into [`IndexService::request_rebuild`]: if a
//! build is already in flight the request only sets a pending flag, and the
//! worker runs exactly one follow-up build when the current one finishes.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::index::{BuildError, VaultIndex, build_snapshot};
use crate::watch::VaultEvent;

/// Quiet period after the last file change before a rebuild starts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Fallback rebuild interval for environments without reliable change
/// notifications.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Where the index lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No snapshot published yet.
    Booting,
    /// A rebuild is in flight; the last good snapshot, if any, stays servable.
    Building,
    /// A snapshot is published and current.
    Ready,
    /// The last build attempt failed; the previous good snapshot, if any,
    /// is still served.
    Error,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booting => "booting",
            Self::Building => "building",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

/// Scheduler tuning knobs.
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Debounce quiet period for file-change notifications.
    pub debounce: Duration,
    /// Periodic fallback rebuild interval; zero disables the fallback.
    pub refresh_interval: Duration,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self { debounce: DEFAULT_DEBOUNCE, refresh_interval: DEFAULT_REFRESH_INTERVAL }
    }
}

/// A point-in-time view of the service state.
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub lifecycle: Lifecycle,
    /// Generation of the published snapshot, 0 while booting.
    pub generation: u64,
    /// Number of build attempts that have finished.
    pub builds_completed: u64,
    /// Error from the last failed build, if the last build failed.
    pub last_error: Option<String>,
}

struct State {
    lifecycle: Lifecycle,
    snapshot: Option<Arc<VaultIndex>>,
    last_error: Option<String>,
    building: bool,
    pending: bool,
    builds_completed: u64,
    next_generation: u64,
}

struct Shared {
    state: Mutex<State>,
    build_done: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps the periodic fallback thread alive; dropping the last service
/// handle disconnects it and the thread exits.
struct PeriodicGuard {
    _stop: Sender<()>,
}

/// Handle to the live index service. Cheap to clone; all clones share the
/// same published snapshot and lifecycle state.
#[derive(Clone)]
pub struct IndexService {
    shared: Arc<Shared>,
    build_tx: Sender<()>,
    debounce: Duration,
    _periodic: Option<Arc<PeriodicGuard>>,
}

impl IndexService {
    /// Start the service over a vault root and kick off the initial
    /// background build. Queries may run immediately; they see "not ready"
    /// until the first build publishes.
    pub fn spawn(
        vault_root: PathBuf,
        excluded_folders: Vec<PathBuf>,
        options: RefreshOptions,
    ) -> Self {
        let service = Self::with_builder(
            move |generation| build_snapshot(&vault_root, &excluded_folders, generation),
            options,
        );
        service.request_rebuild();
        service
    }

    /// Construct the service over an arbitrary build function. Used by
    /// `spawn` and by tests; does not trigger a build by itself.
    pub fn with_builder<F>(build_fn: F, options: RefreshOptions) -> Self
    where
        F: Fn(u64) -> Result<VaultIndex, BuildError> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                lifecycle: Lifecycle::Booting,
                snapshot: None,
                last_error: None,
                building: false,
                pending: false,
                builds_completed: 0,
                next_generation: 0,
            }),
            build_done: Condvar::new(),
        });

        let (build_tx, build_rx) = mpsc::channel::<()>();

        {
            let shared = Arc::clone(&shared);
            thread::spawn(move || worker_loop(&shared, &build_rx, &build_fn));
        }

        let periodic = (options.refresh_interval > Duration::ZERO).then(|| {
            let (stop_tx, stop_rx) = mpsc::channel::<()>();
            let shared = Arc::clone(&shared);
            let build_tx = build_tx.clone();
            let interval = options.refresh_interval;
            thread::spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            tracing::debug!("periodic fallback rebuild");
                            request_rebuild_inner(&shared, &build_tx);
                        }
                        _ => break,
                    }
                }
            });
            Arc::new(PeriodicGuard { _stop: stop_tx })
        });

        Self { shared, build_tx, debounce: options.debounce, _periodic: periodic }
    }

    /// The single rebuild entry point. Fire-and-forget: if a build is in
    /// flight, one follow-up build is scheduled; concurrent requests never
    /// stack additional builds.
    pub fn request_rebuild(&self) {
        request_rebuild_inner(&self.shared, &self.build_tx);
    }

    /// The currently published snapshot, or `None` while no build has
    /// succeeded yet.
    pub fn snapshot(&self) -> Option<Arc<VaultIndex>> {
        self.shared.lock().snapshot.clone()
    }

    /// Current lifecycle state, published generation, and stored error.
    pub fn status(&self) -> ServiceStatus {
        let st = self.shared.lock();
        ServiceStatus {
            lifecycle: st.lifecycle,
            generation: st.snapshot.as_ref().map(|s| s.generation).unwrap_or(0),
            builds_completed: st.builds_completed,
            last_error: st.last_error.clone(),
        }
    }

    /// Block until at least `count` build attempts have finished, or the
    /// timeout elapses. Returns true if the count was reached in time.
    pub fn wait_for_builds(&self, count: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut st = self.shared.lock();

        while st.builds_completed < count {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            let (guard, _) = self
                .shared
                .build_done
                .wait_timeout(st, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            st = guard;
        }
        true
    }

    /// Create a channel for file-change notifications. Each event resets the
    /// quiet-period timer; the timer firing is what actually requests the
    /// rebuild, so a burst of changes collapses into one build.
    pub fn event_sender(&self) -> Sender<VaultEvent> {
        let (event_tx, event_rx) = mpsc::channel::<VaultEvent>();
        let shared = Arc::clone(&self.shared);
        let build_tx = self.build_tx.clone();
        let quiet = self.debounce;

        thread::spawn(move || debounce_loop(&shared, &build_tx, &event_rx, quiet));

        event_tx
    }
}

fn request_rebuild_inner(shared: &Shared, build_tx: &Sender<()>) {
    let mut st = shared.lock();
    if st.building {
        st.pending = true;
        return;
    }
    st.building = true;
    st.lifecycle = Lifecycle::Building;
    drop(st);

    // The worker exits only when every handle is gone, so a send failure
    // means the process is already tearing down.
    let _ = build_tx.send(());
}

/// Background worker: one build at a time, plus at most one follow-up when
/// requests arrived mid-build.
fn worker_loop<F>(shared: &Shared, build_rx: &Receiver<()>, build_fn: &F)
where
    F: Fn(u64) -> Result<VaultIndex, BuildError>,
{
    while build_rx.recv().is_ok() {
        loop {
            let generation = {
                let mut st = shared.lock();
                st.next_generation += 1;
                st.next_generation
            };

            let result = build_fn(generation);

            let mut st = shared.lock();
            match result {
                Ok(index) => {
                    st.snapshot = Some(Arc::new(index));
                    st.lifecycle = Lifecycle::Ready;
                    st.last_error = None;
                }
                Err(e) => {
                    tracing::warn!("index rebuild failed: {e}");
                    st.lifecycle = Lifecycle::Error;
                    st.last_error = Some(e.to_string());
                }
            }
            st.builds_completed += 1;
            shared.build_done.notify_all();

            if st.pending {
                // Coalesced follow-up: run exactly one more build.
                st.pending = false;
                st.lifecycle = Lifecycle::Building;
                continue;
            }
            st.building = false;
            break;
        }
    }
}

/// Timer-reset debouncing: idle until an event arrives, then wait for the
/// quiet period to pass without further events before requesting a rebuild.
fn debounce_loop(
    shared: &Shared,
    build_tx: &Sender<()>,
    event_rx: &Receiver<VaultEvent>,
    quiet: Duration,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        match deadline {
            None => match event_rx.recv() {
                Ok(event) => {
                    tracing::debug!(?event, "file change detected");
                    deadline = Some(Instant::now() + quiet);
                }
                Err(_) => break,
            },
            Some(at) => {
                let remaining = at.saturating_duration_since(Instant::now());
                match event_rx.recv_timeout(remaining) {
                    Ok(_) => deadline = Some(Instant::now() + quiet),
                    Err(RecvTimeoutError::Timeout) => {
                        deadline = None;
                        tracing::debug!("quiet period elapsed, rebuilding index");
                        request_rebuild_inner(shared, build_tx);
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::{VaultEvent, VaultEventKind};
    use chrono::Utc;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn empty_index(generation: u64) -> VaultIndex {
        VaultIndex {
            notes: BTreeMap::new(),
            entities: HashMap::new(),
            tags: BTreeMap::new(),
            backlinks: HashMap::new(),
            built_at: Utc::now(),
            generation,
        }
    }

    fn walker_error() -> BuildError {
        BuildError::Walker(crate::vault::VaultWalkerError::MissingRoot(
            "/nonexistent".to_string(),
        ))
    }

    fn no_periodic() -> RefreshOptions {
        RefreshOptions { debounce: Duration::from_millis(20), refresh_interval: Duration::ZERO }
    }

    #[test]
    fn starts_in_booting_with_no_snapshot() {
        let service = IndexService::with_builder(|g| Ok(empty_index(g)), no_periodic());

        assert!(service.snapshot().is_none());
        let status = service.status();
        assert_eq!(status.lifecycle, Lifecycle::Booting);
        assert_eq!(status.generation, 0);
    }

    #[test]
    fn publishes_snapshot_after_build() {
        let service = IndexService::with_builder(|g| Ok(empty_index(g)), no_periodic());
        service.request_rebuild();

        assert!(service.wait_for_builds(1, Duration::from_secs(5)));
        let status = service.status();
        assert_eq!(status.lifecycle, Lifecycle::Ready);
        assert_eq!(status.generation, 1);
        assert!(service.snapshot().is_some());
    }

    #[test]
    fn single_flight_coalesces_concurrent_requests() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let builds = Arc::new(AtomicUsize::new(0));
        let builds_in_fn = Arc::clone(&builds);

        let service = IndexService::with_builder(
            move |g| {
                builds_in_fn.fetch_add(1, Ordering::SeqCst);
                gate_rx.recv().ok();
                Ok(empty_index(g))
            },
            no_periodic(),
        );

        // First build starts and blocks on the gate
        service.request_rebuild();
        while builds.load(Ordering::SeqCst) == 0 {
            thread::sleep(Duration::from_millis(5));
        }

        // A burst of requests while the build is in flight
        for _ in 0..5 {
            service.request_rebuild();
        }

        // Release the in-flight build and the single coalesced follow-up
        gate_tx.send(()).unwrap();
        assert!(service.wait_for_builds(1, Duration::from_secs(5)));
        gate_tx.send(()).unwrap();
        assert!(service.wait_for_builds(2, Duration::from_secs(5)));

        thread::sleep(Duration::from_millis(50));
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert_eq!(service.status().builds_completed, 2);
        assert_eq!(service.status().lifecycle, Lifecycle::Ready);
    }

    #[test]
    fn failed_build_keeps_previous_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_fn = Arc::clone(&calls);

        let service = IndexService::with_builder(
            move |g| {
                if calls_in_fn.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(empty_index(g))
                } else {
                    Err(walker_error())
                }
            },
            no_periodic(),
        );

        service.request_rebuild();
        assert!(service.wait_for_builds(1, Duration::from_secs(5)));
        let first = service.snapshot().unwrap();
        assert_eq!(service.status().lifecycle, Lifecycle::Ready);

        service.request_rebuild();
        assert!(service.wait_for_builds(2, Duration::from_secs(5)));

        let status = service.status();
        assert_eq!(status.lifecycle, Lifecycle::Error);
        assert!(status.last_error.is_some());

        // The stale-but-good snapshot is still served, unchanged
        let still = service.snapshot().unwrap();
        assert_eq!(still.generation, first.generation);
    }

    #[test]
    fn generations_strictly_increase() {
        let service = IndexService::with_builder(|g| Ok(empty_index(g)), no_periodic());

        let mut last = 0;
        for round in 1..=3 {
            service.request_rebuild();
            assert!(service.wait_for_builds(round, Duration::from_secs(5)));
            let generation = service.status().generation;
            assert!(generation > last);
            last = generation;
        }
    }

    #[test]
    fn event_burst_collapses_into_one_rebuild() {
        let service = IndexService::with_builder(|g| Ok(empty_index(g)), no_periodic());
        let events = service.event_sender();

        for i in 0..5 {
            events
                .send(VaultEvent {
                    kind: VaultEventKind::Change,
                    path: format!("note{i}.md").into(),
                })
                .unwrap();
        }

        assert!(service.wait_for_builds(1, Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(100));
        assert_eq!(service.status().builds_completed, 1);
    }

    #[test]
    fn periodic_fallback_triggers_rebuilds() {
        let service = IndexService::with_builder(
            |g| Ok(empty_index(g)),
            RefreshOptions {
                debounce: Duration::from_millis(20),
                refresh_interval: Duration::from_millis(30),
            },
        );

        assert!(service.wait_for_builds(1, Duration::from_secs(5)));
        assert!(service.status().builds_completed >= 1);
    }
}
