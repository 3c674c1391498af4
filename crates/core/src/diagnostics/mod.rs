//! Read-only diagnostics over a published snapshot.
//!
//! Everything here is a pure function of a snapshot (plus the lifecycle
//! state for health): staleness evaluation, broken-link enumeration, and
//! aggregate statistics.

pub mod broken_links;
pub mod health;
pub mod stats;

pub use broken_links::{BrokenLink, BrokenLinkReport, find_broken_links};
pub use health::{HealthReport, HealthStatus, STALE_THRESHOLD, evaluate_health};
pub use stats::{OrphanStats, VaultStats, collect_stats, is_periodic_note};
