//! The vault graph index.
//!
//! This module builds immutable [`VaultIndex`] snapshots:
//! - Entity lookup from every addressable name (title, alias, filename)
//! - Link-target resolution with deterministic ambiguity tie-breaking
//! - Eager reverse (backlink) index
//!
//! A snapshot is never mutated after construction; rebuilds produce a brand
//! new snapshot that supersedes the old one by reference swap. That is what
//! makes concurrent reads safe without locks.

pub mod backlinks;
pub mod builder;
pub mod entities;
pub mod types;

pub use backlinks::build_reverse_index;
pub use builder::{BuildError, IndexStats, build_snapshot, build_with_stats};
pub use entities::{Resolution, build_entities, resolve_target, resolution};
pub use types::{Backlink, Entity, Note, Outlink, VaultIndex};
