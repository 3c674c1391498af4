//! Core library for notegraph: a queryable graph index over a markdown vault.
//!
//! Data flows one way: the vault walker discovers files, the scanner extracts
//! notes, the index builder resolves entities and backlinks into an immutable
//! [`VaultIndex`](index::VaultIndex) snapshot, and the
//! [`IndexService`](scheduler::IndexService) keeps a published snapshot fresh
//! while readers query it concurrently.

pub mod config;
pub mod diagnostics;
pub mod frontmatter;
pub mod index;
pub mod scheduler;
pub mod vault;
pub mod watch;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
