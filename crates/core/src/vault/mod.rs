//! Vault file discovery and note extraction.
//!
//! This module walks the vault directory tree and turns each eligible
//! markdown file into a [`Note`](crate::index::Note) value. It performs no
//! link resolution; that belongs to the index layer.

pub mod scanner;
pub mod walker;

pub use scanner::{ScanOutcome, scan_file, scan_vault};
pub use walker::{VaultWalker, VaultWalkerError, WalkedFile};
