//! YAML frontmatter parsing for note files.
//!
//! Only the read side exists here: the indexer never writes notes back to
//! the vault.

pub mod parser;
pub mod types;

pub use parser::{FrontmatterParseError, parse};
pub use types::{Frontmatter, ParsedDocument};
