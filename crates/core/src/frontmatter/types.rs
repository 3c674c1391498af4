//! Frontmatter types and data structures.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;

/// Represents parsed YAML frontmatter from a markdown document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Fields as key-value pairs.
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl Frontmatter {
    /// Declared title, if the `title:` field is a string.
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(|v| v.as_str())
    }

    /// Declared aliases. Accepts both a single string and a sequence:
    /// `aliases: foo` and `aliases: [foo, bar]` are both valid, and the
    /// singular `alias:` spelling is honoured too.
    pub fn aliases(&self) -> Vec<String> {
        let value = self.fields.get("aliases").or_else(|| self.fields.get("alias"));
        string_or_sequence(value)
    }

    /// Declared tags, normalized without a leading `#`.
    /// Accepts `tags: foo`, `tags: [foo, bar]`, and `tag:`.
    pub fn tags(&self) -> Vec<String> {
        let value = self.fields.get("tags").or_else(|| self.fields.get("tag"));
        string_or_sequence(value)
            .into_iter()
            .map(|t| t.trim_start_matches('#').to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn string_or_sequence(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() { Vec::new() } else { vec![s.to_string()] }
        }
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Parsed frontmatter (if present).
    pub frontmatter: Option<Frontmatter>,
    /// The markdown body (everything after frontmatter).
    pub body: String,
}
