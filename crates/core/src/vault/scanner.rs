//! Note content extraction: title, aliases, tags, outgoing links.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::walker::{VaultWalker, WalkedFile};
use crate::frontmatter::{self, Frontmatter};
use crate::index::{Note, Outlink};

// Regex patterns for link and tag extraction
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [[target]] or [[target|text]]
    // Also handles [[target#section]] and [[target#section|text]]
    Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").unwrap()
});

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [text](url) - captures .md files and relative paths
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap()
});

static INLINE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches #tag at a word boundary; a heading marker is `#` followed by
    // whitespace so it never matches here.
    Regex::new(r"(?:^|[\s(])#([A-Za-z][A-Za-z0-9_/-]*)").unwrap()
});

/// Result of scanning a whole vault.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Extracted notes, in relative-path order.
    pub notes: Vec<Note>,
    /// Number of files discovered by the walker.
    pub files_found: usize,
    /// Number of files skipped because they could not be read.
    pub files_skipped: usize,
}

/// Scan every eligible file under the walker's root.
///
/// A file that cannot be read is logged and skipped; it never aborts the
/// scan.
pub fn scan_vault(walker: &VaultWalker) -> Result<ScanOutcome, super::VaultWalkerError> {
    let files = walker.walk()?;
    let mut outcome = ScanOutcome { files_found: files.len(), ..Default::default() };

    for file in &files {
        match std::fs::read_to_string(&file.absolute_path) {
            Ok(content) => outcome.notes.push(scan_note(&content, file)),
            Err(e) => {
                tracing::warn!(
                    "failed to read {}: {e}",
                    file.relative_path.display()
                );
                outcome.files_skipped += 1;
            }
        }
    }

    Ok(outcome)
}

/// Extract a [`Note`] from one file's content.
pub fn scan_note(content: &str, file: &WalkedFile) -> Note {
    let modified: DateTime<Utc> = file.modified.into();
    scan_file(content, &file.relative_path, modified)
}

/// Extract a [`Note`] from content and a vault-relative path.
pub fn scan_file(content: &str, relative_path: &Path, modified: DateTime<Utc>) -> Note {
    // A malformed front section degrades to "no declared metadata"; the
    // body and its links are still indexed.
    let parsed = frontmatter::parse(content).unwrap_or_else(|e| {
        tracing::warn!("malformed frontmatter in {}: {e}", relative_path.display());
        crate::frontmatter::ParsedDocument { frontmatter: None, body: content.to_string() }
    });

    let title = extract_title(&parsed.frontmatter, &parsed.body, relative_path);
    let aliases = parsed.frontmatter.as_ref().map(Frontmatter::aliases).unwrap_or_default();
    let tags = extract_tags(&parsed.frontmatter, &parsed.body);
    let outlinks = extract_outlinks(&parsed.body);

    Note {
        path: super::walker::note_path_of(relative_path),
        title,
        aliases,
        tags,
        outlinks,
        modified,
    }
}

fn extract_title(fm: &Option<Frontmatter>, body: &str, file_path: &Path) -> String {
    // Try frontmatter title
    if let Some(fm) = fm
        && let Some(title) = fm.title()
    {
        return title.to_string();
    }

    // Try first heading
    for line in body.lines() {
        let trimmed = line.trim();
        if let Some(heading) = trimmed.strip_prefix('#') {
            let heading = heading.trim_start_matches('#').trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
        }
    }

    // Fall back to filename without extension
    file_path.file_stem().and_then(|s| s.to_str()).unwrap_or("Untitled").to_string()
}

fn extract_tags(fm: &Option<Frontmatter>, body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for tag in fm.as_ref().map(Frontmatter::tags).unwrap_or_default() {
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }

    for line in body.lines() {
        for cap in INLINE_TAG_RE.captures_iter(line) {
            let tag = cap[1].to_string();
            if seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }
    }

    tags
}

fn extract_outlinks(body: &str) -> Vec<Outlink> {
    let mut links = Vec::new();

    for (line_num, source) in body.lines().enumerate() {
        let line = (line_num + 1) as u32;

        // Extract wikilinks
        for cap in WIKILINK_RE.captures_iter(source) {
            let target = cap.get(1).map(|m| m.as_str()).unwrap_or("").trim();
            if target.is_empty() {
                continue;
            }
            let text = cap.get(2).map(|m| m.as_str().to_string());

            links.push(Outlink { target: target.to_string(), text, line });
        }

        // Extract markdown links to local files
        for cap in MARKDOWN_LINK_RE.captures_iter(source) {
            let text = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let url = cap.get(2).map(|m| m.as_str()).unwrap_or("");

            if !is_local_note_target(url) {
                continue;
            }

            links.push(Outlink {
                target: url.to_string(),
                text: Some(text.to_string()),
                line,
            });
        }
    }

    links
}

fn is_local_note_target(url: &str) -> bool {
    if url.starts_with("http://") || url.starts_with("https://") {
        return false;
    }

    // Same-file anchors are not note references
    if url.starts_with('#') {
        return false;
    }

    let lower = url.to_lowercase();
    if lower.ends_with(".png")
        || lower.ends_with(".jpg")
        || lower.ends_with(".jpeg")
        || lower.ends_with(".gif")
        || lower.ends_with(".svg")
        || lower.ends_with(".pdf")
    {
        return false;
    }

    // Either an explicit .md target or an extensionless note name
    lower.ends_with(".md") || !url.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(content: &str, path: &str) -> Note {
        scan_file(content, Path::new(path), Utc::now())
    }

    #[test]
    fn extracts_wikilinks() {
        let content = r#"---
title: Test Note
---
# Heading

This links to [[other-note]] and [[another|with text]].
Also [[path/to/note]] works.
"#;
        let note = scan(content, "test.md");

        assert_eq!(note.outlinks.len(), 3);
        assert_eq!(note.outlinks[0].target, "other-note");
        assert_eq!(note.outlinks[0].text, None);

        assert_eq!(note.outlinks[1].target, "another");
        assert_eq!(note.outlinks[1].text, Some("with text".to_string()));

        assert_eq!(note.outlinks[2].target, "path/to/note");
    }

    #[test]
    fn extracts_markdown_links() {
        let content = r#"# Note

See [this note](./other.md) for details.
Also [external](https://example.com) should be skipped.
And [image](./pic.png) should be skipped too.
"#;
        let note = scan(content, "test.md");

        assert_eq!(note.outlinks.len(), 1);
        assert_eq!(note.outlinks[0].target, "./other.md");
        assert_eq!(note.outlinks[0].text, Some("this note".to_string()));
    }

    #[test]
    fn title_from_frontmatter() {
        let note = scan("---\ntitle: My Title\n---\n# Heading\n", "file.md");
        assert_eq!(note.title, "My Title");
    }

    #[test]
    fn title_from_heading() {
        let note = scan("# First Heading\n\nContent here.", "file.md");
        assert_eq!(note.title, "First Heading");
    }

    #[test]
    fn title_from_filename() {
        let note = scan("No frontmatter, no heading.", "my-note.md");
        assert_eq!(note.title, "my-note");
    }

    #[test]
    fn aliases_from_frontmatter() {
        let note = scan("---\naliases:\n  - Alt\n  - Other Name\n---\nbody", "a.md");
        assert_eq!(note.aliases, vec!["Alt", "Other Name"]);
    }

    #[test]
    fn tags_from_frontmatter_and_body() {
        let content = r#"---
tags:
  - project
---
Working on #rust today, also more #project notes.

# Heading is not a tag
"#;
        let note = scan(content, "t.md");
        assert_eq!(note.tags, vec!["project", "rust"]);
    }

    #[test]
    fn malformed_frontmatter_still_indexes_links() {
        let content = "---\ntitle: [broken\n---\nSee [[target]].\n";
        let note = scan(content, "broken.md");
        assert_eq!(note.title, "broken");
        assert!(note.aliases.is_empty());
        assert_eq!(note.outlinks.len(), 1);
        assert_eq!(note.outlinks[0].target, "target");
    }

    #[test]
    fn line_numbers_are_one_based() {
        let content = "Line 1\nLine 2 with [[link1]]\nLine 3\nLine 4 with [[link2]]\n";
        let note = scan(content, "test.md");

        assert_eq!(note.outlinks.len(), 2);
        assert_eq!(note.outlinks[0].line, 2);
        assert_eq!(note.outlinks[1].line, 4);
    }

    #[test]
    fn wikilink_with_section_keeps_raw_target() {
        let note = scan("Link to [[note#section]] here.", "test.md");
        assert_eq!(note.outlinks.len(), 1);
        assert_eq!(note.outlinks[0].target, "note#section");
    }
}
