//! Markdown metadata extraction.
//!
//! Stage 2 of the pipeline. Every node's title and description come from the
//! structure of its `README.md`, not from frontmatter:
//!
//! ```markdown
//! ---
//! lastUpdatedOn: 2025-03-14
//! ---
//! # Draft: Attention from scratch      ← title (verbatim, prefix kept)
//!
//! A walk through scaled dot-product    ← description: everything up to
//! attention.                             the first H2, trimmed
//!
//! ## Setup                             ← description ends here
//! ```
//!
//! ## Headings
//!
//! Headings are found with `pulldown-cmark`, so a `# comment` inside a fenced
//! code block never counts. Only ATX headings (`#`, `##`) are considered; an
//! underlined setext heading is body text as far as this module cares.
//!
//! A file without an H1 is a `metadata` error and the node is invalid. It
//! still travels through the pipeline so ordering and redirect checks see it,
//! but the assembler keeps it out of navigation.
//!
//! ## Frontmatter
//!
//! No key is required. A leading `---` block is parsed as YAML (which also
//! accepts a JSON object) and every key is passed through. The only key read
//! here is `lastUpdatedOn`.

use crate::diagnostics::{Component, Diagnostic};
use chrono::{DateTime, NaiveDate};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Frontmatter key holding the last-updated date.
pub const LAST_UPDATED_KEY: &str = "lastUpdatedOn";

/// Metadata read from one markdown file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    /// Text of the first H1. `None` makes the node invalid.
    pub title: Option<String>,
    pub description: String,
    pub frontmatter: BTreeMap<String, serde_json::Value>,
    pub last_updated_on: Option<NaiveDate>,
}

impl Extracted {
    pub fn is_valid(&self) -> bool {
        self.title.is_some()
    }
}

/// Read and extract a `README.md`. A read failure is a metadata error and
/// yields an invalid (title-less) result.
pub fn extract_file(path: &Path, node_path: &str) -> (Extracted, Vec<Diagnostic>) {
    match fs::read_to_string(path) {
        Ok(raw) => extract(&raw, node_path),
        Err(e) => (
            Extracted::default(),
            vec![Diagnostic::error(
                Component::Metadata,
                node_path,
                format!("cannot read file: {e}"),
            )],
        ),
    }
}

/// Extract title, description and frontmatter from raw markdown.
pub fn extract(raw: &str, node_path: &str) -> (Extracted, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let (frontmatter, body) = match split_frontmatter(raw) {
        FrontmatterSplit::None => (BTreeMap::new(), raw),
        FrontmatterSplit::Unterminated => {
            diagnostics.push(Diagnostic::error(
                Component::Metadata,
                node_path,
                "frontmatter block opened with '---' is never closed",
            ));
            (BTreeMap::new(), raw)
        }
        FrontmatterSplit::Block { yaml, body } => match parse_frontmatter(yaml) {
            Ok(map) => (map, body),
            // Not frontmatter after all (often a leading `---` rule): the
            // whole file is body.
            Err(message) => {
                diagnostics.push(Diagnostic::error(
                    Component::Metadata,
                    node_path,
                    format!("malformed frontmatter: {message}"),
                ));
                (BTreeMap::new(), raw)
            }
        },
    };

    let last_updated_on = match frontmatter.get(LAST_UPDATED_KEY) {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => {
            let parsed = value.as_str().and_then(parse_date);
            if parsed.is_none() {
                diagnostics.push(Diagnostic::warning(
                    Component::Metadata,
                    node_path,
                    format!("{LAST_UPDATED_KEY} is not a date (expected YYYY-MM-DD): {value}"),
                ));
            }
            parsed
        }
    };

    let (title, description) = match title_and_description(body) {
        Some((title, description)) => (Some(title), description),
        None => {
            diagnostics.push(Diagnostic::error(
                Component::Metadata,
                node_path,
                "no H1 heading; the first '# ' line is the page title",
            ));
            (None, String::new())
        }
    };

    let extracted = Extracted {
        title,
        description,
        frontmatter,
        last_updated_on,
    };
    (extracted, diagnostics)
}

// =============================================================================
// Headings
// =============================================================================

/// Find the first H1 and the description span that follows it.
///
/// Returns `None` when there is no H1 or its text is empty.
pub fn title_and_description(body: &str) -> Option<(String, String)> {
    let headings = atx_headings(body);
    let (h1_index, h1_range) = headings
        .iter()
        .enumerate()
        .find(|(_, (level, _))| *level == HeadingLevel::H1)
        .map(|(i, (_, range))| (i, range.clone()))?;

    let title = heading_text(&body[h1_range.clone()]);
    if title.is_empty() {
        return None;
    }

    let description_end = headings[h1_index + 1..]
        .iter()
        .find(|(level, _)| *level == HeadingLevel::H2)
        .map(|(_, range)| range.start)
        .unwrap_or(body.len());
    let description = body[h1_range.end..description_end].trim().to_string();

    Some((title, description))
}

/// Top-level ATX headings with their source ranges, in document order.
///
/// Headings inside block quotes and list items don't count, and neither do
/// setext headings, even when their text happens to start with `#`.
fn atx_headings(body: &str) -> Vec<(HeadingLevel, Range<usize>)> {
    let mut nesting = 0usize;
    let mut headings = Vec::new();
    for (event, range) in Parser::new_ext(body, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::BlockQuote(_) | Tag::List(_) | Tag::Item) => nesting += 1,
            Event::End(TagEnd::BlockQuote(_) | TagEnd::List(_) | TagEnd::Item) => {
                nesting = nesting.saturating_sub(1);
            }
            Event::Start(Tag::Heading { level, .. })
                if nesting == 0 && is_atx_line(line_at(body, range.start)) =>
            {
                headings.push((level, range));
            }
            _ => {}
        }
    }
    headings
}

/// The full source line containing `offset`, without its line break.
fn line_at(body: &str, offset: usize) -> &str {
    let start = body[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = body[offset..].find('\n').map_or(body.len(), |i| offset + i);
    &body[start..end]
}

/// Whether a line opens an ATX heading: up to three spaces, one to six `#`,
/// then whitespace or end of line.
fn is_atx_line(line: &str) -> bool {
    let unindented = line.trim_start_matches(' ');
    if line.len() - unindented.len() > 3 {
        return false;
    }
    let marks = unindented.len() - unindented.trim_start_matches('#').len();
    if !(1..=6).contains(&marks) {
        return false;
    }
    matches!(
        unindented[marks..].chars().next(),
        None | Some(' ' | '\t' | '\r')
    )
}

/// Source text of an ATX heading without its `#` markers: `"# Foo ##"` → `"Foo"`.
///
/// Inline markup is kept verbatim.
fn heading_text(source: &str) -> String {
    let line = source.lines().next().unwrap_or("").trim();
    let content = line.trim_start_matches('#').trim();
    let without_closing = content.trim_end_matches('#');
    if without_closing.is_empty() {
        String::new()
    } else if without_closing.ends_with([' ', '\t']) {
        without_closing.trim_end().to_string()
    } else {
        content.to_string()
    }
}

// =============================================================================
// Frontmatter
// =============================================================================

enum FrontmatterSplit<'a> {
    None,
    Unterminated,
    Block { yaml: &'a str, body: &'a str },
}

/// Split a leading `---` … `---` (or `...`) block off the document.
fn split_frontmatter(raw: &str) -> FrontmatterSplit<'_> {
    let mut lines = raw.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return FrontmatterSplit::None,
    }
    let yaml_start = raw.find('\n').map(|i| i + 1).unwrap_or(raw.len());
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return FrontmatterSplit::Block {
                yaml: &raw[yaml_start..offset],
                body: &raw[offset + line.len()..],
            };
        }
        offset += line.len();
    }
    FrontmatterSplit::Unterminated
}

fn parse_frontmatter(yaml: &str) -> Result<BTreeMap<String, serde_json::Value>, String> {
    if yaml.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let value: serde_json::Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    match value {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        serde_json::Value::Null => Ok(BTreeMap::new()),
        other => Err(format!("expected a mapping of keys, found {other}")),
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
}

// =============================================================================
// Plain text
// =============================================================================

/// Render markdown to a single line of plain text (for CLI previews).
pub fn plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item) => out.push(' '),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ok(raw: &str) -> Extracted {
        let (extracted, diagnostics) = extract(raw, "a/README.md");
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        extracted
    }

    // =========================================================================
    // Title and description
    // =========================================================================

    #[test]
    fn draft_prefix_kept_in_title() {
        let e = ok("# Draft: My Title\nSome description.\n\n## Next");
        assert_eq!(e.title.as_deref(), Some("Draft: My Title"));
        assert_eq!(e.description, "Some description.");
    }

    #[test]
    fn description_runs_to_end_without_h2() {
        let e = ok("# Title\n\nFirst paragraph.\n\nSecond paragraph.\n");
        assert_eq!(e.description, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn empty_description_when_h2_follows_directly() {
        let e = ok("# Title\n## Section\nBody");
        assert_eq!(e.description, "");
    }

    #[test]
    fn h3_does_not_end_description() {
        let e = ok("# Title\nIntro.\n### Aside\nMore.\n## End\n");
        assert_eq!(e.description, "Intro.\n### Aside\nMore.");
    }

    #[test]
    fn text_before_h1_is_ignored() {
        let e = ok("Preamble line.\n\n# Real Title\nDesc.\n");
        assert_eq!(e.title.as_deref(), Some("Real Title"));
        assert_eq!(e.description, "Desc.");
    }

    #[test]
    fn headings_in_code_fences_do_not_count() {
        let raw = "```bash\n# not a title\n```\n\n# Title\nUse it:\n\n```\n## not a section\n```\n\n## Real\n";
        let e = ok(raw);
        assert_eq!(e.title.as_deref(), Some("Title"));
        assert_eq!(e.description, "Use it:\n\n```\n## not a section\n```");
    }

    #[test]
    fn inline_markup_kept_verbatim() {
        let e = ok("# Using `tokio::select!` *well*\n");
        assert_eq!(e.title.as_deref(), Some("Using `tokio::select!` *well*"));
    }

    #[test]
    fn closing_hashes_stripped() {
        assert_eq!(heading_text("# Title ##"), "Title");
        assert_eq!(heading_text("# C#"), "C#");
        assert_eq!(heading_text("#   Spaced   "), "Spaced");
    }

    #[test]
    fn h2_before_h1_is_not_a_title() {
        let (e, diagnostics) = extract("## Only a section\nText\n", "a/README.md");
        assert!(!e.is_valid());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn missing_h1_is_metadata_error() {
        let (e, diagnostics) = extract("Just text, no heading.\n", "ml/README.md");
        assert!(e.title.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        assert_eq!(diagnostics[0].component, Component::Metadata);
        assert_eq!(diagnostics[0].node_path, "ml/README.md");
    }

    #[test]
    fn empty_h1_counts_as_missing() {
        let (e, diagnostics) = extract("#\nText\n", "a/README.md");
        assert!(e.title.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn setext_heading_is_not_a_title() {
        let (e, _) = extract("Title\n=====\n", "a/README.md");
        assert!(e.title.is_none());
    }

    #[test]
    fn setext_heading_starting_with_hash_is_not_a_title() {
        let (e, diagnostics) = extract("#tag\n====\n", "a/README.md");
        assert!(e.title.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn heading_in_block_quote_is_not_a_title() {
        let (e, diagnostics) = extract("> # Quoted heading\n\nBody\n", "a/README.md");
        assert!(e.title.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("no H1"));
    }

    #[test]
    fn heading_in_list_item_is_skipped() {
        let e = ok("- # In a list\n\n# Real\n\nBody.\n");
        assert_eq!(e.title.as_deref(), Some("Real"));
        assert_eq!(e.description, "Body.");
    }

    #[test]
    fn nested_h2_does_not_end_description() {
        let e = ok("# Title\nIntro.\n\n> ## Quoted\n\nMore.\n\n## End\n");
        assert_eq!(e.description, "Intro.\n\n> ## Quoted\n\nMore.");
    }

    #[test]
    fn atx_line_shapes() {
        assert!(is_atx_line("# Title"));
        assert!(is_atx_line("   ### Indented"));
        assert!(is_atx_line("#"));
        assert!(is_atx_line("##\tTabbed"));
        assert!(!is_atx_line("    # Code block indent"));
        assert!(!is_atx_line("#tag"));
        assert!(!is_atx_line("####### Seven"));
        assert!(!is_atx_line("Title"));
    }

    // =========================================================================
    // Frontmatter
    // =========================================================================

    #[test]
    fn frontmatter_keys_passed_through() {
        let e = ok("---\nlastUpdatedOn: 2025-03-14\ntags: [rust, async]\nseries: deep-dive\n---\n# T\nD\n");
        assert_eq!(e.last_updated_on, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(e.frontmatter["series"], serde_json::json!("deep-dive"));
        assert_eq!(e.frontmatter["tags"], serde_json::json!(["rust", "async"]));
        assert_eq!(e.title.as_deref(), Some("T"));
        assert_eq!(e.description, "D");
    }

    #[test]
    fn json_frontmatter_block() {
        let e = ok("---\n{\"lastUpdatedOn\": \"2024-01-02\", \"draft\": true}\n---\n# T\n");
        assert_eq!(e.last_updated_on, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(e.frontmatter["draft"], serde_json::json!(true));
    }

    #[test]
    fn empty_frontmatter_block() {
        let e = ok("---\n---\n# T\n");
        assert!(e.frontmatter.is_empty());
    }

    #[test]
    fn rfc3339_timestamp_keeps_date() {
        assert_eq!(parse_date("2025-03-14T09:30:00Z"), NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(parse_date("14/03/2025"), None);
    }

    #[test]
    fn malformed_frontmatter_is_error_but_title_survives() {
        let (e, diagnostics) = extract("---\nkey: [unclosed\n---\n# Title\n", "a/README.md");
        assert_eq!(e.title.as_deref(), Some("Title"));
        assert!(e.frontmatter.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("malformed frontmatter"));
    }

    #[test]
    fn leading_rule_is_not_frontmatter() {
        let (e, diagnostics) = extract(
            "---\n\n# Title\n\nIntro\n\n---\n\n## Next\n",
            "a/README.md",
        );
        assert_eq!(e.title.as_deref(), Some("Title"));
        assert!(e.description.starts_with("Intro"));
        assert!(e.frontmatter.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("malformed frontmatter"));
    }

    #[test]
    fn scalar_frontmatter_is_error() {
        let (_, diagnostics) = extract("---\njust a string\n---\n# T\n", "a/README.md");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn unterminated_frontmatter_reported() {
        let (e, diagnostics) = extract("---\nkey: value\n# Title\n", "a/README.md");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("never closed"));
        assert_eq!(e.title.as_deref(), Some("Title"));
    }

    #[test]
    fn bad_date_is_warning() {
        let (e, diagnostics) = extract("---\nlastUpdatedOn: soon\n---\n# T\n", "a/README.md");
        assert!(e.is_valid());
        assert_eq!(e.last_updated_on, None);
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn no_frontmatter_required() {
        let e = ok("# T\n");
        assert!(e.frontmatter.is_empty());
        assert_eq!(e.last_updated_on, None);
    }

    #[test]
    fn byte_order_mark_ignored() {
        let e = ok("\u{feff}# Title\n");
        assert_eq!(e.title.as_deref(), Some("Title"));
    }

    // =========================================================================
    // Files and plain text
    // =========================================================================

    #[test]
    fn extract_file_reads_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        fs::write(&path, "# On Disk\nHello.\n").unwrap();
        let (e, diagnostics) = extract_file(&path, "README.md");
        assert!(diagnostics.is_empty());
        assert_eq!(e.title.as_deref(), Some("On Disk"));
    }

    #[test]
    fn extract_file_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let (e, diagnostics) = extract_file(&tmp.path().join("README.md"), "README.md");
        assert!(!e.is_valid());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].component, Component::Metadata);
    }

    #[test]
    fn plain_text_strips_markup() {
        assert_eq!(
            plain_text("A **bold** [link](https://x.y) and `code`.\n\nNext para."),
            "A bold link and code. Next para."
        );
    }
}
