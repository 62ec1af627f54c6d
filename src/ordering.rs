//! Sibling ordering.
//!
//! Stage 3 of the pipeline. `ordering.json5` pins some children of a parent
//! to the front of its group; everything it doesn't mention follows in
//! lexicographic slug order. Builds are reproducible without listing every
//! node, and adding an article never requires touching the config.
//!
//! ```text
//! siblings  [cuda, attention, tokenizers, evals]
//! pinned    ["tokenizers", "attention"]
//! result    [tokenizers, attention, cuda, evals]
//! ```
//!
//! Resolution is total: bad entries are reported and skipped, the rest of
//! the group is still ordered.
//!
//! - A pinned slug that isn't a sibling is a dangling reference (error).
//! - A slug pinned twice in one group is an error; the first occurrence wins.
//! - A group key naming a parent that doesn't exist is an error.
//! - Two keys that normalize to the same parent (`"ml"` and `"/ml/"`): the
//!   first in key order wins, the other is an error.
//!
//! Resolution runs over every scanned node, valid or not, so pinning an
//! article whose H1 is missing isn't reported as dangling on top of the
//! metadata error. The assembler drops invalid nodes afterwards.

use crate::diagnostics::{Component, Report};
use crate::inputs::OrderingConfig;
use crate::naming;
use std::collections::{BTreeMap, HashSet};

/// Normalized ordering configuration for one build.
#[derive(Debug, Clone, Default)]
pub struct OrderingResolver {
    /// Parent slug path (root = `""`) → pinned child slugs.
    groups: BTreeMap<String, Vec<String>>,
    /// Config file name, used as the diagnostic path.
    source: String,
}

impl OrderingResolver {
    /// Normalize group keys and report keys that collide after normalization.
    pub fn new(config: &OrderingConfig, source: &str, report: &mut Report) -> Self {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (raw_key, slugs) in &config.groups {
            let key = naming::normalize_slug_path(raw_key);
            if groups.contains_key(&key) {
                report.error(
                    Component::Ordering,
                    source,
                    format!(
                        "group {} is listed more than once (as \"{raw_key}\"); using the first",
                        display_group(&key)
                    ),
                );
                continue;
            }
            let slugs = slugs.iter().map(|s| s.trim().to_string()).collect();
            groups.insert(key, slugs);
        }
        Self {
            groups,
            source: source.to_string(),
        }
    }

    /// Report group keys whose parent isn't a scanned node. The root always exists.
    pub fn check_parents(&self, is_node: impl Fn(&str) -> bool, report: &mut Report) {
        for key in self.groups.keys() {
            if !key.is_empty() && !is_node(key) {
                report.error(
                    Component::Ordering,
                    self.source.as_str(),
                    format!("group {} names a parent that does not exist", display_group(key)),
                );
            }
        }
    }

    /// Whether `parent` has an explicit group in the config.
    pub fn has_group(&self, parent: &str) -> bool {
        self.groups.contains_key(parent)
    }

    /// Order the children of `parent`: pinned slugs first in config order,
    /// then the rest by slug.
    pub fn order(&self, parent: &str, siblings: &[&str], report: &mut Report) -> Vec<String> {
        let pinned = self.groups.get(parent).map(Vec::as_slice).unwrap_or(&[]);
        resolve_group(parent, siblings, pinned, &self.source, report)
    }
}

/// Merge one sibling group against its pinned list.
///
/// Pure apart from the diagnostics it records; feeding the output back in
/// with the same pinned list returns it unchanged.
pub fn resolve_group(
    parent: &str,
    siblings: &[&str],
    pinned: &[String],
    source: &str,
    report: &mut Report,
) -> Vec<String> {
    let available: HashSet<&str> = siblings.iter().copied().collect();
    let mut placed: HashSet<&str> = HashSet::with_capacity(siblings.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(pinned.len());
    let mut ordered = Vec::with_capacity(siblings.len());

    for slug in pinned {
        let slug = slug.as_str();
        if !seen.insert(slug) {
            report.error(
                Component::Ordering,
                source,
                format!(
                    "group {}: slug '{slug}' is listed more than once; keeping the first position",
                    display_group(parent)
                ),
            );
            continue;
        }
        match available.get(slug) {
            Some(&sibling) => {
                placed.insert(sibling);
                ordered.push(sibling.to_string());
            }
            None => {
                report.error(
                    Component::Ordering,
                    source,
                    format!(
                        "group {}: slug '{slug}' does not exist under {}",
                        display_group(parent),
                        display_parent(parent)
                    ),
                );
            }
        }
    }

    let mut rest: Vec<&str> = siblings
        .iter()
        .copied()
        .filter(|s| !placed.contains(s))
        .collect();
    rest.sort_unstable();
    rest.dedup();
    ordered.extend(rest.into_iter().map(String::from));
    ordered
}

fn display_group(key: &str) -> String {
    format!("\"{key}\"")
}

fn display_parent(parent: &str) -> String {
    if parent.is_empty() {
        "the articles root".to_string()
    } else {
        format!("'{parent}'")
    }
}
