//! Vanity redirect validation.
//!
//! Stage 4 of the pipeline. `vanity.json5` maps retired URL paths to the
//! canonical path of a current node. It runs after assembly, so targets are
//! checked against the nodes that actually made it into navigation.
//!
//! The resulting table resolves in one lookup: no value is ever a key. An
//! entry is dropped, with an error, when:
//!
//! - its source appears more than once (ambiguous: *every* entry for that
//!   source is dropped, there is no "first wins");
//! - its target is itself a redirect source (chain or self-loop);
//! - its target isn't a live node.
//!
//! A source that is also a live node's path is kept with a warning, since the
//! redirect hides a real page.

use crate::diagnostics::{Component, Report};
use crate::inputs::RedirectEntry;
use crate::naming;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Validate redirect entries against the set of live canonical paths.
///
/// `is_live` answers whether a canonical path (`/a/b`) is an emitted node.
pub fn resolve_redirects(
    entries: &[RedirectEntry],
    is_live: impl Fn(&str) -> bool,
    source: &str,
    report: &mut Report,
) -> BTreeMap<String, String> {
    let mut normalized = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.from.trim().is_empty() || entry.to.trim().is_empty() {
            report.error(
                Component::Redirect,
                source,
                format!(
                    "redirect {{ from: \"{}\", to: \"{}\" }} has an empty path",
                    entry.from, entry.to
                ),
            );
            continue;
        }
        normalized.push((
            naming::normalize_url_path(&entry.from),
            naming::normalize_url_path(&entry.to),
        ));
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (from, _) in &normalized {
        *counts.entry(from.as_str()).or_default() += 1;
    }
    let sources: HashSet<&str> = counts.keys().copied().collect();

    let mut table = BTreeMap::new();
    let mut reported_duplicates: HashSet<&str> = HashSet::new();

    for (from, to) in &normalized {
        let count = counts[from.as_str()];
        if count > 1 {
            if reported_duplicates.insert(from.as_str()) {
                report.error(
                    Component::Redirect,
                    source,
                    format!("source '{from}' is listed {count} times; none of its redirects are used"),
                );
            }
            continue;
        }
        if from == to {
            report.error(
                Component::Redirect,
                source,
                format!("'{from}' redirects to itself"),
            );
            continue;
        }
        if sources.contains(to.as_str()) {
            let message = if counts[to.as_str()] > 1 {
                format!("'{from}' → '{to}' points at an ambiguous redirect source listed more than once")
            } else {
                format!("'{from}' → '{to}' points at another redirect; chains are not followed")
            };
            report.error(Component::Redirect, source, message);
            continue;
        }
        if !is_live(to) {
            report.error(
                Component::Redirect,
                source,
                format!("'{from}' → '{to}': target is not a page"),
            );
            continue;
        }
        if is_live(from) {
            report.warning(
                Component::Redirect,
                source,
                format!("'{from}' is an existing page; the redirect hides it"),
            );
        }
        table.insert(from.clone(), to.clone());
    }

    table
}
