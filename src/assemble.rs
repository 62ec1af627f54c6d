//! Navigation model assembly.
//!
//! Stage 5 of the pipeline. Composes the scanned entries, their extracted
//! metadata, the sibling order and the sidecar inputs into one
//! [`NavigationModel`]. Everything it consumes is complete by the time it
//! runs: extraction is finished for every file, so ordering and redirect
//! checks never see a partial tree.
//!
//! ## Exclusion policy
//!
//! Invalid nodes never reach the model. A node is excluded when:
//!
//! - its `README.md` has no H1 (already reported by the extractor), along
//!   with every node below it;
//! - its parent directory isn't a node (no `README.md`, already reported by
//!   the scanner).
//!
//! Each excluded descendant gets its own warning naming the cause, so the
//! report explains every page that silently disappeared.
//!
//! Sibling ranks (`order`) are assigned after exclusion: they are always
//! `0..n` in emitted order.

use crate::config::FilesConfig;
use crate::diagnostics::{Component, Report};
use crate::inputs::{HomeConfig, Inputs};
use crate::metadata::Extracted;
use crate::naming;
use crate::ordering::OrderingResolver;
use crate::redirects;
use crate::scan::ScanEntry;
use crate::types::{ContentNode, NavigationModel};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// A scanned node together with what the extractor found in it.
#[derive(Debug, Clone)]
pub struct ExtractedEntry {
    pub entry: ScanEntry,
    pub metadata: Extracted,
}

/// Build the navigation model from fully extracted entries.
pub fn assemble(
    nodes: &[ExtractedEntry],
    inputs: &Inputs,
    files: &FilesConfig,
    report: &mut Report,
) -> NavigationModel {
    let ordering = OrderingResolver::new(&inputs.ordering, &files.ordering, report);
    let categories = assemble_tree(nodes, &ordering, report);

    let model = NavigationModel {
        site: inputs.site.clone(),
        categories,
        ..NavigationModel::default()
    };
    let live: HashSet<String> = model.nodes().iter().map(|n| n.canonical_path()).collect();
    debug!(nodes = live.len(), "navigation tree assembled");

    let redirects = redirects::resolve_redirects(
        &inputs.vanity.redirects,
        |path| live.contains(path),
        &files.vanity,
        report,
    );
    let home = resolve_home(&inputs.home, &model, &files.home, report);

    NavigationModel {
        redirects,
        home,
        ..model
    }
}

/// Build the ordered category tree, dropping invalid and orphaned nodes.
pub fn assemble_tree(
    nodes: &[ExtractedEntry],
    ordering: &OrderingResolver,
    report: &mut Report,
) -> Vec<ContentNode> {
    let index: HashMap<&str, &ExtractedEntry> = nodes
        .iter()
        .map(|n| (n.entry.slug_path.as_str(), n))
        .collect();

    let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for node in nodes {
        let parent = naming::parent_slug_path(&node.entry.slug_path);
        children
            .entry(parent)
            .or_default()
            .push(node.entry.slug.as_str());
    }

    ordering.check_parents(|p| index.contains_key(p), report);

    // Root first, then every node in path order, so diagnostics come out in
    // a stable order. Leaves are visited too: a group pinned under an
    // article still has its slugs checked.
    let mut parents: Vec<&str> = vec![""];
    let mut sorted: Vec<&str> = index.keys().copied().collect();
    sorted.sort_unstable();
    parents.extend(sorted);

    let mut orders: HashMap<String, Vec<String>> = HashMap::new();
    for parent in parents {
        let siblings = children.get(parent).map(Vec::as_slice).unwrap_or(&[]);
        if siblings.is_empty() && !ordering.has_group(parent) {
            continue;
        }
        orders.insert(parent.to_string(), ordering.order(parent, siblings, report));
    }

    let mut assembler = Assembler {
        nodes,
        index: &index,
        orders: &orders,
        visited: HashSet::new(),
    };
    let tree = assembler.build_level("", report);
    assembler.report_orphans(report);
    tree
}

struct Assembler<'a> {
    nodes: &'a [ExtractedEntry],
    index: &'a HashMap<&'a str, &'a ExtractedEntry>,
    orders: &'a HashMap<String, Vec<String>>,
    visited: HashSet<&'a str>,
}

impl<'a> Assembler<'a> {
    fn build_level(&mut self, parent: &str, report: &mut Report) -> Vec<ContentNode> {
        let Some(ordered) = self.orders.get(parent) else {
            return Vec::new();
        };
        let mut level = Vec::with_capacity(ordered.len());
        for slug in ordered {
            let slug_path = naming::join_slug_path(parent, slug);
            let Some(&node) = self.index.get(slug_path.as_str()) else {
                continue;
            };
            self.visited.insert(node.entry.slug_path.as_str());

            let Some(title) = &node.metadata.title else {
                self.exclude_descendants(node, report);
                continue;
            };
            let children = self.build_level(&slug_path, report);
            level.push(ContentNode {
                kind: node.entry.kind,
                slug: node.entry.slug.clone(),
                slug_path,
                path: node.entry.rel_path.clone(),
                title: title.clone(),
                description: node.metadata.description.clone(),
                order: level.len(),
                last_updated_on: node.metadata.last_updated_on,
                frontmatter: node.metadata.frontmatter.clone(),
                children,
            });
        }
        level
    }

    /// Every node below an invalid one is dropped with a warning.
    fn exclude_descendants(&mut self, invalid: &'a ExtractedEntry, report: &mut Report) {
        let prefix = format!("{}/", invalid.entry.slug_path);
        for node in self.nodes {
            if node.entry.slug_path.starts_with(&prefix)
                && self.visited.insert(node.entry.slug_path.as_str())
            {
                report.warning(
                    Component::Structure,
                    node.entry.rel_path.as_str(),
                    format!(
                        "excluded from navigation: ancestor '{}' has no valid title",
                        invalid.entry.rel_path
                    ),
                );
            }
        }
    }

    /// Nodes never reached from the root sit under a directory that isn't a node.
    fn report_orphans(&self, report: &mut Report) {
        for node in self.nodes {
            if self.visited.contains(node.entry.slug_path.as_str()) {
                continue;
            }
            // Outermost ancestor directory that isn't a node.
            let mut missing = naming::parent_slug_path(&node.entry.slug_path);
            let mut cursor = missing;
            while !cursor.is_empty() {
                if !self.index.contains_key(cursor) {
                    missing = cursor;
                }
                cursor = naming::parent_slug_path(cursor);
            }
            report.warning(
                Component::Structure,
                node.entry.rel_path.as_str(),
                format!("excluded from navigation: parent directory '{missing}/' is not a content node"),
            );
        }
    }
}

/// Resolve `home.json5` references against the assembled tree.
pub fn resolve_home(
    home: &HomeConfig,
    model: &NavigationModel,
    source: &str,
    report: &mut Report,
) -> Vec<String> {
    let mut featured = Vec::with_capacity(home.featured.len());
    let mut seen = HashSet::new();
    for raw in &home.featured {
        let slug_path = naming::normalize_slug_path(raw);
        if slug_path.is_empty() {
            report.error(Component::Home, source, "featured entry is empty");
            continue;
        }
        if model.find(&slug_path).is_none() {
            report.error(
                Component::Home,
                source,
                format!("featured '{raw}' does not name a page in navigation"),
            );
            continue;
        }
        if !seen.insert(slug_path.clone()) {
            report.warning(
                Component::Home,
                source,
                format!("featured '{raw}' is listed more than once"),
            );
            continue;
        }
        featured.push(slug_path);
    }
    featured
}
