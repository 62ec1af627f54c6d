//! The navigation model handed to the rendering layer.
//!
//! These types are the pipeline's only output. They're serialized to
//! `navigation.json` by the `build` command and are never mutated after
//! assembly; every build produces a fresh tree.

use crate::inputs::SiteMeta;
use crate::naming;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix on an H1 that marks an unfinished article.
pub const DRAFT_PREFIX: &str = "Draft:";

/// Position in the `<category>/<topic>/<article>` hierarchy, fixed by
/// directory depth under the articles directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Category,
    Topic,
    Article,
}

impl NodeKind {
    /// Kind for a directory depth (1, 2 or 3). Anything else isn't a node.
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(NodeKind::Category),
            2 => Some(NodeKind::Topic),
            3 => Some(NodeKind::Article),
            _ => None,
        }
    }
}

/// One category, topic, or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    pub kind: NodeKind,
    /// Directory name; unique among siblings.
    pub slug: String,
    /// `/`-joined slugs from the articles directory, e.g. `ml/llms/attention`.
    pub slug_path: String,
    /// The node's `README.md`, relative to the articles directory.
    pub path: String,
    /// Text of the first H1, verbatim.
    pub title: String,
    /// Markdown between the H1 and the first H2, trimmed. May be empty.
    pub description: String,
    /// Rank among siblings: 0, 1, 2, … in emitted order.
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_on: Option<NaiveDate>,
    /// Frontmatter keys, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub frontmatter: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// URL path of this node, e.g. `/ml/llms/attention`.
    pub fn canonical_path(&self) -> String {
        naming::canonical_path(&self.slug_path)
    }

    /// Drafts are marked by a `Draft:` prefix on the H1 and nowhere else.
    pub fn is_draft(&self) -> bool {
        self.title.starts_with(DRAFT_PREFIX)
    }
}

/// The root aggregate: category tree, redirect table, homepage picks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationModel {
    pub site: SiteMeta,
    pub categories: Vec<ContentNode>,
    /// Old URL path → canonical path. Values are never keys (no chains).
    pub redirects: BTreeMap<String, String>,
    /// Slug paths of featured nodes, in `home.json5` order.
    pub home: Vec<String>,
}

impl NavigationModel {
    /// Look up a node by slug path.
    pub fn find(&self, slug_path: &str) -> Option<&ContentNode> {
        let mut level = &self.categories;
        let mut found = None;
        for slug in slug_path.split('/').filter(|s| !s.is_empty()) {
            let node = level.iter().find(|n| n.slug == slug)?;
            level = &node.children;
            found = Some(node);
        }
        found
    }

    /// Every node, depth-first in navigation order.
    pub fn nodes(&self) -> Vec<&ContentNode> {
        fn walk<'a>(nodes: &'a [ContentNode], out: &mut Vec<&'a ContentNode>) {
            for node in nodes {
                out.push(node);
                walk(&node.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.categories, &mut out);
        out
    }

    /// Resolve a request path through the redirect table in one lookup.
    pub fn resolve_redirect(&self, path: &str) -> Option<&str> {
        self.redirects
            .get(&naming::normalize_url_path(path))
            .map(String::as_str)
    }

    /// Featured nodes, in homepage order.
    pub fn featured(&self) -> Vec<&ContentNode> {
        self.home.iter().filter_map(|p| self.find(p)).collect()
    }
}
