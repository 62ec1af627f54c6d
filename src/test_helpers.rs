//! Shared test utilities for the content-nav test suite.
//!
//! Provides tree-writing helpers, lookups that panic with the available
//! choices on a miss, and navigation shape assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let output = build(tmp.path(), &BuildConfig::default()).unwrap();
//!
//! let llms = find_node(&output.model, "machine-learning/llms");
//! assert_eq!(child_slugs(llms), vec!["tokenizers", "attention"]);
//!
//! assert_nav_shape(&output.model, &[
//!     ("machine-learning", &["llms", "classical"]),
//!     ("systems", &["rust"]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::diagnostics::{Component, Report};
use crate::types::{ContentNode, NavigationModel};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Write one `README.md` with just an H1 per `(dir, title)` pair.
pub fn write_nodes(root: &Path, nodes: &[(&str, &str)]) {
    for (dir, title) in nodes {
        write_file(root, &format!("{dir}/README.md"), &format!("# {title}\n"));
    }
}

// =========================================================================
// Model lookups (panic with the available choices on a miss)
// =========================================================================

/// Find a node by slug path. Panics if not found.
pub fn find_node<'a>(model: &'a NavigationModel, slug_path: &str) -> &'a ContentNode {
    model.find(slug_path).unwrap_or_else(|| {
        let paths: Vec<&str> = model.nodes().iter().map(|n| n.slug_path.as_str()).collect();
        panic!("node '{slug_path}' not found. Available: {paths:?}")
    })
}

/// Child slugs of a node, in navigation order.
pub fn child_slugs(node: &ContentNode) -> Vec<&str> {
    node.children.iter().map(|c| c.slug.as_str()).collect()
}

/// Top-level category slugs, in navigation order.
pub fn category_slugs(model: &NavigationModel) -> Vec<&str> {
    model.categories.iter().map(|c| c.slug.as_str()).collect()
}

/// Messages of every diagnostic from one component.
pub fn messages(report: &Report, component: Component) -> Vec<&str> {
    report
        .by_component(component)
        .map(|d| d.message.as_str())
        .collect()
}

// =========================================================================
// Navigation helpers
// =========================================================================

/// Assert that categories and their topics match an expected shape.
///
/// Each entry is `(category slug, topic slugs)`. Use `&[]` for none.
pub fn assert_nav_shape(model: &NavigationModel, expected: &[(&str, &[&str])]) {
    let expected_slugs: Vec<&str> = expected.iter().map(|(s, _)| *s).collect();
    assert_eq!(category_slugs(model), expected_slugs, "category slugs mismatch");

    for (slug, children) in expected {
        let actual_children = child_slugs(find_node(model, slug));
        assert_eq!(
            actual_children,
            children.to_vec(),
            "children of '{slug}' mismatch"
        );
    }
}
