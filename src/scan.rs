//! Filesystem scanning.
//!
//! Stage 1 of the pipeline. Walks the articles directory and discovers every
//! content node by its `README.md`, producing a flat, path-sorted list of
//! [`ScanEntry`] values that later stages read and assemble.
//!
//! ## Directory Structure
//!
//! ```text
//! articles/                          # Articles root (depth 0)
//! ├── README.md                      # Index page, not a node
//! ├── machine-learning/              # Category (depth 1)
//! │   ├── README.md
//! │   └── llms/                      # Topic (depth 2)
//! │       ├── README.md
//! │       └── attention/             # Article (depth 3)
//! │           ├── README.md
//! │           └── images/            # Asset folder, ignored
//! └── systems/
//!     └── README.md
//! ```
//!
//! ## Validation
//!
//! Problems are reported, never returned as errors, so one bad directory
//! doesn't hide the others:
//! - A directory at depth 1–3 without a `README.md` is a structural error.
//!   Its descendants are still scanned.
//! - A `README.md` deeper than depth 3 is a structural error and excluded.
//! - A directory name that isn't URL-safe is a warning.
//!
//! Only a missing or unreadable articles root is fatal.

use crate::config::ScanConfig;
use crate::diagnostics::{Component, Report};
use crate::naming;
use crate::types::NodeKind;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// File that marks a directory as a content node.
pub const README: &str = "README.md";

/// Deepest directory level that can hold a node (`<category>/<topic>/<article>`).
pub const MAX_DEPTH: usize = 3;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Articles directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Articles path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A discovered node, before its markdown has been read.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry {
    pub kind: NodeKind,
    pub depth: usize,
    pub slug: String,
    pub slug_path: String,
    /// `README.md` path relative to the articles root, `/`-separated.
    pub rel_path: String,
    /// `README.md` path on disk.
    pub readme: PathBuf,
}

/// Scan the articles root for content nodes.
pub fn scan(
    root: &Path,
    config: &ScanConfig,
    report: &mut Report,
) -> Result<Vec<ScanEntry>, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    // Fail fast if the root itself is unreadable; deeper read errors are reported.
    fs::read_dir(root)?;

    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e, config));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| rel_string(root, p))
                    .unwrap_or_default();
                report.error(Component::Structure, path, format!("cannot read directory: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let depth = entry.depth();
        let dir = entry.path();
        let readme = dir.join(README);
        let rel_dir = rel_string(root, dir);

        match NodeKind::from_depth(depth) {
            Some(kind) => {
                if !readme.is_file() {
                    report.error(
                        Component::Structure,
                        format!("{rel_dir}/"),
                        format!("directory has no {README}"),
                    );
                    continue;
                }
                let slug = entry.file_name().to_string_lossy().to_string();
                if !naming::is_url_safe(&slug) {
                    report.warning(
                        Component::Structure,
                        format!("{rel_dir}/"),
                        format!(
                            "directory name '{slug}' is not URL-safe (suggested: '{}')",
                            naming::sanitize_slug(&slug)
                        ),
                    );
                }
                entries.push(ScanEntry {
                    kind,
                    depth,
                    slug,
                    slug_path: rel_dir.clone(),
                    rel_path: format!("{rel_dir}/{README}"),
                    readme,
                });
            }
            None if readme.is_file() => {
                report.error(
                    Component::Structure,
                    format!("{rel_dir}/{README}"),
                    format!(
                        "{README} at depth {depth}; content nodes live at most {MAX_DEPTH} levels deep (<category>/<topic>/<article>)"
                    ),
                );
            }
            None => {}
        }
    }

    entries.sort_by(|a, b| a.slug_path.cmp(&b.slug_path));
    debug!(root = %root.display(), nodes = entries.len(), "scan complete");
    Ok(entries)
}

/// Hidden (`.git`), private (`_drafts`), and configured asset directories
/// are skipped along with everything below them.
fn is_ignored(entry: &DirEntry, config: &ScanConfig) -> bool {
    if !entry.file_type().is_dir() || entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_') || config.ignore_dirs.iter().any(|d| *d == name)
}

/// `root/a/b` → `"a/b"`, independent of the platform separator.
fn rel_string(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
