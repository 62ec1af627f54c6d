//! JSON5 sidecar inputs: `ordering.json5`, `home.json5`, `site.json5`, `vanity.json5`.
//!
//! Each file is loaded once per build and handed explicitly to the stage that
//! consumes it; nothing here is global. A missing file is the same as an empty
//! one. A file that exists but doesn't parse is reported as a `config`
//! diagnostic and replaced by its empty default, so a typo in the redirect
//! table never stops the ordering or homepage checks from running.
//!
//! ```json5
//! // ordering.json5: parent slug path → children pinned to the front
//! {
//!   "": ["machine-learning", "systems"],
//!   "machine-learning": ["llms"],
//!   "machine-learning/llms": ["attention", "tokenizers"],
//! }
//! ```
//!
//! ```json5
//! // vanity.json5
//! [
//!   { from: "/old-attention-post", to: "machine-learning/llms/attention" },
//! ]
//! ```

use crate::config::FilesConfig;
use crate::diagnostics::{Component, Report};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// `ordering.json5`: parent slug path → ordered child slugs.
///
/// Keys are kept as written; [`crate::ordering`] normalizes them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OrderingConfig {
    pub groups: BTreeMap<String, Vec<String>>,
}

/// `home.json5`: nodes featured on the homepage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HomeConfig {
    /// Slug paths of featured nodes, in display order.
    #[serde(default)]
    pub featured: Vec<String>,
    /// Everything else, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// `site.json5`: site-level metadata, consumed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One `{ from, to }` record from `vanity.json5`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RedirectEntry {
    pub from: String,
    pub to: String,
}

/// `vanity.json5`: a bare array, or an object wrapping it under `redirects`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "VanityFile")]
pub struct VanityConfig {
    pub redirects: Vec<RedirectEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VanityFile {
    List(Vec<RedirectEntry>),
    Wrapped { redirects: Vec<RedirectEntry> },
}

impl From<VanityFile> for VanityConfig {
    fn from(file: VanityFile) -> Self {
        match file {
            VanityFile::List(redirects) | VanityFile::Wrapped { redirects } => {
                Self { redirects }
            }
        }
    }
}

/// All sidecar inputs for one build.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub ordering: OrderingConfig,
    pub home: HomeConfig,
    pub site: SiteMeta,
    pub vanity: VanityConfig,
}

/// Load every sidecar file from the content root.
///
/// Never fails: unreadable or malformed files become `config` errors in the
/// report and fall back to their defaults.
pub fn load_inputs(root: &Path, files: &FilesConfig, report: &mut Report) -> Inputs {
    Inputs {
        ordering: load_json5(root, &files.ordering, report),
        home: load_json5(root, &files.home, report),
        site: load_json5(root, &files.site, report),
        vanity: load_json5(root, &files.vanity, report),
    }
}

fn load_json5<T: DeserializeOwned + Default>(root: &Path, name: &str, report: &mut Report) -> T {
    let path = root.join(name);
    if !path.exists() {
        debug!(file = name, "sidecar file not found, using defaults");
        return T::default();
    }
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            report.error(Component::Config, name, format!("cannot read file: {e}"));
            return T::default();
        }
    };
    match parse_json5(&content) {
        Ok(value) => {
            debug!(file = name, "loaded sidecar file");
            value
        }
        Err(e) => {
            report.error(Component::Config, name, format!("invalid JSON5: {e}"));
            T::default()
        }
    }
}

/// Parse a JSON5 document. An empty (or whitespace-only) document is the
/// type's default.
pub fn parse_json5<T: DeserializeOwned + Default>(content: &str) -> Result<T, json5::Error> {
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    json5::from_str(content)
}
