//! Diagnostics collection for a single build pass.
//!
//! Every stage pushes recoverable problems into one [`Report`] instead of
//! returning early. A broken article never hides the problems in the next
//! one: the author reads a single report and fixes everything in one edit.
//!
//! ## Severity
//!
//! - **error**: the content is wrong (missing title, dangling ordering slug,
//!   dead redirect). The CLI exits non-zero.
//! - **warning**: something is suspicious but the model is still usable
//!   (excluded orphan, redirect shadowing a page). Only blocks the build
//!   when `deny_warnings` is set.
//!
//! ## Components
//!
//! The component doubles as the error kind: a `Structure` diagnostic is a
//! structural error, an `Ordering` diagnostic an ordering error, and so on.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// The pipeline stage that raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Directory layout: depth, missing `README.md`, orphans.
    Structure,
    /// Markdown parsing: missing H1, frontmatter.
    Metadata,
    /// `ordering.json5` references.
    Ordering,
    /// `vanity.json5` entries.
    Redirect,
    /// `home.json5` references.
    Home,
    /// Sidecar files that exist but can't be parsed.
    Config,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Structure => "structure",
            Component::Metadata => "metadata",
            Component::Ordering => "ordering",
            Component::Redirect => "redirect",
            Component::Home => "home",
            Component::Config => "config",
        };
        f.write_str(name)
    }
}

/// One problem found during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub component: Component,
    /// The offending node or config location, e.g. `ml/llms/README.md`
    /// or `vanity.json5`.
    pub node_path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(
        component: Component,
        node_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            component,
            node_path: node_path.into(),
            message: message.into(),
        }
    }

    pub fn warning(
        component: Component,
        node_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            component,
            node_path: node_path.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.component, self.node_path, self.message
        )
    }
}

/// Aggregate of every diagnostic from one build, in emission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(
        &mut self,
        component: Component,
        node_path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::error(component, node_path, message));
    }

    pub fn warning(
        &mut self,
        component: Component,
        node_path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::warning(component, node_path, message));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics raised by one component, in emission order.
    pub fn by_component(&self, component: Component) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.component == component)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Whether the build may publish. With `deny_warnings`, any diagnostic
    /// at all blocks it.
    pub fn is_clean(&self, deny_warnings: bool) -> bool {
        if deny_warnings {
            self.is_empty()
        } else {
            !self.has_errors()
        }
    }
}

impl Extend<Diagnostic> for Report {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}
