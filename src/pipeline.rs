//! One full build pass.
//!
//! ```text
//! scan ─→ extract (parallel) ─→ order ─→ assemble ─→ redirects/home ─→ model
//!   └──────────┴──────────────────┴─────────┴─────────────┴──────────→ report
//! ```
//!
//! Extraction is the only parallel step: each file is read and parsed on the
//! rayon pool and produces its own metadata and diagnostics, merged back in
//! path order. Everything after it runs on the complete set of nodes.
//!
//! A build either returns a model plus a report (possibly full of errors) or
//! fails outright when the articles root or the build config is unusable.

use crate::assemble::{self, ExtractedEntry};
use crate::config::{self, BuildConfig, ConfigError};
use crate::diagnostics::{Diagnostic, Report};
use crate::inputs;
use crate::metadata;
use crate::scan::{self, ScanEntry, ScanError};
use crate::types::NavigationModel;
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result of a build that got far enough to produce a model.
#[derive(Debug)]
pub struct BuildOutput {
    pub model: NavigationModel,
    pub report: Report,
}

/// Load `content-nav.toml` from the content root and build.
pub fn build_from_root(
    content_root: &Path,
) -> Result<(BuildConfig, BuildOutput), BuildError> {
    let config = config::load_config(content_root)?;
    let output = build(content_root, &config)?;
    Ok((config, output))
}

/// Run the whole pipeline over a content root with an explicit config.
pub fn build(content_root: &Path, config: &BuildConfig) -> Result<BuildOutput, ScanError> {
    let mut report = Report::new();
    let articles_root = content_root.join(&config.articles_dir);

    let entries = scan::scan(&articles_root, &config.scan, &mut report)?;
    info!(nodes = entries.len(), "scanned {}", articles_root.display());

    let (extracted, diagnostics) = extract_all(entries);
    report.extend(diagnostics);

    let inputs = inputs::load_inputs(content_root, &config.files, &mut report);
    let model = assemble::assemble(&extracted, &inputs, &config.files, &mut report);

    info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "build complete"
    );
    Ok(BuildOutput { model, report })
}

/// Read and extract every entry in parallel, keeping input order.
pub fn extract_all(entries: Vec<ScanEntry>) -> (Vec<ExtractedEntry>, Vec<Diagnostic>) {
    let results: Vec<(ExtractedEntry, Vec<Diagnostic>)> = entries
        .into_par_iter()
        .map(|entry| {
            let (metadata, diagnostics) = metadata::extract_file(&entry.readme, &entry.rel_path);
            (ExtractedEntry { entry, metadata }, diagnostics)
        })
        .collect();

    let mut extracted = Vec::with_capacity(results.len());
    let mut all = Vec::new();
    for (entry, diagnostics) in results {
        extracted.push(entry);
        all.extend(diagnostics);
    }
    (extracted, all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Component;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn extract_all_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let names: Vec<String> = (0..40).map(|i| format!("cat-{i:02}")).collect();
        for name in &names {
            write_file(tmp.path(), &format!("{name}/README.md"), &format!("# {name}\n"));
        }
        let mut report = Report::new();
        let entries = scan::scan(tmp.path(), &Default::default(), &mut report).unwrap();

        let (extracted, diagnostics) = extract_all(entries);

        assert!(diagnostics.is_empty());
        let titles: Vec<&str> = extracted
            .iter()
            .map(|e| e.metadata.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, names.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn build_uses_articles_dir_from_config() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/rust/README.md", "# Rust\n");
        let config = BuildConfig {
            articles_dir: "posts".to_string(),
            ..BuildConfig::default()
        };

        let output = build(tmp.path(), &config).unwrap();
        assert!(output.report.is_empty());
        assert_eq!(output.model.categories[0].title, "Rust");
    }

    #[test]
    fn build_from_root_reads_toml() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "content-nav.toml", "articles_dir = \"notes\"\n");
        write_file(tmp.path(), "notes/a/README.md", "# A\n");

        let (config, output) = build_from_root(tmp.path()).unwrap();
        assert_eq!(config.articles_dir, "notes");
        assert_eq!(output.model.categories.len(), 1);
    }

    #[test]
    fn missing_articles_dir_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let result = build(tmp.path(), &BuildConfig::default());
        assert!(matches!(result, Err(ScanError::MissingRoot(_))));
    }

    #[test]
    fn invalid_toml_is_fatal() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "content-nav.toml", "unknown_key = 1\n");
        write_file(tmp.path(), "articles/a/README.md", "# A\n");
        assert!(matches!(build_from_root(tmp.path()), Err(BuildError::Config(_))));
    }

    #[test]
    fn bad_sidecar_does_not_stop_the_build() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "articles/a/README.md", "# A\n");
        write_file(tmp.path(), "ordering.json5", "{ oops");

        let output = build(tmp.path(), &BuildConfig::default()).unwrap();
        assert_eq!(output.model.categories.len(), 1);
        assert_eq!(output.report.by_component(Component::Config).count(), 1);
    }

    #[test]
    fn fixture_tree_shape() {
        let tmp = setup_fixtures();
        let output = build(tmp.path(), &BuildConfig::default()).unwrap();

        assert!(output.report.is_empty(), "{:?}", output.report);
        assert_nav_shape(
            &output.model,
            &[
                ("machine-learning", &["llms", "classical"]),
                ("systems", &["rust"]),
            ],
        );
        let llms = find_node(&output.model, "machine-learning/llms");
        assert_eq!(child_slugs(llms), vec!["tokenizers", "attention"]);
    }

    #[test]
    fn fixture_ordering_typo_is_reported() {
        let tmp = setup_fixtures();
        write_file(
            tmp.path(),
            "ordering.json5",
            "{ 'machine-learning': ['lmms', 'llms'] }",
        );

        let output = build(tmp.path(), &BuildConfig::default()).unwrap();

        let ordering = messages(&output.report, Component::Ordering);
        assert_eq!(ordering.len(), 1);
        assert!(ordering[0].contains("'lmms'"));
        let ml = find_node(&output.model, "machine-learning");
        assert_eq!(child_slugs(ml), vec!["llms", "classical"]);
    }
}
