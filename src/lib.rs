//! # Content Nav
//!
//! Builds the navigation model of a documentation or blog site from a tree of
//! `README.md` files. Directories are nodes, the first H1 of each README is
//! its title, and a handful of JSON5 sidecar files pin ordering, feature
//! pages on the homepage, and map retired URLs to current pages.
//!
//! # Architecture: One Pass, Many Stages
//!
//! ```text
//! 1. Scan       articles/        →  candidate nodes       (filesystem → entries)
//! 2. Extract    README.md        →  title, description    (parallel, per file)
//! 3. Order      ordering.json5   →  sibling order         (pinned, then lexical)
//! 4. Assemble   entries + order  →  category tree
//! 5. Link       vanity/home      →  redirect table, homepage picks
//! ```
//!
//! Every stage reports problems into one shared [`diagnostics::Report`]
//! instead of stopping at the first one. A build only fails outright when
//! there is nothing to read (missing articles root, unreadable config);
//! otherwise it yields a model *and* the full list of what is wrong with it,
//! so an author can fix a whole batch of mistakes in one go.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the articles tree, classifies directories, flags structural problems |
//! | [`metadata`] | Stage 2: frontmatter, first-H1 title, first paragraph description |
//! | [`ordering`] | Stage 3: resolves `ordering.json5` groups into sibling orders |
//! | [`assemble`] | Stage 4: builds the category tree, excludes invalid subtrees, validates `home.json5` |
//! | [`redirects`] | Stage 5: validates `vanity.json5` into a chain-free redirect table |
//! | [`pipeline`] | Runs the stages in order and owns the parallel extraction step |
//! | [`inputs`] | Loads and parses the JSON5 sidecar files |
//! | [`diagnostics`] | Severity, component, and the accumulated `Report` |
//! | [`config`] | `content-nav.toml` loading, validation, and stock defaults |
//! | [`types`] | The serialized model: `NavigationModel`, `ContentNode` |
//! | [`naming`] | Slug and URL path normalization |
//! | [`output`] | CLI output formatting for the tree and the report |
//!
//! # Design Decisions
//!
//! ## Depth Is Kind
//!
//! A node's kind follows from where it sits, never from a flag:
//!
//! ```text
//! articles/
//! ├── machine-learning/          ← category (depth 1)
//! │   ├── README.md
//! │   └── llms/                  ← topic (depth 2)
//! │       ├── README.md
//! │       └── attention/         ← article (depth 3)
//! │           └── README.md
//! ```
//!
//! Anything deeper than an article is an error.
//!
//! ## Pinned, Then Lexical
//!
//! `ordering.json5` only needs to list the siblings an author cares about.
//! Pinned slugs come first in the listed order; everything else follows in
//! lexicographic slug order. Adding a new article never reshuffles the
//! pinned ones.
//!
//! ## Exclude, Don't Abort
//!
//! A README without an H1 is an error, and that node and its subtree are
//! left out of navigation. Siblings still get contiguous `order` values, so
//! consumers can rely on `0..n` regardless of what was dropped.
//!
//! ## Drafts Live In The Title
//!
//! A `Draft:` prefix on the H1 marks a draft. The title is stored exactly as
//! written; nothing strips or re-adds the prefix.
//!
//! ## Redirects Resolve In One Hop
//!
//! The redirect table never contains a target that is also a source.
//! Chains, self-loops, ambiguous sources, and dangling targets are rejected
//! while the table is built, so looking a path up is a single map access.

pub mod assemble;
pub mod config;
pub mod diagnostics;
pub mod inputs;
pub mod metadata;
pub mod naming;
pub mod ordering;
pub mod output;
pub mod pipeline;
pub mod redirects;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
