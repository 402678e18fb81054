//! # declint-core
//!
//! Rule resolution and declaration-tree traversal for the declint naming
//! convention checker.
//!
//! A front-end (such as `declint-cpp`) parses a source file into a tree
//! of [`DeclNode`]s. This crate decides, for every node, which naming
//! convention governs it (taking the enclosing class/struct/union
//! context into account) and matches the spelled name against the
//! convention's pattern, streaming each mismatch to a [`ReportSink`].
//!
//! ## Example
//!
//! ```ignore
//! use declint_core::{Catalog, Checker, RuleDb, TextSink};
//!
//! let db = RuleDb::build(&Catalog::builtin(), Some(&style.patterns))?;
//! let mut sink = TextSink::new(std::io::stderr());
//! let count = Checker::new(&db, &mut sink).check_file(&root, path);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod engine;
mod kind;
mod node;
mod report;
mod rules;
mod scope;
mod style;

pub use catalog::{Catalog, CatalogEntry, DEFAULT_PATTERN};
pub use engine::Checker;
pub use kind::NodeKind;
pub use node::{DeclNode, Location};
pub use report::{CollectSink, JsonSink, ReportSink, TextSink, Violation};
pub use rules::{Rule, RuleDb, RulesError};
pub use scope::ScopeStack;
pub use style::{Style, StyleError};
