//! Declaration tree handed from a front-end to the engine.
//!
//! This is the checker's whole view of a parsed file: a tree of
//! [`DeclNode`]s, each carrying a kind, the identifier as spelled, a
//! display name for diagnostics, and an optional source location. How the
//! tree is produced is the front-end's business.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::kind::NodeKind;

/// Source position of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File the declaration was spelled in.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// One node of the declaration tree.
#[derive(Debug, Clone)]
pub struct DeclNode {
    /// Syntactic kind of this declaration.
    pub kind: NodeKind,
    /// Identifier exactly as spelled (empty for anonymous declarations).
    pub spelling: String,
    /// Display name used in diagnostics (e.g. `DoThing()` for functions).
    pub display: String,
    /// Where the declaration was spelled; `None` for synthetic nodes.
    pub location: Option<Location>,
    /// Child declarations in source order.
    pub children: Vec<DeclNode>,
}

impl DeclNode {
    /// Creates a leaf node. The display name defaults to the spelling.
    #[must_use]
    pub fn new(kind: NodeKind, spelling: impl Into<String>, location: Option<Location>) -> Self {
        let spelling = spelling.into();
        Self {
            kind,
            display: spelling.clone(),
            spelling,
            location,
            children: Vec::new(),
        }
    }

    /// Overrides the display name.
    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    /// Attaches children, consuming the node.
    #[must_use]
    pub fn with_children(mut self, children: Vec<DeclNode>) -> Self {
        self.children = children;
        self
    }
}
