//! Enclosing-structure stack maintained during traversal.

use crate::kind::NodeKind;

/// Stack of enclosing structural kinds (class, struct, union).
///
/// Only structural declarations are pushed. The engine pairs every push
/// with a pop in the same block, with no exit path between them, so the
/// stack always mirrors the active nesting chain from the root to the
/// node being visited.
#[derive(Debug, Default)]
pub struct ScopeStack {
    stack: Vec<NodeKind>,
}

impl ScopeStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a structural kind on entry to its body.
    pub fn push(&mut self, kind: NodeKind) {
        debug_assert!(kind.is_structural());
        self.stack.push(kind);
    }

    /// Pops on exit from a structural body.
    pub fn pop(&mut self) -> Option<NodeKind> {
        self.stack.pop()
    }

    /// The innermost enclosing structural kind, if any.
    #[must_use]
    pub fn top(&self) -> Option<NodeKind> {
        self.stack.last().copied()
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
