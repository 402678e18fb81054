//! Context-aware traversal of declaration trees.

use std::path::Path;

use tracing::debug;

use crate::kind::NodeKind;
use crate::node::{DeclNode, Location};
use crate::report::{ReportSink, Violation};
use crate::rules::RuleDb;
use crate::scope::ScopeStack;

/// Walks declaration trees and streams naming violations to a sink.
///
/// Holds the per-file scope stack; use one checker per file (checkers
/// share nothing but the immutable [`RuleDb`], so files can be processed
/// independently).
pub struct Checker<'a> {
    rules: &'a RuleDb,
    sink: &'a mut dyn ReportSink,
    scopes: ScopeStack,
}

impl<'a> Checker<'a> {
    /// Creates a checker over `rules`, reporting through `sink`.
    pub fn new(rules: &'a RuleDb, sink: &'a mut dyn ReportSink) -> Self {
        Self {
            rules,
            sink,
            scopes: ScopeStack::new(),
        }
    }

    /// Checks every declaration of `root` that is spelled in `path` and
    /// returns the number of violations found in the whole tree.
    ///
    /// The root itself is never matched; traversal starts at its
    /// children. For fixed inputs the count and the order of emitted
    /// diagnostics are deterministic.
    pub fn check_file(&mut self, root: &DeclNode, path: &Path) -> usize {
        let depth_before = self.scopes.depth();
        let count = self.walk(root, path);
        debug_assert_eq!(self.scopes.depth(), depth_before);
        debug!(
            file = %path.display(),
            violations = count,
            "file checked"
        );
        count
    }

    fn walk(&mut self, node: &DeclNode, path: &Path) -> usize {
        let mut count = 0;

        for child in &node.children {
            // Declarations pulled in from other files (included headers)
            // are neither checked nor descended into.
            let Some(location) = &child.location else {
                continue;
            };
            if location.file != path {
                continue;
            }

            // `typedef struct { ... } T;` yields a record node directly
            // under the typedef describing the same declaration; checking
            // both would double-report. Skip matching that one node; its
            // members are still visited below.
            let suppressed = child.kind.is_structural() && node.kind == NodeKind::TypedefDecl;
            if !suppressed {
                count += self.check_node(child, location);
            }

            if child.kind.is_structural() {
                self.scopes.push(child.kind);
                count += self.walk(child, path);
                self.scopes.pop();
            } else {
                count += self.walk(child, path);
            }
        }

        count
    }

    fn check_node(&mut self, node: &DeclNode, location: &Location) -> usize {
        let Some(rule) = self.rules.resolve(node.kind, self.scopes.top()) else {
            return 0;
        };
        if rule.matches(&node.spelling) {
            return 0;
        }
        self.sink.emit(&Violation {
            location: location.clone(),
            display: node.display.clone(),
            pattern: rule.pattern_str().to_string(),
            convention: rule.name(),
        });
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::report::CollectSink;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn local(line: usize) -> Option<Location> {
        Some(Location::new(PathBuf::from("test.cpp"), line, 1))
    }

    fn root(children: Vec<DeclNode>) -> DeclNode {
        DeclNode::new(NodeKind::TranslationUnit, "", local(1)).with_children(children)
    }

    fn check(db: &RuleDb, tree: &DeclNode) -> (usize, Vec<Violation>) {
        let mut sink = CollectSink::new();
        let mut checker = Checker::new(db, &mut sink);
        let count = checker.check_file(tree, Path::new("test.cpp"));
        (count, sink.violations)
    }

    #[test]
    fn default_patterns_never_fire() {
        let db = RuleDb::build(&Catalog::builtin(), None).expect("build failed");
        let tree = root(vec![
            DeclNode::new(NodeKind::FunctionDecl, "Whatever_NAME", local(2)),
            DeclNode::new(NodeKind::ClassDecl, "x", local(3)),
        ]);
        let (count, violations) = check(&db, &tree);
        assert_eq!(count, 0);
        assert!(violations.is_empty());
    }

    #[test]
    fn mismatch_is_counted_and_reported() {
        let patterns = overrides(&[("FunctionName", "^[a-z_][a-z0-9_]*$")]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");
        let tree = root(vec![
            DeclNode::new(NodeKind::FunctionDecl, "DoThing", local(2)).with_display("DoThing()"),
            DeclNode::new(NodeKind::FunctionDecl, "do_thing", local(3)).with_display("do_thing()"),
        ]);
        let (count, violations) = check(&db, &tree);
        assert_eq!(count, 1);
        assert_eq!(violations[0].display, "DoThing()");
        assert_eq!(violations[0].convention, "FunctionName");
        assert_eq!(violations[0].pattern, "^[a-z_][a-z0-9_]*$");
        assert_eq!(violations[0].location.line, 2);
    }

    #[test]
    fn fields_resolve_by_enclosing_structure() {
        let patterns = overrides(&[
            ("ClassMemberVariable", "^m_"),
            ("StructMemberVariable", "^s_"),
        ]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");

        let tree = root(vec![
            DeclNode::new(NodeKind::ClassDecl, "Widget", local(2)).with_children(vec![
                DeclNode::new(NodeKind::FieldDecl, "m_count", local(3)),
                DeclNode::new(NodeKind::FieldDecl, "s_count", local(4)),
            ]),
            DeclNode::new(NodeKind::StructDecl, "Point", local(6)).with_children(vec![
                DeclNode::new(NodeKind::FieldDecl, "s_x", local(7)),
                DeclNode::new(NodeKind::FieldDecl, "m_x", local(8)),
            ]),
        ]);

        let (count, violations) = check(&db, &tree);
        assert_eq!(count, 2);
        assert_eq!(violations[0].convention, "ClassMemberVariable");
        assert_eq!(violations[0].display, "s_count");
        assert_eq!(violations[1].convention, "StructMemberVariable");
        assert_eq!(violations[1].display, "m_x");
    }

    #[test]
    fn top_level_field_falls_back_to_first_registered_convention() {
        let patterns = overrides(&[("ClassMemberVariable", "^m_")]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");
        let tree = root(vec![DeclNode::new(NodeKind::FieldDecl, "naked", local(2))]);
        let (count, violations) = check(&db, &tree);
        assert_eq!(count, 1);
        assert_eq!(violations[0].convention, "ClassMemberVariable");
    }

    #[test]
    fn foreign_located_nodes_are_skipped_entirely() {
        let patterns = overrides(&[("FunctionName", "^[a-z_]+$")]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");

        let foreign = Some(Location::new(PathBuf::from("header.h"), 1, 1));
        let tree = root(vec![
            // Bad name, but spelled in another file: never checked, and
            // its (also bad) descendant is never reached.
            DeclNode::new(NodeKind::FunctionDecl, "FromHeader", foreign.clone()).with_children(
                vec![DeclNode::new(NodeKind::VarDecl, "AlsoForeign", foreign)],
            ),
            DeclNode::new(NodeKind::FunctionDecl, "local_ok", local(5)),
        ]);

        let (count, _) = check(&db, &tree);
        assert_eq!(count, 0);
    }

    #[test]
    fn node_without_location_is_skipped() {
        let patterns = overrides(&[("FunctionName", "^[a-z_]+$")]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");
        let tree = root(vec![DeclNode::new(NodeKind::FunctionDecl, "NoWhere", None)]);
        let (count, _) = check(&db, &tree);
        assert_eq!(count, 0);
    }

    #[test]
    fn typedef_struct_is_suppressed_but_members_are_checked() {
        let patterns = overrides(&[
            ("StructName", "^[A-Z][a-z]+$"),
            ("StructMemberVariable", "^[a-z]+$"),
            ("TypedefName", "^[A-Z][a-z]+$"),
        ]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");

        // typedef struct { int x; int BAD; } Foo;
        let tree = root(vec![DeclNode::new(NodeKind::TypedefDecl, "Foo", local(2))
            .with_children(vec![DeclNode::new(NodeKind::StructDecl, "", local(2))
                .with_children(vec![
                    DeclNode::new(NodeKind::FieldDecl, "x", local(2)),
                    DeclNode::new(NodeKind::FieldDecl, "BAD", local(2)),
                ])])]);

        let (count, violations) = check(&db, &tree);
        // The anonymous struct would fail StructName, but it is the same
        // declaration as the typedef; only the member mismatch counts.
        assert_eq!(count, 1);
        assert_eq!(violations[0].display, "BAD");
        assert_eq!(violations[0].convention, "StructMemberVariable");
    }

    #[test]
    fn typedef_only_shields_its_direct_child() {
        let patterns = overrides(&[("StructName", "^[A-Z][a-z]+$")]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");

        // A struct that is NOT under a typedef still gets checked, even
        // when a typedef exists elsewhere in the tree.
        let tree = root(vec![
            DeclNode::new(NodeKind::TypedefDecl, "Foo", local(2)).with_children(vec![
                DeclNode::new(NodeKind::StructDecl, "bad_one", local(2)),
            ]),
            DeclNode::new(NodeKind::StructDecl, "bad_two", local(4)),
        ]);

        let (count, violations) = check(&db, &tree);
        assert_eq!(count, 1);
        assert_eq!(violations[0].display, "bad_two");
    }

    #[test]
    fn scope_stack_balanced_across_nested_and_empty_structures() {
        let db = RuleDb::build(&Catalog::builtin(), None).expect("build failed");

        let mut deep = DeclNode::new(NodeKind::StructDecl, "inner", local(10));
        for depth in 0..16 {
            deep = DeclNode::new(NodeKind::ClassDecl, format!("level{depth}"), local(depth + 2))
                .with_children(vec![deep]);
        }
        let tree = root(vec![
            deep,
            DeclNode::new(NodeKind::UnionDecl, "empty", local(40)),
        ]);

        let mut sink = CollectSink::new();
        let mut checker = Checker::new(&db, &mut sink);
        checker.check_file(&tree, Path::new("test.cpp"));
        assert_eq!(checker.scopes.depth(), 0);
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let patterns = overrides(&[
            ("FunctionName", "^[a-z_]+$"),
            ("VariableName", "^[a-z_]+$"),
        ]);
        let db = RuleDb::build(&Catalog::builtin(), Some(&patterns)).expect("build failed");
        let tree = root(vec![
            DeclNode::new(NodeKind::FunctionDecl, "Alpha", local(2)),
            DeclNode::new(NodeKind::VarDecl, "Beta", local(3)),
            DeclNode::new(NodeKind::FunctionDecl, "Gamma", local(4)),
        ]);

        let (first_count, first) = check(&db, &tree);
        let (second_count, second) = check(&db, &tree);
        assert_eq!(first_count, 3);
        assert_eq!(first_count, second_count);
        let first_names: Vec<_> = first.iter().map(|v| v.display.clone()).collect();
        let second_names: Vec<_> = second.iter().map(|v| v.display.clone()).collect();
        assert_eq!(first_names, second_names);
        assert_eq!(first_names, ["Alpha", "Beta", "Gamma"]);
    }
}
