//! Built-in convention catalog.

use crate::kind::NodeKind;

/// Pattern an unconfigured convention carries; matches any spelling.
pub const DEFAULT_PATTERN: &str = "^.*$";

/// One built-in convention: a user-facing name, the node kind it targets,
/// and an optional enclosing-structure constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Convention name as it appears in style files (e.g. `"ClassName"`).
    pub name: &'static str,
    /// Node kind this convention applies to.
    pub kind: NodeKind,
    /// Required enclosing structural kind, set only where several
    /// conventions share a target kind and context must break the tie.
    pub parent: Option<NodeKind>,
}

/// The ordered set of known conventions.
///
/// Registration order is part of the resolution contract: when several
/// conventions target the same node kind and none matches the current
/// scope, the first registered one wins.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds the built-in catalog. Pure; no global state is touched.
    #[must_use]
    pub fn builtin() -> Self {
        use NodeKind::{
            ClassDecl, ClassTemplate, CxxMethod, EnumConstantDecl, EnumDecl, FieldDecl,
            FunctionDecl, FunctionTemplate, Namespace, NamespaceAlias, ParmDecl, StructDecl,
            TemplateNonTypeParameter, TemplateTypeParameter, TypeAliasDecl, TypedefDecl,
            UnionDecl, VarDecl,
        };

        let entries = vec![
            entry("StructName", StructDecl, None),
            entry("UnionName", UnionDecl, None),
            entry("ClassName", ClassDecl, None),
            entry("EnumName", EnumDecl, None),
            entry("ClassMemberVariable", FieldDecl, Some(ClassDecl)),
            entry("StructMemberVariable", FieldDecl, Some(StructDecl)),
            entry("UnionMemberVariable", FieldDecl, Some(UnionDecl)),
            entry("EnumConstantName", EnumConstantDecl, None),
            entry("FunctionName", FunctionDecl, None),
            entry("VariableName", VarDecl, None),
            entry("ParameterName", ParmDecl, None),
            entry("TypedefName", TypedefDecl, None),
            entry("CppMethod", CxxMethod, None),
            entry("Namespace", Namespace, None),
            entry("NamespaceAlias", NamespaceAlias, None),
            entry("TypeAliasName", TypeAliasDecl, None),
            entry("TemplateTypeParameter", TemplateTypeParameter, None),
            entry("TemplateNonTypeParameter", TemplateNonTypeParameter, None),
            entry("FunctionTemplate", FunctionTemplate, None),
            entry("ClassTemplate", ClassTemplate, None),
        ];

        Self { entries }
    }

    /// Entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Whether `name` is a known convention.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Convention names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }
}

fn entry(name: &'static str, kind: NodeKind, parent: Option<NodeKind>) -> CatalogEntry {
    CatalogEntry { name, kind, parent }
}
