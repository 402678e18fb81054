//! Syntactic construct kinds recognized by the checker.

use serde::{Deserialize, Serialize};

/// Kind of a declaration node produced by a front-end.
///
/// This is a closed enumeration: every node handed to the engine carries
/// exactly one of these kinds, and the convention catalog is keyed by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of a parsed file. No convention targets it, so it is never
    /// matched; the engine only ever checks its descendants.
    TranslationUnit,
    /// `struct S { ... };`
    StructDecl,
    /// `union U { ... };`
    UnionDecl,
    /// `class C { ... };`
    ClassDecl,
    /// `enum E { ... };` (plain or scoped)
    EnumDecl,
    /// A member variable of a class, struct or union.
    FieldDecl,
    /// One enumerator inside an enum body.
    EnumConstantDecl,
    /// A free function definition or prototype.
    FunctionDecl,
    /// A variable declaration (global or local).
    VarDecl,
    /// A named function parameter.
    ParmDecl,
    /// `typedef ... T;`
    TypedefDecl,
    /// A member function of a class, struct or union.
    CxxMethod,
    /// `namespace n { ... }`
    Namespace,
    /// `namespace alias = some::ns;`
    NamespaceAlias,
    /// `using T = ...;`
    TypeAliasDecl,
    /// `template <typename T>` type parameter.
    TemplateTypeParameter,
    /// `template <int N>` non-type parameter.
    TemplateNonTypeParameter,
    /// A templated function.
    FunctionTemplate,
    /// A templated class or struct.
    ClassTemplate,
}

impl NodeKind {
    /// True for the kinds that scope member-variable conventions:
    /// class, struct and union declarations. Only these push onto the
    /// scope stack during traversal.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(self, Self::ClassDecl | Self::StructDecl | Self::UnionDecl)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TranslationUnit => "translation unit",
            Self::StructDecl => "struct declaration",
            Self::UnionDecl => "union declaration",
            Self::ClassDecl => "class declaration",
            Self::EnumDecl => "enum declaration",
            Self::FieldDecl => "field declaration",
            Self::EnumConstantDecl => "enum constant",
            Self::FunctionDecl => "function declaration",
            Self::VarDecl => "variable declaration",
            Self::ParmDecl => "parameter declaration",
            Self::TypedefDecl => "typedef declaration",
            Self::CxxMethod => "method declaration",
            Self::Namespace => "namespace",
            Self::NamespaceAlias => "namespace alias",
            Self::TypeAliasDecl => "type alias",
            Self::TemplateTypeParameter => "template type parameter",
            Self::TemplateNonTypeParameter => "template non-type parameter",
            Self::FunctionTemplate => "function template",
            Self::ClassTemplate => "class template",
        };
        f.write_str(name)
    }
}
