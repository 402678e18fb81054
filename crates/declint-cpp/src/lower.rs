//! Lowering from the tree-sitter C/C++ grammar to declaration nodes.
//!
//! The grammar is purely syntactic, so a handful of declarator shapes
//! have to be unwrapped by hand: a function is only a function when its
//! declarator chain bottoms out in a plain name (a function pointer
//! bottoms out in a parenthesized declarator and stays a variable), and
//! `typedef struct { ... } Foo;` hangs the record off the typedef node
//! so the engine can treat them as one declaration.

use std::path::Path;

use tree_sitter::Node;

use declint_core::{DeclNode, Location, NodeKind};

/// Context carried down the lowering recursion.
#[derive(Clone, Copy, Default)]
struct Scope<'a> {
    /// Name of the nearest enclosing record body, if any. Empty string
    /// for anonymous records. Function bodies reset this to `None` so
    /// local declarations lower as plain variables.
    record: Option<&'a str>,
}

pub(crate) struct Lowerer<'a> {
    src: &'a [u8],
    path: &'a Path,
}

impl<'a> Lowerer<'a> {
    pub(crate) fn new(src: &'a [u8], path: &'a Path) -> Self {
        Self { src, path }
    }

    pub(crate) fn lower_translation_unit(&self, root: Node<'a>, out: &mut DeclNode) {
        self.lower_children(root, out, Scope::default());
    }

    fn lower_children(&self, node: Node<'a>, parent: &mut DeclNode, scope: Scope<'a>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.lower_node(child, parent, scope);
        }
    }

    fn lower_node(&self, node: Node<'a>, parent: &mut DeclNode, scope: Scope<'a>) {
        match node.kind() {
            "struct_specifier" => self.lower_record(node, NodeKind::StructDecl, parent),
            "union_specifier" => self.lower_record(node, NodeKind::UnionDecl, parent),
            "class_specifier" => self.lower_record(node, NodeKind::ClassDecl, parent),
            "enum_specifier" => self.lower_enum(node, parent),
            "type_definition" => self.lower_typedef(node, parent),
            "alias_declaration" => self.lower_alias(node, parent),
            "function_definition" => self.lower_function_definition(node, parent, scope),
            "declaration" => self.lower_declaration(node, parent, scope),
            "field_declaration" => self.lower_field(node, parent, scope),
            "namespace_definition" => self.lower_namespace(node, parent),
            "namespace_alias_definition" => self.lower_namespace_alias(node, parent),
            "template_declaration" => self.lower_template(node, parent, scope),
            // Declarations inside `extern "C" { ... }` sit at file scope.
            "linkage_specification" | "declaration_list" => {
                self.lower_children(node, parent, scope);
            }
            "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" => {
                self.lower_children(node, parent, scope);
            }
            // Statement bodies can hold local declarations.
            kind if kind.ends_with("statement") => {
                self.lower_children(node, parent, Scope::default());
            }
            _ => {}
        }
    }

    /// Lowers a record specifier. A specifier without a body is a type
    /// reference (`struct Foo x;`) and produces nothing.
    fn lower_record(&self, node: Node<'a>, kind: NodeKind, parent: &mut DeclNode) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let name = node.child_by_field_name("name");
        let spelling = name.map_or("", |n| self.text(n));
        let anchor = name.unwrap_or(node);
        let mut decl = DeclNode::new(kind, spelling, Some(self.location(anchor)));
        self.lower_children(
            body,
            &mut decl,
            Scope {
                record: Some(spelling),
            },
        );
        parent.children.push(decl);
    }

    fn lower_enum(&self, node: Node<'a>, parent: &mut DeclNode) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let name = node.child_by_field_name("name");
        let spelling = name.map_or("", |n| self.text(n));
        let anchor = name.unwrap_or(node);
        let mut decl = DeclNode::new(NodeKind::EnumDecl, spelling, Some(self.location(anchor)));
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() != "enumerator" {
                continue;
            }
            if let Some(name) = child.child_by_field_name("name") {
                decl.children.push(DeclNode::new(
                    NodeKind::EnumConstantDecl,
                    self.text(name),
                    Some(self.location(name)),
                ));
            }
        }
        parent.children.push(decl);
    }

    /// Lowers `typedef ... name1, name2;`. The underlying record or
    /// enum definition, when there is one, becomes a child of the first
    /// typedef node.
    fn lower_typedef(&self, node: Node<'a>, parent: &mut DeclNode) {
        let mut first = true;
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let Some(name) = declarator_name(declarator) else {
                continue;
            };
            let mut decl = DeclNode::new(
                NodeKind::TypedefDecl,
                self.text(name),
                Some(self.location(name)),
            );
            if first {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.lower_node(ty, &mut decl, Scope::default());
                }
                first = false;
            }
            parent.children.push(decl);
        }
    }

    fn lower_alias(&self, node: Node<'a>, parent: &mut DeclNode) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        parent.children.push(DeclNode::new(
            NodeKind::TypeAliasDecl,
            self.text(name),
            Some(self.location(name)),
        ));
    }

    fn lower_function_definition(&self, node: Node<'a>, parent: &mut DeclNode, scope: Scope<'a>) {
        let Some(declarator) = node.child_by_field_name("declarator") else {
            return;
        };
        let Some(func) = callable_declarator(declarator) else {
            return;
        };
        self.lower_callable(func, node.child_by_field_name("body"), parent, scope);
    }

    /// Lowers a plain `declaration`: an inline record/enum definition
    /// followed by the declared names, each either a function prototype
    /// or a variable.
    fn lower_declaration(&self, node: Node<'a>, parent: &mut DeclNode, scope: Scope<'a>) {
        if let Some(ty) = node.child_by_field_name("type") {
            self.lower_node(ty, parent, scope);
        }
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            if let Some(func) = callable_declarator(declarator) {
                self.lower_callable(func, None, parent, scope);
            } else if let Some(name) = declarator_name(declarator) {
                parent.children.push(DeclNode::new(
                    NodeKind::VarDecl,
                    self.text(name),
                    Some(self.location(name)),
                ));
            }
        }
    }

    /// Lowers a `field_declaration` inside a record body: a member
    /// variable, a method prototype, or a nested type definition.
    fn lower_field(&self, node: Node<'a>, parent: &mut DeclNode, scope: Scope<'a>) {
        if let Some(ty) = node.child_by_field_name("type") {
            self.lower_node(ty, parent, scope);
        }
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            if let Some(func) = callable_declarator(declarator) {
                self.lower_callable(func, None, parent, scope);
            } else if let Some(name) = declarator_name(declarator) {
                parent.children.push(DeclNode::new(
                    NodeKind::FieldDecl,
                    self.text(name),
                    Some(self.location(name)),
                ));
            }
        }
    }

    /// Lowers a function declarator into a function or method node.
    ///
    /// Constructors, destructors, operators and conversion functions
    /// have no naming convention and are dropped. Out-of-line qualified
    /// definitions (`void Widget::resize() { ... }`) are dropped too;
    /// the in-class declaration already carries the name.
    fn lower_callable(
        &self,
        func: Node<'a>,
        body: Option<Node<'a>>,
        parent: &mut DeclNode,
        scope: Scope<'a>,
    ) {
        let Some(inner) = func.child_by_field_name("declarator") else {
            return;
        };
        if inner.kind() == "qualified_identifier" {
            return;
        }
        if !matches!(inner.kind(), "identifier" | "field_identifier") {
            return;
        }
        let spelling = self.text(inner);
        if scope.record == Some(spelling) {
            // Constructor: spelled as the record's own name.
            return;
        }

        let kind = if scope.record.is_some() {
            NodeKind::CxxMethod
        } else {
            NodeKind::FunctionDecl
        };
        let mut decl = DeclNode::new(kind, spelling, Some(self.location(inner)))
            .with_display(self.text(func));

        if let Some(params) = func.child_by_field_name("parameters") {
            self.lower_parameters(params, &mut decl);
        }
        if let Some(body) = body {
            self.lower_children(body, &mut decl, Scope::default());
        }
        parent.children.push(decl);
    }

    fn lower_parameters(&self, params: Node<'a>, parent: &mut DeclNode) {
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            if !matches!(
                child.kind(),
                "parameter_declaration" | "optional_parameter_declaration"
            ) {
                continue;
            }
            // Unnamed parameters (`void f(int);`) have no declarator.
            let Some(name) = child
                .child_by_field_name("declarator")
                .and_then(declarator_name)
            else {
                continue;
            };
            parent.children.push(DeclNode::new(
                NodeKind::ParmDecl,
                self.text(name),
                Some(self.location(name)),
            ));
        }
    }

    /// Lowers a namespace definition. `namespace a::b { ... }` declares
    /// every segment, so it lowers to a chain of namespace nodes.
    fn lower_namespace(&self, node: Node<'a>, parent: &mut DeclNode) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let name = node.child_by_field_name("name");
        let segments: Vec<&str> = name.map_or_else(|| vec![""], |n| self.text(n).split("::").collect());
        let anchor = name.unwrap_or(node);
        let location = self.location(anchor);

        let innermost = segments.last().copied().unwrap_or("");
        let mut decl = DeclNode::new(NodeKind::Namespace, innermost, Some(location.clone()));
        self.lower_children(body, &mut decl, Scope::default());
        for segment in segments.iter().rev().skip(1) {
            decl = DeclNode::new(NodeKind::Namespace, *segment, Some(location.clone()))
                .with_children(vec![decl]);
        }
        parent.children.push(decl);
    }

    fn lower_namespace_alias(&self, node: Node<'a>, parent: &mut DeclNode) {
        let mut cursor = node.walk();
        let Some(name) = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "namespace_identifier")
        else {
            return;
        };
        parent.children.push(DeclNode::new(
            NodeKind::NamespaceAlias,
            self.text(name),
            Some(self.location(name)),
        ));
    }

    /// Lowers a template declaration. The wrapped entity keeps its
    /// shape but takes a template kind, and the template parameters
    /// become its first children.
    fn lower_template(&self, node: Node<'a>, parent: &mut DeclNode, scope: Scope<'a>) {
        let mut params = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "template_parameter_list" {
                self.lower_template_parameters(child, &mut params);
            }
        }

        let mut wrapped = DeclNode::new(NodeKind::TranslationUnit, "", None);
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "template_parameter_list" {
                self.lower_node(child, &mut wrapped, scope);
            }
        }

        for mut produced in wrapped.children {
            produced.kind = match produced.kind {
                NodeKind::FunctionDecl | NodeKind::CxxMethod => NodeKind::FunctionTemplate,
                NodeKind::StructDecl | NodeKind::ClassDecl => NodeKind::ClassTemplate,
                other => other,
            };
            let mut children = params.clone();
            children.append(&mut produced.children);
            produced.children = children;
            parent.children.push(produced);
        }
    }

    fn lower_template_parameters(&self, list: Node<'a>, out: &mut Vec<DeclNode>) {
        let mut cursor = list.walk();
        for child in list.children(&mut cursor) {
            match child.kind() {
                "type_parameter_declaration" | "optional_type_parameter_declaration" => {
                    let mut inner = child.walk();
                    if let Some(name) = child
                        .named_children(&mut inner)
                        .find(|c| c.kind() == "type_identifier")
                    {
                        out.push(DeclNode::new(
                            NodeKind::TemplateTypeParameter,
                            self.text(name),
                            Some(self.location(name)),
                        ));
                    };
                }
                "parameter_declaration" | "optional_parameter_declaration" => {
                    if let Some(name) = child
                        .child_by_field_name("declarator")
                        .and_then(declarator_name)
                    {
                        out.push(DeclNode::new(
                            NodeKind::TemplateNonTypeParameter,
                            self.text(name),
                            Some(self.location(name)),
                        ));
                    }
                }
                _ => {}
            }
        }
    }

    fn text(&self, node: Node<'a>) -> &'a str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn location(&self, node: Node<'a>) -> Location {
        let point = node.start_position();
        Location::new(self.path, point.row + 1, point.column + 1)
    }
}

/// Unwraps a declarator chain down to the declared name, if there is
/// one.
fn declarator_name(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" | "type_identifier" => return Some(current),
            "init_declarator"
            | "pointer_declarator"
            | "array_declarator"
            | "reference_declarator"
            | "parenthesized_declarator"
            | "function_declarator" => {
                current = current
                    .child_by_field_name("declarator")
                    .or_else(|| current.named_child(0))?;
            }
            _ => return None,
        }
    }
}

/// Returns the `function_declarator` of a chain when the chain actually
/// names a function. A function pointer variable has its name inside a
/// parenthesized declarator and yields `None`.
fn callable_declarator(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node;
    loop {
        match current.kind() {
            "function_declarator" => {
                let inner = current.child_by_field_name("declarator")?;
                return matches!(
                    inner.kind(),
                    "identifier"
                        | "field_identifier"
                        | "qualified_identifier"
                        | "destructor_name"
                        | "operator_name"
                        | "operator_cast"
                )
                .then_some(current);
            }
            "init_declarator" | "pointer_declarator" | "reference_declarator" => {
                current = current
                    .child_by_field_name("declarator")
                    .or_else(|| current.named_child(0))?;
            }
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use declint_core::{DeclNode, NodeKind};

    use crate::parser::CppParser;

    fn parse(source: &str) -> DeclNode {
        CppParser::new()
            .parse(source, Path::new("test.cpp"))
            .unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn kinds(node: &DeclNode) -> Vec<NodeKind> {
        node.children.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn function_with_parameters_and_local() {
        let root = parse("int run(int argc) { int local; return local; }");
        let func = &root.children[0];
        assert_eq!(func.kind, NodeKind::FunctionDecl);
        assert_eq!(func.spelling, "run");
        assert_eq!(func.display, "run(int argc)");
        assert_eq!(kinds(func), vec![NodeKind::ParmDecl, NodeKind::VarDecl]);
        assert_eq!(func.children[0].spelling, "argc");
        assert_eq!(func.children[1].spelling, "local");
    }

    #[test]
    fn unnamed_parameter_is_skipped() {
        let root = parse("void poll(int);");
        let func = &root.children[0];
        assert_eq!(func.kind, NodeKind::FunctionDecl);
        assert!(func.children.is_empty());
    }

    #[test]
    fn function_pointer_is_a_variable() {
        let root = parse("void (*handler)(int);");
        let var = &root.children[0];
        assert_eq!(var.kind, NodeKind::VarDecl);
        assert_eq!(var.spelling, "handler");
    }

    #[test]
    fn struct_with_fields() {
        let root = parse("struct Point { int x; int y; };");
        let record = &root.children[0];
        assert_eq!(record.kind, NodeKind::StructDecl);
        assert_eq!(record.spelling, "Point");
        assert_eq!(kinds(record), vec![NodeKind::FieldDecl, NodeKind::FieldDecl]);
        assert_eq!(record.children[0].spelling, "x");
    }

    #[test]
    fn bodyless_specifier_is_a_reference_not_a_declaration() {
        let root = parse("struct Point origin;");
        assert_eq!(kinds(&root), vec![NodeKind::VarDecl]);
        assert_eq!(root.children[0].spelling, "origin");
    }

    #[test]
    fn class_with_method_and_field() {
        let root = parse("class Widget { int m_size; void resize(int w); };");
        let class = &root.children[0];
        assert_eq!(class.kind, NodeKind::ClassDecl);
        assert_eq!(kinds(class), vec![NodeKind::FieldDecl, NodeKind::CxxMethod]);
        let method = &class.children[1];
        assert_eq!(method.spelling, "resize");
        assert_eq!(kinds(method), vec![NodeKind::ParmDecl]);
    }

    #[test]
    fn constructor_and_destructor_are_dropped() {
        let root = parse("class Widget { Widget(); ~Widget(); void paint(); };");
        let class = &root.children[0];
        assert_eq!(kinds(class), vec![NodeKind::CxxMethod]);
        assert_eq!(class.children[0].spelling, "paint");
    }

    #[test]
    fn typedef_record_hangs_off_the_typedef() {
        let root = parse("typedef struct { int x; } Vec2;");
        let typedef = &root.children[0];
        assert_eq!(typedef.kind, NodeKind::TypedefDecl);
        assert_eq!(typedef.spelling, "Vec2");
        let record = &typedef.children[0];
        assert_eq!(record.kind, NodeKind::StructDecl);
        assert_eq!(record.spelling, "");
        assert_eq!(kinds(record), vec![NodeKind::FieldDecl]);
    }

    #[test]
    fn typedef_of_plain_type() {
        let root = parse("typedef unsigned long size_type;");
        let typedef = &root.children[0];
        assert_eq!(typedef.kind, NodeKind::TypedefDecl);
        assert_eq!(typedef.spelling, "size_type");
        assert!(typedef.children.is_empty());
    }

    #[test]
    fn enum_constants() {
        let root = parse("enum Color { RED, GREEN = 2 };");
        let decl = &root.children[0];
        assert_eq!(decl.kind, NodeKind::EnumDecl);
        assert_eq!(decl.spelling, "Color");
        assert_eq!(
            decl.children.iter().map(|c| c.spelling.as_str()).collect::<Vec<_>>(),
            vec!["RED", "GREEN"]
        );
        assert!(decl
            .children
            .iter()
            .all(|c| c.kind == NodeKind::EnumConstantDecl));
    }

    #[test]
    fn nested_namespaces() {
        let root = parse("namespace app { namespace detail { int leaked; } }");
        let outer = &root.children[0];
        assert_eq!(outer.kind, NodeKind::Namespace);
        assert_eq!(outer.spelling, "app");
        let inner = &outer.children[0];
        assert_eq!(inner.kind, NodeKind::Namespace);
        assert_eq!(inner.spelling, "detail");
        assert_eq!(inner.children[0].kind, NodeKind::VarDecl);
    }

    #[test]
    fn qualified_namespace_lowers_to_a_chain() {
        let root = parse("namespace app::detail { int leaked; }");
        let outer = &root.children[0];
        assert_eq!(outer.spelling, "app");
        let inner = &outer.children[0];
        assert_eq!(inner.kind, NodeKind::Namespace);
        assert_eq!(inner.spelling, "detail");
        assert_eq!(inner.children[0].spelling, "leaked");
    }

    #[test]
    fn using_alias() {
        let root = parse("using Callback = void (*)(int);");
        let alias = &root.children[0];
        assert_eq!(alias.kind, NodeKind::TypeAliasDecl);
        assert_eq!(alias.spelling, "Callback");
    }

    #[test]
    fn template_class_with_type_parameter() {
        let root = parse("template <typename T> class Vec { T item; };");
        let class = &root.children[0];
        assert_eq!(class.kind, NodeKind::ClassTemplate);
        assert_eq!(class.spelling, "Vec");
        assert_eq!(
            kinds(class),
            vec![NodeKind::TemplateTypeParameter, NodeKind::FieldDecl]
        );
        assert_eq!(class.children[0].spelling, "T");
    }

    #[test]
    fn template_function_with_non_type_parameter() {
        let root = parse("template <typename T, int N> T pick() { return T(); }");
        let func = &root.children[0];
        assert_eq!(func.kind, NodeKind::FunctionTemplate);
        assert_eq!(func.spelling, "pick");
        assert_eq!(
            kinds(func),
            vec![
                NodeKind::TemplateTypeParameter,
                NodeKind::TemplateNonTypeParameter
            ]
        );
        assert_eq!(func.children[1].spelling, "N");
    }

    #[test]
    fn extern_c_block_is_transparent() {
        let root = parse("extern \"C\" { int c_entry(void); }");
        assert_eq!(kinds(&root), vec![NodeKind::FunctionDecl]);
        assert_eq!(root.children[0].spelling, "c_entry");
    }

    #[test]
    fn out_of_line_definition_is_dropped() {
        let root = parse("void Widget::resize(int w) { }");
        assert!(root.children.is_empty());
    }

    #[test]
    fn locations_are_one_indexed() {
        let root = parse("\nint counter;\n");
        let var = &root.children[0];
        let location = var.location.as_ref().unwrap_or_else(|| panic!("no location"));
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 5);
    }

    #[test]
    fn union_members() {
        let root = parse("union Value { int i; float f; };");
        let record = &root.children[0];
        assert_eq!(record.kind, NodeKind::UnionDecl);
        assert_eq!(kinds(record), vec![NodeKind::FieldDecl, NodeKind::FieldDecl]);
    }
}
