//! Type-descriptor extraction from parsed Java compilation units.
//!
//! This module is organized into focused sub-modules:
//! - helpers: node-reading utilities (modifiers, extends/implements clauses)
//! - types: the descriptor model shared with the archive side
//!
//! Extraction is purely structural: for every member type declared in a
//! compilation unit it captures the qualified name, kind, abstract flag and
//! the raw superclass/interface references, together with the unit's
//! package and imports for later resolution. Local and anonymous classes
//! inside method bodies are not candidate roots and are skipped.

pub(crate) mod helpers;
pub mod types;

use tree_sitter::{Node, Tree};

use self::types::{ResolutionScope, TypeDescriptor, TypeKind};

/// Extracts the structural slice of every member type declared in one
/// compilation unit.
pub struct CompilationUnitExtractor<'a> {
    content: &'a str,
    scope: ResolutionScope,
}

impl<'a> CompilationUnitExtractor<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            scope: ResolutionScope::default(),
        }
    }

    /// Extract all member type declarations from `tree`, outer types before
    /// the types nested in them.
    pub fn extract(mut self, tree: &Tree) -> Vec<TypeDescriptor> {
        let root = tree.root_node();
        self.collect_unit_scope(root);

        let mut descriptors = Vec::new();
        let mut enclosing = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            self.visit(child, &mut enclosing, &mut descriptors);
        }
        descriptors
    }

    fn collect_unit_scope(&mut self, root: Node) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    self.scope.package = package_name(self.content, child);
                }
                "import_declaration" => self.record_import(child),
                _ => {}
            }
        }
    }

    fn record_import(&mut self, node: Node) {
        // Static imports bring in members, not types; they cannot name a
        // supertype and are ignored.
        let is_static = node
            .children(&mut node.walk())
            .any(|c| c.kind() == "static");
        if is_static {
            return;
        }

        let Some(path_node) = node
            .children(&mut node.walk())
            .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
        else {
            return;
        };
        let path = helpers::node_text(self.content, &path_node);

        let is_wildcard = node
            .children(&mut node.walk())
            .any(|c| c.kind() == "asterisk");
        if is_wildcard {
            self.scope.wildcard_imports.push(path);
        } else if let Some((_, simple)) = path.rsplit_once('.') {
            self.scope
                .single_imports
                .insert(simple.to_string(), path.clone());
        }
    }

    fn visit(&self, node: Node, enclosing: &mut Vec<String>, out: &mut Vec<TypeDescriptor>) {
        let Some(kind) = declaration_kind(node.kind()) else {
            return;
        };
        let Some(name_node) = node
            .children(&mut node.walk())
            .find(|c| c.kind() == "identifier")
        else {
            return;
        };
        let name = helpers::node_text(self.content, &name_node);

        out.push(self.build_descriptor(node, kind, &name, enclosing));

        // Member types nested in this declaration's body.
        if let Some(body) = node.child_by_field_name("body") {
            enclosing.push(name);
            self.visit_body(body, enclosing, out);
            enclosing.pop();
        }
    }

    fn visit_body(&self, body: Node, enclosing: &mut Vec<String>, out: &mut Vec<TypeDescriptor>) {
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            if child.kind() == "enum_body_declarations" {
                self.visit_body(child, enclosing, out);
            } else {
                self.visit(child, enclosing, out);
            }
        }
    }

    fn build_descriptor(
        &self,
        node: Node,
        kind: TypeKind,
        name: &str,
        enclosing: &[String],
    ) -> TypeDescriptor {
        let modifiers = helpers::modifiers(self.content, node);
        let is_abstract = matches!(kind, TypeKind::Interface | TypeKind::Annotation)
            || modifiers.iter().any(|m| m == "abstract");

        let superclass = match kind {
            TypeKind::Class => helpers::superclass(self.content, node),
            _ => None,
        };
        let interfaces = match kind {
            TypeKind::Interface => helpers::extended_interfaces(self.content, node),
            TypeKind::Annotation => Vec::new(),
            _ => helpers::implemented_interfaces(self.content, node),
        };

        let mut scope = self.scope.clone();
        scope.enclosing = enclosing.to_vec();
        let qualified_name = scope.candidate(name, enclosing.len());

        TypeDescriptor {
            qualified_name,
            kind,
            is_abstract,
            superclass,
            interfaces,
            scope,
            is_local: true,
        }
    }
}

fn declaration_kind(node_kind: &str) -> Option<TypeKind> {
    match node_kind {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "record_declaration" => Some(TypeKind::Record),
        "annotation_type_declaration" => Some(TypeKind::Annotation),
        _ => None,
    }
}

fn package_name(content: &str, node: Node) -> Option<String> {
    node.children(&mut node.walk())
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
        .map(|c| helpers::node_text(content, &c))
}
