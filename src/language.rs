//! Language support - tree-sitter configuration for the analyzed sources.
//!
//! The components this crate analyzes are distributed as Java source; all
//! tree-sitter grammar configuration lives here so the rest of the crate
//! never touches grammar details.

use tree_sitter::{Language, LanguageError, Node, Parser, Point, Tree};

/// Tree-sitter grammar for Java source files.
pub fn java_language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

/// Build a parser configured for Java.
pub fn java_parser() -> Result<Parser, LanguageError> {
    let mut parser = Parser::new();
    parser.set_language(&java_language())?;
    Ok(parser)
}

/// Locate the first syntax error in a parsed tree, if any.
///
/// Tree-sitter always produces a tree; syntax errors surface as ERROR or
/// missing nodes inside it. Returns the position of the first one in
/// document order (0-based row and column).
pub fn first_syntax_error(tree: &Tree) -> Option<Point> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }
    find_error_node(root)
}

fn find_error_node(node: Node) -> Option<Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(point) = find_error_node(child) {
            return Some(point);
        }
    }
    Some(node.start_position())
}
