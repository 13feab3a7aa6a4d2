//! Shared node-reading helpers for Java declarations: modifiers, superclass
//! and interface clauses, reference normalization.

use tree_sitter::Node;

/// Text of `node` within `content`.
pub(crate) fn node_text(content: &str, node: &Node) -> String {
    content
        .get(node.start_byte()..node.end_byte())
        .unwrap_or_default()
        .to_string()
}

/// All modifier tokens of a declaration (`public`, `abstract`, `final`, ...).
pub(super) fn modifiers(content: &str, node: Node) -> Vec<String> {
    node.children(&mut node.walk())
        .find(|c| c.kind() == "modifiers")
        .map(|modifiers_node| {
            modifiers_node
                .children(&mut modifiers_node.walk())
                .filter(|c| !c.kind().contains("annotation"))
                .map(|c| node_text(content, &c))
                .collect()
        })
        .unwrap_or_default()
}

/// Superclass reference of a class declaration, type arguments stripped.
pub(super) fn superclass(content: &str, node: Node) -> Option<String> {
    let superclass_node = node
        .children(&mut node.walk())
        .find(|c| c.kind() == "superclass")?;

    let type_node = superclass_node
        .children(&mut superclass_node.walk())
        .find(|c| is_type_reference(c.kind()))?;

    Some(strip_type_arguments(&node_text(content, &type_node)))
}

/// Interfaces a class, enum or record implements, declaration order.
pub(super) fn implemented_interfaces(content: &str, node: Node) -> Vec<String> {
    interface_list(content, node, "super_interfaces")
}

/// Interfaces an interface extends, declaration order.
pub(super) fn extended_interfaces(content: &str, node: Node) -> Vec<String> {
    interface_list(content, node, "extends_interfaces")
}

fn interface_list(content: &str, node: Node, clause_kind: &str) -> Vec<String> {
    let Some(clause) = node
        .children(&mut node.walk())
        .find(|c| c.kind() == clause_kind)
    else {
        return Vec::new();
    };

    let Some(type_list) = clause
        .children(&mut clause.walk())
        .find(|c| c.kind() == "type_list")
    else {
        return Vec::new();
    };

    type_list
        .children(&mut type_list.walk())
        .filter(|c| is_type_reference(c.kind()))
        .map(|c| strip_type_arguments(&node_text(content, &c)))
        .collect()
}

fn is_type_reference(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier" | "generic_type" | "scoped_type_identifier"
    )
}

/// Drop `<...>` type arguments from a reference; hierarchy edges are erased.
pub(crate) fn strip_type_arguments(reference: &str) -> String {
    match reference.find('<') {
        Some(index) => reference[..index].trim().to_string(),
        None => reference.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_type_arguments() {
        assert_eq!(strip_type_arguments("Describable<T>"), "Describable");
        assert_eq!(
            strip_type_arguments("hudson.model.Describable<Foo, Bar>"),
            "hudson.model.Describable"
        );
        assert_eq!(strip_type_arguments("Plain"), "Plain");
    }
}
