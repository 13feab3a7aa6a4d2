//! Structural type descriptors shared by the source and archive sides of the
//! symbol environment.

use std::collections::HashMap;

/// Declaration form of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// Name-resolution context of a source compilation unit, as seen from one
/// declared type. Archive-backed descriptors carry an empty scope because
/// class-file references are already fully qualified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionScope {
    /// Declared package; `None` for the default package.
    pub package: Option<String>,
    /// Single-type imports, simple name to qualified name.
    pub single_imports: HashMap<String, String>,
    /// On-demand imports (`import a.b.*`), stored without the `.*`.
    pub wildcard_imports: Vec<String>,
    /// Simple names of the enclosing types, outermost first.
    pub enclosing: Vec<String>,
}

impl ResolutionScope {
    /// Qualified-name candidate for `simple` seen from `depth` enclosing
    /// levels; `depth` 0 is package level.
    pub(crate) fn candidate(&self, simple: &str, depth: usize) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(package) = &self.package {
            parts.push(package);
        }
        parts.extend(self.enclosing[..depth].iter().map(String::as_str));
        parts.push(simple);
        parts.join(".")
    }
}

/// Structural view of one declared type: exactly the slice of a declaration
/// the hierarchy walk needs. Method bodies, members and generics never make
/// it into a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Fully qualified, dot-separated name, nesting included
    /// (`a.b.Outer.Inner`).
    pub qualified_name: String,
    pub kind: TypeKind,
    /// Declared `abstract`; always set for interfaces and annotations.
    pub is_abstract: bool,
    /// Superclass reference as written in source, or the dotted binary name
    /// for archive classes. Absent at a hierarchy root.
    pub superclass: Option<String>,
    /// Directly implemented interfaces; for an interface, the directly
    /// extended ones. Declaration order.
    pub interfaces: Vec<String>,
    /// Resolution context for the references above.
    pub scope: ResolutionScope,
    /// Declared in the analyzed component's own sources, which makes it a
    /// candidate root for the hierarchy walk.
    pub is_local: bool,
}
