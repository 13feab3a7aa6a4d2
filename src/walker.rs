//! Hierarchy walker: proves, for every locally declared type, whether the
//! marker interface is reachable through superclass/interface edges, and
//! records where the marker is named.
//!
//! The walk is a pure, synchronous computation over an already-built
//! [`SymbolEnvironment`]; it never fails. References that resolve to nothing
//! on the classpath end their branch silently and are only visible as debug
//! diagnostics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::environment::{Resolution, SymbolEnvironment};
use crate::extractor::types::TypeDescriptor;

/// One discovered implementation: the locally declared root and the type in
/// its hierarchy that directly names the marker among its interfaces. Root
/// and implementor coincide for direct implementations; for inherited ones
/// the implementor is the ancestor that declares the extension contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub root: String,
    pub implementor: String,
}

/// Walks the symbol environment for implementors of one marker interface.
pub struct HierarchyWalker<'a> {
    env: &'a SymbolEnvironment,
    marker: &'a str,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(env: &'a SymbolEnvironment, marker: &'a str) -> Self {
        Self { env, marker }
    }

    /// Traverse every local root and collect extension records in discovery
    /// order. No sorting, no deduplication: a root reaching the marker
    /// through several distinct ancestors yields one record per ancestor.
    pub fn walk(&self) -> Vec<ExtensionRecord> {
        let mut records = Vec::new();
        for root in self.env.local_types() {
            self.walk_root(root, &mut records);
        }
        records
    }

    /// Explicit depth-first traversal from one root. Well-formed class
    /// hierarchies are acyclic; the per-root visited set makes malformed
    /// input terminate too, and keeps diamonds from double-reporting one
    /// ancestor.
    fn walk_root(&self, root: &TypeDescriptor, records: &mut Vec<ExtensionRecord>) {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root.qualified_name.clone());
        let mut stack: Vec<&TypeDescriptor> = vec![root];

        while let Some(current) = stack.pop() {
            let mut next: Vec<&TypeDescriptor> = Vec::new();

            for reference in &current.interfaces {
                match self.env.resolve(reference, &current.scope) {
                    Resolution::Known(descriptor) => {
                        if descriptor.qualified_name == self.marker {
                            records.push(ExtensionRecord {
                                root: root.qualified_name.clone(),
                                implementor: current.qualified_name.clone(),
                            });
                        }
                        next.push(descriptor);
                    }
                    Resolution::Presumed(name) => {
                        if name == self.marker {
                            records.push(ExtensionRecord {
                                root: root.qualified_name.clone(),
                                implementor: current.qualified_name.clone(),
                            });
                        } else {
                            debug!(
                                root = %root.qualified_name,
                                reference = %name,
                                "interface not on classpath, branch ends"
                            );
                        }
                    }
                }
            }

            if let Some(reference) = &current.superclass {
                match self.env.resolve(reference, &current.scope) {
                    Resolution::Known(descriptor) => next.push(descriptor),
                    Resolution::Presumed(name) => debug!(
                        root = %root.qualified_name,
                        reference = %name,
                        "superclass not on classpath, branch ends"
                    ),
                }
            }

            // LIFO stack: reversed push keeps declaration order on pop.
            for descriptor in next.into_iter().rev() {
                if visited.insert(descriptor.qualified_name.clone()) {
                    stack.push(descriptor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::classfile::{class_bytes, ACC_ABSTRACT, ACC_INTERFACE};
    use crate::archive::testjar::write_jar;
    use std::fs;
    use std::path::PathBuf;

    const IFACE: u16 = ACC_INTERFACE | ACC_ABSTRACT;

    fn scratch() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let sources = dir.path().join("sources");
        let deps = dir.path().join("deps");
        fs::create_dir_all(&sources).unwrap();
        fs::create_dir_all(&deps).unwrap();
        (dir, sources, deps)
    }

    fn record(root: &str, implementor: &str) -> ExtensionRecord {
        ExtensionRecord {
            root: root.to_string(),
            implementor: implementor.to_string(),
        }
    }

    #[test]
    fn direct_inherited_and_interface_paths() {
        let (_dir, sources, deps) = scratch();
        fs::write(sources.join("A.java"), "class A implements M {}").unwrap();
        fs::write(sources.join("B.java"), "class B extends A {}").unwrap();
        fs::write(sources.join("C.java"), "class C implements I {}").unwrap();
        write_jar(
            &deps.join("dep.jar"),
            &[
                ("M.class", class_bytes("M", IFACE, Some("java/lang/Object"), &[])),
                ("I.class", class_bytes("I", IFACE, Some("java/lang/Object"), &["M"])),
            ],
        );

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "M").walk();
        assert_eq!(
            records,
            [record("A", "A"), record("B", "A"), record("C", "I")]
        );
    }

    #[test]
    fn no_marker_anywhere_yields_empty_result() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("Foo.java"),
            "package p; class Foo extends Bar {} class Bar implements Comparable {}",
        )
        .unwrap();

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "hudson.ExtensionPoint").walk();
        assert!(records.is_empty());
    }

    #[test]
    fn abstract_types_are_eligible_roots() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("D.java"),
            "package p; import m.Mark; public abstract class D implements Mark {}",
        )
        .unwrap();
        write_jar(
            &deps.join("dep.jar"),
            &[(
                "m/Mark.class",
                class_bytes("m/Mark", IFACE, Some("java/lang/Object"), &[]),
            )],
        );

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "m.Mark").walk();
        assert_eq!(records, [record("p.D", "p.D")]);
    }

    #[test]
    fn malformed_cyclic_hierarchy_terminates() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("Cycle.java"),
            "package p; class X extends Y {} class Y extends X {}",
        )
        .unwrap();

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "m.Mark").walk();
        assert!(records.is_empty());
    }

    #[test]
    fn dead_end_branch_does_not_stop_siblings() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("E.java"),
            "package p; import ext.Gone; import m.Mark; class E implements Gone, Mark {}",
        )
        .unwrap();
        write_jar(
            &deps.join("dep.jar"),
            &[(
                "m/Mark.class",
                class_bytes("m/Mark", IFACE, Some("java/lang/Object"), &[]),
            )],
        );

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "m.Mark").walk();
        assert_eq!(records, [record("p.E", "p.E")]);
    }

    #[test]
    fn zero_archives_direct_implementor_still_reported() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("G.java"),
            "package p; import hudson.ExtensionPoint; public class G implements ExtensionPoint {}",
        )
        .unwrap();

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "hudson.ExtensionPoint").walk();
        assert_eq!(records, [record("p.G", "p.G")]);
    }

    #[test]
    fn multiple_marker_ancestors_yield_one_record_each() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("F.java"),
            "package p; import m.P; import m.Q; class F implements P, Q {}",
        )
        .unwrap();
        write_jar(
            &deps.join("dep.jar"),
            &[
                ("m/Mark.class", class_bytes("m/Mark", IFACE, Some("java/lang/Object"), &[])),
                ("m/P.class", class_bytes("m/P", IFACE, Some("java/lang/Object"), &["m/Mark"])),
                ("m/Q.class", class_bytes("m/Q", IFACE, Some("java/lang/Object"), &["m/Mark"])),
            ],
        );

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "m.Mark").walk();
        assert_eq!(records, [record("p.F", "m.P"), record("p.F", "m.Q")]);
    }

    #[test]
    fn diamond_ancestor_is_reported_once_per_root() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("D.java"),
            "package p; import m.A1; import m.A2; class D implements A1, A2 {}",
        )
        .unwrap();
        write_jar(
            &deps.join("dep.jar"),
            &[
                ("m/Mark.class", class_bytes("m/Mark", IFACE, Some("java/lang/Object"), &[])),
                ("m/S.class", class_bytes("m/S", IFACE, Some("java/lang/Object"), &["m/Mark"])),
                ("m/A1.class", class_bytes("m/A1", IFACE, Some("java/lang/Object"), &["m/S"])),
                ("m/A2.class", class_bytes("m/A2", IFACE, Some("java/lang/Object"), &["m/S"])),
            ],
        );

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "m.Mark").walk();
        assert_eq!(records, [record("p.D", "m.S")]);
    }

    #[test]
    fn superclass_edges_are_followed_but_not_marker_checked() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("H.java"),
            "package p; import m.Base; class H extends Base {}",
        )
        .unwrap();
        write_jar(
            &deps.join("dep.jar"),
            &[
                ("m/Mark.class", class_bytes("m/Mark", IFACE, Some("java/lang/Object"), &[])),
                (
                    "m/Base.class",
                    class_bytes("m/Base", 0, Some("java/lang/Object"), &["m/Mark"]),
                ),
            ],
        );

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "m.Mark").walk();
        assert_eq!(records, [record("p.H", "m.Base")]);
    }

    #[test]
    fn local_interface_extending_marker_is_its_own_root() {
        let (_dir, sources, deps) = scratch();
        fs::write(
            sources.join("J.java"),
            "package p; import m.Mark; interface J extends Mark {}",
        )
        .unwrap();
        write_jar(
            &deps.join("dep.jar"),
            &[(
                "m/Mark.class",
                class_bytes("m/Mark", IFACE, Some("java/lang/Object"), &[]),
            )],
        );

        let env = SymbolEnvironment::build(&sources, &deps).unwrap();
        let records = HierarchyWalker::new(&env, "m.Mark").walk();
        assert_eq!(records, [record("p.J", "p.J")]);
    }
}
