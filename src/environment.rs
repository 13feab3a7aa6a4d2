//! The symbol environment: every type the hierarchy walk can see, indexed
//! by qualified name.
//!
//! Descriptors live in an arena; lookups go through a name index, and
//! hierarchy edges stay plain name strings resolved on demand. Local types
//! keep their declaration-discovery order so the walker's roots are
//! reproducible. The environment is built once per analysis run and never
//! mutated afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::archive;
use crate::error::{AnalysisError, EnvironmentBuildError, ParseError};
use crate::extractor::types::{ResolutionScope, TypeDescriptor};
use crate::extractor::CompilationUnitExtractor;
use crate::language;
use crate::sources;

#[derive(Debug)]
pub struct SymbolEnvironment {
    arena: Vec<TypeDescriptor>,
    index: HashMap<String, usize>,
    local_count: usize,
}

/// Outcome of resolving one hierarchy reference.
pub enum Resolution<'a> {
    /// A descriptor is on the classpath; traversal can continue through it.
    Known(&'a TypeDescriptor),
    /// The qualified name is determined (qualified text, single-type import
    /// or same-package presumption) but nothing on the classpath declares
    /// it. Usable for identity checks, a dead end for traversal.
    Presumed(String),
}

impl SymbolEnvironment {
    /// Build the environment for one analysis run: parse every source file
    /// under `sources_dir`, then index the compiled archives under
    /// `dependency_dir`.
    ///
    /// Any syntactically invalid source file fails the whole build; there
    /// are no partial environments.
    pub fn build(sources_dir: &Path, dependency_dir: &Path) -> Result<Self, AnalysisError> {
        let mut env = SymbolEnvironment {
            arena: Vec::new(),
            index: HashMap::new(),
            local_count: 0,
        };

        let files = sources::collect_java_files(sources_dir)?;
        let mut parser = language::java_parser()
            .map_err(|source| EnvironmentBuildError::Parser { source })?;

        for path in &files {
            let content = fs::read_to_string(path).map_err(|source| {
                EnvironmentBuildError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            let tree = parser
                .parse(&content, None)
                .ok_or_else(|| ParseError::NoTree { path: path.clone() })?;
            if let Some(point) = language::first_syntax_error(&tree) {
                return Err(ParseError::Syntax {
                    path: path.clone(),
                    line: point.row + 1,
                    column: point.column,
                }
                .into());
            }
            for descriptor in CompilationUnitExtractor::new(&content).extract(&tree) {
                env.insert_local(descriptor);
            }
        }
        env.local_count = env.arena.len();

        for descriptor in archive::scan_dependency_dir(dependency_dir)? {
            env.insert_dependency(descriptor);
        }

        debug!(
            local = env.local_count,
            total = env.arena.len(),
            "symbol environment ready"
        );
        Ok(env)
    }

    fn insert_local(&mut self, descriptor: TypeDescriptor) {
        if self.index.contains_key(&descriptor.qualified_name) {
            warn!(
                name = %descriptor.qualified_name,
                "duplicate local type declaration, keeping the first"
            );
            return;
        }
        self.index
            .insert(descriptor.qualified_name.clone(), self.arena.len());
        self.arena.push(descriptor);
    }

    /// Local declarations shadow classpath classes of the same name; across
    /// archives the first one scanned wins.
    fn insert_dependency(&mut self, descriptor: TypeDescriptor) {
        if self.index.contains_key(&descriptor.qualified_name) {
            return;
        }
        self.index
            .insert(descriptor.qualified_name.clone(), self.arena.len());
        self.arena.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&TypeDescriptor> {
        self.index.get(qualified_name).map(|&i| &self.arena[i])
    }

    /// Locally declared types in declaration-discovery order: the candidate
    /// roots of the hierarchy walk.
    pub fn local_types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.arena[..self.local_count].iter()
    }

    /// Resolve one supertype/interface reference as written inside `scope`.
    ///
    /// Lookup order follows Java's: enclosing types innermost first, then
    /// single-type imports, the declaring package, on-demand imports and
    /// `java.lang`. A reference that matches nothing still produces a
    /// presumed qualified name whenever one is determined by the source
    /// text alone, so identity checks against off-classpath types (platform
    /// types, a marker whose archive was not materialized) keep working.
    pub fn resolve<'a>(&'a self, reference: &str, scope: &ResolutionScope) -> Resolution<'a> {
        if reference.contains('.') {
            return match self.get(reference) {
                Some(descriptor) => Resolution::Known(descriptor),
                None => Resolution::Presumed(reference.to_string()),
            };
        }

        for depth in (1..=scope.enclosing.len()).rev() {
            if let Some(descriptor) = self.get(&scope.candidate(reference, depth)) {
                return Resolution::Known(descriptor);
            }
        }

        if let Some(mapped) = scope.single_imports.get(reference) {
            return match self.get(mapped) {
                Some(descriptor) => Resolution::Known(descriptor),
                None => Resolution::Presumed(mapped.clone()),
            };
        }

        let package_candidate = scope.candidate(reference, 0);
        if let Some(descriptor) = self.get(&package_candidate) {
            return Resolution::Known(descriptor);
        }

        for wildcard in &scope.wildcard_imports {
            if let Some(descriptor) = self.get(&format!("{wildcard}.{reference}")) {
                return Resolution::Known(descriptor);
            }
        }

        if let Some(descriptor) = self.get(&format!("java.lang.{reference}")) {
            return Resolution::Known(descriptor);
        }

        // An unqualified reference that survived compilation and matched no
        // import names a same-package type.
        Resolution::Presumed(package_candidate)
    }
}
