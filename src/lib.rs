//! Extpoint - static discovery of extension-point implementations in Java
//! components.
//!
//! Given a directory of extracted component sources and a directory holding
//! the component's compiled dependency closure, the crate parses every
//! source file, builds a symbol environment spanning both, and walks each
//! declared type's superclass/interface chain looking for a fixed marker
//! interface. The output is an ordered list of (root, implementor) records
//! for an external cataloging step; no catalog format is prescribed here,
//! and nothing from the analyzed component is ever executed.
//!
//! ```no_run
//! use std::path::Path;
//! use extpoint::ExtensionScanner;
//!
//! # fn main() -> Result<(), extpoint::AnalysisError> {
//! let scanner = ExtensionScanner::new("hudson.ExtensionPoint");
//! let records = scanner.analyze(Path::new("work/sources"), Path::new("work/deps"))?;
//! for record in &records {
//!     println!("{} as {}", record.root, record.implementor);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod environment;
pub mod error;
pub mod extractor;
pub mod language;
pub mod sources;
pub mod walker;

pub use environment::{Resolution, SymbolEnvironment};
pub use error::{AnalysisError, EnvironmentBuildError, ParseError};
pub use extractor::types::{ResolutionScope, TypeDescriptor, TypeKind};
pub use walker::{ExtensionRecord, HierarchyWalker};

use std::path::Path;

use tracing::info;

/// One-shot analysis pipeline for a fixed marker interface.
///
/// Each [`analyze`](ExtensionScanner::analyze) call is a fresh, from-scratch
/// analysis of one component version; the scanner holds no state between
/// calls, so independent components may be analyzed from separate scanners
/// concurrently as long as their working directories are isolated.
pub struct ExtensionScanner {
    marker: String,
}

impl ExtensionScanner {
    /// `marker` is the qualified name of the capability interface to search
    /// for, fixed for every analysis this scanner performs.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Analyze one component: parse `sources_dir`, index `dependency_dir`,
    /// walk the hierarchy. Fatal failures abort the run with no partial
    /// results; everything built here is dropped when the call returns.
    pub fn analyze(
        &self,
        sources_dir: &Path,
        dependency_dir: &Path,
    ) -> Result<Vec<ExtensionRecord>, AnalysisError> {
        let env = SymbolEnvironment::build(sources_dir, dependency_dir)?;
        let records = HierarchyWalker::new(&env, &self.marker).walk();
        info!(
            marker = %self.marker,
            types = env.len(),
            records = records.len(),
            "analysis complete"
        );
        Ok(records)
    }
}
