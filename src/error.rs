//! Error taxonomy for one analysis run.
//!
//! Fatal failures abort the whole run for a component and surface as a single
//! [`AnalysisError`]; unresolvable hierarchy references are not errors and
//! only show up in tracing diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::archive::classfile::ClassFileError;

/// Failure outcome of a single component analysis.
///
/// A failed analysis for one component never aborts the analysis of others;
/// batch callers fold each component's outcome independently.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Collaborator-level failure (source provisioning, dependency
    /// materialization). Propagated from outside the core, never generated
    /// by it.
    #[error(transparent)]
    Acquisition(#[from] anyhow::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    EnvironmentBuild(#[from] EnvironmentBuildError),
}

/// A source file failed to parse. Fatal for the run: no partial environment
/// is built and no result set is produced.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error in {} at line {line}, column {column}", .path.display())]
    Syntax {
        path: PathBuf,
        /// 1-based line of the first syntax error.
        line: usize,
        /// 0-based column of the first syntax error.
        column: usize,
    },

    #[error("parser produced no syntax tree for {}", .path.display())]
    NoTree { path: PathBuf },
}

/// The symbol environment could not be constructed. Fatal for the run.
#[derive(Debug, Error)]
pub enum EnvironmentBuildError {
    #[error("IO error while reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ZIP error while reading {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("class parse error in {}: {source}", .path.display())]
    ClassFile {
        path: PathBuf,
        #[source]
        source: ClassFileError,
    },

    #[error("failed to initialize the Java parser: {source}")]
    Parser {
        #[source]
        source: tree_sitter::LanguageError,
    },
}
