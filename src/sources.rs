//! Source tree discovery.
//!
//! The provisioning collaborator hands the crate a directory of extracted
//! `.java` files with arbitrary nesting; this module collects them. Paths
//! are sorted so declaration-discovery order is reproducible between runs
//! over the same tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EnvironmentBuildError;

/// Collect every `.java` file under `dir`, recursively.
pub fn collect_java_files(dir: &Path) -> Result<Vec<PathBuf>, EnvironmentBuildError> {
    let mut files = Vec::new();
    collect_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_recursive(dir: &Path, results: &mut Vec<PathBuf>) -> Result<(), EnvironmentBuildError> {
    let entries = fs::read_dir(dir).map_err(|source| EnvironmentBuildError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| EnvironmentBuildError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_recursive(&path, results)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("java") {
            results.push(path);
        }
    }

    Ok(())
}
