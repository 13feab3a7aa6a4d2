//! Dependency-closure scanning.
//!
//! The dependency materializer leaves behind a directory of compiled
//! archives; this module turns every class they contain into a type
//! descriptor without ever touching the classes' original sources. Only
//! structural metadata is read - see [`classfile`].

pub mod classfile;

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::EnvironmentBuildError;
use crate::extractor::types::{ResolutionScope, TypeDescriptor, TypeKind};
use self::classfile::ClassHeader;

/// Scan every archive under `dir` and return descriptors for the classes
/// they declare: archives in sorted path order, classes in entry order.
///
/// An empty directory is a valid, empty dependency closure.
pub fn scan_dependency_dir(dir: &Path) -> Result<Vec<TypeDescriptor>, EnvironmentBuildError> {
    let entries = fs::read_dir(dir).map_err(|source| EnvironmentBuildError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| EnvironmentBuildError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_archive(&path) {
            archives.push(path);
        }
    }
    archives.sort();

    let mut descriptors = Vec::new();
    for path in &archives {
        scan_archive(path, &mut descriptors)?;
    }

    debug!(
        archives = archives.len(),
        classes = descriptors.len(),
        "scanned dependency closure"
    );
    Ok(descriptors)
}

fn scan_archive(path: &Path, out: &mut Vec<TypeDescriptor>) -> Result<(), EnvironmentBuildError> {
    let file = File::open(path).map_err(|source| EnvironmentBuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|source| EnvironmentBuildError::Archive {
            path: path.to_path_buf(),
            source,
        })?;

    let mut buffer = Vec::new();
    for idx in 0..archive.len() {
        let mut entry = archive
            .by_index(idx)
            .map_err(|source| EnvironmentBuildError::Archive {
                path: path.to_path_buf(),
                source,
            })?;

        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();
        if should_skip_entry(&name) {
            continue;
        }

        buffer.clear();
        entry
            .read_to_end(&mut buffer)
            .map_err(|source| EnvironmentBuildError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let header =
            classfile::read_header(&buffer).map_err(|source| EnvironmentBuildError::ClassFile {
                path: archive_entry_path(path, &name),
                source,
            })?;
        out.push(descriptor_from_header(header));
    }

    Ok(())
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

fn should_skip_entry(name: &str) -> bool {
    if !name.ends_with(".class") {
        return true;
    }
    if name.starts_with("META-INF/") {
        return true;
    }
    if name == "module-info.class" || name.ends_with("/module-info.class") {
        return true;
    }
    // Anonymous and local classes (Outer$1, Outer$2Local) carry no
    // catalog-usable name.
    has_synthetic_nested_segment(name)
}

fn has_synthetic_nested_segment(name: &str) -> bool {
    let stem = name.trim_end_matches(".class");
    stem.split('$')
        .skip(1)
        .any(|segment| segment.chars().next().is_none_or(|c| c.is_ascii_digit()))
}

fn descriptor_from_header(header: ClassHeader) -> TypeDescriptor {
    let kind = if header.is_annotation() {
        TypeKind::Annotation
    } else if header.is_interface() {
        TypeKind::Interface
    } else if header.is_enum() {
        TypeKind::Enum
    } else {
        TypeKind::Class
    };

    TypeDescriptor {
        qualified_name: dotted_name(&header.binary_name),
        kind,
        is_abstract: header.is_abstract(),
        superclass: header.superclass.as_deref().map(dotted_name),
        interfaces: header.interfaces.iter().map(|n| dotted_name(n)).collect(),
        scope: ResolutionScope::default(),
        is_local: false,
    }
}

/// Binary name (`a/b/Outer$Inner`) to the dotted form source references use.
fn dotted_name(binary: &str) -> String {
    binary.replace(['/', '$'], ".")
}

fn archive_entry_path(archive: &Path, entry: &str) -> PathBuf {
    let mut display = archive.display().to_string();
    display.push('!');
    display.push('/');
    display.push_str(entry);
    PathBuf::from(display)
}
