//! Locating Java source files across an ordered set of source roots

use crate::source::CompilationUnit;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Ordered list of directories holding domain sources
///
/// Earlier roots take precedence when a class is declared in more than one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRoots {
    roots: Vec<PathBuf>,
}

/// A located and parsed class
#[derive(Debug, Clone)]
pub struct LocatedClass {
    pub path: PathBuf,
    pub unit: CompilationUnit,
}

impl SourceRoots {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Stable identity of the root list, used to key memoized answers
    pub fn identity(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.roots.hash(&mut hasher);
        hasher.finish()
    }

    /// Find the file declaring `class_name` as a top-level type
    ///
    /// Roots are searched in order and each tree is walked depth-first in file
    /// name order. A candidate named `<class_name>.java` only counts if it parses
    /// and actually declares the class; unreadable candidates are skipped.
    pub fn find_class(&self, class_name: &str) -> Option<LocatedClass> {
        let file_name = format!("{class_name}.java");
        self.roots
            .iter()
            .find_map(|root| find_in_tree(root, &file_name, class_name))
    }

    /// Resolve the file holding a superclass referenced from `unit`
    ///
    /// For each root in order, the first applicable rule picks a candidate path:
    /// a single-type import, the current package, the directory of the referencing
    /// file (only when inside that root), then the name read as fully qualified.
    /// The first candidate that exists wins.
    pub fn find_superclass(
        &self,
        unit: &CompilationUnit,
        superclass: &str,
        current_dir: &Path,
    ) -> Option<PathBuf> {
        self.roots.iter().find_map(|root| {
            let candidate = superclass_candidate(root, unit, superclass, current_dir)?;
            candidate.is_file().then_some(candidate)
        })
    }
}

fn superclass_candidate(
    root: &Path,
    unit: &CompilationUnit,
    superclass: &str,
    current_dir: &Path,
) -> Option<PathBuf> {
    if let Some(imported) = unit.import_for(superclass) {
        return Some(qualified_path(root, imported));
    }

    if let Some(package) = &unit.package {
        let candidate = qualified_path(root, &format!("{package}.{superclass}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let sibling = current_dir.join(format!("{superclass}.java"));
    if sibling.is_file() && current_dir.starts_with(root) {
        return Some(sibling);
    }

    if superclass.contains('.') {
        return Some(qualified_path(root, superclass));
    }

    None
}

fn qualified_path(root: &Path, qualified: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in qualified.split('.') {
        path.push(segment);
    }
    path.set_extension("java");
    path
}

fn find_in_tree(dir: &Path, file_name: &str, class_name: &str) -> Option<LocatedClass> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return None;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            if let Some(found) = find_in_tree(&path, file_name, class_name) {
                return Some(found);
            }
        } else if file_type.is_file() && entry.file_name() == file_name {
            match CompilationUnit::parse_file(&path) {
                Ok(unit) if unit.find_type(class_name).is_some() => {
                    return Some(LocatedClass { path, unit });
                }
                Ok(_) => {
                    tracing::debug!(path = %path.display(), class = class_name, "File does not declare class");
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping unparseable candidate");
                }
            }
        }
    }
    None
}
