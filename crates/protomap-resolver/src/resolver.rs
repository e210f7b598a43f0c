//! Deciding whether a domain field must be reached through accessors
//!
//! A field needs accessors when it is inherited from a superclass that declares it
//! `private` or `protected`. Fields declared on the class itself never do. The
//! superclass chain is followed through source files first, across every root, and
//! only when a superclass has no source does runtime introspection take over.

use crate::error::{ResolveError, ResolveResult};
use crate::introspect::{ClassRegistry, RuntimeLookup, TypeIntrospector, find_runtime_field};
use crate::locate::SourceRoots;
use crate::source::{CompilationUnit, Visibility};
use protomap_core::naming::{getter_name, setter_name, simple_name};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the declaration of a field was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldOrigin {
    /// Declared by the class itself
    Local { path: PathBuf },
    /// Inherited from a superclass read from source
    Source {
        class: String,
        path: PathBuf,
        visibility: Visibility,
    },
    /// Inherited from a superclass known only through introspection
    Runtime {
        class: String,
        visibility: Visibility,
    },
    /// No declaration was found
    Unresolved,
}

impl FieldOrigin {
    pub fn needs_accessor(&self) -> bool {
        match self {
            FieldOrigin::Source { visibility, .. } | FieldOrigin::Runtime { visibility, .. } => {
                visibility.is_restricted()
            }
            FieldOrigin::Local { .. } | FieldOrigin::Unresolved => false,
        }
    }
}

/// Answer for one (class, field) query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibilityResolution {
    pub class_name: String,
    pub field_name: String,
    pub needs_accessor: bool,
    pub getter: String,
    pub setter: String,
    pub origin: FieldOrigin,
}

impl VisibilityResolution {
    pub fn new(class_name: &str, field_name: &str, origin: FieldOrigin) -> Self {
        Self {
            class_name: class_name.to_string(),
            field_name: field_name.to_string(),
            needs_accessor: origin.needs_accessor(),
            getter: getter_name(field_name),
            setter: setter_name(field_name),
            origin,
        }
    }
}

/// Anything that can answer field visibility queries
pub trait VisibilityQuery: Send + Sync {
    fn needs_accessor(&self, class_name: &str, field_name: &str)
    -> ResolveResult<VisibilityResolution>;
}

/// Resolver over an ordered set of source roots with a runtime fallback
pub struct HierarchyResolver {
    roots: SourceRoots,
    introspector: Arc<dyn TypeIntrospector>,
}

impl std::fmt::Debug for HierarchyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyResolver")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Walk {
    visited: HashSet<PathBuf>,
    chain: Vec<String>,
}

impl Walk {
    fn enter(&mut self, path: &Path, class_name: &str) -> ResolveResult<()> {
        self.chain.push(class_name.to_string());
        if !self.visited.insert(path.to_path_buf()) {
            return Err(ResolveError::CyclicHierarchy {
                chain: self.chain.join(" -> "),
            });
        }
        Ok(())
    }
}

impl HierarchyResolver {
    /// Create a resolver backed by the built-in JDK class registry
    pub fn new(roots: SourceRoots) -> Self {
        Self {
            roots,
            introspector: Arc::new(ClassRegistry::with_jdk_defaults()),
        }
    }

    pub fn with_introspector(mut self, introspector: Arc<dyn TypeIntrospector>) -> Self {
        self.introspector = introspector;
        self
    }

    pub fn roots(&self) -> &SourceRoots {
        &self.roots
    }

    /// Resolve a field of a domain class named by its simple name
    pub fn resolve(&self, class_name: &str, field_name: &str) -> ResolveResult<VisibilityResolution> {
        let located = self
            .roots
            .find_class(class_name)
            .ok_or_else(|| ResolveError::NotFound {
                class: class_name.to_string(),
            })?;

        let mut walk = Walk::default();
        let origin = self.analyze(
            &located.path,
            &located.unit,
            class_name,
            field_name,
            false,
            &mut walk,
        )?;

        let resolution = VisibilityResolution::new(class_name, field_name, origin);
        tracing::debug!(
            class = class_name,
            field = field_name,
            needs_accessor = resolution.needs_accessor,
            depth = walk.chain.len(),
            "Resolved field visibility"
        );
        Ok(resolution)
    }

    fn analyze(
        &self,
        path: &Path,
        unit: &CompilationUnit,
        class_name: &str,
        field_name: &str,
        inherited: bool,
        walk: &mut Walk,
    ) -> ResolveResult<FieldOrigin> {
        walk.enter(path, class_name)?;

        let decl = unit
            .find_type(class_name)
            .ok_or_else(|| ResolveError::MalformedSource {
                path: path.to_path_buf(),
                reason: format!("{class_name} is not declared in this file"),
            })?;

        if let Some(field) = decl.field(field_name) {
            let origin = if inherited {
                FieldOrigin::Source {
                    class: qualified_name(unit, class_name),
                    path: path.to_path_buf(),
                    visibility: field.visibility,
                }
            } else {
                FieldOrigin::Local {
                    path: path.to_path_buf(),
                }
            };
            return Ok(origin);
        }

        let Some(superclass) = decl.extends.as_deref() else {
            return Ok(FieldOrigin::Unresolved);
        };

        if let Some(origin) = self.from_source(unit, superclass, path, field_name, walk)? {
            return Ok(origin);
        }
        Ok(self
            .from_runtime(unit, superclass, field_name)
            .unwrap_or(FieldOrigin::Unresolved))
    }

    /// Follow a superclass through source; `None` when no root holds its file.
    fn from_source(
        &self,
        unit: &CompilationUnit,
        superclass: &str,
        path: &Path,
        field_name: &str,
        walk: &mut Walk,
    ) -> ResolveResult<Option<FieldOrigin>> {
        let current_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let Some(super_path) = self.roots.find_superclass(unit, superclass, current_dir) else {
            return Ok(None);
        };

        let super_unit = CompilationUnit::parse_file(&super_path)?;
        self.analyze(
            &super_path,
            &super_unit,
            simple_name(superclass),
            field_name,
            true,
            walk,
        )
        .map(Some)
    }

    /// Look a superclass up through introspection; `None` when it cannot be loaded.
    fn from_runtime(
        &self,
        unit: &CompilationUnit,
        superclass: &str,
        field_name: &str,
    ) -> Option<FieldOrigin> {
        for candidate in runtime_candidates(unit, superclass) {
            match find_runtime_field(self.introspector.as_ref(), &candidate, field_name) {
                RuntimeLookup::Unloadable => continue,
                RuntimeLookup::Absent => return Some(FieldOrigin::Unresolved),
                RuntimeLookup::Declared {
                    declaring_class,
                    visibility,
                } => {
                    return Some(FieldOrigin::Runtime {
                        class: declaring_class,
                        visibility,
                    });
                }
            }
        }

        tracing::warn!(
            superclass,
            field = field_name,
            "Superclass has no source and cannot be introspected; assuming direct access"
        );
        None
    }
}

impl VisibilityQuery for HierarchyResolver {
    fn needs_accessor(
        &self,
        class_name: &str,
        field_name: &str,
    ) -> ResolveResult<VisibilityResolution> {
        self.resolve(class_name, field_name)
    }
}

fn qualified_name(unit: &CompilationUnit, simple: &str) -> String {
    match &unit.package {
        Some(package) => format!("{package}.{simple}"),
        None => simple.to_string(),
    }
}

/// Names to try when loading a superclass at runtime, most specific first
fn runtime_candidates(unit: &CompilationUnit, superclass: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if let Some(imported) = unit.import_for(superclass) {
        candidates.push(imported.to_string());
    }
    candidates.push(superclass.to_string());
    if !superclass.contains('.') {
        if let Some(package) = &unit.package {
            candidates.push(format!("{package}.{superclass}"));
        }
        for import in unit.imports.iter().filter(|i| i.is_wildcard && !i.is_static) {
            candidates.push(format!("{}.{superclass}", import.path));
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));
    candidates
}
