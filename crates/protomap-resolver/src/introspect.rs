//! Runtime type introspection for superclasses that have no source
//!
//! A [`TypeIntrospector`] answers "what fields does this loaded class declare, and
//! what is its superclass". The bundled [`ClassRegistry`] knows common JDK base
//! classes and can be extended from a TOML file describing library classes.

use crate::error::{ResolveError, ResolveResult};
use crate::source::Visibility;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Field of a loaded class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeField {
    pub name: String,
    pub visibility: Visibility,
}

/// Declared shape of a loaded class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeClass {
    /// Fully qualified name
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub fields: Vec<RuntimeField>,
}

impl RuntimeClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, visibility: Visibility) -> Self {
        self.fields.push(RuntimeField {
            name: name.into(),
            visibility,
        });
        self
    }

    pub fn declared_field(&self, name: &str) -> Option<&RuntimeField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Source of runtime class metadata
pub trait TypeIntrospector: Send + Sync {
    /// Load a class by fully qualified or simple name
    fn load_class(&self, name: &str) -> Option<RuntimeClass>;
}

/// Introspector that knows no classes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntrospection;

impl TypeIntrospector for NoIntrospection {
    fn load_class(&self, _name: &str) -> Option<RuntimeClass> {
        None
    }
}

/// Outcome of walking a runtime superclass chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeLookup {
    /// The starting class could not be loaded
    Unloadable,
    /// The chain was walked without finding the field
    Absent,
    Declared {
        declaring_class: String,
        visibility: Visibility,
    },
}

/// Walk the runtime chain starting at `class_name` looking for `field_name`
///
/// A revisited class or an unloadable ancestor ends the walk.
pub fn find_runtime_field(
    introspector: &dyn TypeIntrospector,
    class_name: &str,
    field_name: &str,
) -> RuntimeLookup {
    let Some(mut current) = introspector.load_class(class_name) else {
        return RuntimeLookup::Unloadable;
    };
    let mut seen = HashSet::new();

    loop {
        if !seen.insert(current.name.clone()) {
            tracing::warn!(class = %current.name, "Runtime class chain revisits a class");
            return RuntimeLookup::Absent;
        }
        if let Some(field) = current.declared_field(field_name) {
            return RuntimeLookup::Declared {
                declaring_class: current.name.clone(),
                visibility: field.visibility,
            };
        }
        let Some(superclass) = current.superclass.clone() else {
            return RuntimeLookup::Absent;
        };
        match introspector.load_class(&superclass) {
            Some(next) => current = next,
            None => {
                tracing::debug!(class = %superclass, "Runtime superclass not loadable");
                return RuntimeLookup::Absent;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "class")]
    classes: Vec<RuntimeClass>,
}

/// In-memory table of runtime classes
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, RuntimeClass>,
}

impl ClassRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with common JDK base classes
    pub fn with_jdk_defaults() -> Self {
        let mut registry = Self::new();
        for class in jdk_classes() {
            registry.register(class);
        }
        registry
    }

    pub fn register(&mut self, class: RuntimeClass) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Add every class from a TOML registry document
    ///
    /// ```toml
    /// [[class]]
    /// name = "org.lib.AuditedEntity"
    /// superclass = "java.lang.Object"
    /// fields = [{ name = "createdAt", visibility = "private" }]
    /// ```
    pub fn load_str(&mut self, content: &str) -> ResolveResult<usize> {
        let file: RegistryFile = toml::from_str(content)?;
        let count = file.classes.len();
        for class in file.classes {
            if class.name.trim().is_empty() {
                return Err(ResolveError::Registry(
                    "class entry with empty name".to_string(),
                ));
            }
            self.register(class);
        }
        Ok(count)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ResolveResult<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.load_str(&content)?;
        tracing::debug!(path = %path.display(), count, "Loaded runtime classes");
        Ok(count)
    }
}

impl TypeIntrospector for ClassRegistry {
    fn load_class(&self, name: &str) -> Option<RuntimeClass> {
        if let Some(class) = self.classes.get(name) {
            return Some(class.clone());
        }
        if !name.contains('.') {
            // Simple names resolve like the implicit java.lang import.
            return self.classes.get(&format!("java.lang.{name}")).cloned();
        }
        None
    }
}

fn jdk_classes() -> Vec<RuntimeClass> {
    use Visibility::*;

    vec![
        RuntimeClass::new("java.lang.Object"),
        RuntimeClass::new("java.lang.Number").extends("java.lang.Object"),
        RuntimeClass::new("java.lang.Throwable")
            .extends("java.lang.Object")
            .field("detailMessage", Private)
            .field("cause", Private)
            .field("stackTrace", Private)
            .field("suppressedExceptions", Private),
        RuntimeClass::new("java.lang.Exception").extends("java.lang.Throwable"),
        RuntimeClass::new("java.lang.RuntimeException").extends("java.lang.Exception"),
        RuntimeClass::new("java.util.AbstractCollection").extends("java.lang.Object"),
        RuntimeClass::new("java.util.AbstractList")
            .extends("java.util.AbstractCollection")
            .field("modCount", Protected),
        RuntimeClass::new("java.util.ArrayList")
            .extends("java.util.AbstractList")
            .field("elementData", Package)
            .field("size", Private),
        RuntimeClass::new("java.util.AbstractMap")
            .extends("java.lang.Object")
            .field("keySet", Package)
            .field("values", Package),
        RuntimeClass::new("java.util.HashMap")
            .extends("java.util.AbstractMap")
            .field("table", Package)
            .field("size", Package)
            .field("modCount", Package),
    ]
}
