//! Per-field type model.
//!
//! [`TypeModel`] is a closed enum with one variant per kind of field a mapping has to
//! deal with. Each variant knows how to turn a domain-side Java expression into the
//! wire representation and back, and which protoc accessors the wire class exposes for
//! it.
//!
//! | Variant | Domain type | to wire | from wire |
//! |---------|-------------|---------|-----------|
//! | `Primitive` | `int`, `String`, ... | identity | identity |
//! | `Enum` | `Status` | `v.toGrpc()` | `Status.fromGrpc(e)` |
//! | `Message` | `Item` | `v.toGrpc()` | `Item.fromGrpc(e)` |
//! | `Repeated` | `List<T>`, `Set<T>`, ... | element-wise | element-wise |
//! | `Map` | `Map<K, V>` | entry-wise | entry-wise |
//! | `Unfolded` | inner type | `W.newBuilder().setX(..).build()` | `e.getX()` |

use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::error::{GeneratorError, GeneratorResult};
use crate::naming;
use crate::options::RepeatedContainer;
use serde::Serialize;

/// Scalar field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
    ByteString,
}

impl ScalarType {
    /// Java type used for a required value
    pub fn java_type(&self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Long => "long",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Boolean => "boolean",
            ScalarType::String => "String",
            ScalarType::ByteString => "ByteString",
        }
    }

    /// Java type used where a reference is required (nullable values, generics)
    pub fn boxed_java_type(&self) -> &'static str {
        match self {
            ScalarType::Int => "Integer",
            ScalarType::Long => "Long",
            ScalarType::Float => "Float",
            ScalarType::Double => "Double",
            ScalarType::Boolean => "Boolean",
            ScalarType::String => "String",
            ScalarType::ByteString => "ByteString",
        }
    }

    /// Whether the unboxed Java type is a JVM primitive
    pub fn is_jvm_primitive(&self) -> bool {
        !matches!(self, ScalarType::String | ScalarType::ByteString)
    }
}

/// Wire-side accessor names for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorNames {
    pub getter: String,
    pub setter: String,
    /// Presence check (`hasX`); meaningful for singular fields only
    pub has: String,
}

/// Conversion behavior of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeModel {
    Primitive {
        scalar: ScalarType,
        boxed: bool,
    },
    Enum {
        wire_type: String,
        domain_type: String,
    },
    Message {
        wire_type: String,
        domain_type: String,
    },
    Repeated {
        element: Box<TypeModel>,
        container: RepeatedContainer,
    },
    Map {
        key: Box<TypeModel>,
        value: Box<TypeModel>,
    },
    Unfolded {
        wrapper_type: String,
        inner_field: String,
        inner: Box<TypeModel>,
    },
}

impl TypeModel {
    /// Resolve the type model of a field from its kind and shape
    pub fn for_field(field: &FieldDescriptor) -> GeneratorResult<Self> {
        Self::resolve(field, &mut Vec::new())
    }

    fn resolve(field: &FieldDescriptor, unfolding: &mut Vec<String>) -> GeneratorResult<Self> {
        if field.is_map() {
            let entry = field.message_type()?;
            let key = Self::singular(&map_entry_field(&entry, "key")?, unfolding)?;
            let value = Self::singular(&map_entry_field(&entry, "value")?, unfolding)?;
            return Ok(TypeModel::Map {
                key: Box::new(key.boxed()),
                value: Box::new(value.boxed()),
            });
        }

        if field.is_repeated() {
            return Ok(TypeModel::Repeated {
                element: Box::new(Self::singular(field, unfolding)?.boxed()),
                container: field.repeated_container(),
            });
        }

        Self::singular(field, unfolding)
    }

    fn singular(field: &FieldDescriptor, unfolding: &mut Vec<String>) -> GeneratorResult<Self> {
        let scalar = |scalar| TypeModel::Primitive {
            scalar,
            boxed: false,
        };

        Ok(match field.kind() {
            FieldKind::Int => scalar(ScalarType::Int),
            FieldKind::Long => scalar(ScalarType::Long),
            FieldKind::Float => scalar(ScalarType::Float),
            FieldKind::Double => scalar(ScalarType::Double),
            FieldKind::Boolean => scalar(ScalarType::Boolean),
            FieldKind::String => scalar(ScalarType::String),
            FieldKind::ByteString => scalar(ScalarType::ByteString),
            FieldKind::Enum => {
                let enum_type = field.enum_type()?;
                TypeModel::Enum {
                    wire_type: enum_type.java_name(),
                    domain_type: enum_type.domain_name().to_string(),
                }
            }
            FieldKind::Message => {
                let message = field.message_type()?;
                let full_name = message.full_name().to_string();

                // A wrapper that wraps itself is mapped as a plain message.
                let wrapped = match message.fields().next() {
                    Some(inner_field) if message.is_unfolded() && !unfolding.contains(&full_name) => {
                        Some(inner_field)
                    }
                    _ => None,
                };

                if let Some(inner_field) = wrapped {
                    unfolding.push(full_name);
                    let inner = Self::resolve(&inner_field, unfolding)?;
                    unfolding.pop();

                    let inner = if inner_field.is_nullable() {
                        inner.boxed()
                    } else {
                        inner
                    };
                    TypeModel::Unfolded {
                        wrapper_type: message.java_name(),
                        inner_field: inner_field.original_name().to_string(),
                        inner: Box::new(inner),
                    }
                } else {
                    TypeModel::Message {
                        wire_type: message.java_name(),
                        domain_type: message.domain_name().to_string(),
                    }
                }
            }
        })
    }

    /// The same model with JVM primitives replaced by their wrapper classes
    pub fn boxed(self) -> Self {
        match self {
            TypeModel::Primitive { scalar, .. } => TypeModel::Primitive {
                scalar,
                boxed: true,
            },
            TypeModel::Unfolded {
                wrapper_type,
                inner_field,
                inner,
            } => TypeModel::Unfolded {
                wrapper_type,
                inner_field,
                inner: Box::new(inner.boxed()),
            },
            other => other,
        }
    }

    /// Whether the domain-side value is a JVM primitive and therefore never null
    pub fn is_primitive_like(&self) -> bool {
        match self {
            TypeModel::Primitive { scalar, boxed } => scalar.is_jvm_primitive() && !boxed,
            TypeModel::Unfolded { inner, .. } => inner.is_primitive_like(),
            TypeModel::Enum { .. }
            | TypeModel::Message { .. }
            | TypeModel::Repeated { .. }
            | TypeModel::Map { .. } => false,
        }
    }

    /// Whether both conversions are the identity
    pub fn is_identity(&self) -> bool {
        matches!(self, TypeModel::Primitive { .. })
    }

    /// Domain-side Java type
    pub fn java_type(&self) -> String {
        match self {
            TypeModel::Primitive { scalar, boxed } => {
                if *boxed {
                    scalar.boxed_java_type().to_string()
                } else {
                    scalar.java_type().to_string()
                }
            }
            TypeModel::Enum { domain_type, .. } | TypeModel::Message { domain_type, .. } => {
                domain_type.clone()
            }
            TypeModel::Repeated { element, container } => {
                let element = element.boxed_java_type();
                match container {
                    RepeatedContainer::List | RepeatedContainer::ImmutableList => {
                        format!("List<{element}>")
                    }
                    RepeatedContainer::Set | RepeatedContainer::ImmutableSet => {
                        format!("Set<{element}>")
                    }
                    RepeatedContainer::SortedSet => format!("SortedSet<{element}>"),
                    RepeatedContainer::Stream => format!("Stream<{element}>"),
                }
            }
            TypeModel::Map { key, value } => format!(
                "Map<{}, {}>",
                key.boxed_java_type(),
                value.boxed_java_type()
            ),
            TypeModel::Unfolded { inner, .. } => inner.java_type(),
        }
    }

    fn boxed_java_type(&self) -> String {
        match self {
            TypeModel::Primitive { scalar, .. } => scalar.boxed_java_type().to_string(),
            TypeModel::Unfolded { inner, .. } => inner.boxed_java_type(),
            other => other.java_type(),
        }
    }

    /// Wire-side accessors for a field of this type named `wire_field_name`
    pub fn accessor_names(&self, wire_field_name: &str) -> AccessorNames {
        let suffix = naming::wire_accessor_suffix(wire_field_name);
        let (getter, setter) = match self {
            TypeModel::Repeated { .. } => (format!("get{suffix}List"), format!("addAll{suffix}")),
            TypeModel::Map { .. } => (format!("get{suffix}Map"), format!("putAll{suffix}")),
            _ => (format!("get{suffix}"), format!("set{suffix}")),
        };
        AccessorNames {
            getter,
            setter,
            has: format!("has{suffix}"),
        }
    }

    /// Expression converting the domain value `value` into its wire representation
    pub fn to_wire(&self, value: &str) -> String {
        self.to_wire_at(value, 0)
    }

    /// Expression converting the wire value `access` into its domain representation
    pub fn from_wire(&self, access: &str) -> String {
        self.from_wire_at(access, 0)
    }

    fn to_wire_at(&self, value: &str, depth: usize) -> String {
        match self {
            TypeModel::Primitive { .. } => value.to_string(),
            TypeModel::Enum { .. } | TypeModel::Message { .. } => format!("{value}.toGrpc()"),
            TypeModel::Repeated { element, container } => {
                let source = match container {
                    RepeatedContainer::Stream => value.to_string(),
                    _ if element.is_identity() => return value.to_string(),
                    _ => format!("{value}.stream()"),
                };
                if element.is_identity() {
                    return format!("{source}.toList()");
                }
                let var = lambda_var(depth);
                format!(
                    "{source}.map({var} -> {}).toList()",
                    element.to_wire_at(&var, depth + 1)
                )
            }
            TypeModel::Map { key, value: entry_value } => {
                if key.is_identity() && entry_value.is_identity() {
                    return value.to_string();
                }
                let var = lambda_var(depth);
                format!(
                    "{value}.entrySet().stream().collect(Collectors.toMap({var} -> {}, {var} -> {}))",
                    key.to_wire_at(&format!("{var}.getKey()"), depth + 1),
                    entry_value.to_wire_at(&format!("{var}.getValue()"), depth + 1)
                )
            }
            TypeModel::Unfolded {
                wrapper_type,
                inner_field,
                inner,
            } => format!(
                "{wrapper_type}.newBuilder().{}({}).build()",
                inner.accessor_names(inner_field).setter,
                inner.to_wire_at(value, depth)
            ),
        }
    }

    fn from_wire_at(&self, access: &str, depth: usize) -> String {
        match self {
            TypeModel::Primitive { .. } => access.to_string(),
            TypeModel::Enum { domain_type, .. } | TypeModel::Message { domain_type, .. } => {
                format!("{domain_type}.fromGrpc({access})")
            }
            TypeModel::Repeated { element, container } => {
                if element.is_identity() {
                    return copy_into(container, access);
                }
                let var = lambda_var(depth);
                let mapped = format!(
                    "{access}.stream().map({var} -> {})",
                    element.from_wire_at(&var, depth + 1)
                );
                collect_into(container, mapped)
            }
            TypeModel::Map { key, value } => {
                if key.is_identity() && value.is_identity() {
                    return access.to_string();
                }
                let var = lambda_var(depth);
                format!(
                    "{access}.entrySet().stream().collect(Collectors.toMap({var} -> {}, {var} -> {}))",
                    key.from_wire_at(&format!("{var}.getKey()"), depth + 1),
                    value.from_wire_at(&format!("{var}.getValue()"), depth + 1)
                )
            }
            TypeModel::Unfolded {
                inner_field,
                inner,
                ..
            } => {
                let getter = inner.accessor_names(inner_field).getter;
                inner.from_wire_at(&format!("{access}.{getter}()"), depth)
            }
        }
    }
}

fn map_entry_field(entry: &MessageDescriptor, name: &str) -> GeneratorResult<FieldDescriptor> {
    entry.field(name).ok_or_else(|| {
        GeneratorError::Schema(format!("map entry {} has no {name} field", entry.full_name()))
    })
}

fn lambda_var(depth: usize) -> String {
    if depth == 0 {
        "it".to_string()
    } else {
        format!("it{depth}")
    }
}

/// Wire lists are immutable; containers other than `List` get a copy.
fn copy_into(container: &RepeatedContainer, list: &str) -> String {
    match container {
        RepeatedContainer::List => list.to_string(),
        RepeatedContainer::Set => format!("new HashSet<>({list})"),
        RepeatedContainer::SortedSet => format!("new TreeSet<>({list})"),
        RepeatedContainer::ImmutableList => format!("List.copyOf({list})"),
        RepeatedContainer::ImmutableSet => format!("Set.copyOf({list})"),
        RepeatedContainer::Stream => format!("{list}.stream()"),
    }
}

fn collect_into(container: &RepeatedContainer, stream: String) -> String {
    match container {
        RepeatedContainer::List | RepeatedContainer::ImmutableList => format!("{stream}.toList()"),
        RepeatedContainer::Set => format!("{stream}.collect(Collectors.toSet())"),
        RepeatedContainer::SortedSet => {
            format!("{stream}.collect(Collectors.toCollection(TreeSet::new))")
        }
        RepeatedContainer::ImmutableSet => {
            format!("{stream}.collect(Collectors.toUnmodifiableSet())")
        }
        RepeatedContainer::Stream => stream,
    }
}

#[cfg(test)]
#[path = "types/types_tests.rs"]
mod types_tests;
