//! Descriptor wrappers over a decoded `FileDescriptorSet`.
//!
//! A [`DescriptorPool`] is decoded with `prost_reflect`, which links every type
//! reference and checks the set the way protoc does. The wrappers handed out here are
//! cheap clones of the underlying `prost_reflect` handles with the protomap options of
//! their file or field already read, plus the naming and nullability rules the
//! generator needs.

use crate::error::{GeneratorError, GeneratorResult};
use crate::naming;
use crate::options::{FieldOptions, FileOptions, OPTIONS_FILE, RepeatedContainer};
use prost_reflect::{Cardinality, Kind, Syntax};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Semantic kind of a field, derived from its wire type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
    ByteString,
    Enum,
    Message,
}

impl FieldKind {
    fn from_kind(kind: &Kind) -> Self {
        match kind {
            Kind::Int32 | Kind::Uint32 | Kind::Sint32 | Kind::Fixed32 | Kind::Sfixed32 => {
                FieldKind::Int
            }
            Kind::Int64 | Kind::Uint64 | Kind::Sint64 | Kind::Fixed64 | Kind::Sfixed64 => {
                FieldKind::Long
            }
            Kind::Float => FieldKind::Float,
            Kind::Double => FieldKind::Double,
            Kind::Bool => FieldKind::Boolean,
            Kind::String => FieldKind::String,
            Kind::Bytes => FieldKind::ByteString,
            Kind::Enum(_) => FieldKind::Enum,
            Kind::Message(_) => FieldKind::Message,
        }
    }
}

/// Every descriptor of a decoded descriptor set
#[derive(Debug, Clone)]
pub struct DescriptorPool {
    inner: prost_reflect::DescriptorPool,
}

impl DescriptorPool {
    /// Decode a binary `FileDescriptorSet` (`protoc --include_imports --descriptor_set_out`)
    pub fn decode(bytes: &[u8]) -> GeneratorResult<Self> {
        let inner = prost_reflect::DescriptorPool::decode(bytes)?;
        let pool = Self { inner };

        tracing::debug!(
            files = pool.inner.files().len(),
            messages = pool.messages().count(),
            "Descriptor pool loaded"
        );

        Ok(pool)
    }

    /// Load a binary `FileDescriptorSet` from a file
    pub fn from_file(path: impl AsRef<Path>) -> GeneratorResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes)
    }

    /// Schema files, in set order
    ///
    /// The `google.protobuf` files and the protomap options file are imports
    /// only and are left out.
    pub fn files(&self) -> impl Iterator<Item = FileDescriptor> + '_ {
        self.inner
            .files()
            .filter(|file| !is_support_file(file))
            .map(FileDescriptor::new)
    }

    /// All messages of the schema files including nested ones, parents before children
    pub fn messages(&self) -> impl Iterator<Item = MessageDescriptor> + '_ {
        self.inner
            .all_messages()
            .filter(|message| !is_support_file(&message.parent_file()))
            .map(MessageDescriptor::new)
    }

    /// Look up a message by fully-qualified name (`shop.GrpcOrder`)
    pub fn message(&self, full_name: &str) -> Option<MessageDescriptor> {
        self.inner
            .get_message_by_name(full_name.trim_start_matches('.'))
            .map(MessageDescriptor::new)
    }

    /// Look up an enum by fully-qualified name
    pub fn enum_type(&self, full_name: &str) -> Option<EnumDescriptor> {
        self.inner
            .get_enum_by_name(full_name.trim_start_matches('.'))
            .map(EnumDescriptor::new)
    }
}

fn is_support_file(file: &prost_reflect::FileDescriptor) -> bool {
    file.package_name() == "google.protobuf" || file.name() == OPTIONS_FILE
}

fn strip_domain_prefix<'s>(name: &'s str, prefix: &str) -> &'s str {
    match name.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && !rest.is_empty() => rest,
        _ => name,
    }
}

/// Java class name including enclosing classes (`Outer.Inner`)
fn nested_java_name(name: &str, parent: Option<prost_reflect::MessageDescriptor>) -> String {
    let mut segments = vec![name.to_string()];
    let mut current = parent;
    while let Some(message) = current {
        segments.push(message.name().to_string());
        current = message.parent_message();
    }
    segments.reverse();
    segments.join(".")
}

// ============================================================================
// File
// ============================================================================

/// A schema file
#[derive(Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    inner: prost_reflect::FileDescriptor,
    options: FileOptions,
}

impl FileDescriptor {
    fn new(inner: prost_reflect::FileDescriptor) -> Self {
        let options = FileOptions::read(&inner);
        Self { inner, options }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn package(&self) -> &str {
        self.inner.package_name()
    }

    pub fn is_proto2(&self) -> bool {
        matches!(self.inner.syntax(), Syntax::Proto2)
    }

    /// Prefix stripped from wire message names to obtain domain class names
    pub fn domain_prefix(&self) -> &str {
        &self.options.domain_prefix
    }

    /// Explicit per-file nullability marker setting, if any
    pub fn nullability_annotations(&self) -> Option<bool> {
        self.options.nullability_annotations
    }

    /// Top-level messages declared in this file
    pub fn messages(&self) -> impl Iterator<Item = MessageDescriptor> + '_ {
        self.inner.messages().map(MessageDescriptor::new)
    }
}

impl fmt::Debug for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileDescriptor").field(&self.name()).finish()
    }
}

// ============================================================================
// Message
// ============================================================================

/// A message type
#[derive(Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    inner: prost_reflect::MessageDescriptor,
}

impl MessageDescriptor {
    fn new(inner: prost_reflect::MessageDescriptor) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn full_name(&self) -> &str {
        self.inner.full_name()
    }

    /// Declared fields, in schema order
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        self.inner.fields().map(FieldDescriptor::new)
    }

    pub fn field(&self, name: &str) -> Option<FieldDescriptor> {
        self.inner.get_field_by_name(name).map(FieldDescriptor::new)
    }

    pub fn field_count(&self) -> usize {
        self.inner.fields().len()
    }

    /// Enclosing message for nested types
    pub fn containing_message(&self) -> Option<MessageDescriptor> {
        self.inner.parent_message().map(MessageDescriptor::new)
    }

    pub fn containing_file(&self) -> FileDescriptor {
        FileDescriptor::new(self.inner.parent_file())
    }

    /// Names of the declared oneof groups, synthetic proto3-optional groups excluded
    pub fn oneof_names(&self) -> Vec<String> {
        self.inner
            .oneofs()
            .filter(|oneof| !oneof.is_synthetic())
            .map(|oneof| oneof.name().to_string())
            .collect()
    }

    /// Message synthesized for a map field, marked with the `map_entry` option
    pub fn is_map_entry(&self) -> bool {
        self.inner.is_map_entry()
    }

    /// A message with a single field, treated as a transparent wrapper
    pub fn is_unfolded(&self) -> bool {
        self.field_count() == 1 && !self.is_map_entry()
    }

    /// Java class name of the wire type, including enclosing classes (`Outer.Inner`)
    pub fn java_name(&self) -> String {
        nested_java_name(self.name(), self.inner.parent_message())
    }

    /// Domain class name: the wire name without the file's domain prefix
    pub fn domain_name(&self) -> &str {
        let file = self.containing_file();
        strip_domain_prefix(self.name(), file.domain_prefix())
    }
}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

// ============================================================================
// Field
// ============================================================================

/// A field of a message
#[derive(Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    inner: prost_reflect::FieldDescriptor,
    options: FieldOptions,
}

impl FieldDescriptor {
    fn new(inner: prost_reflect::FieldDescriptor) -> Self {
        let options = FieldOptions::read(&inner);
        Self { inner, options }
    }

    /// Declared name with protoc's leading-underscore normalization applied
    pub fn name(&self) -> &str {
        naming::strip_leading_underscore(self.original_name())
    }

    /// Name exactly as declared in the schema
    pub fn original_name(&self) -> &str {
        self.inner.name()
    }

    pub fn full_name(&self) -> &str {
        self.inner.full_name()
    }

    pub fn number(&self) -> u32 {
        self.inner.number()
    }

    pub fn kind(&self) -> FieldKind {
        FieldKind::from_kind(&self.inner.kind())
    }

    pub fn containing_message(&self) -> MessageDescriptor {
        MessageDescriptor::new(self.inner.parent_message().clone())
    }

    /// Referenced message type; an error for non-message fields
    pub fn message_type(&self) -> GeneratorResult<MessageDescriptor> {
        self.target_message().ok_or_else(|| {
            GeneratorError::Schema(format!("field {} is not a message field", self.full_name()))
        })
    }

    /// Referenced enum type; an error for non-enum fields
    pub fn enum_type(&self) -> GeneratorResult<EnumDescriptor> {
        match self.inner.kind() {
            Kind::Enum(descriptor) => Ok(EnumDescriptor::new(descriptor)),
            _ => Err(GeneratorError::Schema(format!(
                "field {} is not an enum field",
                self.full_name()
            ))),
        }
    }

    fn target_message(&self) -> Option<MessageDescriptor> {
        match self.inner.kind() {
            Kind::Message(descriptor) => Some(MessageDescriptor::new(descriptor)),
            _ => None,
        }
    }

    pub fn is_repeated(&self) -> bool {
        self.inner.cardinality() == Cardinality::Repeated
    }

    /// Declared with the `optional` keyword
    ///
    /// True for a proto3 `optional` field and for a proto2 `optional` field that is
    /// not part of a oneof.
    pub fn is_optional(&self) -> bool {
        if self.inner.field_descriptor_proto().proto3_optional() {
            return true;
        }
        matches!(self.inner.parent_file().syntax(), Syntax::Proto2)
            && self.inner.cardinality() == Cardinality::Optional
            && self.inner.containing_oneof().is_none()
    }

    /// Name of the (non-synthetic) oneof group this field belongs to
    pub fn oneof_name(&self) -> Option<String> {
        self.inner
            .containing_oneof()
            .filter(|oneof| !oneof.is_synthetic())
            .map(|oneof| oneof.name().to_string())
    }

    pub fn in_oneof(&self) -> bool {
        self.inner
            .containing_oneof()
            .is_some_and(|oneof| !oneof.is_synthetic())
    }

    pub fn is_map(&self) -> bool {
        self.inner.is_map()
    }

    pub fn is_list(&self) -> bool {
        self.inner.is_list()
    }

    /// Singular field whose message type is a single-field wrapper
    pub fn is_unfolded(&self) -> bool {
        !self.is_repeated() && self.target_message().is_some_and(|m| m.is_unfolded())
    }

    /// The wrapped field of an unfolded message field
    pub fn unfolded_field(&self) -> GeneratorResult<FieldDescriptor> {
        self.unfolded_inner().ok_or_else(|| {
            GeneratorError::Schema(format!("field {} is not unfolded", self.full_name()))
        })
    }

    fn unfolded_inner(&self) -> Option<FieldDescriptor> {
        if !self.is_unfolded() {
            return None;
        }
        self.target_message()
            .and_then(|message| message.fields().next())
    }

    pub fn is_unused(&self) -> bool {
        self.options.unused
    }

    /// Optional keyword, oneof membership, or a nullable field inside an unfolded wrapper
    pub fn is_nullable(&self) -> bool {
        let mut visited: Vec<String> = Vec::new();
        let mut field = self.clone();
        loop {
            if field.is_optional() || field.in_oneof() {
                return true;
            }
            let Some(inner) = field.unfolded_inner() else {
                return false;
            };
            // A wrapper that (transitively) wraps itself cannot add nullability.
            let wrapper = inner.inner.parent_message().full_name().to_string();
            if visited.contains(&wrapper) {
                return false;
            }
            visited.push(wrapper);
            field = inner;
        }
    }

    /// Domain-side name set with `(protomap.field_name)`
    pub fn overridden_name(&self) -> Option<&str> {
        self.options.field_name.as_deref()
    }

    /// Domain-side identifier: the overridden name or the original name, minus a
    /// leading underscore
    pub fn generated_name(&self) -> &str {
        let name = self.overridden_name().unwrap_or_else(|| self.original_name());
        naming::strip_leading_underscore(name)
    }

    pub fn had_leading_underscore(&self) -> bool {
        self.original_name().starts_with('_')
    }

    /// Domain-side getter (`_count` -> `getCount`)
    pub fn getter_method_name(&self) -> String {
        naming::getter_name(self.generated_name())
    }

    /// Domain-side setter (`_count` -> `setCount`)
    pub fn setter_method_name(&self) -> String {
        naming::setter_name(self.generated_name())
    }

    pub fn repeated_container(&self) -> RepeatedContainer {
        self.options.repeated_container
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

// ============================================================================
// Enum
// ============================================================================

/// An enum type
#[derive(Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    inner: prost_reflect::EnumDescriptor,
}

impl EnumDescriptor {
    fn new(inner: prost_reflect::EnumDescriptor) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn full_name(&self) -> &str {
        self.inner.full_name()
    }

    /// Constants as `(name, number)`, in declaration order
    pub fn values(&self) -> Vec<(String, i32)> {
        self.inner
            .values()
            .map(|value| (value.name().to_string(), value.number()))
            .collect()
    }

    pub fn containing_file(&self) -> FileDescriptor {
        FileDescriptor::new(self.inner.parent_file())
    }

    /// Java class name of the wire enum, including enclosing classes
    pub fn java_name(&self) -> String {
        nested_java_name(self.name(), self.inner.parent_message())
    }

    pub fn domain_name(&self) -> &str {
        let file = self.containing_file();
        strip_domain_prefix(self.name(), file.domain_prefix())
    }
}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumDescriptor")
            .field(&self.full_name())
            .finish()
    }
}
