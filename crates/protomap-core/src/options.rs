//! protomap custom options.
//!
//! Schemas opt into protomap behavior through the extensions declared in
//! `protomap/options.proto` ([`OPTIONS_PROTO`]). Extension values are read from the
//! decoded option messages through their [`ExtensionDescriptor`]; when a descriptor
//! set does not import the options file, every option takes its default.

use prost_reflect::{DynamicMessage, ExtensionDescriptor, Value};
use serde::Serialize;

/// Source of `protomap/options.proto`
pub const OPTIONS_PROTO: &str = include_str!("../proto/protomap/options.proto");

/// Import path of the options file
pub const OPTIONS_FILE: &str = "protomap/options.proto";

/// Domain prefix used when a file does not set `(protomap.domain_prefix)`
pub const DEFAULT_DOMAIN_PREFIX: &str = "Grpc";

const OPTIONS_PACKAGE: &str = "protomap";

/// Domain-side container used for repeated fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatedContainer {
    #[default]
    List,
    Set,
    SortedSet,
    ImmutableList,
    ImmutableSet,
    Stream,
}

impl RepeatedContainer {
    /// Map a `protomap.RepeatedContainer` enum number
    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            0 => Some(RepeatedContainer::List),
            1 => Some(RepeatedContainer::Set),
            2 => Some(RepeatedContainer::SortedSet),
            3 => Some(RepeatedContainer::ImmutableList),
            4 => Some(RepeatedContainer::ImmutableSet),
            5 => Some(RepeatedContainer::Stream),
            _ => None,
        }
    }
}

/// File-level options
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileOptions {
    pub domain_prefix: String,
    pub nullability_annotations: Option<bool>,
}

impl FileOptions {
    pub fn read(file: &prost_reflect::FileDescriptor) -> Self {
        let options = file.options();
        let pool = file.parent_pool();

        Self {
            domain_prefix: extension(pool, &options, "domain_prefix")
                .and_then(|value| value.as_str().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_DOMAIN_PREFIX.to_string()),
            nullability_annotations: extension(pool, &options, "nullability_annotations")
                .and_then(|value| value.as_bool()),
        }
    }
}

/// Per-field options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldOptions {
    pub field_name: Option<String>,
    pub repeated_container: RepeatedContainer,
    pub unused: bool,
}

impl FieldOptions {
    pub fn read(field: &prost_reflect::FieldDescriptor) -> Self {
        let options = field.options();
        let pool = field.parent_pool();

        let repeated_container = match extension(pool, &options, "repeated_container")
            .and_then(|value| value.as_enum_number())
        {
            Some(number) => RepeatedContainer::from_number(number).unwrap_or_else(|| {
                tracing::warn!(
                    field = field.full_name(),
                    number,
                    "Unknown repeated_container value, using LIST"
                );
                RepeatedContainer::List
            }),
            None => RepeatedContainer::List,
        };

        Self {
            field_name: extension(pool, &options, "field_name")
                .and_then(|value| value.as_str().map(str::to_string)),
            repeated_container,
            unused: extension(pool, &options, "unused")
                .and_then(|value| value.as_bool())
                .unwrap_or(false),
        }
    }
}

fn extension(
    pool: &prost_reflect::DescriptorPool,
    options: &DynamicMessage,
    name: &str,
) -> Option<Value> {
    let descriptor: ExtensionDescriptor =
        pool.get_extension_by_name(&format!("{OPTIONS_PACKAGE}.{name}"))?;
    options
        .has_extension(&descriptor)
        .then(|| options.get_extension(&descriptor).into_owned())
}
