//! protomap-core - Descriptor model, naming rules, and field type model
//!
//! This crate provides the schema-side building blocks of protomap:
//! - [`DescriptorPool`], decoded from a binary `FileDescriptorSet`, and its descriptor
//!   wrappers ([`MessageDescriptor`], [`FieldDescriptor`], [`EnumDescriptor`],
//!   [`FileDescriptor`])
//! - the `protomap/options.proto` custom options ([`options`])
//! - [`TypeModel`], the closed per-field type model that produces conversion expressions
//! - [`GeneratorError`] for error handling
//! - [`GeneratorConfig`] for generator configuration (`protomap.toml`)

mod config;
mod descriptor;
mod error;
pub mod naming;
pub mod options;
mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{GeneratorConfig, OutputFormat, OutputSection};
pub use descriptor::{
    DescriptorPool, EnumDescriptor, FieldDescriptor, FieldKind, FileDescriptor,
    MessageDescriptor,
};
pub use error::{GeneratorError, GeneratorResult};
pub use options::RepeatedContainer;
pub use types::{AccessorNames, ScalarType, TypeModel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AccessorNames, DescriptorPool, FieldDescriptor, FieldKind, GeneratorConfig,
        GeneratorError, GeneratorResult, MessageDescriptor, RepeatedContainer, ScalarType,
        TypeModel,
    };
}
