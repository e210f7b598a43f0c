//! # protomap
//!
//! Generates the field mappings between protobuf wire messages and hand-written Java
//! domain classes.
//!
//! For each schema field protomap decides:
//! - the domain-side identifier, Java type and nullability marker
//! - whether the domain class must go through accessors, by following its superclass
//!   chain across several source roots and falling back to runtime class metadata
//! - the `toGrpc` and `fromGrpc` conversion fragments
//!
//! ## Example
//!
//! ```ignore
//! use protomap::prelude::*;
//!
//! // protoc --include_imports --descriptor_set_out=schema.pb order.proto
//! let pool = DescriptorPool::from_file("schema.pb")?;
//! let resolver = CachingResolver::new(HierarchyResolver::new(SourceRoots::new([
//!     "service/src/main/java",
//!     "shared/src/main/java",
//! ])));
//! let policy = FileOptionPolicy::default();
//!
//! let generator = MessageGenerator::new(FieldGenerator::new(&resolver, &policy));
//! for mapping in generator.generate_all(&pool) {
//!     for field in &mapping.fields {
//!         println!("{}: {}", field.field, field.to_wire);
//!     }
//! }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`protomap_core`] - Descriptor model, naming, type model, errors, config
//! - [`protomap_resolver`] - Java source scanning and hierarchy resolution
//! - [`protomap_codegen`] - Field, transformer and message generation

// Re-export core types
pub use protomap_core::{
    DescriptorPool, FieldDescriptor, FieldKind, GeneratorConfig, GeneratorError,
    GeneratorResult, MessageDescriptor, TypeModel,
};

// Re-export resolver types
pub use protomap_resolver::{
    CachingResolver, ClassRegistry, HierarchyResolver, ResolveError, ResolveResult,
    SourceRoots, VisibilityQuery, VisibilityResolution,
};

// Re-export generator types
pub use protomap_codegen::{
    CodeBlock, FieldGenerator, FieldMapping, FieldTransformer, FileOptionPolicy,
    MessageGenerator, MessageMapping,
};

/// Prelude module for convenient imports.
///
/// Use `use protomap::prelude::*;` to import the types needed to run a generation.
pub mod prelude {
    pub use protomap_codegen::prelude::*;
    pub use protomap_core::prelude::*;
    pub use protomap_resolver::prelude::*;
}
