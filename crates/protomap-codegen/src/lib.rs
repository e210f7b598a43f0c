//! protomap-codegen - Field and transformer generation
//!
//! Turns descriptors into the pieces of a Java mapper:
//! - [`FieldGenerator`] picks the domain identifier, Java type and nullability marker,
//!   consulting a [`VisibilityQuery`](protomap_resolver::VisibilityQuery) for accessor use
//! - [`FieldTransformer`] emits the to-wire and from-wire conversion fragments
//! - [`MessageGenerator`] drives both over every field of a message

mod code;
mod field;
mod message;
mod nullability;
mod transformer;

pub use code::CodeBlock;
pub use field::{FieldGenerator, GeneratedField, GenerationResult, IdentifierSpec, VisibilityDecision};
pub use message::{Diagnostic, FieldMapping, MessageGenerator, MessageMapping, Severity};
pub use nullability::{FileOptionPolicy, NoAnnotations, NullabilityMarker, NullabilityPolicy};
pub use transformer::FieldTransformer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CodeBlock, Diagnostic, FieldGenerator, FieldMapping, FieldTransformer, FileOptionPolicy,
        MessageGenerator, MessageMapping, NullabilityPolicy, Severity,
    };
}
