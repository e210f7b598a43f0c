//! Field generation
//!
//! [`FieldGenerator`] brings the descriptor, type model and hierarchy resolver together
//! for one field: it picks the domain-side identifier, the Java type and nullability
//! marker, and records whether the domain class must be read through accessors.

use crate::nullability::{NullabilityMarker, NullabilityPolicy};
use protomap_core::{FieldDescriptor, GeneratorError, GeneratorResult, TypeModel};
use protomap_resolver::{VisibilityQuery, VisibilityResolution};
use serde::Serialize;

/// Outcome of the visibility query for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VisibilityDecision {
    Resolved(VisibilityResolution),
    /// The query failed; direct access is assumed
    Defaulted { code: u32, reason: String },
}

impl VisibilityDecision {
    pub fn needs_accessor(&self) -> bool {
        match self {
            VisibilityDecision::Resolved(resolution) => resolution.needs_accessor,
            VisibilityDecision::Defaulted { .. } => false,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, VisibilityDecision::Defaulted { .. })
    }
}

/// Domain-side declaration of a generated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierSpec {
    /// Field name, or the getter name when the domain class needs accessors
    pub name: String,
    pub java_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<NullabilityMarker>,
}

impl IdentifierSpec {
    /// Expression reading the value inside the domain class
    pub fn domain_expr(&self, needs_accessor: bool) -> String {
        if needs_accessor {
            format!("{}()", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Everything produced for a used field
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedField {
    pub identifier: IdentifierSpec,
    pub type_model: TypeModel,
    pub nullable: bool,
    pub visibility: VisibilityDecision,
}

/// Result of generating one field; empty for fields flagged unused
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    field: FieldDescriptor,
    generated: Option<GeneratedField>,
}

impl GenerationResult {
    pub fn empty(field: FieldDescriptor) -> Self {
        Self {
            field,
            generated: None,
        }
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn generated(&self) -> Option<&GeneratedField> {
        self.generated.as_ref()
    }

    pub fn into_generated(self) -> Option<GeneratedField> {
        self.generated
    }

    pub fn is_empty(&self) -> bool {
        self.generated.is_none()
    }
}

/// Generates domain-side field declarations
#[derive(Clone, Copy)]
pub struct FieldGenerator<'r> {
    resolver: &'r dyn VisibilityQuery,
    nullability: &'r dyn NullabilityPolicy,
}

impl<'r> FieldGenerator<'r> {
    pub fn new(resolver: &'r dyn VisibilityQuery, nullability: &'r dyn NullabilityPolicy) -> Self {
        Self {
            resolver,
            nullability,
        }
    }

    pub fn generate(&self, field: &FieldDescriptor) -> GeneratorResult<GenerationResult> {
        if field.is_unused() {
            tracing::debug!(field = field.full_name(), "Skipping unused field");
            return Ok(GenerationResult::empty(field.clone()));
        }

        let nullable = field.is_nullable();
        let mut type_model = TypeModel::for_field(field)?;
        if nullable && type_model.is_primitive_like() {
            type_model = type_model.boxed();
        }

        let visibility = self.resolve_visibility(field)?;
        let name = if visibility.needs_accessor() {
            field.getter_method_name()
        } else {
            field.generated_name().to_string()
        };

        let marker = (!type_model.is_primitive_like()
            && self
                .nullability
                .use_annotation(&field.containing_message().containing_file(), nullable))
        .then_some(NullabilityMarker::for_nullable(nullable));

        let identifier = IdentifierSpec {
            name,
            java_type: type_model.java_type(),
            marker,
        };

        Ok(GenerationResult {
            field: field.clone(),
            generated: Some(GeneratedField {
                identifier,
                type_model,
                nullable,
                visibility,
            }),
        })
    }

    fn resolve_visibility(&self, field: &FieldDescriptor) -> GeneratorResult<VisibilityDecision> {
        let message = field.containing_message();
        let domain_class = message.domain_name();
        let field_name = field.generated_name();

        match self.resolver.needs_accessor(domain_class, field_name) {
            Ok(resolution) => Ok(VisibilityDecision::Resolved(resolution)),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(
                    field = field_name,
                    wire_message = message.full_name(),
                    error = %e,
                    "Could not resolve field visibility, assuming direct access"
                );
                Ok(VisibilityDecision::Defaulted {
                    code: e.error_code(),
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(GeneratorError::Resolution(format!(
                "field {field_name} of {}: {e}",
                message.full_name()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "field/field_tests.rs"]
mod field_tests;
