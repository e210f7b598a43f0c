//! Message-level generation driver

use crate::code::CodeBlock;
use crate::field::{FieldGenerator, GeneratedField, IdentifierSpec, VisibilityDecision};
use crate::transformer::FieldTransformer;
use protomap_core::{
    DescriptorPool, FieldDescriptor, FieldKind, GeneratorResult, MessageDescriptor, TypeModel,
};
use serde::Serialize;

/// Complete mapping of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMapping {
    /// Field name as declared in the schema
    pub field: String,
    pub number: u32,
    pub kind: FieldKind,
    pub identifier: IdentifierSpec,
    pub nullable: bool,
    pub needs_accessor: bool,
    pub visibility: VisibilityDecision,
    pub type_model: TypeModel,
    pub to_wire: CodeBlock,
    pub from_wire: CodeBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Problem found while generating a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub field: String,
    pub code: u32,
    pub detail: String,
}

/// All field mappings of one message, in declared order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageMapping {
    /// Fully qualified wire message name
    pub message: String,
    pub domain_class: String,
    pub fields: Vec<FieldMapping>,
    /// Fields flagged unused
    pub skipped: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MessageMapping {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Runs the field generator over every field of a message
pub struct MessageGenerator<'r> {
    fields: FieldGenerator<'r>,
    builder_name: String,
    wire_parameter: String,
}

impl<'r> MessageGenerator<'r> {
    pub fn new(fields: FieldGenerator<'r>) -> Self {
        Self {
            fields,
            builder_name: "builder".to_string(),
            wire_parameter: "grpc".to_string(),
        }
    }

    /// Variable names used in the generated fragments
    pub fn with_names(mut self, builder_name: impl Into<String>, wire_parameter: impl Into<String>) -> Self {
        self.builder_name = builder_name.into();
        self.wire_parameter = wire_parameter.into();
        self
    }

    /// Map every field of `message`
    ///
    /// A failing field is left out of the mapping and reported as an error
    /// diagnostic; the remaining fields are still generated.
    pub fn generate(&self, message: &MessageDescriptor) -> MessageMapping {
        let mut mapping = MessageMapping {
            message: message.full_name().to_string(),
            domain_class: message.domain_name().to_string(),
            fields: Vec::with_capacity(message.field_count()),
            skipped: Vec::new(),
            diagnostics: Vec::new(),
        };

        for field in message.fields() {
            match self.generate_field(&field) {
                Ok(Some(field_mapping)) => {
                    if let VisibilityDecision::Defaulted { code, reason } = &field_mapping.visibility {
                        mapping.diagnostics.push(Diagnostic {
                            severity: Severity::Warning,
                            message: mapping.message.clone(),
                            field: field.original_name().to_string(),
                            code: *code,
                            detail: format!("visibility unresolved, assuming direct access: {reason}"),
                        });
                    }
                    mapping.fields.push(field_mapping);
                }
                Ok(None) => mapping.skipped.push(field.original_name().to_string()),
                Err(e) => {
                    tracing::error!(
                        field = field.original_name(),
                        wire_message = message.full_name(),
                        error = %e,
                        "Field generation failed"
                    );
                    mapping.diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        message: mapping.message.clone(),
                        field: field.original_name().to_string(),
                        code: e.error_code(),
                        detail: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            wire_message = %mapping.message,
            fields = mapping.fields.len(),
            skipped = mapping.skipped.len(),
            diagnostics = mapping.diagnostics.len(),
            "Generated message mapping"
        );
        mapping
    }

    /// Map every message in the pool except synthesized map entries
    pub fn generate_all(&self, pool: &DescriptorPool) -> Vec<MessageMapping> {
        pool.messages()
            .filter(|message| !message.is_map_entry())
            .map(|message| self.generate(&message))
            .collect()
    }

    fn generate_field(&self, field: &FieldDescriptor) -> GeneratorResult<Option<FieldMapping>> {
        let Some(generated) = self.fields.generate(field)?.into_generated() else {
            return Ok(None);
        };
        let GeneratedField {
            identifier,
            type_model,
            nullable,
            visibility,
        } = generated;

        let needs_accessor = visibility.needs_accessor();
        let domain_expr = identifier.domain_expr(needs_accessor);
        let transformer = FieldTransformer::new(&type_model, field.name(), nullable)
            .in_message(field.containing_message().full_name());
        let to_wire = transformer.to_wire(&self.builder_name, &domain_expr)?;
        let from_wire = transformer.from_wire(&self.wire_parameter)?;

        Ok(Some(FieldMapping {
            field: field.original_name().to_string(),
            number: field.number(),
            kind: field.kind(),
            identifier,
            nullable,
            needs_accessor,
            visibility,
            type_model,
            to_wire,
            from_wire,
        }))
    }
}
