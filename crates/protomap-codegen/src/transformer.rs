//! Per-field conversion fragments
//!
//! [`FieldTransformer`] turns a resolved [`TypeModel`] into the two fragments a mapper
//! needs: copying a domain value onto a wire builder, and reading a wire value back,
//! with presence handling for nullable fields.

use crate::code::CodeBlock;
use protomap_core::{AccessorNames, GeneratorError, GeneratorResult, TypeModel};

/// Conversion fragments for one field
#[derive(Debug, Clone)]
pub struct FieldTransformer<'t> {
    type_model: &'t TypeModel,
    wire_field_name: String,
    nullable: bool,
    message: String,
}

impl<'t> FieldTransformer<'t> {
    pub fn new(type_model: &'t TypeModel, wire_field_name: impl Into<String>, nullable: bool) -> Self {
        Self {
            type_model,
            wire_field_name: wire_field_name.into(),
            nullable,
            message: "unknown message".to_string(),
        }
    }

    /// Name the owning message in contract violations
    pub fn in_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn accessors(&self) -> AccessorNames {
        self.type_model.accessor_names(&self.wire_field_name)
    }

    /// Copy `domain_expr` onto the wire builder named `builder`
    ///
    /// With an empty builder name the result is the bare `.setX(..)` call for
    /// chaining onto a builder expression.
    pub fn to_wire(&self, builder: &str, domain_expr: &str) -> GeneratorResult<CodeBlock> {
        self.check_nullable()?;

        let setter = self.accessors().setter;
        let converted = self.type_model.to_wire(domain_expr);
        let call = if builder.is_empty() {
            format!(".{setter}({converted})")
        } else {
            format!("{builder}.{setter}({converted})")
        };

        if self.nullable {
            return Ok(CodeBlock::guarded(
                &format!("{domain_expr} != null"),
                CodeBlock::statement(call),
            ));
        }
        if builder.is_empty() {
            Ok(CodeBlock::expression(call))
        } else {
            Ok(CodeBlock::statement(call))
        }
    }

    /// Read the field from the wire message named `wire`
    pub fn from_wire(&self, wire: &str) -> GeneratorResult<CodeBlock> {
        self.check_nullable()?;

        let accessors = self.accessors();
        let converted = self
            .type_model
            .from_wire(&format!("{wire}.{}()", accessors.getter));

        if self.nullable {
            return Ok(CodeBlock::expression(format!(
                "{wire}.{}() ? {converted} : null",
                accessors.has
            )));
        }
        Ok(CodeBlock::expression(converted))
    }

    fn check_nullable(&self) -> GeneratorResult<()> {
        if self.nullable && self.type_model.is_primitive_like() {
            return Err(GeneratorError::contract(
                &self.message,
                &self.wire_field_name,
                format!(
                    "nullable conversion requested for primitive type {}",
                    self.type_model.java_type()
                ),
            ));
        }
        Ok(())
    }
}
