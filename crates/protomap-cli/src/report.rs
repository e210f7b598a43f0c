//! Generation report handed to the emission step

use anyhow::{Context, Result};
use protomap_codegen::{CodeBlock, MessageMapping, Severity};
use protomap_core::OutputFormat;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Totals over every message in a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub messages: usize,
    pub fields: usize,
    pub skipped: usize,
    pub accessors: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl Summary {
    fn of(messages: &[MessageMapping]) -> Self {
        let mut summary = Summary {
            messages: messages.len(),
            ..Summary::default()
        };
        for message in messages {
            summary.fields += message.fields.len();
            summary.skipped += message.skipped.len();
            summary.accessors += message.fields.iter().filter(|f| f.needs_accessor).count();
            for diagnostic in &message.diagnostics {
                match diagnostic.severity {
                    Severity::Warning => summary.warnings += 1,
                    Severity::Error => summary.errors += 1,
                }
            }
        }
        summary
    }
}

/// Everything produced by one `generate` run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema: PathBuf,
    pub source_roots: Vec<PathBuf>,
    pub summary: Summary,
    pub messages: Vec<MessageMapping>,
}

impl Report {
    pub fn new(schema: PathBuf, source_roots: Vec<PathBuf>, messages: Vec<MessageMapping>) -> Self {
        Self {
            schema,
            source_roots,
            summary: Summary::of(&messages),
            messages,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report")
            }
            OutputFormat::Text => Ok(TextReport(self).to_string()),
        }
    }
}

struct TextReport<'a>(&'a Report);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        for message in &report.messages {
            writeln!(f, "message {} -> {}", message.message, message.domain_class)?;

            for field in &message.fields {
                let marker = field
                    .identifier
                    .marker
                    .map(|m| format!("{} ", m.annotation()))
                    .unwrap_or_default();
                let access = if field.needs_accessor { " [accessor]" } else { "" };
                writeln!(
                    f,
                    "  {}: {marker}{} {}{access}",
                    field.field, field.identifier.java_type, field.identifier.name
                )?;
                write_fragment(f, "toGrpc:  ", &field.to_wire)?;
                write_fragment(f, "fromGrpc:", &field.from_wire)?;
            }

            if !message.skipped.is_empty() {
                writeln!(f, "  skipped: {}", message.skipped.join(", "))?;
            }
            for diagnostic in &message.diagnostics {
                let severity = match diagnostic.severity {
                    Severity::Warning => "warning",
                    Severity::Error => "error",
                };
                writeln!(
                    f,
                    "  {severity} {} ({}): {}",
                    diagnostic.field, diagnostic.code, diagnostic.detail
                )?;
            }
        }

        let s = &report.summary;
        write!(
            f,
            "summary: {} messages, {} fields, {} skipped, {} accessors, {} warnings, {} errors",
            s.messages, s.fields, s.skipped, s.accessors, s.warnings, s.errors
        )
    }
}

fn write_fragment(f: &mut fmt::Formatter<'_>, label: &str, code: &CodeBlock) -> fmt::Result {
    let mut lines = code.code().lines();
    if let Some(first) = lines.next() {
        writeln!(f, "    {label} {first}")?;
    }
    let pad = " ".repeat(label.len() + 5);
    for line in lines {
        writeln!(f, "{pad}{line}")?;
    }
    Ok(())
}
