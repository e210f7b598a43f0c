//! `protomap generate` - map every schema message onto its domain class

use crate::report::Report;
use crate::settings::{ConfigArgs, FormatArg};
use anyhow::{Context, Result};
use clap::Args;
use protomap_codegen::{FieldGenerator, FileOptionPolicy, MessageGenerator};
use protomap_core::{DescriptorPool, GeneratorConfig};
use protomap_resolver::{CachingResolver, ClassRegistry, HierarchyResolver, SourceRoots};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Binary FileDescriptorSet (`protoc --include_imports --descriptor_set_out`)
    #[arg(short, long)]
    pub schema: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Report format (overrides the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only map the named message (fully qualified); repeatable
    #[arg(short, long = "message")]
    pub messages: Vec<String>,
}

/// Whether any field failed to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    WithErrors,
}

pub fn run(args: &GenerateArgs, mut config: GeneratorConfig) -> Result<Outcome> {
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    config.validate().context("Invalid configuration")?;

    let report = build_report(&args.schema, &config, &args.messages)?;
    let rendered = report.render(config.output.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => println!("{rendered}"),
    }

    if report.has_errors() {
        tracing::error!(
            errors = report.summary.errors,
            "Generation finished with errors"
        );
        return Ok(Outcome::WithErrors);
    }
    Ok(Outcome::Clean)
}

/// Resolver over the configured roots, with the runtime registry as fallback
pub fn build_resolver(config: &GeneratorConfig) -> Result<CachingResolver> {
    let mut registry = ClassRegistry::with_jdk_defaults();
    if let Some(path) = &config.runtime_classes {
        registry
            .load_file(path)
            .with_context(|| format!("Failed to load runtime classes: {}", path.display()))?;
    }

    let roots = SourceRoots::new(config.source_roots.iter().cloned());
    let resolver = HierarchyResolver::new(roots).with_introspector(Arc::new(registry));
    Ok(CachingResolver::new(resolver))
}

/// Generate mappings for `only` (or every message when empty)
pub fn build_report(schema: &Path, config: &GeneratorConfig, only: &[String]) -> Result<Report> {
    let pool = DescriptorPool::from_file(schema)
        .with_context(|| format!("Failed to load schema: {}", schema.display()))?;
    let resolver = build_resolver(config)?;
    let policy = FileOptionPolicy::new(config.default_nullability_annotations);
    let generator = MessageGenerator::new(FieldGenerator::new(&resolver, &policy))
        .with_names(&config.output.builder_name, &config.output.wire_parameter);

    let messages = if only.is_empty() {
        generator.generate_all(&pool)
    } else {
        only.iter()
            .map(|name| {
                pool.message(name)
                    .map(|message| generator.generate(&message))
                    .with_context(|| format!("Unknown message: {name}"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    tracing::info!(
        messages = messages.len(),
        resolved = resolver.len(),
        cache_hits = resolver.hits(),
        "Generation finished"
    );
    Ok(Report::new(
        schema.to_path_buf(),
        config.source_roots.clone(),
        messages,
    ))
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
