//! `protomap resolve` - answer a single visibility query

use crate::generate::build_resolver;
use crate::settings::ConfigArgs;
use anyhow::{Context, Result};
use clap::Args;
use protomap_core::GeneratorConfig;
use protomap_resolver::VisibilityQuery;

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Simple name of the domain class
    pub class: String,

    /// Field name as declared in the domain class
    pub field: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: &ResolveArgs, config: GeneratorConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let resolver = build_resolver(&config)?;
    let resolution = resolver
        .needs_accessor(&args.class, &args.field)
        .with_context(|| format!("Failed to resolve {}.{}", args.class, args.field))?;

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}
