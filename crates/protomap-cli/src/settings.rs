//! Configuration loading and command-line overrides

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use protomap_core::{GeneratorConfig, OutputFormat};
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG: &str = "protomap.toml";

/// Report format accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

/// Options shared by every command that reads `protomap.toml`
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Path to protomap.toml (default: ./protomap.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Domain source root; repeat in precedence order. Replaces the configured roots.
    #[arg(short = 'r', long = "root")]
    pub roots: Vec<PathBuf>,

    /// TOML registry of runtime classes. Replaces the configured registry.
    #[arg(long)]
    pub runtime_classes: Option<PathBuf>,
}

impl ConfigArgs {
    /// Read the configuration file and apply command-line overrides, without validating
    pub fn load(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => read(path)?,
            None if Path::new(DEFAULT_CONFIG).is_file() => read(Path::new(DEFAULT_CONFIG))?,
            None => GeneratorConfig::new(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Command-line values win over file values
    pub fn apply(&self, config: &mut GeneratorConfig) {
        if !self.roots.is_empty() {
            config.source_roots = self.roots.clone();
        }
        if let Some(registry) = &self.runtime_classes {
            config.runtime_classes = Some(registry.clone());
        }
    }
}

fn read(path: &Path) -> Result<GeneratorConfig> {
    GeneratorConfig::from_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Validate a configuration file and print a summary
pub fn check(args: &ConfigArgs) -> Result<()> {
    let shown = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    println!("Checking config: {}", shown.display());

    let config = args.load()?;
    config.validate().context("Invalid configuration")?;

    for root in &config.source_roots {
        if !root.is_dir() {
            tracing::warn!(root = %root.display(), "Source root does not exist");
        }
    }
    if let Some(registry) = &config.runtime_classes
        && !registry.is_file()
    {
        anyhow::bail!("Runtime class registry not found: {}", registry.display());
    }

    println!("✓ Source roots: {}", config.source_roots.len());
    println!("✓ Log level: {}", config.log_level);
    println!("✓ Output format: {:?}", config.output.format);
    println!("\nConfig is valid!");

    Ok(())
}

#[cfg(test)]
#[path = "settings/settings_tests.rs"]
mod settings_tests;
