//! Generator configuration (`protomap.toml`)

use crate::error::{GeneratorError, GeneratorResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Initial log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Domain source roots, in precedence order
    #[serde(default)]
    pub source_roots: Vec<PathBuf>,

    /// Attach nullability markers when a schema file does not say otherwise
    #[serde(default = "default_nullability_annotations")]
    pub default_nullability_annotations: bool,

    /// Optional TOML registry of runtime classes used when a superclass has no source
    #[serde(default)]
    pub runtime_classes: Option<PathBuf>,

    #[serde(default)]
    pub output: OutputSection,
}

/// Report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,

    /// Name of the wire builder variable used in `toGrpc` fragments
    #[serde(default = "default_builder_name")]
    pub builder_name: String,

    /// Name of the wire message parameter used in `fromGrpc` fragments
    #[serde(default = "default_wire_parameter")]
    pub wire_parameter: String,
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_nullability_annotations() -> bool {
    true
}

fn default_builder_name() -> String {
    "builder".to_string()
}

fn default_wire_parameter() -> String {
    "grpc".to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            builder_name: default_builder_name(),
            wire_parameter: default_wire_parameter(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source_roots: Vec::new(),
            default_nullability_annotations: default_nullability_annotations(),
            runtime_classes: None,
            output: OutputSection::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with defaults and no source roots
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// Relative source roots and registry paths are resolved against the directory
    /// containing the file.
    pub fn from_file(path: impl AsRef<Path>) -> GeneratorResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> GeneratorResult<Self> {
        Ok(toml::from_str(content)?)
    }

    fn rebase(&mut self, base: &Path) {
        for root in &mut self.source_roots {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        if let Some(registry) = &mut self.runtime_classes
            && registry.is_relative()
        {
            *registry = base.join(&*registry);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> GeneratorResult<()> {
        if self.source_roots.is_empty() {
            return Err(GeneratorError::Config(
                "at least one source root is required".to_string(),
            ));
        }

        for (i, root) in self.source_roots.iter().enumerate() {
            if root.as_os_str().is_empty() {
                return Err(GeneratorError::Config(format!(
                    "source root #{i} is empty"
                )));
            }
            if self.source_roots[..i].contains(root) {
                return Err(GeneratorError::Config(format!(
                    "source root listed twice: {}",
                    root.display()
                )));
            }
        }

        if !is_valid_level(&self.log_level) {
            return Err(GeneratorError::Config(format!(
                "unknown log level: {}",
                self.log_level
            )));
        }

        if self.output.builder_name.trim().is_empty() {
            return Err(GeneratorError::Config(
                "output.builder_name cannot be empty".to_string(),
            ));
        }
        if self.output.wire_parameter.trim().is_empty() {
            return Err(GeneratorError::Config(
                "output.wire_parameter cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_valid_level(level: &str) -> bool {
    matches!(
        level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}
