//! Error types for schema loading and field generation

use thiserror::Error;

/// Result type alias for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Error type for generator operations
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// A conversion was requested that the type model cannot honor
    #[error("contract violation for field {field} of {message}: {detail}")]
    ContractViolation {
        message: String,
        field: String,
        detail: String,
    },

    /// The descriptor set is inconsistent
    #[error("schema error: {0}")]
    Schema(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Descriptor or configuration could not be decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The domain class hierarchy could not be walked
    #[error("hierarchy resolution failed: {0}")]
    Resolution(String),

    /// Reading an input file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    /// Returns a stable numeric code for reports
    pub fn error_code(&self) -> u32 {
        match self {
            GeneratorError::ContractViolation { .. } => 1,
            GeneratorError::Schema(_) => 2,
            GeneratorError::Config(_) => 3,
            GeneratorError::Serialization(_) => 4,
            GeneratorError::Io(_) => 5,
            GeneratorError::Resolution(_) => 6,
        }
    }

    /// Shorthand for a contract violation on a named field
    pub fn contract(
        message: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        GeneratorError::ContractViolation {
            message: message.into(),
            field: field.into(),
            detail: detail.into(),
        }
    }
}

impl From<prost_reflect::DescriptorError> for GeneratorError {
    fn from(err: prost_reflect::DescriptorError) -> Self {
        GeneratorError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for GeneratorError {
    fn from(err: toml::de::Error) -> Self {
        GeneratorError::Config(err.to_string())
    }
}
