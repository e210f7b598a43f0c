//! Error types for hierarchy resolution

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resolver operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Error type for hierarchy resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No source root contains a parseable declaration of the class
    #[error("class {class} not found in any source root")]
    NotFound { class: String },

    /// A source file was located but could not be read as Java
    #[error("malformed source {}: {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },

    /// The superclass chain revisits a class
    #[error("cyclic class hierarchy: {chain}")]
    CyclicHierarchy { chain: String },

    /// Reading a source file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The runtime class registry is invalid
    #[error("invalid class registry: {0}")]
    Registry(String),
}

impl ResolveError {
    /// Returns a stable numeric code for reports
    pub fn error_code(&self) -> u32 {
        match self {
            ResolveError::NotFound { .. } => 101,
            ResolveError::MalformedSource { .. } => 102,
            ResolveError::CyclicHierarchy { .. } => 103,
            ResolveError::Io { .. } => 104,
            ResolveError::Registry(_) => 105,
        }
    }

    /// Whether a field generator may fall back to direct access
    ///
    /// A cyclic hierarchy means the domain model itself is broken and is never
    /// downgraded.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ResolveError::CyclicHierarchy { .. })
    }
}

impl From<toml::de::Error> for ResolveError {
    fn from(err: toml::de::Error) -> Self {
        ResolveError::Registry(err.to_string())
    }
}
