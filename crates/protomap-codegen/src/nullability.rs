//! Nullability markers on generated domain fields

use protomap_core::FileDescriptor;
use serde::Serialize;

/// Marker attached to a reference-typed field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullabilityMarker {
    Nullable,
    NotNull,
}

impl NullabilityMarker {
    pub fn for_nullable(nullable: bool) -> Self {
        if nullable {
            NullabilityMarker::Nullable
        } else {
            NullabilityMarker::NotNull
        }
    }

    pub fn annotation(&self) -> &'static str {
        match self {
            NullabilityMarker::Nullable => "@Nullable",
            NullabilityMarker::NotNull => "@NotNull",
        }
    }
}

/// Decides per schema file whether markers are attached
pub trait NullabilityPolicy: Send + Sync {
    fn use_annotation(&self, file: &FileDescriptor, nullable: bool) -> bool;
}

/// Honors the file's `nullability_annotations` option, else a configured default
#[derive(Debug, Clone, Copy)]
pub struct FileOptionPolicy {
    default_enabled: bool,
}

impl FileOptionPolicy {
    pub fn new(default_enabled: bool) -> Self {
        Self { default_enabled }
    }
}

impl Default for FileOptionPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NullabilityPolicy for FileOptionPolicy {
    fn use_annotation(&self, file: &FileDescriptor, _nullable: bool) -> bool {
        file.nullability_annotations().unwrap_or(self.default_enabled)
    }
}

/// Never attaches markers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotations;

impl NullabilityPolicy for NoAnnotations {
    fn use_annotation(&self, _file: &FileDescriptor, _nullable: bool) -> bool {
        false
    }
}
