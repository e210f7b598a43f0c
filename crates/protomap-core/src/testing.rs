//! Compile `.proto` sources into descriptor sets for tests.
//!
//! Sources are written to a scratch directory next to `protomap/options.proto` and
//! compiled with `protox`, so test schemas can import the protomap options without
//! a `protoc` install.

use crate::descriptor::DescriptorPool;
use crate::error::{GeneratorError, GeneratorResult};
use crate::options::{OPTIONS_FILE, OPTIONS_PROTO};

/// Encoded `FileDescriptorSet` of `files` (`(path, source)` pairs), imports included
pub fn encode_descriptor_set(files: &[(&str, &str)]) -> GeneratorResult<Vec<u8>> {
    let dir = tempfile::tempdir()?;
    write_source(dir.path(), OPTIONS_FILE, OPTIONS_PROTO)?;
    for (name, source) in files {
        write_source(dir.path(), name, source)?;
    }

    let mut compiler = protox::Compiler::new([dir.path()]).map_err(schema_error)?;
    compiler.include_imports(true);
    compiler
        .open_files(files.iter().map(|(name, _)| dir.path().join(name)))
        .map_err(schema_error)?;

    Ok(compiler.encode_file_descriptor_set())
}

/// Decoded pool of `files`
pub fn compile(files: &[(&str, &str)]) -> GeneratorResult<DescriptorPool> {
    DescriptorPool::decode(&encode_descriptor_set(files)?)
}

fn write_source(root: &std::path::Path, name: &str, source: &str) -> GeneratorResult<()> {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, source)?;
    Ok(())
}

fn schema_error(err: protox::Error) -> GeneratorError {
    GeneratorError::Schema(err.to_string())
}
