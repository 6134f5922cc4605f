//! Writing generated declarations to disk.
//!
//! Writes go through a temp file and a rename, so a failed run never leaves
//! a half-written declaration file behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::compiler::SchemaCompiler;
use crate::emitter::emit;
use crate::errors::GeneratorError;
use crate::registry::ServiceRegistry;

/// File name used when the definition target is a directory.
pub const DEFAULT_DEFINITION_FILE: &str = "apiful.d.ts";

/// Resolves the declaration file path for `target`.
///
/// An existing directory, or a path ending in a separator, gets
/// [`DEFAULT_DEFINITION_FILE`] appended; anything else is used as is.
pub fn definition_path(target: &Path) -> PathBuf {
    let ends_with_separator = target
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator);

    if target.is_dir() || ends_with_separator {
        target.join(DEFAULT_DEFINITION_FILE)
    } else {
        target.to_path_buf()
    }
}

/// Writes content to a file atomically using temp file + rename.
///
/// Parent directories are created as needed.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if any filesystem step fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    info!(path = %path.display(), bytes = content.len(), "wrote declarations");
    Ok(())
}

/// Emits declarations for `registry` and writes them to `target`.
///
/// Returns the path actually written, see [`definition_path`].
///
/// ## Errors
///
/// Returns [`GeneratorError::EmptyRegistry`] if no service declares a
/// schema, or a write error. Per-service failures never fail the run.
pub async fn generate_and_write(
    registry: &ServiceRegistry,
    compiler: &dyn SchemaCompiler,
    target: &Path,
) -> Result<PathBuf, GeneratorError> {
    if !registry.has_schemas() {
        return Err(GeneratorError::EmptyRegistry);
    }

    let path = definition_path(target);
    let declarations = emit(registry, compiler).await;
    write_atomic(&path, &declarations)?;
    Ok(path)
}
