//! Error types for the declaration generator.

use thiserror::Error;

/// Errors that can occur while configuring or running generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("Invalid configuration in '{path}': {message}")]
    ConfigError { path: String, message: String },

    /// No service declares a schema.
    #[error("No services with a schema are configured")]
    EmptyRegistry,

    /// A service id cannot be turned into a usable identifier.
    #[error("Invalid service id '{id}': {reason}")]
    InvalidServiceId {
        /// The rejected id.
        id: String,
        /// Explanation of why the id is invalid.
        reason: String,
    },

    /// Two service ids normalize to the same generated type name.
    ///
    /// For example `pet-store` and `petStore` both become `PetStore`.
    #[error(
        "Naming collision for service '{id}': generated name '{identifier}' is already used by service '{existing}'"
    )]
    NamingCollision {
        /// The id being registered.
        id: String,
        /// The already registered id.
        existing: String,
        /// The shared generated name.
        identifier: String,
    },

    /// A schema source could not be turned into a document.
    #[error("Failed to resolve schema for service '{service}': {message}")]
    Resolution { service: String, message: String },

    /// The schema compiler failed for a service.
    #[error("Failed to compile schema for service '{service}': {message}")]
    Compile { service: String, message: String },

    /// A JSON document or schema could not be interpreted.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reported by a [`SchemaCompiler`](crate::compiler::SchemaCompiler).
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The compiler process could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler exited unsuccessfully.
    #[error("Compiler exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    /// The schema document could not be handed to the compiler.
    #[error("Failed to prepare schema document: {0}")]
    Io(#[from] std::io::Error),

    /// The schema document could not be serialized.
    #[error("Failed to serialize schema document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The compiler rejected the document.
    #[error("{0}")]
    Rejected(String),
}

impl GeneratorError {
    /// Returns `true` for failures that only affect a single service.
    ///
    /// The emitter degrades these to placeholder declarations instead of
    /// failing the batch.
    pub fn is_per_service(&self) -> bool {
        matches!(self, Self::Resolution { .. } | Self::Compile { .. })
    }
}
