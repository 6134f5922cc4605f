//! TypeScript declaration generation for apiful.
//!
//! Two independent pipelines live here:
//!
//! - **Service declarations**: a [`ServiceRegistry`] of OpenAPI services is
//!   resolved, compiled with a [`SchemaCompiler`] and emitted as one
//!   declaration file with a `apiful/schema` hub module and one module per
//!   service.
//! - **Schema unification**: JSON samples and JSON Schema documents map onto
//!   a [`Schema`] tree, are merged with [`merge`] and rendered as TypeScript
//!   or JSON Schema.
//!
//! ## Modules
//!
//! - [`registry`] - Ordered service registry with collision checks
//! - [`source`] - Inline, URL, file and resolver schema sources
//! - [`compiler`] - The OpenAPI to TypeScript compiler collaborator
//! - [`emitter`] - Declaration file assembly
//! - [`config`] - `apiful.toml` loading
//! - [`output`] - Atomic file writing
//! - [`schema`] - The unified schema model
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use apiful_gen::{ApifulConfig, CommandCompiler, generate_and_write};
//!
//! # async fn run() -> Result<(), apiful_gen::GeneratorError> {
//! let registry = ApifulConfig::load(Path::new("apiful.toml"))?.into_registry(Path::new("."))?;
//! let written = generate_and_write(&registry, &CommandCompiler::default(), Path::new(".nuxt")).await?;
//! println!("wrote {}", written.display());
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod config;
pub mod emitter;
pub mod errors;
pub mod naming;
pub mod output;
pub mod registry;
pub mod schema;
pub mod source;

pub use compiler::{CommandCompiler, DEFAULT_COMPILER_COMMAND, SchemaCompiler};
pub use config::{ApifulConfig, DEFAULT_CONFIG_FILE, ServiceConfig};
pub use emitter::emit;
pub use errors::{CompilerError, GeneratorError};
pub use output::{DEFAULT_DEFINITION_FILE, definition_path, generate_and_write, write_atomic};
pub use registry::{Service, ServiceOptions, ServiceRegistry};
pub use schema::{
    JsonSchemaDocument, Primitive, Schema, TypeDefinitionOptions, infer, json_to_type_definition,
    merge, schema_to_type_definition,
};
pub use source::SchemaSource;
