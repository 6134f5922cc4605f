//! apiful command line
//!
//! Generates TypeScript declarations for configured OpenAPI services, and
//! infers TypeScript types from JSON samples.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use apiful_gen::schema::unwrap_document;
use apiful_gen::{
    ApifulConfig, CommandCompiler, DEFAULT_COMPILER_COMMAND, DEFAULT_CONFIG_FILE,
    DEFAULT_DEFINITION_FILE, GeneratorError, Schema, TypeDefinitionOptions, generate_and_write,
    infer, merge, schema_to_type_definition,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Typed API clients for OpenAPI services
///
/// Examples:
///   apiful generate                          # Read apiful.toml, write apiful.d.ts
///   apiful generate --definition .nuxt/      # Write .nuxt/apiful.d.ts
///   apiful infer response.json --type-name Pet
#[derive(Debug, Parser)]
#[command(name = "apiful")]
#[command(version)]
#[command(about = "Typed API clients for OpenAPI services")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate declarations for every configured service with a schema
    Generate {
        /// Service configuration file (TOML, YAML or JSON)
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output file, or a directory to write apiful.d.ts into
        #[arg(short, long, default_value = DEFAULT_DEFINITION_FILE)]
        definition: PathBuf,

        /// Directory that relative paths are resolved against
        #[arg(long, default_value = ".")]
        cwd: PathBuf,

        /// Command that compiles an OpenAPI document to TypeScript
        #[arg(long, default_value = DEFAULT_COMPILER_COMMAND)]
        compiler: String,
    },

    /// Infer a TypeScript type from JSON samples
    Infer {
        /// JSON files; samples are merged into one type
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Name of the exported type
        #[arg(short, long, default_value = "Root")]
        type_name: String,

        /// Make every inferred property required
        #[arg(long)]
        strict: bool,

        /// Treat the files as JSON Schema documents instead of samples
        #[arg(long)]
        from_schema: bool,

        /// Print the merged JSON Schema instead of TypeScript
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Error)]
enum CliError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("'{path}' is not valid JSON: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

// `main` reports a returned error through `Debug`, so show the message.
impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate {
            config,
            definition,
            cwd,
            compiler,
        } => generate(&cwd.join(config), &cwd.join(definition), &cwd, &compiler).await,
        Command::Infer {
            files,
            type_name,
            strict,
            from_schema,
            json_schema,
        } => {
            let schema = merge_files(&files, strict, from_schema)?;
            let output = if json_schema {
                serde_json::to_string_pretty(&schema.to_json_schema()).map_err(|source| {
                    CliError::Parse {
                        path: "<output>".to_string(),
                        source,
                    }
                })? + "\n"
            } else {
                let options = TypeDefinitionOptions {
                    type_name,
                    strict_properties: strict,
                    ..TypeDefinitionOptions::default()
                };
                schema_to_type_definition(&schema, &options)
            };
            print!("{output}");
            Ok(())
        }
    }
}

async fn generate(
    config: &Path,
    definition: &Path,
    cwd: &Path,
    compiler: &str,
) -> Result<(), CliError> {
    let registry = ApifulConfig::load(config)?.into_registry(cwd)?;
    let compiler = CommandCompiler::from_command_line(compiler)?;
    info!(services = registry.len(), program = compiler.program(), "starting generation");

    let written = generate_and_write(&registry, &compiler, definition).await?;

    println!(
        "{} {} {}",
        "✓".green(),
        "Generated".bold(),
        written.display().to_string().cyan()
    );
    Ok(())
}

fn merge_files(files: &[PathBuf], strict: bool, from_schema: bool) -> Result<Schema, CliError> {
    let mut schemas = Vec::with_capacity(files.len());

    for file in files {
        let path = file.display().to_string();
        let text = fs::read_to_string(file).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|source| CliError::Parse { path, source })?;

        schemas.push(if from_schema {
            Schema::from_json_schema(&unwrap_document(value))
        } else {
            infer(&value, strict)
        });
    }

    debug!(inputs = schemas.len(), "merging schemas");
    Ok(merge(schemas))
}

/// Initialize tracing subscriber for logging.
///
/// Uses RUST_LOG if set, otherwise derives the filter from `-v` counts.
/// Logs go to stderr so generated output on stdout stays clean.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,apiful_gen=info,apiful=info".to_string(),
            2 => "info,apiful_gen=debug,apiful=debug".to_string(),
            _ => "debug,apiful_gen=trace,apiful=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
