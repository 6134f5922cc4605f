//! OpenAPI-to-TypeScript compilation.
//!
//! The emitter treats the compiler as a black box: given a document and
//! optional settings it returns declaration source text, or fails.
//! [`CommandCompiler`] runs the `openapi-typescript` command line tool;
//! any closure with the right shape works too.

use std::process::Stdio;

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::errors::{CompilerError, GeneratorError};
use crate::naming::kebab_case;

/// Default command used to compile OpenAPI documents.
pub const DEFAULT_COMPILER_COMMAND: &str = "npx openapi-typescript";

/// Turns an OpenAPI document into TypeScript declarations.
pub trait SchemaCompiler: Send + Sync {
    /// Compiles `document`, honouring `options` where supported.
    fn compile<'a>(
        &'a self,
        document: &'a Value,
        options: Option<&'a Map<String, Value>>,
    ) -> BoxFuture<'a, Result<String, CompilerError>>;
}

impl<F> SchemaCompiler for F
where
    F: Fn(&Value, Option<&Map<String, Value>>) -> Result<String, CompilerError> + Send + Sync,
{
    fn compile<'a>(
        &'a self,
        document: &'a Value,
        options: Option<&'a Map<String, Value>>,
    ) -> BoxFuture<'a, Result<String, CompilerError>> {
        Box::pin(std::future::ready(self(document, options)))
    }
}

/// Runs an external command on a temporary copy of the document.
///
/// The command receives the document path as its first extra argument,
/// followed by one `--kebab-case` flag per compiler option, and must print
/// the declarations to stdout.
///
/// ## Examples
///
/// ```
/// use apiful_gen::CommandCompiler;
///
/// let compiler = CommandCompiler::from_command_line("npx openapi-typescript").unwrap();
/// assert_eq!(compiler.program(), "npx");
/// ```
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl Default for CommandCompiler {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["openapi-typescript".to_string()],
        }
    }
}

impl CommandCompiler {
    /// Creates a compiler running `program` with no leading arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds a leading argument, builder style.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Splits a whitespace separated command line into program and
    /// arguments.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] for an empty command line.
    pub fn from_command_line(command: &str) -> Result<Self, GeneratorError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| GeneratorError::ConfigError {
            path: "--compiler".to_string(),
            message: "compiler command cannot be empty".to_string(),
        })?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// The program that is run.
    pub fn program(&self) -> &str {
        &self.program
    }

    #[instrument(name = "compile_schema", skip_all, fields(program = %self.program))]
    async fn run(
        &self,
        document: &Value,
        options: Option<&Map<String, Value>>,
    ) -> Result<String, CompilerError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("schema.json");
        tokio::fs::write(&input, serde_json::to_vec(document)?).await?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&input)
            .args(option_flags(options))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CompilerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompilerError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(bytes = output.stdout.len(), "compiler finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SchemaCompiler for CommandCompiler {
    fn compile<'a>(
        &'a self,
        document: &'a Value,
        options: Option<&'a Map<String, Value>>,
    ) -> BoxFuture<'a, Result<String, CompilerError>> {
        Box::pin(self.run(document, options))
    }
}

/// Maps compiler options to command line flags.
///
/// `true` becomes a bare flag and `false`/`null` are dropped; arrays repeat
/// the flag once per element; anything else becomes the flag's value.
fn option_flags(options: Option<&Map<String, Value>>) -> Vec<String> {
    let mut flags = Vec::new();
    for (name, value) in options.into_iter().flatten() {
        let flag = format!("--{}", kebab_case(name));
        match value {
            Value::Bool(true) => flags.push(flag),
            Value::Bool(false) | Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    flags.push(flag.clone());
                    flags.push(flag_value(item));
                }
            }
            other => {
                flags.push(flag);
                flags.push(flag_value(other));
            }
        }
    }
    flags
}

fn flag_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
