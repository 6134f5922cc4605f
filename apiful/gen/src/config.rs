//! Service configuration files.
//!
//! ```toml
//! [services.petStore]
//! url = "https://petstore3.swagger.io/api/v3"
//! schema = "https://petstore3.swagger.io/api/v3/openapi.json"
//!
//! [services.local]
//! schema = "./schemas/local.yaml"
//! compiler = { rootTypes = true }
//! ```
//!
//! TOML, YAML and JSON files are accepted, chosen by extension. Services are
//! registered in document order.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::GeneratorError;
use crate::registry::{ServiceOptions, ServiceRegistry};
use crate::source::SchemaSource;

/// Config file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "apiful.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApifulConfig {
    /// Services keyed by id.
    #[serde(default)]
    pub services: IndexMap<String, ServiceConfig>,
}

/// One service entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub url: Option<String>,
    /// A URL or file path, or an inline OpenAPI document.
    pub schema: Option<Value>,
    /// Options forwarded to the schema compiler.
    pub compiler: Option<Map<String, Value>>,
}

impl ApifulConfig {
    /// Loads a configuration file.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigRead`] if the file cannot be read and
    /// [`GeneratorError::ConfigError`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = fs::read_to_string(path).map_err(|e| GeneratorError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&content, path)?;
        debug!(path = %path.display(), services = config.services.len(), "loaded config");
        Ok(config)
    }

    /// Parses configuration text, using the extension of `path` to pick the
    /// format. Unknown extensions are read as TOML.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] on malformed input.
    pub fn parse(content: &str, path: &Path) -> Result<Self, GeneratorError> {
        let invalid = |message: String| GeneratorError::ConfigError {
            path: path.display().to_string(),
            message,
        };

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(content).map_err(|e| invalid(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(content).map_err(|e| invalid(e.to_string())),
            _ => toml::from_str(content).map_err(|e| invalid(e.to_string())),
        }
    }

    /// Builds a registry, resolving relative schema paths against `cwd`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] for a `schema` that is neither
    /// a string nor an object, and any registration error.
    pub fn into_registry(self, cwd: &Path) -> Result<ServiceRegistry, GeneratorError> {
        let mut registry = ServiceRegistry::new();

        for (id, service) in self.services {
            let schema = match service.schema {
                None => None,
                Some(Value::String(location)) => {
                    Some(SchemaSource::from_location(&location).relative_to(cwd))
                }
                Some(document @ Value::Object(_)) => Some(SchemaSource::Inline(document)),
                Some(other) => {
                    return Err(GeneratorError::ConfigError {
                        path: format!("services.{id}.schema"),
                        message: format!("expected a URL, a file path or a document, got {other}"),
                    });
                }
            };

            registry.register(
                id,
                ServiceOptions {
                    url: service.url,
                    schema,
                    compiler_options: service.compiler,
                },
            )?;
        }

        Ok(registry)
    }
}
