//! The service schema registry.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::errors::GeneratorError;
use crate::naming::service_identifier;
use crate::source::SchemaSource;

/// Options for one registered service.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    /// Base URL used by runtime clients.
    pub url: Option<String>,
    /// Where the OpenAPI document comes from. Services without one are
    /// skipped by the emitter.
    pub schema: Option<SchemaSource>,
    /// Options forwarded to the schema compiler.
    pub compiler_options: Option<Map<String, Value>>,
}

impl ServiceOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the schema source.
    pub fn with_schema(mut self, schema: SchemaSource) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the compiler options.
    pub fn with_compiler_options(mut self, options: Map<String, Value>) -> Self {
        self.compiler_options = Some(options);
        self
    }
}

/// A registered service.
#[derive(Debug, Clone, Copy)]
pub struct Service<'a> {
    /// The id as registered.
    pub id: &'a str,
    /// The generated type-name prefix, e.g. `PetStore`.
    pub identifier: &'a str,
    /// The service options.
    pub options: &'a ServiceOptions,
}

#[derive(Debug, Clone)]
struct Entry {
    identifier: String,
    options: ServiceOptions,
}

/// Ordered mapping from service id to [`ServiceOptions`].
///
/// Iteration follows registration order, which fixes the order of the
/// generated declaration blocks.
///
/// ## Examples
///
/// ```
/// use apiful_gen::{SchemaSource, ServiceOptions, ServiceRegistry};
/// use serde_json::json;
///
/// let mut registry = ServiceRegistry::new();
/// registry
///     .register("petStore", ServiceOptions::new().with_schema(SchemaSource::Inline(json!({}))))
///     .unwrap();
///
/// // `pet-store` would also generate `PetStore` types
/// assert!(registry.register("pet-store", ServiceOptions::new()).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: IndexMap<String, Entry>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, replacing any earlier registration of `id`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::InvalidServiceId`] if `id` cannot produce a
    /// type name, or [`GeneratorError::NamingCollision`] if another id
    /// already produces the same one.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        options: ServiceOptions,
    ) -> Result<(), GeneratorError> {
        let id = id.into();
        let identifier = service_identifier(&id)?;

        if let Some((existing, _)) = self
            .services
            .iter()
            .find(|(other, entry)| **other != id && entry.identifier == identifier)
        {
            return Err(GeneratorError::NamingCollision {
                id,
                existing: existing.clone(),
                identifier,
            });
        }

        self.services.insert(id, Entry { identifier, options });
        Ok(())
    }

    /// Registers a service, builder style.
    ///
    /// ## Errors
    ///
    /// See [`register`](Self::register).
    pub fn with_service(
        mut self,
        id: impl Into<String>,
        options: ServiceOptions,
    ) -> Result<Self, GeneratorError> {
        self.register(id, options)?;
        Ok(self)
    }

    /// Returns a registered service.
    pub fn get(&self, id: &str) -> Option<Service<'_>> {
        self.services.get_key_value(id).map(|(id, entry)| Service {
            id,
            identifier: &entry.identifier,
            options: &entry.options,
        })
    }

    /// Iterates all services in registration order.
    pub fn iter(&self) -> impl Iterator<Item = Service<'_>> {
        self.services.iter().map(|(id, entry)| Service {
            id,
            identifier: &entry.identifier,
            options: &entry.options,
        })
    }

    /// Iterates the services that declare a schema, in registration order.
    pub fn with_schemas(&self) -> impl Iterator<Item = Service<'_>> {
        self.iter().filter(|service| service.options.schema.is_some())
    }

    /// Returns `true` if at least one service declares a schema.
    pub fn has_schemas(&self) -> bool {
        self.with_schemas().next().is_some()
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
