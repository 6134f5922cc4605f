//! Schema sources and their resolution.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::GeneratorError;
use crate::schema::unwrap_document;

/// An async function producing a schema document.
pub type Resolver = Arc<dyn Fn() -> BoxFuture<'static, Result<Value, String>> + Send + Sync>;

/// Where a service's OpenAPI document comes from.
#[derive(Clone)]
pub enum SchemaSource {
    /// A document given directly. Wrapped JSON Schema documents are
    /// unwrapped on resolution.
    Inline(Value),
    /// A document fetched over HTTP, or read from disk for `file:` URLs.
    Url(Url),
    /// A local JSON or YAML file.
    File(PathBuf),
    /// A document produced on demand.
    Resolver(Resolver),
}

impl fmt::Debug for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::Url(url) => f.debug_tuple("Url").field(&url.as_str()).finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl SchemaSource {
    /// Interprets a location string: an absolute URL, otherwise a file path.
    ///
    /// ## Examples
    ///
    /// ```
    /// use apiful_gen::SchemaSource;
    ///
    /// assert!(matches!(
    ///     SchemaSource::from_location("https://petstore3.swagger.io/api/v3/openapi.json"),
    ///     SchemaSource::Url(_)
    /// ));
    /// assert!(matches!(SchemaSource::from_location("./openapi.yaml"), SchemaSource::File(_)));
    /// ```
    pub fn from_location(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) => Self::Url(url),
            Err(_) => Self::File(PathBuf::from(location)),
        }
    }

    /// Wraps an async function as a source.
    pub fn resolver<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, String>> + Send + 'static,
    {
        Self::Resolver(Arc::new(move || Box::pin(f())))
    }

    /// Anchors a relative file path at `base`.
    pub fn relative_to(self, base: &Path) -> Self {
        match self {
            Self::File(path) if path.is_relative() => Self::File(base.join(path)),
            other => other,
        }
    }

    /// Produces the document for `service`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::Resolution`] if the document cannot be
    /// fetched, read or parsed, or if the resolver fails.
    pub async fn resolve(&self, service: &str) -> Result<Value, GeneratorError> {
        let failed = |message: String| GeneratorError::Resolution {
            service: service.to_string(),
            message,
        };

        let document = match self {
            Self::Inline(document) => document.clone(),
            Self::Url(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| failed(format!("'{url}' is not a valid file URL")))?;
                read_file(&path).await.map_err(failed)?
            }
            Self::Url(url) => fetch(url).await.map_err(failed)?,
            Self::File(path) => read_file(path).await.map_err(failed)?,
            Self::Resolver(resolve) => resolve().await.map_err(failed)?,
        };

        debug!(service, "resolved schema source");
        Ok(unwrap_document(document))
    }
}

async fn fetch(url: &Url) -> Result<Value, String> {
    let response = reqwest::get(url.clone())
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| e.to_string())?;
    let text = response.text().await.map_err(|e| e.to_string())?;
    parse_document(&text, url.path())
}

async fn read_file(path: &Path) -> Result<Value, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
    parse_document(&text, &path.to_string_lossy())
}

/// Parses JSON or YAML, choosing by the extension of `name` and falling
/// back to YAML (a superset of JSON) when there is none.
pub fn parse_document(text: &str, name: &str) -> Result<Value, String> {
    if name.ends_with(".json") {
        serde_json::from_str(text).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::JsonSchemaDocument;
    use serde_json::json;

    #[test]
    fn relative_files_are_anchored() {
        let source = SchemaSource::from_location("schemas/a.json").relative_to(Path::new("/project"));
        let SchemaSource::File(path) = source else {
            panic!("expected a file source");
        };
        assert_eq!(path, PathBuf::from("/project/schemas/a.json"));
    }

    #[test]
    fn parses_yaml_and_json() {
        assert_eq!(
            parse_document("openapi: 3.1.0\npaths: {}\n", "a.yaml").unwrap(),
            json!({ "openapi": "3.1.0", "paths": {} })
        );
        assert_eq!(parse_document("{\"a\":1}", "a.json").unwrap(), json!({ "a": 1 }));
        assert!(parse_document("{", "a.json").is_err());
    }

    #[tokio::test]
    async fn inline_wrappers_are_unwrapped() {
        let inner = json!({ "openapi": "3.1.0" });
        let source = SchemaSource::Inline(JsonSchemaDocument::new(inner.clone()).to_value());
        assert_eq!(source.resolve("svc").await.unwrap(), inner);
    }

    #[tokio::test]
    async fn resolver_failures_name_the_service() {
        let source = SchemaSource::resolver(|| async { Err("offline".to_string()) });
        let err = source.resolve("remote").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Resolution { ref service, .. } if service == "remote"));
        assert!(err.to_string().contains("offline"));
    }

    #[tokio::test]
    async fn missing_files_fail_to_resolve() {
        let source = SchemaSource::File(PathBuf::from("/definitely/not/here.json"));
        assert!(source.resolve("local").await.is_err());
    }
}
