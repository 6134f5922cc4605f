//! HTTP transport used by the built-in extensions.
//!
//! Extensions never talk to `reqwest` directly; they receive an
//! `Arc<dyn Transport>` so tests and embedders can swap in their own.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value as Json;
use tracing::{Span, debug, instrument};
use url::Url;

use crate::error::{ApiError, ClientError};
use crate::method::RestMethod;
use crate::options::RequestOptions;
use crate::path::{join_url, param_to_string};
use crate::value::{BoxFuture, Value};

/// Performs one HTTP request.
///
/// Implementations are configured once with default options and reused
/// across calls. Responses come back as [`Value::Data`]; an empty body
/// yields [`Value::Undefined`].
pub trait Transport: Send + Sync {
    /// Sends a request to `target` with per-call `options`.
    fn fetch(&self, target: &str, options: RequestOptions) -> BoxFuture<'_, Result<Value, ApiError>>;
}

/// Shared handle to a transport.
pub type SharedTransport = Arc<dyn Transport>;

/// [`Transport`] backed by a pooled `reqwest::Client`.
///
/// ## Examples
///
/// ```rust,ignore
/// use apiful::{RequestOptions, ReqwestTransport, Transport};
///
/// let transport = ReqwestTransport::new(
///     RequestOptions::new().with_base_url("https://api.example.com"),
/// )?;
/// let user = transport.fetch("/users/1", RequestOptions::new()).await?;
/// ```
pub struct ReqwestTransport {
    client: reqwest::Client,
    defaults: RequestOptions,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a transport with the given default options.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(defaults: RequestOptions) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { client, defaults })
    }

    /// Creates a shared transport with the given default options.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn shared(defaults: RequestOptions) -> Result<SharedTransport, ApiError> {
        Ok(Arc::new(Self::new(defaults)?))
    }

    /// Returns the default options applied to every request.
    pub fn defaults(&self) -> &RequestOptions {
        &self.defaults
    }

    #[instrument(
        name = "apiful_fetch",
        skip(self, options),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        )
    )]
    async fn send(&self, target: String, options: RequestOptions) -> Result<Value, ApiError> {
        let options = self.defaults.merged_with(options);
        let method = options.method.unwrap_or(RestMethod::Get);
        Span::current().record("http.method", method.to_string().as_str());

        let url = build_url(&target, &options)?;
        Span::current().record("http.url", url.as_str());

        let mut request = self
            .client
            .request(method.to_reqwest(), url)
            .headers(build_headers(&options)?);

        match options.body {
            Some(Json::String(text)) => request = request.body(text),
            Some(Json::Null) | None => {}
            Some(body) => request = request.json(&body),
        }

        let response = request.send().await.map_err(ClientError::Request)?;
        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));
        let body = response.bytes().await.map_err(ClientError::Request)?;
        debug!(bytes = body.len(), is_json, "response received");

        if body.is_empty() {
            return Ok(Value::Undefined);
        }
        if is_json {
            return Ok(Value::Data(serde_json::from_slice(&body)?));
        }
        Ok(Value::Data(Json::String(
            String::from_utf8_lossy(&body).into_owned(),
        )))
    }
}

impl Transport for ReqwestTransport {
    fn fetch(&self, target: &str, options: RequestOptions) -> BoxFuture<'_, Result<Value, ApiError>> {
        Box::pin(self.send(target.to_string(), options))
    }
}

/// Resolves the request target against the base URL and appends the query.
fn build_url(target: &str, options: &RequestOptions) -> Result<Url, ApiError> {
    let joined = match (Url::parse(target), options.base_url.as_deref()) {
        (Ok(absolute), _) => absolute.to_string(),
        (Err(_), Some(base)) if !target.starts_with(base) => join_url(base, [target]),
        (Err(_), _) => target.to_string(),
    };

    let mut url = Url::parse(&joined).map_err(|source| ClientError::InvalidUrl {
        url: joined.clone(),
        source,
    })?;

    if !options.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &options.query {
            match value {
                Json::Null => {}
                Json::Array(items) => {
                    for item in items {
                        pairs.append_pair(key, &param_to_string(item));
                    }
                }
                other => {
                    pairs.append_pair(key, &param_to_string(other));
                }
            }
        }
    }

    Ok(url)
}

fn build_headers(options: &RequestOptions) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn relative_targets_join_the_base() {
        let options = RequestOptions::new().with_base_url("https://api.example.com/v1");
        let url = build_url("/users", &options).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/users");
    }

    #[test]
    fn absolute_targets_ignore_the_base() {
        let options = RequestOptions::new().with_base_url("https://api.example.com");
        let url = build_url("https://other.example.com/x", &options).unwrap();
        assert_eq!(url.as_str(), "https://other.example.com/x");
    }

    #[test]
    fn query_arrays_repeat_the_key() {
        let options = RequestOptions::new()
            .with_base_url("https://api.example.com")
            .with_query("tag", json!(["a", "b"]))
            .with_query("limit", 10)
            .with_query("skip", Json::Null);
        let url = build_url("/pets", &options).unwrap();
        assert_eq!(url.query(), Some("tag=a&tag=b&limit=10"));
    }

    #[test]
    fn relative_target_without_base_is_invalid() {
        let err = build_url("/pets", &RequestOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Client(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn invalid_header_is_reported() {
        let options = RequestOptions::new().with_header("bad header", "x");
        let err = build_headers(&options).unwrap_err();
        assert!(err.to_string().contains("Invalid header"));
    }
}
