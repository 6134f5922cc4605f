//! Request options shared by the client and its extensions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::error::{ApiError, ValidationError};
use crate::method::RestMethod;
use crate::value::Value;

/// Transport-level request configuration.
///
/// Used both as a client's immutable default options and as per-call
/// options. Keys the client does not recognise are kept in [`extra`]
/// and handed to extensions verbatim.
///
/// [`extra`]: RequestOptions::extra
///
/// ## Examples
///
/// ```rust
/// use apiful::RequestOptions;
///
/// let options = RequestOptions::new()
///     .with_base_url("https://api.example.com")
///     .with_header("X-Foo", "bar");
///
/// let json = serde_json::to_value(&options).unwrap();
/// assert_eq!(json["baseURL"], "https://api.example.com");
/// assert_eq!(json["headers"]["X-Foo"], "bar");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Base address that relative request targets are joined onto.
    #[serde(rename = "baseURL", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,

    /// HTTP method; `GET` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<RestMethod>,

    /// Query string parameters.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub query: Map<String, Json>,

    /// Request body, sent as JSON unless it is a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Json>,

    /// Options not interpreted by the client itself.
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the HTTP method.
    pub fn with_method(mut self, method: RestMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Json>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds an option that only extensions interpret.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Reads per-call options from a dynamic argument.
    ///
    /// `Undefined` and JSON `null` produce empty options.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::InvalidArgument`] for functions and objects,
    /// or [`ValidationError::JsonParse`] if the data is not an options object.
    pub fn from_arg(arg: Option<&Value>, index: usize) -> Result<Self, ApiError> {
        match arg {
            None | Some(Value::Undefined) | Some(Value::Data(Json::Null)) => Ok(Self::default()),
            Some(Value::Data(data)) => Ok(serde_json::from_value(data.clone())?),
            Some(_) => Err(ValidationError::InvalidArgument {
                index,
                expected: "request options object",
            }
            .into()),
        }
    }

    /// Layers per-call options over these defaults.
    ///
    /// Scalar settings from `overrides` win when present; headers, query
    /// parameters and extra options are merged key by key with the override
    /// taking precedence.
    pub fn merged_with(&self, overrides: RequestOptions) -> RequestOptions {
        let mut merged = self.clone();
        if overrides.base_url.is_some() {
            merged.base_url = overrides.base_url;
        }
        if overrides.method.is_some() {
            merged.method = overrides.method;
        }
        if overrides.body.is_some() {
            merged.body = overrides.body;
        }
        merged.headers.extend(overrides.headers);
        merged.query.extend(overrides.query);
        merged.extra.extend(overrides.extra);
        merged
    }
}
