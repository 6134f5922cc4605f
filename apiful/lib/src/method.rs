//! HTTP method types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// HTTP methods accepted in [`RequestOptions`](crate::RequestOptions).
///
/// Parsing is case-insensitive so that `"post"` and `"POST"` both resolve,
/// matching how route-builder property names are interpreted.
///
/// ## Examples
///
/// ```rust
/// use apiful::RestMethod;
///
/// let parsed: RestMethod = "patch".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Patch);
/// assert_eq!(parsed.to_string(), "PATCH");
/// assert!(parsed.has_body());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource.
    #[serde(rename = "GET", alias = "get")]
    Get,
    /// HTTP POST - Create a resource or trigger an action.
    #[serde(rename = "POST", alias = "post")]
    Post,
    /// HTTP PUT - Replace a resource entirely.
    #[serde(rename = "PUT", alias = "put")]
    Put,
    /// HTTP PATCH - Partially update a resource.
    #[serde(rename = "PATCH", alias = "patch")]
    Patch,
    /// HTTP DELETE - Remove a resource.
    #[serde(rename = "DELETE", alias = "delete")]
    Delete,
    /// HTTP HEAD - Retrieve headers only.
    #[serde(rename = "HEAD", alias = "head")]
    Head,
    /// HTTP OPTIONS - Query supported methods.
    #[serde(rename = "OPTIONS", alias = "options")]
    Options,
    /// HTTP TRACE - Echo the request for debugging.
    #[serde(rename = "TRACE", alias = "trace")]
    Trace,
}

impl RestMethod {
    /// Methods the route builder exposes as properties.
    pub const ROUTE_METHODS: [RestMethod; 5] = [
        RestMethod::Get,
        RestMethod::Post,
        RestMethod::Put,
        RestMethod::Delete,
        RestMethod::Patch,
    ];

    /// Returns `true` if the route builder sends call data as the request body.
    ///
    /// GET sends its data as the query string instead.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch | Self::Delete)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Trace => reqwest::Method::TRACE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}
