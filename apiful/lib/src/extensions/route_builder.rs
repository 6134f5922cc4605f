//! Path-based route builder.
//!
//! A [`Route`] is a URL under construction. Reading a property appends it
//! as a path segment, calling the route appends its arguments, and the
//! properties `get`, `post`, `put`, `delete` and `patch` (any case) yield
//! functions that send the request.
//!
//! ```rust,ignore
//! let client = create_client(options).try_with(route_builder())?;
//!
//! // GET {baseURL}/users/42?fields=name
//! let user = client
//!     .get("users")
//!     .call(vec![Value::from(42)])
//!     .await?
//!     .get("get")
//!     .call(vec![Value::from(json!({ "fields": "name" }))])
//!     .await?;
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value as Json;

use super::default_transport;
use crate::client::Client;
use crate::error::{ApiError, ValidationError};
use crate::extension::Extension;
use crate::method::RestMethod;
use crate::options::RequestOptions;
use crate::path::join_url;
use crate::transport::SharedTransport;
use crate::value::{Dynamic, Function, Reply, Value, ready};

/// A route under construction.
#[derive(Clone)]
pub struct Route {
    url: String,
    transport: SharedTransport,
    defaults: Arc<RequestOptions>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("url", &self.url).finish_non_exhaustive()
    }
}

impl Route {
    fn root(transport: SharedTransport, defaults: RequestOptions) -> Self {
        let url = defaults.base_url.clone().unwrap_or_else(|| "/".to_string());
        Self {
            url,
            transport,
            defaults: Arc::new(defaults),
        }
    }

    /// The URL this route points at.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns a route extended by `segments`.
    pub fn join<I, S>(&self, segments: I) -> Route
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Route {
            url: join_url(&self.url, segments),
            transport: Arc::clone(&self.transport),
            defaults: Arc::clone(&self.defaults),
        }
    }

    /// Returns the request function for `method`.
    ///
    /// The function takes `(data?, options?)`. For `GET`, `data` becomes the
    /// query; for the other methods it becomes the body.
    pub fn method(&self, method: RestMethod) -> Function {
        let route = self.clone();
        Function::new(move |args: Vec<Value>| {
            let route = route.clone();
            async move { route.send(method, args).await }
        })
    }

    async fn send(&self, method: RestMethod, args: Vec<Value>) -> Result<Value, ApiError> {
        let mut options = RequestOptions::from_arg(args.get(1), 1)?;
        options.base_url = None;

        match args.first() {
            None | Some(Value::Undefined) | Some(Value::Data(Json::Null)) => {}
            Some(Value::Data(data)) if method.has_body() => {
                options.body = Some(data.clone());
            }
            Some(Value::Data(Json::Object(query))) if !method.has_body() => {
                options.query.extend(query.clone());
            }
            Some(_) => {
                let expected = if method.has_body() {
                    "request body"
                } else {
                    "query object"
                };
                return Err(ValidationError::InvalidArgument { index: 0, expected }.into());
            }
        }
        options.method = Some(method);

        self.transport
            .fetch(&self.url, self.defaults.merged_with(options))
            .await
    }
}

fn route_method(name: &str) -> Option<RestMethod> {
    name.parse::<RestMethod>()
        .ok()
        .filter(|method| RestMethod::ROUTE_METHODS.contains(method))
}

fn segment(value: &Value, index: usize) -> Result<String, ApiError> {
    match value.as_data() {
        Some(Json::String(s)) => Ok(s.clone()),
        Some(Json::Number(n)) => Ok(n.to_string()),
        _ => Err(ValidationError::InvalidArgument {
            index,
            expected: "path segment",
        }
        .into()),
    }
}

impl Dynamic for Route {
    fn get(&self, name: &str) -> Option<Value> {
        match route_method(name) {
            Some(method) => Some(Value::Function(self.method(method))),
            None => Some(Value::object(self.join([name]))),
        }
    }

    fn call(&self, args: Vec<Value>) -> Reply {
        let segments = args
            .iter()
            .enumerate()
            .map(|(index, value)| segment(value, index))
            .collect::<Result<Vec<_>, _>>();
        ready(segments.map(|segments| Value::object(self.join(segments))))
    }
}

/// Makes the client a [`Route`] rooted at its `baseURL` (or `/`).
///
/// ## Errors
///
/// The returned builder fails if the HTTP client cannot be constructed.
pub fn route_builder() -> impl FnOnce(&Client) -> Result<Extension, ApiError> {
    |client| Ok(route_builder_with(default_transport()?)(client))
}

/// Like [`route_builder`], sending through the given transport.
pub fn route_builder_with(transport: SharedTransport) -> impl FnOnce(&Client) -> Extension {
    move |client| Extension::object(Route::root(transport, client.default_options().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;
    use crate::value::BoxFuture;

    struct Unreachable;

    impl Transport for Unreachable {
        fn fetch(&self, _: &str, _: RequestOptions) -> BoxFuture<'_, Result<Value, ApiError>> {
            Box::pin(async { Ok(Value::Undefined) })
        }
    }

    fn root(base: Option<&str>) -> Route {
        let mut defaults = RequestOptions::new();
        defaults.base_url = base.map(str::to_string);
        Route::root(Arc::new(Unreachable), defaults)
    }

    #[test]
    fn starts_at_base_url_or_slash() {
        assert_eq!(root(Some("https://api.example.com")).url(), "https://api.example.com");
        assert_eq!(root(None).url(), "/");
    }

    #[test]
    fn method_names_are_case_insensitive() {
        assert_eq!(route_method("get"), Some(RestMethod::Get));
        assert_eq!(route_method("DELETE"), Some(RestMethod::Delete));
        assert_eq!(route_method("head"), None);
        assert_eq!(route_method("users"), None);
    }

    #[test]
    fn non_method_properties_extend_the_url() {
        let route = root(None);
        let Some(Value::Object(_)) = Dynamic::get(&route, "head") else {
            panic!("expected a nested route");
        };
        assert_eq!(route.join(["users", "42"]).url(), "/users/42");
    }

    #[tokio::test]
    async fn call_rejects_non_segment_arguments() {
        let route = root(None);
        let err = Dynamic::call(&route, vec![Value::from("a"), Value::from(true)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::InvalidArgument { index: 1, .. })
        ));
    }

    struct Captured(std::sync::Mutex<Vec<RequestOptions>>);

    impl Transport for Captured {
        fn fetch(&self, _: &str, options: RequestOptions) -> BoxFuture<'_, Result<Value, ApiError>> {
            self.0.lock().unwrap().push(options);
            Box::pin(async { Ok(Value::Undefined) })
        }
    }

    #[tokio::test]
    async fn body_methods_send_data_as_body() {
        let transport = Arc::new(Captured(std::sync::Mutex::new(Vec::new())));
        let route = Route::root(transport.clone(), RequestOptions::new());
        let data = serde_json::json!({ "id": 7 });

        route.method(RestMethod::Get).call(vec![Value::from(data.clone())]).await.unwrap();
        route.method(RestMethod::Delete).call(vec![Value::from(data.clone())]).await.unwrap();

        let sent = transport.0.lock().unwrap();
        assert_eq!(sent[0].query.get("id"), Some(&serde_json::json!(7)));
        assert!(sent[0].body.is_none());
        assert_eq!(sent[1].body.as_ref(), Some(&data));
        assert!(sent[1].query.is_empty());
        assert_eq!(sent[1].method, Some(RestMethod::Delete));
    }

    #[tokio::test]
    async fn get_rejects_non_object_data() {
        let err = root(None)
            .method(RestMethod::Get)
            .call(vec![Value::from("text")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::InvalidArgument { expected: "query object", .. })
        ));
    }
}
