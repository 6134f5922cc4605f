//! OpenAPI path caller.
//!
//! Requests name an OpenAPI path template and supply its parameters under
//! the `path` option:
//!
//! ```rust,ignore
//! let pet = client
//!     .call(vec![
//!         Value::from("/pets/{petId}"),
//!         Value::from(json!({ "path": { "petId": 42 } })),
//!     ])
//!     .await?;
//! ```

use std::sync::Arc;

use serde_json::Value as Json;
use tracing::debug;

use super::{default_transport, string_arg};
use crate::client::Client;
use crate::error::ApiError;
use crate::extension::Extension;
use crate::options::RequestOptions;
use crate::path::resolve_path_params;
use crate::transport::SharedTransport;
use crate::value::{Dynamic, Reply, Value};

/// Option key holding path parameters.
const PATH_PARAMS: &str = "path";

struct OpenApiHandler {
    transport: SharedTransport,
    defaults: Arc<RequestOptions>,
}

impl Dynamic for OpenApiHandler {
    fn call(&self, args: Vec<Value>) -> Reply {
        let transport = Arc::clone(&self.transport);
        let defaults = Arc::clone(&self.defaults);
        Box::pin(async move {
            let template = string_arg(&args, 0, "OpenAPI path")?;
            let mut options = RequestOptions::from_arg(args.get(1), 1)?;

            let params = options.extra.remove(PATH_PARAMS);
            let path = resolve_path_params(&template, params.as_ref().and_then(Json::as_object));
            debug!(template = %template, path = %path, "resolved OpenAPI path");

            transport.fetch(&path, defaults.merged_with(options)).await
        })
    }
}

/// Makes the client callable with OpenAPI path templates.
///
/// ## Errors
///
/// The returned builder fails if the HTTP client cannot be constructed.
pub fn openapi() -> impl FnOnce(&Client) -> Result<Extension, ApiError> {
    |client| Ok(openapi_with(default_transport()?)(client))
}

/// Like [`openapi`], sending through the given transport.
pub fn openapi_with(transport: SharedTransport) -> impl FnOnce(&Client) -> Extension {
    move |client| {
        Extension::object(OpenApiHandler {
            transport,
            defaults: Arc::new(client.default_options().clone()),
        })
    }
}
