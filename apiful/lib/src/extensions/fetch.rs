//! Plain fetch extension.

use std::sync::Arc;

use super::{default_transport, string_arg};
use crate::client::Client;
use crate::error::ApiError;
use crate::extension::Extension;
use crate::options::RequestOptions;
use crate::transport::SharedTransport;
use crate::value::{Dynamic, Reply, Value};

struct FetchHandler {
    transport: SharedTransport,
    defaults: Arc<RequestOptions>,
}

impl Dynamic for FetchHandler {
    fn call(&self, args: Vec<Value>) -> Reply {
        let transport = Arc::clone(&self.transport);
        let defaults = Arc::clone(&self.defaults);
        Box::pin(async move {
            let target = string_arg(&args, 0, "request target")?;
            let options = RequestOptions::from_arg(args.get(1), 1)?;
            transport.fetch(&target, defaults.merged_with(options)).await
        })
    }
}

/// Makes the client itself perform requests: `client.call([target, options?])`.
///
/// ## Errors
///
/// The returned builder fails if the HTTP client cannot be constructed.
pub fn fetch() -> impl FnOnce(&Client) -> Result<Extension, ApiError> {
    |client| Ok(fetch_with(default_transport()?)(client))
}

/// Like [`fetch`], sending through the given transport.
pub fn fetch_with(transport: SharedTransport) -> impl FnOnce(&Client) -> Extension {
    move |client| {
        Extension::object(FetchHandler {
            transport,
            defaults: Arc::new(client.default_options().clone()),
        })
    }
}
