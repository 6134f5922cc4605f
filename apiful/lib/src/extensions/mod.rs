//! Built-in extensions.
//!
//! Each builder returns a closure suitable for [`Client::try_with`]
//! (or [`Client::with`] for the `*_with` variants, which receive an
//! already constructed transport).
//!
//! | Builder | Call shape |
//! |---------|------------|
//! | [`fetch`] | `client(target, options?)` |
//! | [`route_builder`] | `client.users.get(query?)`, `client("users", 42).delete()` |
//! | [`openapi`] | `client("/pets/{petId}", { path: { petId: 1 } })` |
//!
//! All of them layer the client's default options under per-call options.
//!
//! [`Client::try_with`]: crate::Client::try_with
//! [`Client::with`]: crate::Client::with

mod fetch;
mod openapi;
mod route_builder;

pub use fetch::{fetch, fetch_with};
pub use openapi::{openapi, openapi_with};
pub use route_builder::{Route, route_builder, route_builder_with};

use crate::error::{ApiError, ValidationError};
use crate::options::RequestOptions;
use crate::transport::{ReqwestTransport, SharedTransport};
use crate::value::Value;

/// Transport for the non-`_with` builders.
///
/// Defaults stay empty because the extensions merge the client's own
/// options per call.
fn default_transport() -> Result<SharedTransport, ApiError> {
    ReqwestTransport::shared(RequestOptions::default())
}

/// Reads a required string argument.
fn string_arg(args: &[Value], index: usize, expected: &'static str) -> Result<String, ApiError> {
    match args.get(index) {
        None | Some(Value::Undefined) => {
            Err(ValidationError::MissingArgument { index, expected }.into())
        }
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ValidationError::InvalidArgument { index, expected }.into()),
    }
}
