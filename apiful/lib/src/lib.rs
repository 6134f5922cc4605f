//! Extensible API client.
//!
//! A [`Client`] is a callable HTTP context that independently authored
//! extensions compose onto. Handler extensions decide what calling the
//! client does; methods extensions add named functions. Composition is
//! left to right and the last extension wins on any name collision.
//!
//! ## Features
//!
//! - **Composable clients**: `create_client(options).with(..).with(..)`
//! - **Built-in extensions**: plain fetch, path-based route builder, and an
//!   OpenAPI path caller with `{param}` substitution
//! - **Dynamic values**: extensions exchange [`Value`]s and dispatch
//!   properties through the [`Dynamic`] trait
//! - **Pluggable transport**: any [`Transport`]; [`ReqwestTransport`] by default
//! - **Layered error handling**: [`ApiError`] over client and validation errors
//!
//! ## Example
//!
//! ```rust,ignore
//! use apiful::{create_client, extensions, RequestOptions, Value};
//!
//! let client = create_client(RequestOptions::new().with_base_url("https://petstore.example"))
//!     .try_with(extensions::openapi())?;
//!
//! let pet = client
//!     .call(vec![
//!         Value::from("/pets/{petId}"),
//!         Value::from(serde_json::json!({ "path": { "petId": 1 } })),
//!     ])
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod extension;
pub mod extensions;
pub mod method;
pub mod options;
pub mod path;
pub mod transport;
pub mod value;

// Re-exports for convenience
pub use client::{Client, create_client};
pub use error::{ApiError, ClientError, ValidationError};
pub use extension::{Extension, Methods};
pub use method::RestMethod;
pub use options::RequestOptions;
pub use path::resolve_path_params;
pub use transport::{ReqwestTransport, SharedTransport, Transport};
pub use value::{BoxFuture, Dynamic, Function, Reply, Value};
