//! The extensible client.
//!
//! A [`Client`] starts out as a plain callable that resolves to
//! [`Value::Undefined`]. Extensions are layered on with [`Client::with`];
//! each call mutates the state shared by every view of the client and
//! returns a new view that also remembers the extension it just applied.
//!
//! ## Resolution order
//!
//! Property reads consult, in order:
//!
//! 1. the accumulated extension methods,
//! 2. the client's own fields (`defaultOptions` and `with`),
//! 3. the extension applied by the `with` call that produced this view.
//!
//! Calls go to the most recently applied handler extension, whichever
//! view applied it.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use tracing::trace;

use crate::error::ValidationError;
use crate::extension::Extension;
use crate::options::RequestOptions;
use crate::value::{Dynamic, Function, Reply, Value, ready};

thread_local! {
    /// Clients whose handler is being dispatched on this thread.
    static DISPATCHING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

struct DispatchGuard(usize);

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|active| active.borrow_mut().remove(&self.0));
    }
}

/// Name under which the default options are exposed as a property.
const DEFAULT_OPTIONS: &str = "defaultOptions";

/// Name under which [`Client::with`] is exposed as a property.
const WITH: &str = "with";

struct ClientState {
    default_options: RequestOptions,
    methods: RwLock<IndexMap<String, Function>>,
    handler: RwLock<Option<Arc<dyn Dynamic>>>,
}

/// A reusable HTTP calling context that extensions compose onto.
///
/// Cloning a client is cheap and yields another view over the same state.
///
/// ## Examples
///
/// ```rust
/// use apiful::{Client, Extension, Function, RequestOptions, Value};
///
/// let client = Client::new(RequestOptions::new().with_base_url("https://api.example.com"))
///     .with(|_| Extension::methods([("ping", Function::sync(|_| Ok(Value::from("pong"))))]));
///
/// assert!(client.get("ping").is_callable());
/// assert_eq!(
///     client.get("defaultOptions").get("baseURL").as_str(),
///     Some("https://api.example.com")
/// );
/// ```
#[derive(Clone)]
pub struct Client {
    state: Arc<ClientState>,
    active: Option<Arc<dyn Dynamic>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("default_options", &self.state.default_options)
            .field("methods", &self.method_names())
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

impl Client {
    /// Creates a client with no extensions.
    ///
    /// Options are stored as given; nothing is validated here.
    pub fn new(default_options: RequestOptions) -> Self {
        Self {
            state: Arc::new(ClientState {
                default_options,
                methods: RwLock::new(IndexMap::new()),
                handler: RwLock::new(None),
            }),
            active: None,
        }
    }

    /// The options the client was created with.
    pub fn default_options(&self) -> &RequestOptions {
        &self.state.default_options
    }

    /// Applies an extension and returns the extended view.
    ///
    /// The builder receives the current view, so it can read the default
    /// options or anything earlier extensions registered.
    pub fn with<F>(&self, builder: F) -> Client
    where
        F: FnOnce(&Client) -> Extension,
    {
        let extension = builder(self);
        self.apply(extension)
    }

    /// Applies an extension whose builder can fail.
    ///
    /// ## Errors
    ///
    /// Returns the builder's error unchanged; the shared state is left as
    /// it was.
    pub fn try_with<F, E>(&self, builder: F) -> Result<Client, E>
    where
        F: FnOnce(&Client) -> Result<Extension, E>,
    {
        let extension = builder(self)?;
        Ok(self.apply(extension))
    }

    fn apply(&self, extension: Extension) -> Client {
        let active: Arc<dyn Dynamic> = match extension {
            Extension::Handler(handler) => {
                trace!(kind = "handler", "applying extension");
                *self
                    .state
                    .handler
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&handler));
                handler
            }
            Extension::Methods(methods) => {
                let entries = methods.snapshot();
                trace!(
                    kind = "methods",
                    methods = ?entries.iter().map(|(name, _)| name).collect::<Vec<_>>(),
                    "applying extension"
                );
                let mut table = self
                    .state
                    .methods
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);
                for (name, f) in entries {
                    table.insert(name, f);
                }
                Arc::new(methods)
            }
        };

        Client {
            state: Arc::clone(&self.state),
            active: Some(active),
        }
    }

    /// Reads a property.
    ///
    /// Returns [`Value::Undefined`] when nothing along the resolution order
    /// knows the name.
    pub fn get(&self, name: &str) -> Value {
        if let Some(f) = self.lookup_method(name) {
            return Value::Function(f);
        }
        if name == DEFAULT_OPTIONS {
            return serde_json::to_value(&self.state.default_options)
                .map(Value::Data)
                .unwrap_or_default();
        }
        if name == WITH {
            return Value::Function(self.dynamic_with());
        }
        self.active
            .as_ref()
            .and_then(|active| active.get(name))
            .unwrap_or_default()
    }

    /// Writes a property, returning `true` if the write landed.
    ///
    /// An accumulated method is overwritten only by another function. The
    /// client's own fields are read-only. Anything else is handed to the
    /// extension this view applied.
    pub fn set(&self, name: &str, value: Value) -> bool {
        {
            let mut table = self
                .state
                .methods
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = table.get_mut(name) {
                return match value {
                    Value::Function(f) => {
                        *slot = f;
                        true
                    }
                    _ => false,
                };
            }
        }
        if name == DEFAULT_OPTIONS || name == WITH {
            return false;
        }
        self.active
            .as_ref()
            .is_some_and(|active| active.set(name, value))
    }

    /// Invokes the client.
    ///
    /// Without a handler extension the call resolves to
    /// [`Value::Undefined`].
    pub fn call(&self, args: Vec<Value>) -> Reply {
        let handler = self
            .state
            .handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(handler) = handler else {
            return ready(Ok(Value::Undefined));
        };

        // A handler that is a view of this same client would dispatch back
        // here forever; the re-entrant call gets the base callable instead.
        let key = Arc::as_ptr(&self.state) as usize;
        let entered = DISPATCHING.with(|active| active.borrow_mut().insert(key));
        if !entered {
            trace!("handler re-entered its own client, using base callable");
            return ready(Ok(Value::Undefined));
        }
        let _guard = DispatchGuard(key);
        handler.call(args)
    }

    /// Names of the accumulated extension methods, in first-registration
    /// order.
    pub fn method_names(&self) -> Vec<String> {
        self.state
            .methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Returns `true` once any handler extension has been applied.
    pub fn has_handler(&self) -> bool {
        self.state
            .handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// `with` as a dynamic function: applies its first argument, a
    /// function or object, as a handler extension and returns the new view.
    fn dynamic_with(&self) -> Function {
        let client = self.clone();
        Function::sync(move |args| {
            let extension = match args.into_iter().next() {
                Some(Value::Function(f)) => Extension::handler(f),
                Some(Value::Object(object)) => Extension::Handler(object),
                _ => {
                    return Err(ValidationError::InvalidArgument {
                        index: 0,
                        expected: "extension",
                    }
                    .into());
                }
            };
            Ok(Value::object(client.apply(extension)))
        })
    }

    fn lookup_method(&self, name: &str) -> Option<Function> {
        self.state
            .methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl Dynamic for Client {
    fn get(&self, name: &str) -> Option<Value> {
        let value = Client::get(self, name);
        (!value.is_undefined()).then_some(value)
    }

    fn set(&self, name: &str, value: Value) -> bool {
        Client::set(self, name, value)
    }

    fn call(&self, args: Vec<Value>) -> Reply {
        Client::call(self, args)
    }
}

/// Creates a client with the given default options.
///
/// Each call yields fresh, independent state.
pub fn create_client(default_options: RequestOptions) -> Client {
    Client::new(default_options)
}
