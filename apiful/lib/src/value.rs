//! Dynamic values exchanged through a composed client.
//!
//! Extensions are authored independently, so the client cannot know their
//! shapes at compile time. Everything that flows through property reads,
//! writes and calls is a [`Value`]: plain data, a [`Function`], or an object
//! implementing [`Dynamic`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ValidationError};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The pending result of a dynamic call.
pub type Reply = BoxFuture<'static, Result<Value, ApiError>>;

/// Returns a reply that is already resolved.
pub fn ready(result: Result<Value, ApiError>) -> Reply {
    Box::pin(std::future::ready(result))
}

/// Explicit property/call dispatch for values whose shape is only known at
/// runtime.
///
/// All methods have conservative defaults: no properties, writes rejected,
/// and calls failing with [`ValidationError::NotCallable`].
pub trait Dynamic: Send + Sync {
    /// Reads a property. `None` means the property does not exist.
    fn get(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    /// Writes a property, returning `true` when the write was accepted.
    fn set(&self, name: &str, value: Value) -> bool {
        let _ = (name, value);
        false
    }

    /// Invokes the value as a function.
    fn call(&self, args: Vec<Value>) -> Reply {
        let _ = args;
        ready(Err(ValidationError::NotCallable.into()))
    }
}

/// A shareable callable taking positional arguments.
#[derive(Clone)]
pub struct Function(Arc<dyn Fn(Vec<Value>) -> Reply + Send + Sync>);

impl Function {
    /// Wraps an async closure.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use apiful::{Function, Value};
    ///
    /// let double = Function::new(|args: Vec<Value>| async move {
    ///     let n = args.first().and_then(|v| v.as_i64()).unwrap_or_default();
    ///     Ok(Value::from(n * 2))
    /// });
    /// # let _ = double;
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        Self(Arc::new(move |args| Box::pin(f(args))))
    }

    /// Wraps a closure whose result is available immediately.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        Self(Arc::new(move |args| ready(f(args))))
    }

    /// Invokes the function.
    pub fn call(&self, args: Vec<Value>) -> Reply {
        (self.0)(args)
    }

    /// Returns `true` if both handles point at the same closure.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

impl Dynamic for Function {
    fn call(&self, args: Vec<Value>) -> Reply {
        Function::call(self, args)
    }
}

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Undefined,
    /// Plain JSON data.
    Data(serde_json::Value),
    /// A callable.
    Function(Function),
    /// An object with its own property and call semantics.
    Object(Arc<dyn Dynamic>),
}

impl Value {
    /// Wraps a [`Dynamic`] implementation.
    pub fn object(object: impl Dynamic + 'static) -> Self {
        Self::Object(Arc::new(object))
    }

    /// Returns `true` for [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for functions and objects, which may be invoked.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Object(_))
    }

    /// Returns the JSON data, if this is a data value.
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Consumes the value, returning its JSON data.
    pub fn into_data(self) -> Option<serde_json::Value> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the string content of a data string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_data().and_then(serde_json::Value::as_str)
    }

    /// Returns the integer content of a data number.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_data().and_then(serde_json::Value::as_i64)
    }

    /// Returns the function, if this is a function value.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Reads a property.
    ///
    /// Objects dispatch through [`Dynamic::get`]; JSON objects index their
    /// fields. Anything else yields [`Value::Undefined`].
    pub fn get(&self, name: &str) -> Value {
        match self {
            Self::Object(object) => object.get(name).unwrap_or_default(),
            Self::Data(serde_json::Value::Object(map)) => {
                map.get(name).cloned().map(Self::Data).unwrap_or_default()
            }
            _ => Self::Undefined,
        }
    }

    /// Invokes the value.
    pub fn call(&self, args: Vec<Value>) -> Reply {
        match self {
            Self::Function(f) => f.call(args),
            Self::Object(object) => object.call(args),
            _ => ready(Err(ValidationError::NotCallable.into())),
        }
    }

    /// Deserializes the data into a concrete type.
    ///
    /// [`Value::Undefined`] deserializes like JSON `null`.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::JsonParse`] if the data does not match `T`,
    /// or [`ValidationError::InvalidArgument`] for functions and objects.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Undefined => Ok(serde_json::from_value(serde_json::Value::Null)?),
            Self::Data(data) => Ok(serde_json::from_value(data)?),
            Self::Function(_) | Self::Object(_) => Err(ValidationError::InvalidArgument {
                index: 0,
                expected: "data value",
            }
            .into()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Data(data) => f.debug_tuple("Data").field(data).finish(),
            Self::Function(_) => f.write_str("Function"),
            Self::Object(_) => f.write_str("Object"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Self::Data(data)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Data(serde_json::Value::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Data(serde_json::Value::String(s))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Data(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Data(b.into())
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}
