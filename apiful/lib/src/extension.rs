//! Extension values applied to a [`Client`](crate::Client).

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;

use crate::value::{Dynamic, Function, Value};

/// The value an extension builder produces.
///
/// A [`Handler`](Extension::Handler) becomes the client's call behaviour and
/// replaces any previous handler. A [`Methods`](Extension::Methods) bag is
/// merged into the client's accumulated methods, later names overwriting
/// earlier ones.
pub enum Extension {
    /// A callable object, which may also expose its own properties.
    Handler(Arc<dyn Dynamic>),
    /// Named functions.
    Methods(Methods),
}

impl Extension {
    /// A handler extension from a plain function.
    pub fn handler(f: Function) -> Self {
        Self::Handler(Arc::new(f))
    }

    /// A handler extension from a callable object.
    pub fn object(object: impl Dynamic + 'static) -> Self {
        Self::Handler(Arc::new(object))
    }

    /// A methods extension from `(name, function)` pairs.
    pub fn methods<I, K>(methods: I) -> Self
    where
        I: IntoIterator<Item = (K, Function)>,
        K: Into<String>,
    {
        Self::Methods(methods.into_iter().collect())
    }

    /// Returns `true` for handler extensions.
    pub fn is_handler(&self) -> bool {
        matches!(self, Self::Handler(_))
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler"),
            Self::Methods(methods) => f.debug_tuple("Methods").field(methods).finish(),
        }
    }
}

/// A bag of named functions.
///
/// Once applied, the bag also stays reachable as the client view's most
/// recent extension, so writes delegated to it land here rather than in
/// the client's accumulated table.
#[derive(Default)]
pub struct Methods {
    entries: RwLock<IndexMap<String, Function>>,
}

impl Methods {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function, builder style.
    pub fn method(self, name: impl Into<String>, f: Function) -> Self {
        self.insert(name, f);
        self
    }

    /// Adds or replaces a function.
    pub fn insert(&self, name: impl Into<String>, f: Function) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), f);
    }

    /// Returns the function registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<Function> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Returns the registered names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Copies out all entries in insertion order.
    pub fn snapshot(&self) -> Vec<(String, Function)> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, f)| (name.clone(), f.clone()))
            .collect()
    }

    /// Returns the number of functions.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Into<String>> FromIterator<(K, Function)> for Methods {
    fn from_iter<I: IntoIterator<Item = (K, Function)>>(iter: I) -> Self {
        let entries = iter.into_iter().map(|(k, f)| (k.into(), f)).collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Dynamic for Methods {
    fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).map(Value::Function)
    }

    fn set(&self, name: &str, value: Value) -> bool {
        match value {
            Value::Function(f) => {
                self.insert(name, f);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Function {
        Function::sync(|_| Ok(Value::Undefined))
    }

    #[test]
    fn later_names_overwrite_earlier() {
        let first = noop();
        let second = noop();
        let methods: Methods = [("foo", first), ("foo", second.clone())].into_iter().collect();
        assert_eq!(methods.len(), 1);
        assert!(methods.lookup("foo").unwrap().ptr_eq(&second));
    }

    #[test]
    fn set_accepts_only_functions() {
        let methods = Methods::new();
        assert!(!methods.set("foo", Value::from("bar")));
        assert!(methods.set("foo", Value::Function(noop())));
        assert_eq!(methods.names(), vec!["foo".to_string()]);
    }

    #[test]
    fn classification() {
        assert!(Extension::handler(noop()).is_handler());
        assert!(!Extension::methods([("a", noop())]).is_handler());
    }
}
