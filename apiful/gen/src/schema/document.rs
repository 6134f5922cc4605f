//! Wrapped JSON Schema documents.
//!
//! A wrapper is an ordinary JSON object carrying `isSchema: true` next to
//! the wrapped `jsonSchema`. Anything can be checked for the wrapper shape
//! with [`is_schema`]; no registry or identity comparison is involved.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Schema;

/// A JSON Schema marked as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchemaDocument {
    /// Always `true` for documents built with [`JsonSchemaDocument::new`].
    #[serde(rename = "isSchema")]
    pub is_schema: bool,
    /// The wrapped schema.
    #[serde(rename = "jsonSchema")]
    pub json_schema: Value,
}

impl JsonSchemaDocument {
    /// Wraps a JSON Schema.
    pub fn new(json_schema: Value) -> Self {
        Self {
            is_schema: true,
            json_schema,
        }
    }

    /// Reads a wrapper from a JSON value, if it has the wrapper shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        is_schema(value)
            .then(|| serde_json::from_value(value.clone()).ok())
            .flatten()
    }

    /// Converts the wrapped JSON Schema into the unified model.
    pub fn to_schema(&self) -> Schema {
        Schema::from_json_schema(&self.json_schema)
    }

    /// Serializes the wrapper.
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "isSchema": self.is_schema, "jsonSchema": self.json_schema })
    }
}

/// Returns `true` if `value` is an object with `isSchema: true` and a
/// `jsonSchema` field.
///
/// ## Examples
///
/// ```
/// use apiful_gen::schema::{is_schema, JsonSchemaDocument};
/// use serde_json::json;
///
/// assert!(is_schema(&JsonSchemaDocument::new(json!({ "type": "string" })).to_value()));
/// assert!(!is_schema(&json!({ "openapi": "3.1.0" })));
/// assert!(!is_schema(&json!({ "isSchema": "yes", "jsonSchema": {} })));
/// ```
pub fn is_schema(value: &Value) -> bool {
    value.get("isSchema").and_then(Value::as_bool) == Some(true)
        && value.get("jsonSchema").is_some()
}

/// Returns the wrapped schema of a wrapper, or `value` itself otherwise.
pub fn unwrap_document(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("isSchema").and_then(Value::as_bool) == Some(true) => {
            match map.remove("jsonSchema") {
                Some(inner) => inner,
                None => Value::Object(map),
            }
        }
        other => other,
    }
}
