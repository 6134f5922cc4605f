//! Conversion between [`Schema`] and JSON Schema documents.

use serde_json::{Map, Value, json};

use super::{ObjectSchema, Primitive, Schema, infer, merge};

impl Schema {
    /// Reads the structural part of a JSON Schema.
    ///
    /// Understands `type` (single or list), `properties`, `required`,
    /// `additionalProperties`, `items` (single or tuple), `anyOf`, `oneOf`,
    /// `enum` and `const`. Anything it cannot interpret becomes
    /// [`Schema::Any`].
    pub fn from_json_schema(document: &Value) -> Schema {
        let Value::Object(node) = document else {
            return Schema::Any;
        };

        for combinator in ["anyOf", "oneOf"] {
            if let Some(Value::Array(alternatives)) = node.get(combinator) {
                let mut alternatives: Vec<Schema> =
                    alternatives.iter().map(Schema::from_json_schema).collect();
                return match alternatives.len() {
                    0 => Schema::Any,
                    1 => alternatives.remove(0),
                    _ => Schema::Union(alternatives),
                };
            }
        }

        if let Some(value) = node.get("const") {
            return infer(value, false);
        }
        if let Some(Value::Array(values)) = node.get("enum") {
            return merge(values.iter().map(|value| infer(value, false)));
        }

        match node.get("type") {
            Some(Value::String(ty)) => from_type(ty, node),
            Some(Value::Array(types)) => {
                let mut alternatives: Vec<Schema> = types
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|ty| from_type(ty, node))
                    .collect();
                match alternatives.len() {
                    0 => Schema::Any,
                    1 => alternatives.remove(0),
                    _ => Schema::Union(alternatives),
                }
            }
            _ if node.contains_key("properties") => object_from(node),
            _ if node.contains_key("items") => array_from(node),
            _ => Schema::Any,
        }
    }

    /// Writes the schema as a JSON Schema document.
    ///
    /// ## Examples
    ///
    /// ```
    /// use apiful_gen::schema::{ObjectSchema, Primitive, Schema};
    /// use serde_json::json;
    ///
    /// let schema: Schema = ObjectSchema::default()
    ///     .required_property("id", Primitive::Integer.into())
    ///     .into();
    /// assert_eq!(
    ///     schema.to_json_schema(),
    ///     json!({
    ///         "type": "object",
    ///         "properties": { "id": { "type": "integer" } },
    ///         "required": ["id"],
    ///         "additionalProperties": false
    ///     })
    /// );
    /// ```
    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::Any => json!({}),
            Schema::Primitive(p) => json!({ "type": p.to_string() }),
            Schema::Object(object) => {
                let properties: Map<String, Value> = object
                    .properties
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_json_schema()))
                    .collect();
                let mut node = Map::new();
                node.insert("type".to_string(), json!("object"));
                node.insert("properties".to_string(), Value::Object(properties));
                if !object.required.is_empty() {
                    node.insert("required".to_string(), json!(object.required));
                }
                node.insert(
                    "additionalProperties".to_string(),
                    json!(object.additional_properties),
                );
                Value::Object(node)
            }
            Schema::Array { items: Some(items) } => {
                json!({ "type": "array", "items": items.to_json_schema() })
            }
            Schema::Array { items: None } => json!({ "type": "array" }),
            Schema::Union(alternatives) => json!({
                "anyOf": alternatives.iter().map(Schema::to_json_schema).collect::<Vec<_>>()
            }),
        }
    }
}

fn from_type(ty: &str, node: &Map<String, Value>) -> Schema {
    match ty {
        "object" => object_from(node),
        "array" => array_from(node),
        other => other
            .parse::<Primitive>()
            .map(Schema::Primitive)
            .unwrap_or(Schema::Any),
    }
}

fn object_from(node: &Map<String, Value>) -> Schema {
    let mut object = ObjectSchema::default();

    if let Some(Value::Object(properties)) = node.get("properties") {
        for (name, child) in properties {
            object
                .properties
                .insert(name.clone(), Schema::from_json_schema(child));
        }
    }
    if let Some(Value::Array(required)) = node.get("required") {
        object.required = required
            .iter()
            .filter_map(Value::as_str)
            .filter(|name| object.properties.contains_key(*name))
            .map(str::to_string)
            .collect();
    }
    object.additional_properties = match node.get("additionalProperties") {
        Some(Value::Bool(open)) => *open,
        Some(_) => true,
        None => object.properties.is_empty(),
    };

    object.into()
}

fn array_from(node: &Map<String, Value>) -> Schema {
    match node.get("items") {
        Some(Value::Array(tuple)) => {
            Schema::array_of(merge(tuple.iter().map(Schema::from_json_schema)))
        }
        Some(items) => Schema::array_of(Schema::from_json_schema(items)),
        None => Schema::Array { items: None },
    }
}
