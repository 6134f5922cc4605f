//! TypeScript declaration rendering.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ObjectSchema, Primitive, Schema, infer};
use crate::naming::property_key;

/// Options for [`json_to_type_definition`] and [`schema_to_type_definition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeDefinitionOptions {
    /// Name of the exported type.
    pub type_name: String,
    /// Whether inferred object properties are required.
    pub strict_properties: bool,
    /// Comment placed at the top of the output; empty for none.
    pub banner_comment: String,
}

impl Default for TypeDefinitionOptions {
    fn default() -> Self {
        Self {
            type_name: "Root".to_string(),
            strict_properties: false,
            banner_comment: "/* eslint-disable */".to_string(),
        }
    }
}

impl TypeDefinitionOptions {
    /// Sets the exported type name.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Makes inferred properties required.
    pub fn strict(mut self) -> Self {
        self.strict_properties = true;
        self
    }
}

/// Infers a schema from `sample` and renders it as a TypeScript declaration.
///
/// ## Examples
///
/// ```
/// use apiful_gen::schema::{json_to_type_definition, TypeDefinitionOptions};
/// use serde_json::json;
///
/// let ts = json_to_type_definition(
///     &json!({ "a": { "b": 1 } }),
///     &TypeDefinitionOptions::default().with_type_name("Nested"),
/// );
/// assert_eq!(
///     ts,
///     "/* eslint-disable */\n\nexport interface Nested {\n  a?: {\n    b?: number\n  }\n}\n"
/// );
/// ```
pub fn json_to_type_definition(sample: &Value, options: &TypeDefinitionOptions) -> String {
    schema_to_type_definition(&infer(sample, options.strict_properties), options)
}

/// Renders a schema as a TypeScript declaration.
///
/// Objects become an `export interface`; everything else an `export type`
/// alias. An array of objects is split into a `<Name>Item` interface and
/// an alias for the array.
pub fn schema_to_type_definition(schema: &Schema, options: &TypeDefinitionOptions) -> String {
    let name = options.type_name.as_str();
    let declaration = match schema {
        Schema::Object(object) => interface(name, object),
        Schema::Array { items: Some(items) } if items.as_object().is_some() => {
            let item_name = format!("{name}Item");
            let item = items
                .as_object()
                .map(|object| interface(&item_name, object))
                .unwrap_or_default();
            format!("{item}\n\nexport type {name} = {item_name}[]")
        }
        other => format!("export type {name} = {}", render(other, 0)),
    };

    if options.banner_comment.is_empty() {
        format!("{declaration}\n")
    } else {
        format!("{}\n\n{declaration}\n", options.banner_comment)
    }
}

fn interface(name: &str, object: &ObjectSchema) -> String {
    format!("export interface {name} {}", render_object(object, 0))
}

/// Renders a type expression at the given nesting depth.
fn render(schema: &Schema, depth: usize) -> String {
    match schema {
        Schema::Any => "unknown".to_string(),
        Schema::Primitive(p) => primitive(*p).to_string(),
        Schema::Object(object) => render_object(object, depth),
        Schema::Array { items: None } => "unknown[]".to_string(),
        Schema::Array { items: Some(items) } => match &**items {
            Schema::Union(_) => format!("({})[]", render(items, depth)),
            other => format!("{}[]", render(other, depth)),
        },
        Schema::Union(alternatives) => alternatives
            .iter()
            .map(|alternative| render(alternative, depth))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

fn render_object(object: &ObjectSchema, depth: usize) -> String {
    let indent = "  ".repeat(depth + 1);
    let mut members: Vec<String> = object
        .properties
        .iter()
        .map(|(name, child)| {
            let optional = if object.is_required(name) { "" } else { "?" };
            format!(
                "{indent}{}{optional}: {}",
                property_key(name),
                render(child, depth + 1)
            )
        })
        .collect();
    if object.additional_properties {
        members.push(format!("{indent}[k: string]: unknown"));
    }

    if members.is_empty() {
        return "{}".to_string();
    }
    format!("{{\n{}\n{}}}", members.join("\n"), "  ".repeat(depth))
}

fn primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::String => "string",
        Primitive::Number | Primitive::Integer => "number",
        Primitive::Boolean => "boolean",
        Primitive::Null => "null",
    }
}
