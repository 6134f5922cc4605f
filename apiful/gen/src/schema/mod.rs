//! The unified schema model.
//!
//! A [`Schema`] is an owned tree: every node exclusively owns its children,
//! so there is no sharing and no cycles. JSON samples ([`infer`]) and JSON
//! Schema documents ([`Schema::from_json_schema`]) both map onto it, and
//! [`merge`] combines several of them into one.

mod document;
mod infer;
mod json_schema;
mod merge;
mod typescript;

pub use document::{JsonSchemaDocument, is_schema, unwrap_document};
pub use infer::infer;
pub use merge::merge;
pub use typescript::{TypeDefinitionOptions, json_to_type_definition, schema_to_type_definition};

use indexmap::{IndexMap, IndexSet};
use strum::{Display, EnumString};

/// Primitive JSON types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

/// An object node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Declared properties in first-seen order.
    pub properties: IndexMap<String, Schema>,
    /// Names of required properties.
    pub required: IndexSet<String>,
    /// Whether undeclared properties are allowed.
    pub additional_properties: bool,
}

impl ObjectSchema {
    /// An open object without declared properties.
    pub fn open() -> Self {
        Self {
            additional_properties: true,
            ..Self::default()
        }
    }

    /// Adds an optional property, builder style.
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Adds a required property, builder style.
    pub fn required_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.insert(name.clone());
        self.properties.insert(name, schema);
        self
    }

    /// Returns `true` if `name` is declared and required.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

/// A node of the unified schema tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Schema {
    /// Unknown; matches anything.
    #[default]
    Any,
    Primitive(Primitive),
    Object(ObjectSchema),
    /// An array; `items` is absent when nothing is known about elements.
    Array { items: Option<Box<Schema>> },
    /// One of several alternatives.
    Union(Vec<Schema>),
}

/// The partition key used when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Primitive(Primitive),
    Object,
    Array,
    Unknown,
}

impl Schema {
    /// A primitive node.
    pub fn primitive(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }

    /// An array node with the given item schema.
    pub fn array_of(items: Schema) -> Self {
        Self::Array {
            items: Some(Box::new(items)),
        }
    }

    /// The key this node is partitioned under when merging.
    ///
    /// Unions have no single key and report [`TypeKey::Unknown`]; the merge
    /// flattens them before partitioning.
    pub fn type_key(&self) -> TypeKey {
        match self {
            Self::Primitive(p) => TypeKey::Primitive(*p),
            Self::Object(_) => TypeKey::Object,
            Self::Array { .. } => TypeKey::Array,
            Self::Any | Self::Union(_) => TypeKey::Unknown,
        }
    }

    /// Returns the object node, if this is one.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<Primitive> for Schema {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Self::Object(object)
    }
}
