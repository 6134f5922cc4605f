//! Recursive schema merging.

use indexmap::{IndexMap, IndexSet};

use super::{ObjectSchema, Primitive, Schema, TypeKey};

/// Merges several schemas into one that accepts every input.
///
/// - No inputs gives [`Schema::Any`]; a single input is returned unchanged.
/// - Inputs of different kinds become a union. Primitives appear once per
///   type (first occurrence kept), objects and arrays are all kept, and a
///   trailing [`Schema::Any`] stands in for any unknown input.
/// - Objects merge property by property. A property is required only if
///   every input object requires it, so anything declared by just some of
///   the inputs ends up optional.
/// - Arrays merge their item schemas.
/// - Otherwise the first input wins.
///
/// Union inputs are flattened into their alternatives first.
///
/// ## Examples
///
/// ```
/// use apiful_gen::schema::{merge, Primitive, Schema};
///
/// let merged = merge([
///     Schema::from(Primitive::Number),
///     Schema::from(Primitive::String),
///     Schema::from(Primitive::Number),
/// ]);
/// assert_eq!(
///     merged,
///     Schema::Union(vec![Primitive::Number.into(), Primitive::String.into()])
/// );
/// ```
pub fn merge<I>(schemas: I) -> Schema
where
    I: IntoIterator<Item = Schema>,
{
    let mut schemas: Vec<Schema> = schemas.into_iter().collect();
    match schemas.len() {
        0 => return Schema::Any,
        1 => return schemas.remove(0),
        _ => {}
    }

    let schemas = flatten(schemas);
    if schemas.is_empty() {
        return Schema::Any;
    }

    let keys: IndexSet<TypeKey> = schemas.iter().map(Schema::type_key).collect();
    if keys.len() > 1 {
        return union_of(schemas);
    }

    match keys.first() {
        Some(TypeKey::Object) => merge_objects(schemas),
        Some(TypeKey::Array) => merge_arrays(schemas),
        _ => schemas.into_iter().next().unwrap_or_default(),
    }
}

fn flatten(schemas: Vec<Schema>) -> Vec<Schema> {
    let mut flat = Vec::with_capacity(schemas.len());
    for schema in schemas {
        match schema {
            Schema::Union(alternatives) => flat.extend(flatten(alternatives)),
            other => flat.push(other),
        }
    }
    flat
}

fn union_of(schemas: Vec<Schema>) -> Schema {
    let mut alternatives = Vec::new();
    let mut seen = IndexSet::new();
    let mut has_unknown = false;

    for schema in schemas {
        match schema.type_key() {
            TypeKey::Primitive(p) => {
                if seen.insert(union_key(p)) {
                    alternatives.push(schema);
                }
            }
            TypeKey::Object | TypeKey::Array => alternatives.push(schema),
            TypeKey::Unknown => has_unknown = true,
        }
    }

    if has_unknown {
        alternatives.push(Schema::Any);
    } else if alternatives.len() == 1 {
        return alternatives.remove(0);
    }
    Schema::Union(alternatives)
}

/// Integers are numbers once rendered, so they share one union slot.
fn union_key(p: Primitive) -> Primitive {
    match p {
        Primitive::Integer => Primitive::Number,
        other => other,
    }
}

fn merge_objects(schemas: Vec<Schema>) -> Schema {
    let objects: Vec<ObjectSchema> = schemas
        .into_iter()
        .filter_map(|schema| match schema {
            Schema::Object(object) => Some(object),
            _ => None,
        })
        .collect();

    let required_everywhere = |name: &str| objects.iter().all(|object| object.is_required(name));

    let mut children: IndexMap<String, Vec<Schema>> = IndexMap::new();
    for object in &objects {
        for (name, child) in &object.properties {
            children.entry(name.clone()).or_default().push(child.clone());
        }
    }

    let required: IndexSet<String> = children
        .keys()
        .filter(|name| required_everywhere(name.as_str()))
        .cloned()
        .collect();

    let properties: IndexMap<String, Schema> = children
        .into_iter()
        .map(|(name, schemas)| (name, merge(schemas)))
        .collect();

    Schema::Object(ObjectSchema {
        additional_properties: properties.is_empty(),
        properties,
        required,
    })
}

fn merge_arrays(schemas: Vec<Schema>) -> Schema {
    let items: Vec<Schema> = schemas
        .into_iter()
        .filter_map(|schema| match schema {
            Schema::Array { items } => items.map(|items| *items),
            _ => None,
        })
        .collect();

    Schema::array_of(merge(items))
}
