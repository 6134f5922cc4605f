//! Schema inference from JSON samples.

use serde_json::Value;

use super::{ObjectSchema, Primitive, Schema, merge};

/// Infers a schema describing `sample`.
///
/// Array elements are inferred one by one and merged; an empty array has
/// items of unknown type. Object properties are all required when
/// `strict_properties` is set and all optional otherwise. An empty object
/// is open.
///
/// ## Examples
///
/// ```
/// use apiful_gen::schema::{infer, Primitive, Schema};
/// use serde_json::json;
///
/// let schema = infer(&json!([1, "two"]), false);
/// assert_eq!(
///     schema,
///     Schema::array_of(Schema::Union(vec![Primitive::Number.into(), Primitive::String.into()]))
/// );
/// ```
pub fn infer(sample: &Value, strict_properties: bool) -> Schema {
    match sample {
        Value::Null => Primitive::Null.into(),
        Value::Bool(_) => Primitive::Boolean.into(),
        Value::Number(_) => Primitive::Number.into(),
        Value::String(_) => Primitive::String.into(),
        Value::Array(items) if items.is_empty() => Schema::array_of(Schema::Any),
        Value::Array(items) => Schema::array_of(merge(
            items.iter().map(|item| infer(item, strict_properties)),
        )),
        Value::Object(map) => {
            let mut object = ObjectSchema {
                additional_properties: map.is_empty(),
                ..ObjectSchema::default()
            };
            for (key, value) in map {
                object.properties.insert(key.clone(), infer(value, strict_properties));
                if strict_properties {
                    object.required.insert(key.clone());
                }
            }
            object.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives() {
        assert_eq!(infer(&json!("x"), false), Primitive::String.into());
        assert_eq!(infer(&json!(1.5), false), Primitive::Number.into());
        assert_eq!(infer(&json!(2), false), Primitive::Number.into());
        assert_eq!(infer(&json!(true), false), Primitive::Boolean.into());
        assert_eq!(infer(&json!(null), false), Primitive::Null.into());
    }

    #[test]
    fn empty_array_has_unknown_items() {
        assert_eq!(infer(&json!([]), false), Schema::array_of(Schema::Any));
    }

    #[test]
    fn object_properties_follow_strictness() {
        let sample = json!({ "a": 1, "b": "x" });

        let Schema::Object(loose) = infer(&sample, false) else {
            panic!("expected an object");
        };
        assert!(loose.required.is_empty());

        let Schema::Object(strict) = infer(&sample, true) else {
            panic!("expected an object");
        };
        assert!(strict.is_required("a") && strict.is_required("b"));
        assert!(!strict.additional_properties);
    }

    #[test]
    fn empty_object_is_open() {
        assert_eq!(infer(&json!({}), true), Schema::Object(ObjectSchema::open()));
    }

    #[test]
    fn array_of_objects_merges_strict_requirements() {
        let sample = json!([{ "a": 1, "b": 2 }, { "a": 1 }]);
        let Schema::Array { items: Some(items) } = infer(&sample, true) else {
            panic!("expected an array");
        };
        let object = items.as_object().unwrap();
        assert!(object.is_required("a"));
        assert!(!object.is_required("b"));
    }

    #[test]
    fn mixed_property_types_union() {
        let sample = json!([{ "a": 1 }, { "a": "x" }]);
        let Schema::Array { items: Some(items) } = infer(&sample, false) else {
            panic!("expected an array");
        };
        assert_eq!(
            items.as_object().unwrap().properties["a"],
            Schema::Union(vec![Primitive::Number.into(), Primitive::String.into()])
        );
    }
}
