//! Shared predicates and inference helpers for the keyword handlers.

use serde_json::Value;
use url::Url;

use crate::model::{ModelType, OutputModel, SchemaType};
use crate::schema::SchemaObject;

/// Largest integer magnitude an IEEE 754 double represents exactly.
const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Whether a model stands on its own as a dedicated object shape.
///
/// The all-seven-tags type is the accepts-anything shape and does not count;
/// promoting it would name the universal type.
pub(crate) fn is_model_object(model: &OutputModel) -> bool {
    match &model.types {
        Some(types) => types.contains(SchemaType::Object) && !types.is_all(),
        None => false,
    }
}

/// Whether a model pins an enumeration of allowed values.
pub(crate) fn is_model_enum(model: &OutputModel) -> bool {
    !model.enum_values.is_empty()
}

/// Whether a model is exactly the `null` type and nothing else.
pub(crate) fn is_lone_null(model: &OutputModel) -> bool {
    model.types == Some(ModelType::Single(SchemaType::Null))
}

/// Candidate name for a schema: `title`, then `$id`, then the name the
/// loader inferred from the location a reference resolved through.
pub(crate) fn interpret_name(object: &SchemaObject) -> Option<String> {
    object
        .title
        .clone()
        .or_else(|| object.schema_id.as_deref().map(name_from_id))
        .or_else(|| object.inferred_name.clone())
}

/// Derive a name from an `$id` value.
///
/// URI ids name after the fragment, falling back to the last non-empty path
/// segment; non-URI ids are taken verbatim.
pub(crate) fn name_from_id(id: &str) -> String {
    let Ok(url) = Url::parse(id) else {
        return id.to_string();
    };
    if let Some(fragment) = url.fragment().filter(|fragment| !fragment.is_empty()) {
        return fragment.to_string();
    }
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}

/// Infer a type tag from a literal value.
///
/// Integers beyond double precision map to `integer`; every other number is
/// `number`, matching how JSON readers widen numeric literals.
pub(crate) fn infer_type_from_value(value: &Value) -> SchemaType {
    match value {
        Value::Null => SchemaType::Null,
        Value::Bool(_) => SchemaType::Boolean,
        Value::String(_) => SchemaType::String,
        Value::Array(_) => SchemaType::Array,
        Value::Object(_) => SchemaType::Object,
        Value::Number(number) => {
            let magnitude = number
                .as_u64()
                .or_else(|| number.as_i64().map(i64::unsigned_abs));
            match magnitude {
                Some(magnitude) if magnitude > MAX_SAFE_INTEGER => SchemaType::Integer,
                _ => SchemaType::Number,
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_from_id_uri_forms() {
        assert_eq!(name_from_id("https://example.com/schemas/Person"), "Person");
        assert_eq!(name_from_id("https://example.com/root.json#Address"), "Address");
        assert_eq!(name_from_id("Person"), "Person");
    }

    #[test]
    fn test_infer_type_from_value() {
        assert_eq!(infer_type_from_value(&json!(null)), SchemaType::Null);
        assert_eq!(infer_type_from_value(&json!(true)), SchemaType::Boolean);
        assert_eq!(infer_type_from_value(&json!("x")), SchemaType::String);
        assert_eq!(infer_type_from_value(&json!([1])), SchemaType::Array);
        assert_eq!(infer_type_from_value(&json!({})), SchemaType::Object);
        assert_eq!(infer_type_from_value(&json!(3)), SchemaType::Number);
        assert_eq!(infer_type_from_value(&json!(3.5)), SchemaType::Number);
        assert_eq!(
            infer_type_from_value(&json!(9_007_199_254_740_993i64)),
            SchemaType::Integer
        );
    }

    #[test]
    fn test_is_model_object_excludes_anything_shape() {
        let mut model = OutputModel::default();
        model.add_type(SchemaType::Object);
        assert!(is_model_object(&model));
        model.add_types(&SchemaType::ALL);
        assert!(!is_model_object(&model));
    }
}
