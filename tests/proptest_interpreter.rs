//! Property-based tests for the `interpret()` pipeline.
//!
//! Two families:
//! 1. Negative: `interpret()` **never panics** — returns either `Ok`
//!    (gracefully handled) or `Err(InterpretError)` — when given
//!    structurally-valid JSON that is semantically invalid as JSON Schema.
//! 2. Positive: structural invariants of the output over generated
//!    well-formed schemas — de-duplicated types and enums, and splitting
//!    completeness (no object-kind model left inline).

use json_schema_ir::{interpret, InterpretOptions, ModelItems, ModelType, SchemaType};
use proptest::prelude::*;
use serde_json::json;

fn default_options() -> InterpretOptions {
    InterpretOptions::default()
}

// ===========================================================================
// 1. Deterministic negative tests — known malformed schemas
// ===========================================================================

/// `required` must be an array, not a string.
#[test]
fn malformed_required_as_string() {
    let schema = json!({
        "type": "object",
        "properties": { "name": { "type": "string" } },
        "required": "not_an_array"
    });
    // Must not panic — either Ok (gracefully handled) or Err
    let _ = interpret(&schema, &default_options());
}

/// `oneOf` must be an array, not a string.
#[test]
fn malformed_oneof_as_string() {
    let schema = json!({ "oneOf": "not_an_array" });
    let result = interpret(&schema, &default_options());
    assert!(result.is_err());
}

/// A composition entry must be a schema, not a number.
#[test]
fn malformed_allof_entry_as_number() {
    let schema = json!({ "allOf": [42] });
    let result = interpret(&schema, &default_options());
    assert!(result.is_err());
}

/// `properties` must be an object, not a string.
#[test]
fn malformed_properties_as_string() {
    let schema = json!({
        "type": "object",
        "properties": "a_string"
    });
    let _ = interpret(&schema, &default_options());
}

/// `$ref` must be a string, not a number.
#[test]
fn malformed_ref_as_number() {
    let schema = json!({ "$ref": 42 });
    let result = interpret(&schema, &default_options());
    assert!(result.is_err());
}

/// Unresolvable `$ref` — points to a non-existent definition.
#[test]
fn malformed_unresolvable_ref() {
    let schema = json!({ "$ref": "#/$defs/DoesNotExist" });
    let result = interpret(&schema, &default_options());
    assert!(result.is_err());
}

/// Top-level non-schema values.
#[test]
fn malformed_top_level_values() {
    for schema in [json!(null), json!(42), json!("just_a_string"), json!([1, 2])] {
        let result = interpret(&schema, &default_options());
        assert!(result.is_err());
    }
}

// ===========================================================================
// 2. Strategies
// ===========================================================================

/// Strategy: a JSON Schema keyword with the WRONG value type.
fn arb_malformed_keyword() -> impl Strategy<Value = (&'static str, serde_json::Value)> {
    prop_oneof![
        Just(("required", json!("not_an_array"))),
        Just(("required", json!(42))),
        Just(("properties", json!("not_an_object"))),
        Just(("properties", json!(["a", "b"]))),
        Just(("type", json!(42))),
        Just(("type", json!([1, 2, 3]))),
        Just(("type", json!(null))),
        Just(("allOf", json!({"type": "string"}))),
        Just(("anyOf", json!("bad"))),
        Just(("oneOf", json!(true))),
        Just(("items", json!(99))),
        Just(("enum", json!("bad"))),
        Just(("$ref", json!(42))),
        Just(("additionalProperties", json!([1, 2]))),
        Just(("dependencies", json!("bad"))),
    ]
}

/// Strategy: a malformed schema with 1-3 wrong keywords.
fn arb_malformed_schema() -> impl Strategy<Value = serde_json::Value> {
    proptest::collection::vec(arb_malformed_keyword(), 1..=3).prop_map(|keywords| {
        let mut object = serde_json::Map::new();
        for (key, value) in keywords {
            object.insert(key.to_string(), value);
        }
        serde_json::Value::Object(object)
    })
}

/// Strategy: a well-formed scalar schema.
fn arb_scalar_schema() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(json!({ "type": "string" })),
        Just(json!({ "type": "integer" })),
        Just(json!({ "type": ["string", "null"] })),
        Just(json!({ "enum": ["a", "b"] })),
        Just(json!({ "const": 7 })),
        Just(json!(true)),
    ]
}

/// Strategy: a well-formed schema tree up to three levels deep, mixing
/// objects, arrays, and compositions over scalar leaves.
fn arb_schema() -> impl Strategy<Value = serde_json::Value> {
    arb_scalar_schema().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::btree_map("[a-z]{1,6}", inner.clone(), 1..4).prop_map(
                |properties| {
                    json!({ "type": "object", "properties": properties })
                }
            ),
            inner.clone().prop_map(|items| json!({ "type": "array", "items": items })),
            proptest::collection::vec(inner.clone(), 1..3)
                .prop_map(|branches| json!({ "allOf": branches })),
            proptest::collection::vec(inner, 2..4)
                .prop_map(|branches| json!({ "oneOf": branches })),
        ]
    })
}

// ===========================================================================
// 3. Properties
// ===========================================================================

fn assert_no_duplicate_tags(types: &ModelType) {
    let tags = types.tags();
    for (index, tag) in tags.iter().enumerate() {
        assert!(
            !tags[index + 1..].contains(tag),
            "duplicate type tag {tag} in {tags:?}"
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

    /// `interpret()` never panics on malformed schemas.
    #[test]
    fn interpret_never_panics_on_malformed(schema in arb_malformed_schema()) {
        let _ = interpret(&schema, &default_options());
    }

    /// Over well-formed schemas: interpretation succeeds and every produced
    /// model has de-duplicated type tags and enum literals.
    #[test]
    fn types_and_enums_stay_deduplicated(schema in arb_schema()) {
        let output = interpret(&schema, &default_options())
            .expect("well-formed schema should interpret")
            .expect("only false produces no model");
        for id in output.ordered() {
            let model = output.models.get(id);
            if let Some(types) = &model.types {
                assert_no_duplicate_tags(types);
            }
            for (index, value) in model.enum_values.iter().enumerate() {
                prop_assert!(!model.enum_values[index + 1..].contains(value));
            }
        }
    }

    /// Over well-formed schemas: after splitting, no promoted model directly
    /// embeds an object-kind model — every such slot holds a reference
    /// placeholder instead.
    #[test]
    fn splitting_leaves_no_inline_objects(schema in arb_schema()) {
        let output = interpret(&schema, &default_options())
            .expect("well-formed schema should interpret")
            .expect("only false produces no model");

        let is_inline_object = |id| {
            let model = output.models.get(id);
            model.reference.is_none()
                && model.types.as_ref().is_some_and(|types| {
                    types.contains(SchemaType::Object) && !types.is_all()
                })
        };

        for id in output.ordered() {
            let model = output.models.get(id);
            for &child in model.properties.values() {
                prop_assert!(!is_inline_object(child));
            }
            for &child in model.pattern_properties.values() {
                prop_assert!(!is_inline_object(child));
            }
            if let Some(child) = model.additional_properties {
                prop_assert!(!is_inline_object(child));
            }
            match &model.items {
                Some(ModelItems::Single(child)) => prop_assert!(!is_inline_object(*child)),
                Some(ModelItems::Tuple(positions)) => {
                    for &child in positions {
                        prop_assert!(!is_inline_object(child));
                    }
                }
                None => {}
            }
        }
    }

    /// Interpreting the same document twice yields the same registry names.
    #[test]
    fn interpretation_is_deterministic(schema in arb_schema()) {
        let first = interpret(&schema, &default_options())
            .expect("well-formed schema should interpret")
            .expect("only false produces no model");
        let second = interpret(&schema, &default_options())
            .expect("well-formed schema should interpret")
            .expect("only false produces no model");
        let first_names: Vec<&String> = first.registry.keys().collect();
        let second_names: Vec<&String> = second.registry.keys().collect();
        prop_assert_eq!(first_names, second_names);
    }
}
