//! Recursive model merging.
//!
//! Composition keywords (`allOf`, conditionals, dependency schemas) interpret
//! each branch into its own model and then fold the branch into the target
//! with [`merge_models`]. Merging is additive for collections (types, enum
//! values, required names) and recursive for shared child slots; scalar
//! fields are left-biased, keeping the target's value when both sides carry
//! one.

use std::collections::HashSet;

use crate::model::{ModelArena, ModelId, ModelItems, OutputModel};
use crate::schema::SchemaId;

/// Merge `source` into `target` in place.
///
/// Terminates on cyclic model graphs: each (target, source) pair is merged
/// at most once per top-level call.
pub(crate) fn merge_models(
    models: &mut ModelArena,
    target: ModelId,
    source: ModelId,
    original: SchemaId,
) {
    let mut visited = HashSet::new();
    merge_guarded(models, target, source, original, &mut visited);
}

fn merge_guarded(
    models: &mut ModelArena,
    target: ModelId,
    source: ModelId,
    original: SchemaId,
    visited: &mut HashSet<(ModelId, ModelId)>,
) {
    if target == source {
        models.get_mut(target).original_schema = Some(original);
        return;
    }
    if !visited.insert((target, source)) {
        return;
    }

    // Snapshot the source so child merges can borrow the arena mutably.
    let source_model: OutputModel = models.get(source).clone();

    merge_properties(models, target, &source_model, original, visited);
    merge_pattern_properties(models, target, &source_model, original, visited);

    if let Some(source_child) = source_model.additional_properties {
        match models.get(target).additional_properties {
            Some(target_child) => {
                merge_guarded(models, target_child, source_child, original, visited)
            }
            None => models.get_mut(target).additional_properties = Some(source_child),
        }
    }
    if let Some(source_child) = source_model.additional_items {
        match models.get(target).additional_items {
            Some(target_child) => {
                merge_guarded(models, target_child, source_child, original, visited)
            }
            None => models.get_mut(target).additional_items = Some(source_child),
        }
    }

    merge_items(models, target, &source_model, original, visited);

    if let Some(types) = &source_model.types {
        models.get_mut(target).add_types(types.tags());
    }
    for value in &source_model.enum_values {
        models.get_mut(target).add_enum(value);
    }

    let target_model = models.get_mut(target);
    for name in &source_model.required {
        target_model.required.insert(name.clone());
    }
    for member in &source_model.union {
        if !target_model.union.contains(member) {
            target_model.union.push(*member);
        }
    }

    if target_model.id.is_none() {
        target_model.id = source_model.id.clone();
    }
    if target_model.reference.is_none() {
        target_model.reference = source_model.reference.clone();
    }
    if target_model.extend.is_empty() {
        target_model.extend = source_model.extend.clone();
    }
    if target_model.const_value.is_none() {
        target_model.const_value = source_model.const_value.clone();
    }
    if target_model.discriminator.is_none() {
        target_model.discriminator = source_model.discriminator.clone();
    }

    target_model.original_schema = Some(original);
}

fn merge_properties(
    models: &mut ModelArena,
    target: ModelId,
    source_model: &OutputModel,
    original: SchemaId,
    visited: &mut HashSet<(ModelId, ModelId)>,
) {
    for (name, &source_child) in &source_model.properties {
        match models.get(target).properties.get(name).copied() {
            Some(target_child) => {
                tracing::warn!(
                    property = name.as_str(),
                    "both models carry the property, merging the shapes"
                );
                merge_guarded(models, target_child, source_child, original, visited);
            }
            None => {
                models
                    .get_mut(target)
                    .properties
                    .insert(name.clone(), source_child);
            }
        }
    }
}

fn merge_pattern_properties(
    models: &mut ModelArena,
    target: ModelId,
    source_model: &OutputModel,
    original: SchemaId,
    visited: &mut HashSet<(ModelId, ModelId)>,
) {
    for (pattern, &source_child) in &source_model.pattern_properties {
        match models.get(target).pattern_properties.get(pattern).copied() {
            Some(target_child) => {
                tracing::warn!(
                    pattern = pattern.as_str(),
                    "both models carry the pattern, merging the shapes"
                );
                merge_guarded(models, target_child, source_child, original, visited);
            }
            None => {
                models
                    .get_mut(target)
                    .pattern_properties
                    .insert(pattern.clone(), source_child);
            }
        }
    }
}

/// Merge `items`, folding tuple positions into a single shape.
///
/// A merged model has at most one item shape: when either side carries a
/// tuple, every position folds into the first via recursive merge. A source
/// without items still triggers the fold on an existing target tuple.
fn merge_items(
    models: &mut ModelArena,
    target: ModelId,
    source_model: &OutputModel,
    original: SchemaId,
    visited: &mut HashSet<(ModelId, ModelId)>,
) {
    let folded_source = match source_model.items.clone() {
        Some(items) => Some(fold_tuple(models, items, original, visited)),
        None => None,
    };

    match (models.get(target).items.clone(), folded_source) {
        (None, Some(source_item)) => {
            models.get_mut(target).items = Some(ModelItems::Single(source_item));
        }
        (Some(target_items), Some(source_item)) => {
            let target_item = fold_tuple(models, target_items, original, visited);
            merge_guarded(models, target_item, source_item, original, visited);
            models.get_mut(target).items = Some(ModelItems::Single(target_item));
        }
        (Some(target_items), None) => {
            // The fold still applies even when the source contributes no
            // items.
            let target_item = fold_tuple(models, target_items, original, visited);
            models.get_mut(target).items = Some(ModelItems::Single(target_item));
        }
        (None, None) => {}
    }
}

fn fold_tuple(
    models: &mut ModelArena,
    items: ModelItems,
    original: SchemaId,
    visited: &mut HashSet<(ModelId, ModelId)>,
) -> ModelId {
    match items {
        ModelItems::Single(item) => item,
        ModelItems::Tuple(positions) => {
            let mut positions = positions.into_iter();
            let first = positions
                .next()
                .unwrap_or_else(|| models.alloc(OutputModel::default()));
            for position in positions {
                merge_guarded(models, first, position, original, visited);
            }
            first
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelType, SchemaType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn arena() -> ModelArena {
        ModelArena::default()
    }

    #[test]
    fn test_merge_unions_types_and_enums() {
        let mut models = arena();
        let target = models.alloc(OutputModel {
            types: Some(ModelType::Single(SchemaType::String)),
            enum_values: vec![json!("a")],
            ..OutputModel::default()
        });
        let source = models.alloc(OutputModel {
            types: Some(ModelType::Single(SchemaType::Number)),
            enum_values: vec![json!("a"), json!("b")],
            ..OutputModel::default()
        });

        merge_models(&mut models, target, source, SchemaId(0));

        let merged = models.get(target);
        assert_eq!(
            merged.types,
            Some(ModelType::Multiple(vec![
                SchemaType::String,
                SchemaType::Number
            ]))
        );
        assert_eq!(merged.enum_values, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_merge_keeps_target_scalars() {
        let mut models = arena();
        let target = models.alloc(OutputModel {
            id: Some("Target".to_string()),
            const_value: Some(json!("x")),
            ..OutputModel::default()
        });
        let source = models.alloc(OutputModel {
            id: Some("Source".to_string()),
            const_value: Some(json!("y")),
            discriminator: Some("kind".to_string()),
            ..OutputModel::default()
        });

        merge_models(&mut models, target, source, SchemaId(0));

        let merged = models.get(target);
        assert_eq!(merged.id.as_deref(), Some("Target"));
        assert_eq!(merged.const_value, Some(json!("x")));
        // absent on the target, so the source fills it
        assert_eq!(merged.discriminator.as_deref(), Some("kind"));
    }

    #[test]
    fn test_merge_properties_recursively() {
        let mut models = arena();
        let target_name = models.alloc(OutputModel {
            types: Some(ModelType::Single(SchemaType::String)),
            ..OutputModel::default()
        });
        let target = models.alloc(OutputModel {
            properties: [("name".to_string(), target_name)].into_iter().collect(),
            ..OutputModel::default()
        });
        let source_name = models.alloc(OutputModel {
            types: Some(ModelType::Single(SchemaType::Null)),
            ..OutputModel::default()
        });
        let source_age = models.alloc(OutputModel {
            types: Some(ModelType::Single(SchemaType::Integer)),
            ..OutputModel::default()
        });
        let source = models.alloc(OutputModel {
            properties: [
                ("name".to_string(), source_name),
                ("age".to_string(), source_age),
            ]
            .into_iter()
            .collect(),
            ..OutputModel::default()
        });

        merge_models(&mut models, target, source, SchemaId(0));

        let merged = models.get(target);
        assert_eq!(merged.properties.len(), 2);
        assert_eq!(merged.properties["age"], source_age);
        // colliding property shapes merged in place
        assert_eq!(
            models.get(target_name).types,
            Some(ModelType::Multiple(vec![
                SchemaType::String,
                SchemaType::Null
            ]))
        );
    }

    #[test]
    fn test_merge_folds_tuple_items() {
        let mut models = arena();
        let first = models.alloc(OutputModel {
            types: Some(ModelType::Single(SchemaType::String)),
            ..OutputModel::default()
        });
        let second = models.alloc(OutputModel {
            types: Some(ModelType::Single(SchemaType::Integer)),
            ..OutputModel::default()
        });
        let target = models.alloc(OutputModel {
            items: Some(ModelItems::Tuple(vec![first, second])),
            ..OutputModel::default()
        });
        let source = models.alloc(OutputModel::default());

        merge_models(&mut models, target, source, SchemaId(0));

        assert_eq!(models.get(target).items, Some(ModelItems::Single(first)));
        assert_eq!(
            models.get(first).types,
            Some(ModelType::Multiple(vec![
                SchemaType::String,
                SchemaType::Integer
            ]))
        );
    }

    #[test]
    fn test_merge_terminates_on_cyclic_graphs() {
        let mut models = arena();
        let target = models.alloc(OutputModel::default());
        let source = models.alloc(OutputModel::default());
        // each model's "self" property is the other model
        models
            .get_mut(target)
            .properties
            .insert("self".to_string(), source);
        models
            .get_mut(source)
            .properties
            .insert("self".to_string(), target);

        merge_models(&mut models, target, source, SchemaId(0));
        assert_eq!(models.get(target).original_schema, Some(SchemaId(0)));
    }

    #[test]
    fn test_merge_unions_required() {
        let mut models = arena();
        let target = models.alloc(OutputModel {
            required: ["a".to_string()].into_iter().collect(),
            ..OutputModel::default()
        });
        let source = models.alloc(OutputModel {
            required: ["a".to_string(), "b".to_string()].into_iter().collect(),
            ..OutputModel::default()
        });

        merge_models(&mut models, target, source, SchemaId(0));

        let required: Vec<&str> = models
            .get(target)
            .required
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(required, vec!["a", "b"]);
    }
}
