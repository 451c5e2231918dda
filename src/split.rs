//! Splitting and promotion of nested object and enum models.
//!
//! Renderers emit one type per promoted model, so after interpretation no
//! model may directly embed another object-kind or enum model: each such
//! slot is replaced with a bare reference placeholder, and the embedded
//! model is registered at the top level under its name.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::interpreter::utils::{is_model_enum, is_model_object};
use crate::model::{ModelArena, ModelId, ModelItems, OutputModel};

/// Walk a model and split out every embedded object-kind or enum model.
///
/// The `iterated` set carries across the whole session so cyclic graphs are
/// walked once.
pub(crate) fn ensure_model_is_split(
    models: &mut ModelArena,
    model: ModelId,
    registry: &mut IndexMap<String, ModelId>,
    iterated: &mut HashSet<ModelId>,
) {
    if !iterated.insert(model) {
        return;
    }

    let property_slots: Vec<(String, ModelId)> = models
        .get(model)
        .properties
        .iter()
        .map(|(name, &child)| (name.clone(), child))
        .collect();
    for (name, child) in property_slots {
        let replacement = try_split(models, child, registry, iterated);
        models.get_mut(model).properties.insert(name, replacement);
    }

    let pattern_slots: Vec<(String, ModelId)> = models
        .get(model)
        .pattern_properties
        .iter()
        .map(|(pattern, &child)| (pattern.clone(), child))
        .collect();
    for (pattern, child) in pattern_slots {
        let replacement = try_split(models, child, registry, iterated);
        models
            .get_mut(model)
            .pattern_properties
            .insert(pattern, replacement);
    }

    if let Some(child) = models.get(model).additional_properties {
        let replacement = try_split(models, child, registry, iterated);
        models.get_mut(model).additional_properties = Some(replacement);
    }

    match models.get(model).items.clone() {
        Some(ModelItems::Single(child)) => {
            let replacement = try_split(models, child, registry, iterated);
            models.get_mut(model).items = Some(ModelItems::Single(replacement));
        }
        Some(ModelItems::Tuple(positions)) => {
            let positions: Vec<ModelId> = positions
                .into_iter()
                .map(|child| try_split(models, child, registry, iterated))
                .collect();
            models.get_mut(model).items = Some(ModelItems::Tuple(positions));
        }
        None => {}
    }

    // Walked for completeness, never replaced in place.
    if let Some(child) = models.get(model).additional_items {
        ensure_model_is_split(models, child, registry, iterated);
    }
    let union = models.get(model).union.clone();
    for member in union {
        ensure_model_is_split(models, member, registry, iterated);
    }
}

/// Promote an object-kind or enum model and hand back the reference
/// placeholder to put in its place; anything else passes through unchanged.
/// Either way the model's own children are split next.
fn try_split(
    models: &mut ModelArena,
    model: ModelId,
    registry: &mut IndexMap<String, ModelId>,
    iterated: &mut HashSet<ModelId>,
) -> ModelId {
    let mut replacement = model;
    if is_model_object(models.get(model)) || is_model_enum(models.get(model)) {
        if let Some(name) = models.get(model).id.clone() {
            match registry.get(&name).copied() {
                Some(existing) if existing != model => {
                    tracing::warn!(
                        name = name.as_str(),
                        "a different model is already promoted under this name, keeping the first"
                    );
                }
                Some(_) => {}
                None => {
                    tracing::debug!(name = name.as_str(), "promoting model to the top level");
                    registry.insert(name.clone(), model);
                }
            }
            replacement = models.alloc(OutputModel {
                reference: Some(name),
                original_schema: models.get(model).original_schema,
                ..OutputModel::default()
            });
        } else if is_model_object(models.get(model)) {
            // unnamed enums are plain value constraints and stay inline
            tracing::warn!("object model has no name and cannot be promoted");
        }
    }
    ensure_model_is_split(models, model, registry, iterated);
    replacement
}

// ===========================================================================
// Tests
// ===========================================================================
