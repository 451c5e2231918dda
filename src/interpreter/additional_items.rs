//! `additionalItems` handler.

use crate::merge::merge_models;
use crate::model::{ModelId, SchemaType};
use crate::schema::{SchemaId, SchemaObject};

use super::{InterpretOptions, Interpreter};

/// Attach the additional-items shape to array-kind models.
///
/// Mirrors the additional-properties default: absent means the `true`
/// schema.
pub(crate) fn interpret_additional_items(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    let is_array = interpreter
        .models
        .get(model)
        .types
        .as_ref()
        .is_some_and(|types| types.contains(SchemaType::Array));
    if !is_array {
        return;
    }
    let additional = object
        .additional_items
        .unwrap_or_else(|| interpreter.schemas.true_schema());
    let Some(additional_model) = interpreter.interpret_schema(additional, options) else {
        return;
    };
    match interpreter.models.get(model).additional_items {
        Some(existing) => {
            tracing::warn!("additional items already set, merging the shapes");
            merge_models(&mut interpreter.models, existing, additional_model, schema);
        }
        None => {
            interpreter.models.get_mut(model).additional_items = Some(additional_model);
        }
    }
}
