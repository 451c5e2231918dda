//! `additionalProperties` handler.

use crate::merge::merge_models;
use crate::model::ModelId;
use crate::schema::{SchemaId, SchemaObject};

use super::utils::is_model_object;
use super::{InterpretOptions, Interpreter};

/// Attach the additional-properties shape to object-kind models.
///
/// An absent keyword defaults to the `true` schema: objects accept unknown
/// members unless told otherwise. Only models that already read as objects
/// at this point in the handler sequence pick the shape up.
pub(crate) fn interpret_additional_properties(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    if !is_model_object(interpreter.models.get(model)) {
        return;
    }
    let additional = object
        .additional_properties
        .unwrap_or_else(|| interpreter.schemas.true_schema());
    let Some(additional_model) = interpreter.interpret_schema(additional, options) else {
        return;
    };
    match interpreter.models.get(model).additional_properties {
        Some(existing) => {
            tracing::warn!("additional properties already set, merging the shapes");
            merge_models(&mut interpreter.models, existing, additional_model, schema);
        }
        None => {
            interpreter.models.get_mut(model).additional_properties = Some(additional_model);
        }
    }
}
