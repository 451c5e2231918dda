//! `items` handler.

use crate::merge::merge_models;
use crate::model::{ModelId, ModelItems, SchemaType};
use crate::schema::{SchemaId, SchemaItems, SchemaObject};

use super::{InterpretOptions, Interpreter};

/// Interpret the item shape (single or per tuple position) and mark the
/// model as an array.
pub(crate) fn interpret_items(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    let Some(items) = &object.items else {
        return;
    };
    match items {
        SchemaItems::Single(item_schema) => {
            if let Some(item_model) = interpreter.interpret_schema(*item_schema, options) {
                add_item(interpreter, model, item_model, schema);
            }
        }
        SchemaItems::Tuple(positions) => {
            for &position_schema in positions {
                if let Some(position_model) =
                    interpreter.interpret_schema(position_schema, options)
                {
                    add_item_tuple(interpreter, model, position_model);
                }
            }
        }
    }
    interpreter.models.get_mut(model).add_type(SchemaType::Array);
}

fn add_item(
    interpreter: &mut Interpreter<'_>,
    model: ModelId,
    item_model: ModelId,
    schema: SchemaId,
) {
    match interpreter.models.get(model).items.clone() {
        None => {
            interpreter.models.get_mut(model).items = Some(ModelItems::Single(item_model));
        }
        Some(ModelItems::Single(existing)) => {
            tracing::warn!("item shape already set, merging the shapes");
            merge_models(&mut interpreter.models, existing, item_model, schema);
        }
        Some(ModelItems::Tuple(_)) => {
            tracing::warn!("tuple item shapes replaced by a single item shape");
            interpreter.models.get_mut(model).items = Some(ModelItems::Single(item_model));
        }
    }
}

fn add_item_tuple(interpreter: &mut Interpreter<'_>, model: ModelId, position_model: ModelId) {
    match interpreter.models.get_mut(model).items {
        Some(ModelItems::Tuple(ref mut positions)) => positions.push(position_model),
        ref mut items => {
            if items.is_some() {
                tracing::warn!("single item shape replaced by tuple item shapes");
            }
            *items = Some(ModelItems::Tuple(vec![position_model]));
        }
    }
}
