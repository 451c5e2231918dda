//! `properties` handler.

use crate::merge::merge_models;
use crate::model::{ModelId, SchemaType};
use crate::schema::{SchemaId, SchemaObject};

use super::{InterpretOptions, Interpreter};

/// Interpret each named property into its own model and attach it.
///
/// A declared `properties` keyword marks the model as an object even when
/// the map is empty. Properties whose schema is `false` are dropped.
pub(crate) fn interpret_properties(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    let Some(properties) = &object.properties else {
        return;
    };
    interpreter.models.get_mut(model).add_type(SchemaType::Object);
    for (name, &property_schema) in properties {
        let Some(property_model) = interpreter.interpret_schema(property_schema, options) else {
            continue;
        };
        add_property(interpreter, model, name, property_model, schema);
    }
}

fn add_property(
    interpreter: &mut Interpreter<'_>,
    model: ModelId,
    name: &str,
    property_model: ModelId,
    schema: SchemaId,
) {
    match interpreter.models.get(model).properties.get(name).copied() {
        Some(existing) => {
            tracing::warn!(
                property = name,
                "property already exists, merging the shapes"
            );
            merge_models(&mut interpreter.models, existing, property_model, schema);
        }
        None => {
            interpreter
                .models
                .get_mut(model)
                .properties
                .insert(name.to_string(), property_model);
        }
    }
}
