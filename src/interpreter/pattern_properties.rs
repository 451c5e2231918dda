//! `patternProperties` handler.

use crate::merge::merge_models;
use crate::model::ModelId;
use crate::schema::{SchemaId, SchemaObject};

use super::{InterpretOptions, Interpreter};

/// Interpret each pattern-keyed schema and attach it under its pattern.
pub(crate) fn interpret_pattern_properties(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    for (pattern, &pattern_schema) in &object.pattern_properties {
        let Some(pattern_model) = interpreter.interpret_schema(pattern_schema, options) else {
            continue;
        };
        match interpreter
            .models
            .get(model)
            .pattern_properties
            .get(pattern)
            .copied()
        {
            Some(existing) => {
                tracing::warn!(
                    pattern = pattern.as_str(),
                    "pattern already exists, merging the shapes"
                );
                merge_models(&mut interpreter.models, existing, pattern_model, schema);
            }
            None => {
                interpreter
                    .models
                    .get_mut(model)
                    .pattern_properties
                    .insert(pattern.clone(), pattern_model);
            }
        }
    }
}
