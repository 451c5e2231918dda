//! `not` handler.

use crate::model::ModelId;
use crate::schema::{Schema, SchemaObject};

use super::{InterpretOptions, Interpreter};

/// Subtract the negated schema's contribution from the model.
///
/// The negated schema is interpreted on its own (inheritance never applies
/// inside a negation) and its type tags and literals are removed from the
/// containing model. Negating the `true` schema would reject every value,
/// which the output cannot express; it is flagged and skipped.
pub(crate) fn interpret_not(
    interpreter: &mut Interpreter<'_>,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    let Some(not_schema) = object.not else {
        return;
    };
    if matches!(interpreter.schemas.get(not_schema), Schema::Bool(true)) {
        tracing::warn!("a negation of the accept-everything schema cannot be represented, skipping");
        return;
    }
    let options = InterpretOptions {
        allow_inheritance: false,
        ..options.clone()
    };
    let Some(not_model) = interpreter.interpret_schema(not_schema, &options) else {
        return;
    };

    let negated = interpreter.models.get(not_model).clone();
    let target = interpreter.models.get_mut(model);
    if let Some(types) = &negated.types {
        target.remove_type(types.tags());
    }
    if !negated.enum_values.is_empty() {
        target.remove_enum(&negated.enum_values);
    }
}
