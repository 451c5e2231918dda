//! `const` and `enum` handlers.

use crate::model::{ModelArena, ModelId};
use crate::schema::SchemaObject;

use super::utils::infer_type_from_value;

/// A `const` pins the model to a single literal: the enum collapses to that
/// value. The type is inferred from the literal only when the schema
/// declares none.
pub(crate) fn interpret_const(object: &SchemaObject, models: &mut ModelArena, model: ModelId) {
    let Some(value) = &object.const_value else {
        return;
    };
    let target = models.get_mut(model);
    target.enum_values = vec![value.clone()];
    target.const_value = Some(value.clone());
    if object.types.is_empty() {
        target.add_type(infer_type_from_value(value));
    }
}

/// Collect `enum` literals, inferring types when the schema declares none.
/// A `const` takes precedence and suppresses the enum entirely.
pub(crate) fn interpret_enum(object: &SchemaObject, models: &mut ModelArena, model: ModelId) {
    if object.const_value.is_some() {
        return;
    }
    for value in &object.enum_values {
        let target = models.get_mut(model);
        target.add_enum(value);
        if object.types.is_empty() {
            target.add_type(infer_type_from_value(value));
        }
    }
}
