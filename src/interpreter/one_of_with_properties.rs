//! Handler for `oneOf` combined with own `properties`.
//!
//! The schema's own shape is folded into every `oneOf` branch, and the
//! folded branches become the union members. The containing model loses its
//! own type; it exists only to carry the union.

use crate::model::ModelId;
use crate::schema::{SchemaId, SchemaObject};

use super::{InterpretOptions, Interpreter};

pub(crate) fn interpret_one_of_with_properties(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    if object.one_of.is_empty() || object.properties.is_none() || !object.all_of.is_empty() {
        return;
    }

    let mut options = options.clone();
    if let Some(discriminator) = &object.discriminator {
        options.discriminator = Some(discriminator.clone());
        interpreter.models.get_mut(model).discriminator = Some(discriminator.clone());
    }

    // Snapshot the schema's own shape before it is turned into a pure
    // union carrier. Union members accumulated so far do not belong to the
    // shared shape.
    let base = interpreter.models.deep_clone(model);
    {
        let base_model = interpreter.models.get_mut(base);
        base_model.union.clear();
        base_model.discriminator = None;
    }

    for &branch in &object.one_of {
        let Some(branch_model) = interpreter.interpret_schema(branch, &options) else {
            continue;
        };
        let member = interpreter.models.deep_clone(base);
        interpreter.interpret_and_combine(Some(branch), member, schema, &options);
        let branch_name = interpreter.models.get(branch_model).id.clone();
        interpreter.models.get_mut(member).id = branch_name;
        interpreter.models.get_mut(model).union.push(member);
    }

    interpreter.models.get_mut(model).set_type(None);
}
