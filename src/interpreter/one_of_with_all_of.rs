//! Handler for `oneOf` combined with `allOf`.
//!
//! The combined form describes a discriminated union over a shared base:
//! the `allOf` shape is folded into every `oneOf` branch, and the folded
//! branches become the union members. Each member keeps the branch's own
//! name.

use crate::model::ModelId;
use crate::schema::SchemaObject;

use super::{InterpretOptions, Interpreter};

pub(crate) fn interpret_one_of_with_all_of(
    interpreter: &mut Interpreter<'_>,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    if object.one_of.is_empty()
        || object.all_of.is_empty()
        || object.properties.is_some()
        || options.allow_inheritance
    {
        return;
    }

    let schemas = interpreter.schemas;
    let mut options = options.clone();
    for &base_schema in &object.all_of {
        if let Some(discriminator) = schemas
            .as_object(base_schema)
            .and_then(|base| base.discriminator.clone())
        {
            options.discriminator = Some(discriminator.clone());
            interpreter.models.get_mut(model).discriminator = Some(discriminator);
        }
    }

    let first_base = object.all_of[0];
    if schemas.as_object(first_base).is_none() {
        return;
    }
    let Some(shared) = interpreter.interpret_schema(first_base, &options) else {
        return;
    };
    // Fold the remaining base schemas into a private copy so the cached
    // model for the first base keeps its own shape.
    let base = interpreter.models.deep_clone(shared);
    for &rest in &object.all_of[1..] {
        interpreter.interpret_and_combine(Some(rest), base, first_base, &options);
    }

    for &branch in &object.one_of {
        let Some(branch_model) = interpreter.interpret_schema(branch, &options) else {
            continue;
        };
        let member = interpreter.models.deep_clone(base);
        interpreter.interpret_and_combine(Some(branch), member, first_base, &options);
        // The member is the branch, named as the branch.
        let branch_name = interpreter.models.get(branch_model).id.clone();
        interpreter.models.get_mut(member).id = branch_name;
        interpreter.models.get_mut(model).union.push(member);
    }
}
