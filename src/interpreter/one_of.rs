//! `oneOf` handler.

use crate::model::{ModelId, SchemaType};
use crate::schema::{SchemaId, SchemaObject};

use super::utils::is_lone_null;
use super::{InterpretOptions, Interpreter};

/// Interpret plain `oneOf` branches as union members.
///
/// Stands down when `allOf` or own `properties` are present, which the
/// combined-form handlers cover. A branch that is exactly `null` folds into
/// the containing type set instead of becoming a member, so nullability
/// never manufactures a one-armed union.
pub(crate) fn interpret_one_of(
    interpreter: &mut Interpreter<'_>,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    if object.one_of.is_empty() || !object.all_of.is_empty() || object.properties.is_some() {
        return;
    }
    interpret_union_branches(interpreter, &object.one_of, object, model, options);
}

/// Shared branch walk for `oneOf` and `anyOf`.
pub(crate) fn interpret_union_branches(
    interpreter: &mut Interpreter<'_>,
    branches: &[SchemaId],
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    let mut options = options.clone();
    if let Some(discriminator) = &object.discriminator {
        options.discriminator = Some(discriminator.clone());
        interpreter.models.get_mut(model).discriminator = Some(discriminator.clone());
    }
    for &branch in branches {
        let Some(member) = interpreter.interpret_schema(branch, &options) else {
            continue;
        };
        if is_lone_null(interpreter.models.get(member)) {
            interpreter.models.get_mut(model).add_type(SchemaType::Null);
            continue;
        }
        interpreter.models.get_mut(model).union.push(member);
    }
}
