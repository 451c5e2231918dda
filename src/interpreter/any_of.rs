//! `anyOf` handler.

use crate::model::ModelId;
use crate::schema::SchemaObject;

use super::one_of::interpret_union_branches;
use super::{InterpretOptions, Interpreter};

/// Interpret `anyOf` branches as union members, with the same nullability
/// folding as `oneOf`.
///
/// Unlike `oneOf` there are no combined forms to defer to, so the branches
/// are taken regardless of sibling `allOf` or `properties` keywords.
pub(crate) fn interpret_any_of(
    interpreter: &mut Interpreter<'_>,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    if object.any_of.is_empty() {
        return;
    }
    interpret_union_branches(interpreter, &object.any_of, object, model, options);
}
