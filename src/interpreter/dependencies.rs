//! `dependencies` handler.

use crate::model::ModelId;
use crate::schema::{Dependency, SchemaId, SchemaObject};

use super::{InterpretOptions, Interpreter};

/// Fold schema-valued dependencies into the containing model.
///
/// Property-name dependencies express conditional requiredness, which has
/// no counterpart in the output shape; they are skipped.
pub(crate) fn interpret_dependencies(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    for dependency in object.dependencies.values() {
        match dependency {
            Dependency::Schema(dependent) => {
                interpreter.interpret_and_combine(Some(*dependent), model, schema, options);
            }
            Dependency::Properties(_) => {}
        }
    }
}
