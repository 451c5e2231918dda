//! `allOf` handler.

use crate::merge::merge_models;
use crate::model::ModelId;
use crate::schema::{SchemaId, SchemaObject};

use super::utils::is_model_object;
use super::{InterpretOptions, Interpreter};

/// Fold `allOf` branches into the containing model, or realize them as
/// inheritance when enabled.
///
/// When `oneOf` is also present (and inheritance is off) the combined form
/// is handled elsewhere, so this handler stands down. A branch discriminator
/// propagates to the containing model and to every branch interpreted after
/// it.
pub(crate) fn interpret_all_of(
    interpreter: &mut Interpreter<'_>,
    schema: SchemaId,
    object: &SchemaObject,
    model: ModelId,
    options: &InterpretOptions,
) {
    if object.all_of.is_empty() {
        return;
    }
    if !object.one_of.is_empty() && !options.allow_inheritance {
        return;
    }

    let schemas = interpreter.schemas;
    let mut options = options.clone();
    for &branch in &object.all_of {
        if let Some(discriminator) = schemas
            .as_object(branch)
            .and_then(|branch_object| branch_object.discriminator.clone())
        {
            options.discriminator = Some(discriminator.clone());
            interpreter.models.get_mut(model).discriminator = Some(discriminator);
        }
        let Some(branch_model) = interpreter.interpret_schema(branch, &options) else {
            continue;
        };
        if options.allow_inheritance && is_model_object(interpreter.models.get(branch_model)) {
            extend_with(interpreter, model, branch_model);
            continue;
        }
        tracing::debug!("flattening composition branch into the containing model");
        merge_models(&mut interpreter.models, model, branch_model, schema);
    }
}

/// Record an inheritance edge to a named branch model and promote it.
fn extend_with(interpreter: &mut Interpreter<'_>, model: ModelId, branch_model: ModelId) {
    let Some(name) = interpreter.models.get(branch_model).id.clone() else {
        tracing::warn!("inherited shape has no name and cannot be extended");
        return;
    };
    tracing::debug!(parent = name.as_str(), "extending with inherited shape");
    let target = interpreter.models.get_mut(model);
    if !target.extend.contains(&name) {
        target.extend.push(name.clone());
    }
    interpreter.registry.entry(name).or_insert(branch_model);
}
