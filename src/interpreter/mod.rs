//! The interpretation session.
//!
//! [`Interpreter`] walks a loaded schema graph and produces the canonical
//! output model graph. Each schema node is interpreted exactly once per
//! session: an identity-keyed cache is populated with the in-progress model
//! before any child is visited, so cyclic schemas resolve back to the node
//! being built instead of recursing forever.
//!
//! Keyword handling is an ordered sequence of functions over the shared
//! model, one per keyword family, each living in its own submodule.

mod additional_items;
mod additional_properties;
mod all_of;
mod any_of;
mod dependencies;
mod enum_const;
mod items;
mod not;
mod one_of;
mod one_of_with_all_of;
mod one_of_with_properties;
mod pattern_properties;
mod properties;
pub(crate) mod utils;

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::merge::merge_models;
use crate::model::{ModelArena, ModelId, OutputModel, SchemaType};
use crate::schema::{Schema, SchemaArena, SchemaId};
use crate::split::ensure_model_is_split;

use self::utils::{interpret_name, is_model_object, name_from_id};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options controlling an interpretation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InterpretOptions {
    /// Realize applicable `allOf` branches as inheritance (`extend` edges to
    /// promoted parents) instead of flattening them into the target.
    pub allow_inheritance: bool,
    /// Active discriminator property, stamped onto every model interpreted
    /// while set. Populated internally when descending into discriminated
    /// unions; rarely useful to set from the outside.
    pub discriminator: Option<String>,
    /// Copy `required` names onto models. Conditional branches disable this
    /// internally so `then`/`else` contribute shape without requiredness.
    pub constrict_models: bool,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            allow_inheritance: false,
            discriminator: None,
            constrict_models: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single interpretation session over one schema graph.
///
/// Sessions are single-use: construct one per top-level call so the cache,
/// registry, and anonymous-name counter never leak between unrelated
/// inputs.
pub struct Interpreter<'a> {
    pub(crate) schemas: &'a SchemaArena,
    pub(crate) models: ModelArena,
    /// Schema node → in-progress model; the cycle breaker.
    seen: HashMap<SchemaId, ModelId>,
    /// Promoted top-level models by name, in promotion order.
    pub(crate) registry: IndexMap<String, ModelId>,
    anonym_counter: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(schemas: &'a SchemaArena) -> Self {
        Self {
            schemas,
            models: ModelArena::default(),
            seen: HashMap::new(),
            registry: IndexMap::new(),
            anonym_counter: 1,
        }
    }

    /// Interpret a schema into a model and split out nested object models.
    ///
    /// Returns `None` only for the `false` schema, which accepts nothing
    /// and produces nothing.
    pub fn interpret(&mut self, schema: SchemaId, options: &InterpretOptions) -> Option<ModelId> {
        let root = self.interpret_schema(schema, options)?;

        if is_model_object(self.models.get(root)) {
            if let Some(name) = self.models.get(root).id.clone() {
                self.registry.entry(name).or_insert(root);
            }
        }

        let mut iterated = HashSet::new();
        ensure_model_is_split(&mut self.models, root, &mut self.registry, &mut iterated);
        // Promotion grows the registry while it is being split.
        let mut index = 0;
        while index < self.registry.len() {
            let member = *self.registry.get_index(index).unwrap().1;
            ensure_model_is_split(&mut self.models, member, &mut self.registry, &mut iterated);
            index += 1;
        }

        Some(root)
    }

    /// Consume the session, keeping the model graph and registry.
    pub fn into_output(self, root: ModelId) -> InterpretOutput {
        InterpretOutput {
            models: self.models,
            root,
            registry: self.registry,
        }
    }

    pub(crate) fn interpret_schema(
        &mut self,
        schema: SchemaId,
        options: &InterpretOptions,
    ) -> Option<ModelId> {
        if let Some(&cached) = self.seen.get(&schema) {
            return Some(cached);
        }
        match self.schemas.get(schema) {
            Schema::Bool(false) => None,
            Schema::Bool(true) => {
                let mut model = OutputModel {
                    original_schema: Some(schema),
                    ..OutputModel::default()
                };
                model.add_types(&SchemaType::ALL);
                let id = self.models.alloc(model);
                self.seen.insert(schema, id);
                Some(id)
            }
            Schema::Object(_) => {
                let id = self.models.alloc(OutputModel {
                    original_schema: Some(schema),
                    ..OutputModel::default()
                });
                // Cache before descending so self-references resolve to the
                // node being built.
                self.seen.insert(schema, id);
                self.interpret_schema_object(schema, id, options);
                Some(id)
            }
        }
    }

    fn interpret_schema_object(
        &mut self,
        schema: SchemaId,
        model: ModelId,
        options: &InterpretOptions,
    ) {
        let schemas = self.schemas;
        let Some(object) = schemas.as_object(schema) else {
            return;
        };

        if !object.types.is_empty() {
            self.models.get_mut(model).add_types(&object.types);
        }
        if options.constrict_models {
            for name in &object.required {
                self.models.get_mut(model).required.insert(name.clone());
            }
        }
        if let Some(discriminator) = &options.discriminator {
            self.models.get_mut(model).discriminator = Some(discriminator.clone());
        }

        pattern_properties::interpret_pattern_properties(self, schema, object, model, options);
        additional_properties::interpret_additional_properties(
            self, schema, object, model, options,
        );
        additional_items::interpret_additional_items(self, schema, object, model, options);
        items::interpret_items(self, schema, object, model, options);
        properties::interpret_properties(self, schema, object, model, options);
        all_of::interpret_all_of(self, schema, object, model, options);
        one_of::interpret_one_of(self, object, model, options);
        one_of_with_all_of::interpret_one_of_with_all_of(self, object, model, options);
        one_of_with_properties::interpret_one_of_with_properties(
            self, schema, object, model, options,
        );
        any_of::interpret_any_of(self, object, model, options);
        dependencies::interpret_dependencies(self, schema, object, model, options);
        enum_const::interpret_const(object, &mut self.models, model);
        enum_const::interpret_enum(object, &mut self.models, model);

        let conditional_options = InterpretOptions {
            constrict_models: false,
            ..options.clone()
        };
        self.interpret_and_combine(object.then_schema, model, schema, &conditional_options);
        self.interpret_and_combine(object.else_schema, model, schema, &conditional_options);

        not::interpret_not(self, object, model, options);

        // Naming runs last so the model's kind reflects every contribution
        // above. Object-kind models always end up with a candidate name;
        // anything else is named only by an explicit $id.
        let assigned = if is_model_object(self.models.get(model)) {
            Some(interpret_name(object).unwrap_or_else(|| {
                let name = format!("anonymSchema{}", self.anonym_counter);
                self.anonym_counter += 1;
                name
            }))
        } else {
            object.schema_id.as_deref().map(name_from_id)
        };
        if let Some(name) = assigned {
            self.models.get_mut(model).id = Some(name);
        }
    }

    /// Interpret a child schema (when structurally valued) and merge the
    /// result into `current`.
    pub(crate) fn interpret_and_combine(
        &mut self,
        schema: Option<SchemaId>,
        current: ModelId,
        root_schema: SchemaId,
        options: &InterpretOptions,
    ) {
        let Some(schema) = schema else {
            return;
        };
        if matches!(self.schemas.get(schema), Schema::Bool(_)) {
            return;
        }
        if let Some(interpreted) = self.interpret_schema(schema, options) {
            merge_models(&mut self.models, current, interpreted, root_schema);
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The result of a completed interpretation: the model graph, the root, and
/// the promoted models.
#[derive(Debug)]
pub struct InterpretOutput {
    pub models: ModelArena,
    pub root: ModelId,
    pub registry: IndexMap<String, ModelId>,
}

impl InterpretOutput {
    /// Models in emission order: the root first, then every promoted model
    /// in promotion order.
    pub fn ordered(&self) -> Vec<ModelId> {
        let mut ordered = vec![self.root];
        for &member in self.registry.values() {
            if member != self.root {
                ordered.push(member);
            }
        }
        ordered
    }

    /// Resolve a reference placeholder's name against the registry.
    pub fn resolve_ref(&self, name: &str) -> Option<&OutputModel> {
        self.registry.get(name).map(|&id| self.models.get(id))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
