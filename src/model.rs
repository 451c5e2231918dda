//! The canonical output model graph.
//!
//! Interpretation produces [`OutputModel`] nodes inside a [`ModelArena`].
//! Models reference each other through [`ModelId`] indices rather than owned
//! pointers, so cyclic schemas (a type whose property is itself) are
//! representable without reference counting. Promoted models are additionally
//! addressable by their string `id` through the session registry, and a model
//! whose `reference` field is set is a bare placeholder pointing at a
//! promoted model.

use std::collections::HashMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::SchemaId;

// ---------------------------------------------------------------------------
// Type tags
// ---------------------------------------------------------------------------

/// One of the seven JSON Schema primitive type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Null,
}

impl SchemaType {
    /// Every primitive tag — the type of the `true` schema, which accepts
    /// any value.
    pub const ALL: [SchemaType; 7] = [
        SchemaType::Object,
        SchemaType::String,
        SchemaType::Number,
        SchemaType::Array,
        SchemaType::Boolean,
        SchemaType::Null,
        SchemaType::Integer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Null => "null",
        }
    }

    /// Parse a type tag from its JSON spelling.
    pub fn parse(tag: &str) -> Option<SchemaType> {
        match tag {
            "object" => Some(SchemaType::Object),
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "integer" => Some(SchemaType::Integer),
            "boolean" => Some(SchemaType::Boolean),
            "array" => Some(SchemaType::Array),
            "null" => Some(SchemaType::Null),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type of an output model: a single tag, or a set of tags.
///
/// The scalar/set distinction is part of the data model — a multi-valued
/// type collapses to `Single` as soon as only one member remains, and never
/// contains duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelType {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl ModelType {
    /// The tags of this type as a slice.
    pub fn tags(&self) -> &[SchemaType] {
        match self {
            ModelType::Single(tag) => std::slice::from_ref(tag),
            ModelType::Multiple(tags) => tags,
        }
    }

    pub fn contains(&self, tag: SchemaType) -> bool {
        self.tags().contains(&tag)
    }

    pub fn len(&self) -> usize {
        self.tags().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags().is_empty()
    }

    /// Whether this type covers all seven primitive tags (the "anything"
    /// shape produced by a `true` schema).
    pub fn is_all(&self) -> bool {
        SchemaType::ALL.iter().all(|tag| self.contains(*tag))
    }

    /// Build a type from a tag list, collapsing to scalar at one member.
    /// Returns `None` for an empty list.
    pub fn from_tags(tags: Vec<SchemaType>) -> Option<ModelType> {
        match tags.len() {
            0 => None,
            1 => Some(ModelType::Single(tags[0])),
            _ => Some(ModelType::Multiple(tags)),
        }
    }
}

// ---------------------------------------------------------------------------
// Output model
// ---------------------------------------------------------------------------

/// Index of an [`OutputModel`] inside a [`ModelArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub(crate) u32);

/// `items` of an output model: one shared model, or one model per tuple
/// position.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelItems {
    Single(ModelId),
    Tuple(Vec<ModelId>),
}

/// Canonical intermediate representation node consumed by code generators.
///
/// Child models are held by [`ModelId`]; resolve them through the arena the
/// interpretation session produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputModel {
    /// Candidate name. Always present on object-kind models (other than the
    /// accepts-anything shape); target-language validity is a downstream
    /// naming pipeline's concern.
    pub id: Option<String>,
    pub types: Option<ModelType>,
    /// Ordered, duplicate-free literal values.
    pub enum_values: Vec<Value>,
    pub const_value: Option<Value>,
    pub properties: IndexMap<String, ModelId>,
    pub pattern_properties: IndexMap<String, ModelId>,
    pub additional_properties: Option<ModelId>,
    pub items: Option<ModelItems>,
    pub additional_items: Option<ModelId>,
    pub required: IndexSet<String>,
    /// Ids of models this model extends (inheritance realization of `allOf`).
    pub extend: Vec<String>,
    /// Id of a promoted model. A model with a reference has no shape of its
    /// own.
    pub reference: Option<String>,
    /// Union members contributed by `oneOf`/`anyOf`.
    pub union: Vec<ModelId>,
    /// Property name distinguishing which union member a value belongs to.
    pub discriminator: Option<String>,
    /// Provenance back-pointer into the input schema arena.
    pub original_schema: Option<SchemaId>,
}

impl OutputModel {
    /// Add a single type tag, ignoring duplicates.
    pub fn add_type(&mut self, tag: SchemaType) {
        match &mut self.types {
            None => self.types = Some(ModelType::Single(tag)),
            Some(ModelType::Single(existing)) => {
                if *existing != tag {
                    self.types = Some(ModelType::Multiple(vec![*existing, tag]));
                }
            }
            Some(ModelType::Multiple(tags)) => {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }
    }

    /// Add every tag in `tags`, ignoring duplicates.
    pub fn add_types(&mut self, tags: &[SchemaType]) {
        for tag in tags {
            self.add_type(*tag);
        }
    }

    pub fn set_type(&mut self, types: Option<ModelType>) {
        self.types = types;
    }

    /// Remove tags from the type, collapsing to scalar or absence.
    pub fn remove_type(&mut self, tags: &[SchemaType]) {
        if let Some(types) = self.types.take() {
            let remaining: Vec<SchemaType> = types
                .tags()
                .iter()
                .copied()
                .filter(|tag| !tags.contains(tag))
                .collect();
            self.types = ModelType::from_tags(remaining);
        }
    }

    /// Append a literal value, ignoring duplicates (order-preserving).
    pub fn add_enum(&mut self, value: &Value) {
        if !self.enum_values.contains(value) {
            self.enum_values.push(value.clone());
        }
    }

    /// Remove literal values; an emptied list clears the field.
    pub fn remove_enum(&mut self, values: &[Value]) {
        self.enum_values.retain(|value| !values.contains(value));
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Flat store of output models, addressed by [`ModelId`].
#[derive(Debug, Default)]
pub struct ModelArena {
    nodes: Vec<OutputModel>,
}

impl ModelArena {
    pub fn alloc(&mut self, model: OutputModel) -> ModelId {
        let id = ModelId(self.nodes.len() as u32);
        self.nodes.push(model);
        id
    }

    pub fn get(&self, id: ModelId) -> &OutputModel {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ModelId) -> &mut OutputModel {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deep-clone a model subgraph, following every child edge.
    ///
    /// Cycle-aware: the old→new mapping is recorded before children are
    /// visited, so a model reachable from itself clones to a graph with the
    /// same shape.
    pub fn deep_clone(&mut self, id: ModelId) -> ModelId {
        let mut mapping = HashMap::new();
        self.deep_clone_inner(id, &mut mapping)
    }

    fn deep_clone_inner(&mut self, id: ModelId, mapping: &mut HashMap<ModelId, ModelId>) -> ModelId {
        if let Some(&new_id) = mapping.get(&id) {
            return new_id;
        }
        let cloned = self.get(id).clone();
        let new_id = self.alloc(cloned);
        mapping.insert(id, new_id);

        let property_ids: Vec<(String, ModelId)> = self
            .get(new_id)
            .properties
            .iter()
            .map(|(name, &child)| (name.clone(), child))
            .collect();
        for (name, child) in property_ids {
            let child = self.deep_clone_inner(child, mapping);
            self.get_mut(new_id).properties.insert(name, child);
        }

        let pattern_ids: Vec<(String, ModelId)> = self
            .get(new_id)
            .pattern_properties
            .iter()
            .map(|(pattern, &child)| (pattern.clone(), child))
            .collect();
        for (pattern, child) in pattern_ids {
            let child = self.deep_clone_inner(child, mapping);
            self.get_mut(new_id).pattern_properties.insert(pattern, child);
        }

        if let Some(child) = self.get(new_id).additional_properties {
            let child = self.deep_clone_inner(child, mapping);
            self.get_mut(new_id).additional_properties = Some(child);
        }
        if let Some(child) = self.get(new_id).additional_items {
            let child = self.deep_clone_inner(child, mapping);
            self.get_mut(new_id).additional_items = Some(child);
        }

        match self.get(new_id).items.clone() {
            Some(ModelItems::Single(child)) => {
                let child = self.deep_clone_inner(child, mapping);
                self.get_mut(new_id).items = Some(ModelItems::Single(child));
            }
            Some(ModelItems::Tuple(positions)) => {
                let positions: Vec<ModelId> = positions
                    .into_iter()
                    .map(|child| self.deep_clone_inner(child, mapping))
                    .collect();
                self.get_mut(new_id).items = Some(ModelItems::Tuple(positions));
            }
            None => {}
        }

        let union: Vec<ModelId> = self.get(new_id).union.clone();
        let union: Vec<ModelId> = union
            .into_iter()
            .map(|member| self.deep_clone_inner(member, mapping))
            .collect();
        self.get_mut(new_id).union = union;

        new_id
    }
}

// ===========================================================================
// Tests
// ===========================================================================
