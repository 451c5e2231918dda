//! The input schema graph and its loader.
//!
//! Interpretation consumes schemas from a [`SchemaArena`], an index-addressed
//! store in which self-referential documents are representable: a `$ref`
//! pointing back up the tree resolves to the [`SchemaId`] of the node it
//! targets, so cycles are plain index edges. [`SchemaDocument::from_value`]
//! builds the arena from a raw (already externally dereferenced) JSON value,
//! resolving document-internal JSON Pointer references along the way.
//!
//! Identity matters: the interpreter caches per [`SchemaId`], which is what
//! terminates cycles. Every location in the document gets exactly one id;
//! boolean schemas alias per polarity (all `true` leaves are one node, all
//! `false` leaves another).

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::InterpretError;
use crate::model::SchemaType;
use crate::pointer::build_path;

// ---------------------------------------------------------------------------
// Node types
// ---------------------------------------------------------------------------

/// Index of a [`Schema`] inside a [`SchemaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) u32);

/// A schema node: a boolean leaf (`true` accepts anything, `false` accepts
/// nothing) or a structured object.
#[derive(Debug, Clone)]
pub enum Schema {
    Bool(bool),
    Object(Box<SchemaObject>),
}

/// `items` of a schema: one shared schema, or one schema per tuple position.
#[derive(Debug, Clone)]
pub enum SchemaItems {
    Single(SchemaId),
    Tuple(Vec<SchemaId>),
}

/// A `dependencies` entry: a schema merged in when the key property is
/// present, or a list of property names (ignored by interpretation).
#[derive(Debug, Clone)]
pub enum Dependency {
    Schema(SchemaId),
    Properties(Vec<String>),
}

/// A structured schema node. Child schemas are held by [`SchemaId`].
#[derive(Debug, Clone, Default)]
pub struct SchemaObject {
    /// Explicit `$id`.
    pub schema_id: Option<String>,
    pub title: Option<String>,
    /// Name hint recorded by the loader (e.g. the `$defs` key a `$ref`
    /// resolved through).
    pub inferred_name: Option<String>,
    /// Declared type tags; empty when the keyword is absent.
    pub types: Vec<SchemaType>,
    pub enum_values: Vec<Value>,
    pub const_value: Option<Value>,
    /// `None` when the keyword is absent — an empty map is a declared (if
    /// vacuous) object shape.
    pub properties: Option<IndexMap<String, SchemaId>>,
    pub pattern_properties: IndexMap<String, SchemaId>,
    pub additional_properties: Option<SchemaId>,
    pub items: Option<SchemaItems>,
    pub additional_items: Option<SchemaId>,
    pub required: Vec<String>,
    pub all_of: Vec<SchemaId>,
    pub one_of: Vec<SchemaId>,
    pub any_of: Vec<SchemaId>,
    pub not: Option<SchemaId>,
    pub if_schema: Option<SchemaId>,
    pub then_schema: Option<SchemaId>,
    pub else_schema: Option<SchemaId>,
    pub dependencies: IndexMap<String, Dependency>,
    /// Discriminator property name; accepts both the plain string form and
    /// the OpenAPI `{"propertyName": ...}` object form.
    pub discriminator: Option<String>,
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Flat store of schema nodes, addressed by [`SchemaId`].
///
/// Slots 0 and 1 always hold the `true` and `false` schemas, so implicit
/// boolean defaults (an absent `additionalProperties` means `true`) have a
/// stable identity.
#[derive(Debug)]
pub struct SchemaArena {
    nodes: Vec<Schema>,
    sources: Vec<Value>,
}

impl SchemaArena {
    pub fn new() -> Self {
        Self {
            nodes: vec![Schema::Bool(true), Schema::Bool(false)],
            sources: vec![Value::Bool(true), Value::Bool(false)],
        }
    }

    pub(crate) fn alloc(&mut self, schema: Schema, source: Value) -> SchemaId {
        let id = SchemaId(self.nodes.len() as u32);
        self.nodes.push(schema);
        self.sources.push(source);
        id
    }

    fn replace(&mut self, id: SchemaId, schema: Schema) {
        self.nodes[id.0 as usize] = schema;
    }

    pub fn get(&self, id: SchemaId) -> &Schema {
        &self.nodes[id.0 as usize]
    }

    pub fn as_object(&self, id: SchemaId) -> Option<&SchemaObject> {
        match self.get(id) {
            Schema::Object(object) => Some(object),
            Schema::Bool(_) => None,
        }
    }

    /// The raw JSON this node was loaded from (provenance).
    pub fn source(&self, id: SchemaId) -> &Value {
        &self.sources[id.0 as usize]
    }

    /// The shared `true` schema node.
    pub fn true_schema(&self) -> SchemaId {
        SchemaId(0)
    }

    /// The shared `false` schema node.
    pub fn false_schema(&self) -> SchemaId {
        SchemaId(1)
    }

    fn bool_schema(&self, value: bool) -> SchemaId {
        if value {
            self.true_schema()
        } else {
            self.false_schema()
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for SchemaArena {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// A loaded schema document: the arena plus the root node.
#[derive(Debug)]
pub struct SchemaDocument {
    pub arena: SchemaArena,
    pub root: SchemaId,
}

impl SchemaDocument {
    /// Load a raw JSON document into an arena, resolving internal `$ref`s.
    ///
    /// External references are assumed to have been dereferenced upstream;
    /// encountering one is an error. Malformed composition keywords (an
    /// `allOf` entry that is neither object nor boolean, a non-array
    /// `oneOf`) fail fast.
    pub fn from_value(value: &Value) -> Result<Self, InterpretError> {
        let mut loader = Loader {
            arena: SchemaArena::new(),
            by_location: HashMap::new(),
            document: value,
        };
        let root = loader.build(value, "#", None)?;
        Ok(SchemaDocument {
            arena: loader.arena,
            root,
        })
    }
}

struct Loader<'a> {
    arena: SchemaArena,
    /// Canonical JSON Pointer location → node, populated before children are
    /// built so cyclic `$ref`s resolve to in-progress nodes.
    by_location: HashMap<String, SchemaId>,
    document: &'a Value,
}

impl Loader<'_> {
    fn build(
        &mut self,
        value: &Value,
        path: &str,
        name_hint: Option<&str>,
    ) -> Result<SchemaId, InterpretError> {
        match value {
            Value::Bool(b) => Ok(self.arena.bool_schema(*b)),
            Value::Object(map) => {
                if let Some(ref_value) = map.get("$ref") {
                    return self.build_ref(ref_value, path);
                }
                if let Some(&existing) = self.by_location.get(path) {
                    return Ok(existing);
                }
                // Register the node before descending so references back to
                // this location land on the in-progress node.
                let id = self
                    .arena
                    .alloc(Schema::Object(Box::default()), value.clone());
                self.by_location.insert(path.to_string(), id);
                let object = self.build_object(map, path, name_hint)?;
                self.arena.replace(id, Schema::Object(Box::new(object)));
                Ok(id)
            }
            other => Err(InterpretError::SchemaError {
                path: path.to_string(),
                message: format!(
                    "expected a schema (object or boolean), found {}",
                    kind_name(other)
                ),
            }),
        }
    }

    fn build_ref(&mut self, ref_value: &Value, path: &str) -> Result<SchemaId, InterpretError> {
        let Some(reference) = ref_value.as_str() else {
            return Err(InterpretError::SchemaError {
                path: build_path(path, &["$ref"]),
                message: "$ref must be a string".to_string(),
            });
        };
        let Some(fragment) = reference.strip_prefix('#') else {
            return Err(InterpretError::UnresolvableRef {
                path: path.to_string(),
                reference: reference.to_string(),
            });
        };
        let canonical = format!("#{fragment}");
        if let Some(&existing) = self.by_location.get(&canonical) {
            return Ok(existing);
        }
        let Some(target) = self.document.pointer(fragment) else {
            return Err(InterpretError::UnresolvableRef {
                path: path.to_string(),
                reference: reference.to_string(),
            });
        };
        let hint = definition_name_hint(fragment);
        self.build(target, &canonical, hint.as_deref())
    }

    fn build_object(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        name_hint: Option<&str>,
    ) -> Result<SchemaObject, InterpretError> {
        let mut object = SchemaObject {
            schema_id: map.get("$id").and_then(Value::as_str).map(str::to_string),
            title: map.get("title").and_then(Value::as_str).map(str::to_string),
            inferred_name: name_hint.map(str::to_string),
            ..SchemaObject::default()
        };

        if let Some(type_value) = map.get("type") {
            object.types = parse_types(type_value, path)?;
        }

        if let Some(enum_value) = map.get("enum") {
            match enum_value {
                Value::Array(values) => object.enum_values = values.clone(),
                other => {
                    tracing::debug!(path, found = kind_name(other), "ignoring non-array enum");
                }
            }
        }
        object.const_value = map.get("const").cloned();

        if let Some(properties) = map.get("properties") {
            match properties {
                Value::Object(entries) => {
                    let mut built = IndexMap::new();
                    for (name, child) in entries {
                        let child_path = build_path(path, &["properties", name]);
                        built.insert(name.clone(), self.build(child, &child_path, None)?);
                    }
                    object.properties = Some(built);
                }
                other => {
                    tracing::debug!(path, found = kind_name(other), "ignoring malformed properties");
                }
            }
        }

        if let Some(Value::Object(entries)) = map.get("patternProperties") {
            for (pattern, child) in entries {
                let child_path = build_path(path, &["patternProperties", pattern]);
                let child = self.build(child, &child_path, None)?;
                object.pattern_properties.insert(pattern.clone(), child);
            }
        }

        object.additional_properties =
            self.build_optional(map, "additionalProperties", path)?;
        object.additional_items = self.build_optional(map, "additionalItems", path)?;

        if let Some(items) = map.get("items") {
            match items {
                Value::Array(entries) => {
                    let mut positions = Vec::with_capacity(entries.len());
                    for (index, entry) in entries.iter().enumerate() {
                        let child_path = build_path(path, &["items", &index.to_string()]);
                        positions.push(self.build(entry, &child_path, None)?);
                    }
                    object.items = Some(SchemaItems::Tuple(positions));
                }
                Value::Object(_) | Value::Bool(_) => {
                    let child_path = build_path(path, &["items"]);
                    object.items = Some(SchemaItems::Single(self.build(items, &child_path, None)?));
                }
                other => {
                    tracing::debug!(path, found = kind_name(other), "ignoring malformed items");
                }
            }
        }

        if let Some(Value::Array(names)) = map.get("required") {
            object.required = names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }

        object.all_of = self.build_composition(map, "allOf", path)?;
        object.one_of = self.build_composition(map, "oneOf", path)?;
        object.any_of = self.build_composition(map, "anyOf", path)?;

        object.not = self.build_optional(map, "not", path)?;
        object.if_schema = self.build_optional(map, "if", path)?;
        object.then_schema = self.build_optional(map, "then", path)?;
        object.else_schema = self.build_optional(map, "else", path)?;

        if let Some(dependencies) = map.get("dependencies") {
            let Value::Object(entries) = dependencies else {
                return Err(InterpretError::SchemaError {
                    path: build_path(path, &["dependencies"]),
                    message: format!(
                        "expected an object, found {}",
                        kind_name(dependencies)
                    ),
                });
            };
            for (name, entry) in entries {
                let child_path = build_path(path, &["dependencies", name]);
                let dependency = match entry {
                    Value::Array(names) => Dependency::Properties(
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                    ),
                    Value::Object(_) | Value::Bool(_) => {
                        Dependency::Schema(self.build(entry, &child_path, None)?)
                    }
                    other => {
                        return Err(InterpretError::SchemaError {
                            path: child_path,
                            message: format!(
                                "expected a schema or property-name list, found {}",
                                kind_name(other)
                            ),
                        })
                    }
                };
                object.dependencies.insert(name.clone(), dependency);
            }
        }

        object.discriminator = match map.get("discriminator") {
            Some(Value::String(name)) => Some(name.clone()),
            Some(Value::Object(entries)) => entries
                .get("propertyName")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };

        Ok(object)
    }

    /// Build a single-schema keyword; non-schema values are preserved-as-
    /// absent (the assumed meta-model only fails fast on composition
    /// keywords).
    fn build_optional(
        &mut self,
        map: &Map<String, Value>,
        keyword: &str,
        path: &str,
    ) -> Result<Option<SchemaId>, InterpretError> {
        match map.get(keyword) {
            Some(value @ (Value::Object(_) | Value::Bool(_))) => {
                let child_path = build_path(path, &[keyword]);
                Ok(Some(self.build(value, &child_path, None)?))
            }
            Some(other) => {
                tracing::debug!(
                    path,
                    keyword,
                    found = kind_name(other),
                    "ignoring non-schema value"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn build_composition(
        &mut self,
        map: &Map<String, Value>,
        keyword: &str,
        path: &str,
    ) -> Result<Vec<SchemaId>, InterpretError> {
        match map.get(keyword) {
            None => Ok(Vec::new()),
            Some(Value::Array(entries)) => {
                let mut built = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    let child_path = build_path(path, &[keyword, &index.to_string()]);
                    built.push(self.build(entry, &child_path, None)?);
                }
                Ok(built)
            }
            Some(other) => Err(InterpretError::SchemaError {
                path: build_path(path, &[keyword]),
                message: format!("expected an array of schemas, found {}", kind_name(other)),
            }),
        }
    }
}

fn parse_types(value: &Value, path: &str) -> Result<Vec<SchemaType>, InterpretError> {
    let tag_error = |tag: &Value| InterpretError::SchemaError {
        path: build_path(path, &["type"]),
        message: format!("unknown type tag {tag}"),
    };
    match value {
        Value::String(tag) => Ok(vec![SchemaType::parse(tag).ok_or_else(|| tag_error(value))?]),
        Value::Array(tags) => tags
            .iter()
            .map(|tag| {
                tag.as_str()
                    .and_then(SchemaType::parse)
                    .ok_or_else(|| tag_error(tag))
            })
            .collect(),
        other => Err(InterpretError::SchemaError {
            path: build_path(path, &["type"]),
            message: format!("expected a type tag or list, found {}", kind_name(other)),
        }),
    }
}

/// Name hint for a `$ref` target living under `$defs`/`definitions`.
fn definition_name_hint(fragment: &str) -> Option<String> {
    let segments: Vec<&str> = fragment.split('/').collect();
    match segments.as_slice() {
        [.., container, name] if *container == "$defs" || *container == "definitions" => {
            Some(name.replace("~1", "/").replace("~0", "~"))
        }
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_simple_object() {
        let document = SchemaDocument::from_value(&json!({
            "type": "object",
            "title": "Person",
            "properties": { "name": { "type": "string" } },
            "required": ["name"]
        }))
        .unwrap();

        let root = document.arena.as_object(document.root).unwrap();
        assert_eq!(root.types, vec![SchemaType::Object]);
        assert_eq!(root.title.as_deref(), Some("Person"));
        assert_eq!(root.required, vec!["name"]);
        let name = root.properties.as_ref().unwrap()["name"];
        let name = document.arena.as_object(name).unwrap();
        assert_eq!(name.types, vec![SchemaType::String]);
    }

    #[test]
    fn test_boolean_leaves_alias_per_polarity() {
        let document = SchemaDocument::from_value(&json!({
            "properties": {
                "a": true,
                "b": true,
                "c": false
            }
        }))
        .unwrap();

        let root = document.arena.as_object(document.root).unwrap();
        let properties = root.properties.as_ref().unwrap();
        assert_eq!(properties["a"], properties["b"]);
        assert_eq!(properties["a"], document.arena.true_schema());
        assert_eq!(properties["c"], document.arena.false_schema());
    }

    #[test]
    fn test_internal_ref_resolves_to_same_node() {
        let document = SchemaDocument::from_value(&json!({
            "$defs": {
                "Name": { "type": "string" }
            },
            "properties": {
                "first": { "$ref": "#/$defs/Name" },
                "last": { "$ref": "#/$defs/Name" }
            }
        }))
        .unwrap();

        let root = document.arena.as_object(document.root).unwrap();
        let properties = root.properties.as_ref().unwrap();
        assert_eq!(properties["first"], properties["last"]);
        let name = document.arena.as_object(properties["first"]).unwrap();
        assert_eq!(name.inferred_name.as_deref(), Some("Name"));
    }

    #[test]
    fn test_self_referential_document() {
        let document = SchemaDocument::from_value(&json!({
            "type": "object",
            "properties": {
                "parent": { "$ref": "#" }
            }
        }))
        .unwrap();

        let root = document.arena.as_object(document.root).unwrap();
        let properties = root.properties.as_ref().unwrap();
        assert_eq!(properties["parent"], document.root);
    }

    #[test]
    fn test_external_ref_is_unresolvable() {
        let result = SchemaDocument::from_value(&json!({
            "properties": {
                "x": { "$ref": "https://example.com/other.json" }
            }
        }));
        assert!(matches!(
            result,
            Err(InterpretError::UnresolvableRef { .. })
        ));
    }

    #[test]
    fn test_malformed_composition_fails_fast() {
        let result = SchemaDocument::from_value(&json!({
            "allOf": [42]
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("#/allOf/0"));

        let result = SchemaDocument::from_value(&json!({
            "oneOf": "not-an-array"
        }));
        assert!(matches!(result, Err(InterpretError::SchemaError { .. })));
    }

    #[test]
    fn test_unknown_type_tag_fails_fast() {
        let result = SchemaDocument::from_value(&json!({ "type": "strings" }));
        assert!(matches!(result, Err(InterpretError::SchemaError { .. })));
    }

    #[test]
    fn test_discriminator_both_forms() {
        let document = SchemaDocument::from_value(&json!({
            "discriminator": "petType"
        }))
        .unwrap();
        let root = document.arena.as_object(document.root).unwrap();
        assert_eq!(root.discriminator.as_deref(), Some("petType"));

        let document = SchemaDocument::from_value(&json!({
            "discriminator": { "propertyName": "petType" }
        }))
        .unwrap();
        let root = document.arena.as_object(document.root).unwrap();
        assert_eq!(root.discriminator.as_deref(), Some("petType"));
    }

    #[test]
    fn test_dependencies_entries() {
        let document = SchemaDocument::from_value(&json!({
            "dependencies": {
                "billing": ["name"],
                "shipping": { "properties": { "address": { "type": "string" } } }
            }
        }))
        .unwrap();
        let root = document.arena.as_object(document.root).unwrap();
        assert!(matches!(
            root.dependencies["billing"],
            Dependency::Properties(ref names) if names == &["name".to_string()]
        ));
        assert!(matches!(root.dependencies["shipping"], Dependency::Schema(_)));
    }

    #[test]
    fn test_tuple_items() {
        let document = SchemaDocument::from_value(&json!({
            "items": [{ "type": "string" }, { "type": "integer" }]
        }))
        .unwrap();
        let root = document.arena.as_object(document.root).unwrap();
        match &root.items {
            Some(SchemaItems::Tuple(positions)) => assert_eq!(positions.len(), 2),
            other => panic!("expected tuple items, got {other:?}"),
        }
    }
}
