//! Interpret JSON Schema documents into a canonical model graph.
//!
//! JSON Schema is a validation vocabulary; code generators need nominal
//! types. This crate bridges the two: it loads a (fully dereferenced,
//! possibly cyclic) schema document, interprets its keywords into
//! [`OutputModel`] nodes, and splits every nested object shape out into an
//! independently nameable top-level model, leaving a flat registry a
//! renderer can emit one type per entry from.
//!
//! ## Usage
//!
//! ```
//! use json_schema_ir::{interpret, InterpretOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "title": "Person",
//!     "properties": {
//!         "name": { "type": "string" }
//!     },
//!     "required": ["name"]
//! });
//!
//! let output = interpret(&schema, &InterpretOptions::default())?
//!     .expect("only the false schema produces no model");
//! let root = output.models.get(output.root);
//! assert_eq!(root.id.as_deref(), Some("Person"));
//! # Ok::<(), json_schema_ir::InterpretError>(())
//! ```
//!
//! Interpretation is single-threaded, synchronous, and pure: no I/O, no
//! global state. Cycles in the input are handled by identity caching, never
//! by depth limits.

pub mod error;
pub mod interpreter;
mod merge;
pub mod model;
pub mod pointer;
pub mod schema;
mod split;

pub use error::InterpretError;
pub use interpreter::{InterpretOptions, InterpretOutput, Interpreter};
pub use model::{ModelArena, ModelId, ModelItems, ModelType, OutputModel, SchemaType};
pub use schema::{Schema, SchemaArena, SchemaDocument, SchemaId, SchemaObject};

/// Interpret a raw schema value in one call.
///
/// Loads the value into a schema arena (resolving internal `$ref`s), runs a
/// fresh interpretation session over it, and returns the finished output.
/// `Ok(None)` is produced only for the literal `false` schema.
pub fn interpret(
    value: &serde_json::Value,
    options: &InterpretOptions,
) -> Result<Option<InterpretOutput>, InterpretError> {
    let document = SchemaDocument::from_value(value)?;
    let mut interpreter = Interpreter::new(&document.arena);
    Ok(interpreter
        .interpret(document.root, options)
        .map(|root| interpreter.into_output(root)))
}

/// Parse and interpret a schema from JSON text.
pub fn interpret_str(
    input: &str,
    options: &InterpretOptions,
) -> Result<Option<InterpretOutput>, InterpretError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    interpret(&value, options)
}
