//! Error types for schema interpretation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Schema error at {path}: {message}")]
    SchemaError { path: String, message: String },

    #[error("Unresolvable reference at {path}: {reference}")]
    UnresolvableRef { path: String, reference: String },
}
