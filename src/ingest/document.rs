//! Input document access
//!
//! A document is a JSON object with optional `nodes` and `relationships`
//! arrays. Keys other than the reserved ones below are attributes.

use crate::error::IngestError;
use serde_json::Value;
use std::path::Path;
use tracing::info;

pub const NODES_KEY: &str = "nodes";
pub const RELATIONSHIPS_KEY: &str = "relationships";

/// Object whose entries are expanded into attributes
pub const PROPERTIES_KEY: &str = "properties";

pub const NODE_NAME: &str = "name";
pub const NODE_TYPE: &str = "node_type";
pub const NODE_ENTITY_TYPE: &str = "Entity_Type";
pub const RESERVED_NODE_KEYS: [&str; 4] = [NODE_NAME, NODE_TYPE, NODE_ENTITY_TYPE, PROPERTIES_KEY];

pub const REL_START: &str = "start";
pub const REL_END: &str = "end";
pub const REL_TYPE: &str = "relationship_type";
pub const RESERVED_RELATIONSHIP_KEYS: [&str; 4] = [REL_START, REL_END, REL_TYPE, PROPERTIES_KEY];

/// Read and parse a JSON document from disk
pub fn read_document_file(path: impl AsRef<Path>) -> Result<Value, IngestError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_str(&text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded JSON document from {}", path.display());
    Ok(document)
}

/// Name of a JSON value's type, for error messages
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
