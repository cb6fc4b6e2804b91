//! Error types for graphload
//!
//! Two layers: [`IngestError`] is what a caller of a load sees, and
//! [`RecordError`] describes why a single node or relationship was skipped.
//! Record errors travel inside [`IngestError::Record`] out of the per-record
//! operations, and are turned into data by the batch loop.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by ingestion
#[derive(Error, Debug)]
pub enum IngestError {
    /// Store unreachable or credentials refused
    #[error("Connection error: {0}")]
    Connection(String),

    /// Top-level document shape is invalid
    #[error("Schema error: {0}")]
    Schema(String),

    /// Connection parameters cannot be used
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A single record failed; never escapes `load_document`
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl IngestError {
    /// Whether this error aborts a whole load
    pub fn is_fatal(&self) -> bool {
        !matches!(self, IngestError::Record(_))
    }
}

/// Which endpoint of a relationship could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

/// Why a single record was skipped
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum RecordError {
    /// Missing or malformed field
    #[error("invalid field `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// A relationship endpoint is not in the store
    #[error("{endpoint} node {name:?} does not exist in the store")]
    DanglingReference { endpoint: Endpoint, name: String },

    /// The store rejected the write
    #[error("store rejected write: {message}")]
    StoreWrite { message: String },
}

impl RecordError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RecordError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn store_write(message: impl Into<String>) -> Self {
        RecordError::StoreWrite {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fatality() {
        assert!(IngestError::Connection("refused".into()).is_fatal());
        assert!(IngestError::Schema("bad".into()).is_fatal());
        assert!(!IngestError::from(RecordError::store_write("constraint")).is_fatal());
    }

    #[test]
    fn test_record_error_display() {
        let err = RecordError::validation("node_type", "missing required field");
        assert_eq!(err.to_string(), "invalid field `node_type`: missing required field");

        let err = RecordError::DanglingReference {
            endpoint: Endpoint::End,
            name: "B".into(),
        };
        assert_eq!(err.to_string(), "end node \"B\" does not exist in the store");
    }

    #[test]
    fn test_record_error_serializes_tagged() {
        let err = RecordError::DanglingReference {
            endpoint: Endpoint::Start,
            name: "A".into(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"error": "dangling_reference", "endpoint": "start", "name": "A"})
        );
    }
}
