//! Load summary and per-record failures

use crate::error::RecordError;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;

use super::document::{NODES_KEY, RELATIONSHIPS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Node,
    Relationship,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Node => write!(f, "node"),
            RecordKind::Relationship => write!(f, "relationship"),
        }
    }
}

/// A record that was skipped, with its index in the input array
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    pub kind: RecordKind,
    pub index: usize,
    pub identifier: Option<String>,
    pub cause: RecordError,
}

impl RecordFailure {
    pub fn new(kind: RecordKind, index: usize, identifier: Option<String>, cause: RecordError) -> Self {
        RecordFailure {
            kind,
            index,
            identifier,
            cause,
        }
    }
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(id) => write!(f, "{} #{} ({}): {}", self.kind, self.index, id, self.cause),
            None => write!(f, "{} #{}: {}", self.kind, self.index, self.cause),
        }
    }
}

/// Summary of a load
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestResult {
    /// Node upserts the store reported as affecting a node
    pub nodes_created: u64,
    /// Relationship upserts the store reported as affecting an edge
    pub relationships_created: u64,
    /// Validation failures first, then store failures in processing order
    pub errors: Vec<RecordFailure>,
}

impl IngestResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Indices of failed records of one kind, ascending
    pub fn failed_indices(&self, kind: RecordKind) -> BTreeSet<usize> {
        self.errors
            .iter()
            .filter(|failure| failure.kind == kind)
            .map(|failure| failure.index)
            .collect()
    }

    /// Build a document holding only the records that failed.
    ///
    /// `doc` must be the document this result came from; records are copied
    /// verbatim so the subset can be fixed and loaded again.
    pub fn failed_subset(&self, doc: &Value) -> Value {
        let pick = |kind: RecordKind, key: &str| -> Vec<Value> {
            let items = match doc.get(key).and_then(Value::as_array) {
                Some(items) => items,
                None => return Vec::new(),
            };
            self.failed_indices(kind)
                .into_iter()
                .filter_map(|index| items.get(index).cloned())
                .collect()
        };

        json!({
            NODES_KEY: pick(RecordKind::Node, NODES_KEY),
            RELATIONSHIPS_KEY: pick(RecordKind::Relationship, RELATIONSHIPS_KEY),
        })
    }
}
