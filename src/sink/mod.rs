//! GraphSink trait: the store seam behind the ingestor
//!
//! Implemented by:
//! - `MemorySink` - the in-process `GraphStore` (dry runs, embedding, tests)
//! - `Neo4jHttpSink` - a Neo4j server over its HTTP transactional endpoint
//!
//! Every operation is a single auto-committed write or lookup. Sinks report
//! how many entities a merge affected; they never create missing endpoints.

pub mod memory;
pub mod neo4j;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{IngestError, RecordError};
use crate::ingest::{NodeRecord, RelationshipRecord};

pub use memory::MemorySink;
pub use neo4j::Neo4jHttpSink;

/// Errors reported by a sink
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// Store unreachable, timed out, or credentials refused
    #[error("Connection error: {0}")]
    Connection(String),

    /// The sink was already closed
    #[error("sink is closed")]
    Closed,

    /// The store rejected this write
    #[error("Write rejected: {0}")]
    Write(String),

    /// The store answered with something unexpected
    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type SinkResult<T> = Result<T, SinkError>;

impl SinkError {
    /// Whether the batch can continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, SinkError::Connection(_) | SinkError::Closed)
    }
}

impl From<SinkError> for IngestError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Connection(msg) => IngestError::Connection(msg),
            SinkError::Closed => IngestError::Connection("sink is closed".to_string()),
            SinkError::Write(msg) | SinkError::Protocol(msg) => {
                IngestError::Record(RecordError::store_write(msg))
            }
        }
    }
}

impl From<reqwest::Error> for SinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SinkError::Protocol(err.to_string())
        } else {
            SinkError::Connection(err.to_string())
        }
    }
}

/// A labeled-property-graph store with merge-by-key writes
#[async_trait]
pub trait GraphSink: Send + Sync {
    /// Verify the store is reachable and accepts our credentials
    async fn ping(&self) -> SinkResult<()>;

    /// Merge a node by name; returns the affected count
    async fn merge_node(&self, node: &NodeRecord) -> SinkResult<u64>;

    /// Whether a node with this name exists, regardless of label
    async fn node_exists(&self, name: &str) -> SinkResult<bool>;

    /// Merge a directed edge between existing nodes; returns the affected count
    async fn merge_relationship(&self, rel: &RelationshipRecord) -> SinkResult<u64>;

    /// Release the connection; later calls fail with [`SinkError::Closed`]
    async fn close(&self) -> SinkResult<()>;
}
