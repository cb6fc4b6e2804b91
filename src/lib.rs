//! graphload
//!
//! Loads a JSON document of nodes and relationships into a labeled property
//! graph store with idempotent, per-record upserts.
//!
//! # Architecture
//!
//! - [`ingest`]: validation, the [`GraphIngestor`] batch loop and the load summary
//! - [`sink`]: the [`GraphSink`] seam, with an in-memory store and a Neo4j HTTP client
//! - [`graph`]: the in-memory property graph behind [`MemorySink`]
//! - [`config`]: connection parameters
//!
//! # Guarantees
//!
//! - Nodes are merged by `name`; relationships by `(start, end, type)`
//! - Attributes are merged last-write-wins, absent keys are left alone
//! - All nodes are written before any relationship
//! - A bad record is reported with its index and never stops the batch
//! - Only a lost connection or a malformed document fails a load
//!
//! ## Example Usage
//!
//! ```rust
//! use graphload::{GraphIngestor, MemorySink};
//! use serde_json::json;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let doc = json!({
//!         "nodes": [
//!             {"name": "A", "node_type": "Company"},
//!             {"name": "B", "node_type": "Tech Provider/Vendor"}
//!         ],
//!         "relationships": [
//!             {"start": "A", "end": "B", "relationship_type": "Owns Stake"}
//!         ]
//!     });
//!
//!     let sink = MemorySink::new();
//!     let result = GraphIngestor::ingest(sink.clone(), &doc).await.unwrap();
//!     assert_eq!(result.nodes_created, 2);
//!     assert_eq!(result.relationships_created, 1);
//!     assert!(result.errors.is_empty());
//! });
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod sink;

use serde_json::Value;

pub use config::ConnectionConfig;
pub use error::{Endpoint, IngestError, RecordError};
pub use graph::{
    Edge, EdgeId, EdgeType, GraphError, GraphResult, GraphStore, Label, Node, NodeId,
    PropertyMap, PropertyValue,
};
pub use ingest::{
    read_document_file, validate_document, GraphIngestor, IngestResult, NodeRecord,
    RecordFailure, RecordKind, RelationshipRecord, ValidationResult,
};
pub use sink::{GraphSink, MemorySink, Neo4jHttpSink, SinkError, SinkResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

/// Load `doc` into the Neo4j server described by `config`.
///
/// Connects, loads and disconnects. Fails with [`IngestError::Config`] for
/// unusable parameters, [`IngestError::Connection`] if the server cannot be
/// reached and [`IngestError::Schema`] if the document shape is invalid.
/// Everything else is reported in the returned [`IngestResult`].
pub async fn load(config: &ConnectionConfig, doc: &Value) -> Result<IngestResult, IngestError> {
    let sink = Neo4jHttpSink::new(config)?;
    GraphIngestor::ingest(sink, doc).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "1.0.0");
    }

    #[tokio::test]
    async fn test_load_rejects_bolt_before_connecting() {
        let config = ConnectionConfig::new("bolt://localhost:7687");
        let err = load(&config, &serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, IngestError::Config(_)));
    }
}
