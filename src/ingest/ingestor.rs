//! GraphIngestor - validates a document and upserts it through a sink

use serde_json::Value;
use tracing::{debug, info, warn};

use super::record::{NodeRecord, RelationshipRecord};
use super::result::{IngestResult, RecordFailure, RecordKind};
use super::validate::{self, ValidationResult};
use crate::error::{Endpoint, IngestError, RecordError};
use crate::sink::{GraphSink, SinkError};

/// Loads documents into the store behind `S`.
///
/// The ingestor owns its sink. Records are processed one at a time, nodes
/// strictly before relationships, and each record's write is committed on
/// its own.
pub struct GraphIngestor<S: GraphSink> {
    sink: S,
}

impl<S: GraphSink> GraphIngestor<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Connect, load `doc` and close the sink whatever happened.
    ///
    /// Fails with [`IngestError::Connection`] if the store does not answer
    /// the initial ping, and with [`IngestError::Schema`] if the document
    /// shape is invalid. The sink is closed in both cases.
    pub async fn ingest(sink: S, doc: &Value) -> Result<IngestResult, IngestError> {
        let ingestor = Self::new(sink);

        let outcome = match ingestor.sink.ping().await {
            Ok(()) => ingestor.load_document(doc).await,
            Err(SinkError::Connection(msg)) => Err(IngestError::Connection(msg)),
            Err(e) => Err(IngestError::Connection(e.to_string())),
        };

        if let Err(e) = ingestor.sink.close().await {
            warn!("Failed to close sink: {}", e);
        }

        outcome
    }

    /// Check the document shape and every record, without touching the store
    pub fn validate_document(&self, doc: &Value) -> Result<ValidationResult, IngestError> {
        validate::validate_document(doc)
    }

    /// Merge one node by name and return the store's affected count.
    ///
    /// A merge the store reports as touching nothing fails the record.
    pub async fn upsert_node(&self, node: &NodeRecord) -> Result<u64, IngestError> {
        let affected = self.sink.merge_node(node).await?;
        if affected == 0 {
            return Err(RecordError::store_write(format!(
                "store reported no node merged for {:?}",
                node.name()
            ))
            .into());
        }
        debug!("Upserted node {:?} as {:?} ({} affected)", node.name(), node.labels(), affected);
        Ok(affected)
    }

    /// Merge one relationship between existing nodes.
    ///
    /// Both endpoints must already be in the store; a missing one fails the
    /// record with [`RecordError::DanglingReference`] and nothing is written.
    /// A merge the store reports as touching nothing fails the record too.
    pub async fn upsert_relationship(&self, rel: &RelationshipRecord) -> Result<u64, IngestError> {
        for (endpoint, name) in [(Endpoint::Start, rel.start()), (Endpoint::End, rel.end())] {
            if !self.sink.node_exists(name).await? {
                return Err(RecordError::DanglingReference {
                    endpoint,
                    name: name.to_string(),
                }
                .into());
            }
        }

        let affected = self.sink.merge_relationship(rel).await?;
        if affected == 0 {
            return Err(RecordError::store_write(format!(
                "store reported no relationship merged for {}",
                rel.identifier()
            ))
            .into());
        }
        debug!("Upserted relationship {}", rel.identifier());
        Ok(affected)
    }

    /// Validate and load a whole document.
    ///
    /// Only a schema failure or a lost connection is returned as an error.
    /// Every other failure is recorded in the result and the batch goes on.
    pub async fn load_document(&self, doc: &Value) -> Result<IngestResult, IngestError> {
        let validated = self.validate_document(doc)?;
        info!(
            "Validated document: {} nodes, {} relationships, {} rejected",
            validated.nodes.len(),
            validated.relationships.len(),
            validated.errors.len()
        );

        let mut result = IngestResult {
            errors: validated.errors,
            ..IngestResult::default()
        };

        for item in &validated.nodes {
            match self.upsert_node(&item.record).await {
                Ok(_) => result.nodes_created += 1,
                Err(IngestError::Record(cause)) => {
                    let failure =
                        RecordFailure::new(RecordKind::Node, item.index, Some(item.record.name().to_string()), cause);
                    warn!("Failed {}", failure);
                    result.errors.push(failure);
                }
                Err(fatal) => return Err(fatal),
            }
        }
        info!("Nodes done: {} upserted", result.nodes_created);

        for item in &validated.relationships {
            match self.upsert_relationship(&item.record).await {
                Ok(_) => result.relationships_created += 1,
                Err(IngestError::Record(cause)) => {
                    let failure = RecordFailure::new(
                        RecordKind::Relationship,
                        item.index,
                        Some(item.record.identifier()),
                        cause,
                    );
                    warn!("Failed {}", failure);
                    result.errors.push(failure);
                }
                Err(fatal) => return Err(fatal),
            }
        }
        info!("Relationships done: {} upserted", result.relationships_created);

        Ok(result)
    }
}
