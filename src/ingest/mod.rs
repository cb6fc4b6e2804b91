//! Document ingestion
//!
//! Data flow:
//! JSON document -> `validate_document` -> node upserts -> relationship
//! upserts -> `IngestResult { nodes_created, relationships_created, errors }`

pub mod document;
pub mod ingestor;
pub mod record;
pub mod result;
pub mod validate;

pub use document::read_document_file;
pub use ingestor::GraphIngestor;
pub use record::{NodeRecord, RelationshipRecord};
pub use result::{IngestResult, RecordFailure, RecordKind};
pub use validate::{parse_node, parse_relationship, validate_document, Indexed, ValidationResult};
