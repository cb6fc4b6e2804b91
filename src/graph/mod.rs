//! In-memory labeled property graph
//!
//! - Nodes with labels and scalar properties, keyed by `name`
//! - Directed, typed edges keyed by `(source, target, type)`
//! - Label and relationship type tokens restricted to identifier-safe names

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod token;
pub mod types;

pub use edge::Edge;
pub use node::Node;
pub use property::{properties_to_json, PropertyError, PropertyMap, PropertyValue};
pub use store::{GraphError, GraphResult, GraphStore, MergeOutcome};
pub use token::{sanitize_token, TokenError};
pub use types::{EdgeId, EdgeType, Label, NodeId};
