//! MemorySink - in-process graph store
//!
//! Wraps a `GraphStore` directly, no network needed.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{GraphSink, SinkError, SinkResult};
use crate::graph::GraphStore;
use crate::ingest::{NodeRecord, RelationshipRecord};

/// In-process sink over a shared `GraphStore`.
///
/// Clones share the store and the closed flag.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    store: Arc<RwLock<GraphStore>>,
    closed: Arc<AtomicBool>,
}

impl MemorySink {
    /// Create a sink over a fresh empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink wrapping an existing store
    pub fn with_store(store: Arc<RwLock<GraphStore>>) -> Self {
        Self {
            store,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The underlying store, for direct inspection
    pub fn store(&self) -> &Arc<RwLock<GraphStore>> {
        &self.store
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> SinkResult<()> {
        if self.is_closed() {
            Err(SinkError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GraphSink for MemorySink {
    async fn ping(&self) -> SinkResult<()> {
        self.ensure_open()
    }

    async fn merge_node(&self, node: &NodeRecord) -> SinkResult<u64> {
        self.ensure_open()?;
        let mut store = self.store.write().await;
        store.merge_node(node.name(), &node.labels(), &node.attributes());
        Ok(1)
    }

    async fn node_exists(&self, name: &str) -> SinkResult<bool> {
        self.ensure_open()?;
        let store = self.store.read().await;
        Ok(store.find_node_by_name(name).is_some())
    }

    async fn merge_relationship(&self, rel: &RelationshipRecord) -> SinkResult<u64> {
        self.ensure_open()?;
        let mut store = self.store.write().await;

        let source = store.find_node_by_name(rel.start()).map(|n| n.id);
        let target = store.find_node_by_name(rel.end()).map(|n| n.id);
        let (source, target) = match (source, target) {
            (Some(s), Some(t)) => (s, t),
            _ => return Ok(0),
        };

        store
            .merge_edge(source, target, rel.relationship_type().clone(), rel.properties())
            .map_err(|e| SinkError::Write(e.to_string()))?;
        Ok(1)
    }

    async fn close(&self) -> SinkResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
