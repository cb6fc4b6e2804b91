//! Edge implementation for the in-memory property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, NodeId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A directed, typed edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Type of relationship (e.g., "Owns_Stake")
    pub edge_type: EdgeType,

    /// Properties associated with this edge
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, edge_type: EdgeType) -> Self {
        Edge {
            id,
            source,
            target,
            edge_type,
            properties: PropertyMap::new(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Merge properties: last write wins per key, other keys untouched
    pub fn merge_properties(&mut self, properties: &PropertyMap) {
        for (key, value) in properties {
            self.properties.insert(key.clone(), value.clone());
        }
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: NodeId) -> bool {
        self.source == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: NodeId) -> bool {
        self.target == node
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_edge() {
        let edge = Edge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(2), EdgeType::sanitize("Owns_Stake").unwrap());
        assert_eq!(edge.edge_type.as_str(), "Owns_Stake");
        assert!(edge.starts_from(NodeId::new(1)));
        assert!(edge.ends_at(NodeId::new(2)));
        assert!(!edge.ends_at(NodeId::new(1)));
    }

    #[test]
    fn test_edge_merge_properties() {
        let mut edge = Edge::new(EdgeId::new(2), NodeId::new(1), NodeId::new(2), EdgeType::sanitize("Supplies").unwrap());
        edge.set_property("since", 2019i64);
        edge.set_property("volume", "low");

        let mut update = PropertyMap::new();
        update.insert("volume".to_string(), "high".into());
        edge.merge_properties(&update);

        assert_eq!(edge.property_count(), 2);
        assert_eq!(edge.get_property("since").unwrap().as_integer(), Some(2019));
        assert_eq!(edge.get_property("volume").unwrap().as_string(), Some("high"));
    }
}
