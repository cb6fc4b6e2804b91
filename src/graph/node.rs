//! Node implementation for the in-memory property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node in the property graph
///
/// Every node carries a `name` property, which is its natural key in the
/// store's name index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Set of labels for this node
    pub labels: HashSet<Label>,

    /// Properties associated with this node
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Node {
    /// Create a new node with a name and labels
    pub fn new(id: NodeId, name: impl Into<String>, labels: Vec<Label>) -> Self {
        let now = Utc::now().timestamp_millis();
        let mut properties = PropertyMap::new();
        properties.insert("name".to_string(), PropertyValue::String(name.into()));

        Node {
            id,
            labels: labels.into_iter().collect(),
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// The node's natural key
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_string())
    }

    /// Add a label to this node, returning true if it was new
    pub fn add_label(&mut self, label: Label) -> bool {
        let added = self.labels.insert(label);
        if added {
            self.update_timestamp();
        }
        added
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        let old = self.properties.insert(key.into(), value.into());
        self.update_timestamp();
        old
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
        self.update_timestamp();
    }

    fn update_timestamp(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}
