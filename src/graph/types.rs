//! Core type definitions for the graph store

use super::token::{sanitize_token, TokenError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        EdgeId(id)
    }
}

/// Node label (e.g., "Company", "Tech_Provider_Vendor")
///
/// Only obtainable through [`Label::sanitize`], including when
/// deserializing, so every label is a safe store identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Sanitize a raw category string into a label token.
    pub fn sanitize(raw: &str) -> Result<Self, TokenError> {
        sanitize_token(raw).map(Label)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Label {
    type Error = TokenError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Label::sanitize(&raw)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

/// Edge type (relationship type, e.g., "OWNS_STAKE", "Owns_Stake")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeType(String);

impl EdgeType {
    /// Sanitize a raw relationship type string into an edge type token.
    pub fn sanitize(raw: &str) -> Result<Self, TokenError> {
        sanitize_token(raw).map(EdgeType)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EdgeType {
    type Error = TokenError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        EdgeType::sanitize(&raw)
    }
}

impl From<EdgeType> for String {
    fn from(edge_type: EdgeType) -> Self {
        edge_type.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "NodeId(42)");

        let id2: NodeId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new(99);
        assert_eq!(id.as_u64(), 99);
        assert_eq!(format!("{}", id), "EdgeId(99)");
    }

    #[test]
    fn test_label_sanitize() {
        let label = Label::sanitize("Tech Provider/Vendor").unwrap();
        assert_eq!(label.as_str(), "Tech_Provider_Vendor");
        assert_eq!(label, Label::sanitize("Tech_Provider_Vendor").unwrap());
        assert!(Label::sanitize("9Lives").is_err());
    }

    #[test]
    fn test_tokens_deserialize_through_sanitize() {
        let label: Label = serde_json::from_str("\"Tech Provider/Vendor\"").unwrap();
        assert_eq!(label.as_str(), "Tech_Provider_Vendor");
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"Tech_Provider_Vendor\"");

        assert!(serde_json::from_str::<Label>("\"9 bad`label\"").is_err());
        assert!(serde_json::from_str::<EdgeType>("\"R`]->(b) DETACH DELETE a //\"").is_err());
    }

    #[test]
    fn test_edge_type_sanitize() {
        let edge_type = EdgeType::sanitize("Owns Stake").unwrap();
        assert_eq!(edge_type.as_str(), "Owns_Stake");
        assert_eq!(format!("{}", edge_type), "Owns_Stake");
    }

    #[test]
    fn test_id_ordering() {
        assert!(NodeId::new(1) < NodeId::new(2));
        assert!(EdgeId::new(3) > EdgeId::new(2));
    }
}
