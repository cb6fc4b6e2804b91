//! In-memory graph storage with merge-by-key semantics
//!
//! Nodes are keyed by their `name` property and edges by the ordered
//! `(source, target, type)` triple, so merging the same record twice finds
//! the existing entity instead of creating a second one.

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyMap;
use super::types::{EdgeId, EdgeType, Label, NodeId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Result of a merge: the entity's id and whether it was newly created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome<I> {
    pub id: I,
    pub created: bool,
}

/// In-memory graph storage
///
/// Uses hash maps for O(1) lookup performance:
/// - nodes / edges: arena indexed by id - 1
/// - outgoing / incoming: adjacency lists per node
/// - name_index: name -> NodeId (natural key)
/// - label_index: Label -> NodeIds
/// - edge_type_index: EdgeType -> EdgeIds
/// - edge_keys: (source, target, type) -> EdgeId
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    name_index: HashMap<String, NodeId>,
    label_index: HashMap<Label, HashSet<NodeId>>,
    edge_type_index: HashMap<EdgeType, HashSet<EdgeId>>,
    edge_keys: HashMap<(NodeId, NodeId, EdgeType), EdgeId>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(id: u64) -> usize {
        (id - 1) as usize
    }

    /// Merge a node by name.
    ///
    /// A new node gets `labels` and `properties`. An existing node gains any
    /// missing labels and has `properties` merged onto it; keys not present
    /// in `properties` are left untouched.
    pub fn merge_node(
        &mut self,
        name: &str,
        labels: &[Label],
        properties: &PropertyMap,
    ) -> MergeOutcome<NodeId> {
        if let Some(&id) = self.name_index.get(name) {
            let node = &mut self.nodes[Self::slot(id.as_u64())];
            for label in labels {
                if node.add_label(label.clone()) {
                    self.label_index.entry(label.clone()).or_default().insert(id);
                }
            }
            node.merge_properties(properties);
            return MergeOutcome { id, created: false };
        }

        let id = NodeId::new(self.nodes.len() as u64 + 1);
        let mut node = Node::new(id, name, labels.to_vec());
        node.merge_properties(properties);

        for label in labels {
            self.label_index.entry(label.clone()).or_default().insert(id);
        }
        self.name_index.insert(name.to_string(), id);
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());

        MergeOutcome { id, created: true }
    }

    /// Look up a node by its natural key
    pub fn find_node_by_name(&self, name: &str) -> Option<&Node> {
        self.name_index.get(name).and_then(|&id| self.get_node(id))
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        if id.as_u64() == 0 {
            return None;
        }
        self.nodes.get(Self::slot(id.as_u64()))
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Merge a directed edge keyed by `(source, target, edge_type)`
    pub fn merge_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: EdgeType,
        properties: &PropertyMap,
    ) -> GraphResult<MergeOutcome<EdgeId>> {
        if !self.has_node(source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }

        let key = (source, target, edge_type);
        if let Some(&id) = self.edge_keys.get(&key) {
            self.edges[Self::slot(id.as_u64())].merge_properties(properties);
            return Ok(MergeOutcome { id, created: false });
        }

        let (source, target, edge_type) = key;
        let id = EdgeId::new(self.edges.len() as u64 + 1);
        let mut edge = Edge::new(id, source, target, edge_type.clone());
        edge.merge_properties(properties);

        self.outgoing[Self::slot(source.as_u64())].push(id);
        self.incoming[Self::slot(target.as_u64())].push(id);
        self.edge_type_index
            .entry(edge_type.clone())
            .or_default()
            .insert(id);
        self.edge_keys.insert((source, target, edge_type), id);
        self.edges.push(edge);

        Ok(MergeOutcome { id, created: true })
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        if id.as_u64() == 0 {
            return None;
        }
        self.edges.get(Self::slot(id.as_u64()))
    }

    /// Find the edge of a given type between an ordered pair
    pub fn find_edge(&self, source: NodeId, target: NodeId, edge_type: &EdgeType) -> Option<&Edge> {
        self.edge_keys
            .get(&(source, target, edge_type.clone()))
            .and_then(|&id| self.get_edge(id))
    }

    /// Get all outgoing edges from a node
    pub fn get_outgoing_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.adjacent(&self.outgoing, node_id)
    }

    /// Get all incoming edges to a node
    pub fn get_incoming_edges(&self, node_id: NodeId) -> Vec<&Edge> {
        self.adjacent(&self.incoming, node_id)
    }

    fn adjacent<'a>(&'a self, lists: &'a [Vec<EdgeId>], node_id: NodeId) -> Vec<&'a Edge> {
        if node_id.as_u64() == 0 {
            return Vec::new();
        }
        lists
            .get(Self::slot(node_id.as_u64()))
            .map(|edge_ids| edge_ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    /// Get all nodes with a specific label
    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<&Node> {
        self.label_index
            .get(label)
            .map(|node_ids| node_ids.iter().filter_map(|&id| self.get_node(id)).collect())
            .unwrap_or_default()
    }

    /// Get all edges of a specific type
    pub fn get_edges_by_type(&self, edge_type: &EdgeType) -> Vec<&Edge> {
        self.edge_type_index
            .get(edge_type)
            .map(|edge_ids| edge_ids.iter().filter_map(|&id| self.get_edge(id)).collect())
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::property::PropertyValue;

    fn props(pairs: &[(&str, i64)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), PropertyValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_merge_node_creates_then_matches() {
        let mut store = GraphStore::new();
        let company = Label::sanitize("Company").unwrap();

        let first = store.merge_node("Acme", &[company.clone()], &props(&[("employees", 10)]));
        let second = store.merge_node("Acme", &[company.clone()], &props(&[("employees", 20)]));

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.node_count(), 1);

        let node = store.find_node_by_name("Acme").unwrap();
        assert_eq!(node.get_property("employees").unwrap().as_integer(), Some(20));
        assert_eq!(node.get_property("name").unwrap().as_string(), Some("Acme"));
    }

    #[test]
    fn test_merge_node_keeps_untouched_properties() {
        let mut store = GraphStore::new();
        store.merge_node("Acme", &[], &props(&[("founded", 1999), ("employees", 10)]));
        store.merge_node("Acme", &[], &props(&[("employees", 11)]));

        let node = store.find_node_by_name("Acme").unwrap();
        assert_eq!(node.get_property("founded").unwrap().as_integer(), Some(1999));
        assert_eq!(node.get_property("employees").unwrap().as_integer(), Some(11));
    }

    #[test]
    fn test_merge_node_adds_labels_to_index() {
        let mut store = GraphStore::new();
        store.merge_node("Acme", &[Label::sanitize("Company").unwrap()], &PropertyMap::new());
        store.merge_node("Acme", &[Label::sanitize("Vendor").unwrap()], &PropertyMap::new());

        assert_eq!(store.get_nodes_by_label(&Label::sanitize("Company").unwrap()).len(), 1);
        assert_eq!(store.get_nodes_by_label(&Label::sanitize("Vendor").unwrap()).len(), 1);
        assert_eq!(store.find_node_by_name("Acme").unwrap().label_count(), 2);
    }

    #[test]
    fn test_merge_edge_is_keyed_by_ordered_pair_and_type() {
        let mut store = GraphStore::new();
        let a = store.merge_node("A", &[], &PropertyMap::new()).id;
        let b = store.merge_node("B", &[], &PropertyMap::new()).id;
        let owns = EdgeType::sanitize("Owns_Stake").unwrap();

        let first = store.merge_edge(a, b, owns.clone(), &props(&[("pct", 10)])).unwrap();
        let again = store.merge_edge(a, b, owns.clone(), &props(&[("pct", 15)])).unwrap();
        let reverse = store.merge_edge(b, a, owns.clone(), &PropertyMap::new()).unwrap();
        let other = store.merge_edge(a, b, EdgeType::sanitize("Supplies").unwrap(), &PropertyMap::new()).unwrap();

        assert!(first.created);
        assert!(!again.created);
        assert_eq!(first.id, again.id);
        assert!(reverse.created);
        assert!(other.created);
        assert_eq!(store.edge_count(), 3);

        let edge = store.find_edge(a, b, &owns).unwrap();
        assert_eq!(edge.get_property("pct").unwrap().as_integer(), Some(15));
        assert_eq!(store.get_edges_by_type(&owns).len(), 2);
        assert_eq!(store.get_outgoing_edges(a).len(), 2);
        assert_eq!(store.get_incoming_edges(a).len(), 1);
    }

    #[test]
    fn test_merge_edge_requires_endpoints() {
        let mut store = GraphStore::new();
        let a = store.merge_node("A", &[], &PropertyMap::new()).id;
        let missing = NodeId::new(99);

        assert_eq!(
            store.merge_edge(a, missing, EdgeType::sanitize("X").unwrap(), &PropertyMap::new()),
            Err(GraphError::InvalidEdgeTarget(missing))
        );
        assert_eq!(
            store.merge_edge(missing, a, EdgeType::sanitize("X").unwrap(), &PropertyMap::new()),
            Err(GraphError::InvalidEdgeSource(missing))
        );
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_lookups_on_unknown_ids() {
        let store = GraphStore::new();
        assert!(store.get_node(NodeId::new(0)).is_none());
        assert!(store.get_edge(EdgeId::new(5)).is_none());
        assert!(store.get_outgoing_edges(NodeId::new(0)).is_empty());
        assert!(store.find_node_by_name("ghost").is_none());
    }
}
