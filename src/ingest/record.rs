//! Validated node and relationship records
//!
//! These are what the store sees: names are non-empty, categories are
//! sanitized tokens and properties are scalars. Fields are only reachable
//! through the constructors, so no record can carry an unchecked value.

use super::document::{NODE_ENTITY_TYPE, NODE_NAME, NODE_TYPE, REL_END, REL_START, REL_TYPE};
use crate::error::RecordError;
use crate::graph::{EdgeType, Label, PropertyMap, PropertyValue};

fn non_empty(field: &str, value: String) -> Result<String, RecordError> {
    if value.trim().is_empty() {
        Err(RecordError::validation(field, "must not be empty"))
    } else {
        Ok(value)
    }
}

/// A node ready to be merged by name
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    name: String,
    node_type: Label,
    entity_type: Option<Label>,
    properties: PropertyMap,
}

impl NodeRecord {
    /// Build a record, sanitizing `node_type` into a label
    pub fn new(name: impl Into<String>, node_type: &str) -> Result<Self, RecordError> {
        let name = non_empty(NODE_NAME, name.into())?;
        let node_type = Label::sanitize(node_type)
            .map_err(|e| RecordError::validation(NODE_TYPE, e.to_string()))?;
        Ok(NodeRecord {
            name,
            node_type,
            entity_type: None,
            properties: PropertyMap::new(),
        })
    }

    /// Add a secondary category, sanitized like `node_type`
    pub fn with_entity_type(mut self, entity_type: &str) -> Result<Self, RecordError> {
        let label = Label::sanitize(entity_type)
            .map_err(|e| RecordError::validation(NODE_ENTITY_TYPE, e.to_string()))?;
        self.entity_type = Some(label);
        Ok(self)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub(crate) fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary category, from `node_type`
    pub fn node_type(&self) -> &Label {
        &self.node_type
    }

    /// Secondary category, from `Entity_Type`
    pub fn entity_type(&self) -> Option<&Label> {
        self.entity_type.as_ref()
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// All labels to apply, primary first
    pub fn labels(&self) -> Vec<Label> {
        let mut labels = vec![self.node_type.clone()];
        if let Some(extra) = &self.entity_type {
            if extra != &self.node_type {
                labels.push(extra.clone());
            }
        }
        labels
    }

    /// Attributes to write: `name` first, then the record's properties.
    /// The record's own name always wins over a `name` property.
    pub fn attributes(&self) -> PropertyMap {
        let mut attributes = PropertyMap::with_capacity(self.properties.len() + 1);
        attributes.insert(NODE_NAME.to_string(), PropertyValue::String(self.name.clone()));
        for (key, value) in &self.properties {
            if key != NODE_NAME {
                attributes.insert(key.clone(), value.clone());
            }
        }
        attributes
    }
}

/// A directed relationship between two named nodes
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipRecord {
    start: String,
    end: String,
    relationship_type: EdgeType,
    properties: PropertyMap,
}

impl RelationshipRecord {
    /// Build a record, sanitizing `relationship_type` into an edge type
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        relationship_type: &str,
    ) -> Result<Self, RecordError> {
        let start = non_empty(REL_START, start.into())?;
        let end = non_empty(REL_END, end.into())?;
        let relationship_type = EdgeType::sanitize(relationship_type)
            .map_err(|e| RecordError::validation(REL_TYPE, e.to_string()))?;
        Ok(RelationshipRecord {
            start,
            end,
            relationship_type,
            properties: PropertyMap::new(),
        })
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub(crate) fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn relationship_type(&self) -> &EdgeType {
        &self.relationship_type
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Short identifier for logs and error reports
    pub fn identifier(&self) -> String {
        format!("{}-[{}]->{}", self.start, self.relationship_type, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_record_sanitizes_type() {
        let node = NodeRecord::new("Acme", "Tech Provider/Vendor").unwrap();
        assert_eq!(node.node_type().as_str(), "Tech_Provider_Vendor");
        assert!(NodeRecord::new("Acme", "1st").is_err());
    }

    #[test]
    fn test_node_record_rejects_empty_name() {
        assert_eq!(
            NodeRecord::new("", "Company"),
            Err(RecordError::validation("name", "must not be empty"))
        );
        assert!(NodeRecord::new("   ", "Company").is_err());
    }

    #[test]
    fn test_record_tokens_cannot_carry_cypher() {
        let err = NodeRecord::new("Acme", "Company")
            .unwrap()
            .with_entity_type("X` DETACH DELETE n //")
            .unwrap_err();
        assert!(matches!(err, RecordError::Validation { ref field, .. } if field == "Entity_Type"));

        let err = RelationshipRecord::new("A", "B", "R`]->(b) DETACH DELETE a //").unwrap_err();
        assert!(matches!(err, RecordError::Validation { ref field, .. } if field == "relationship_type"));

        let err = RelationshipRecord::new("A", " ", "Owns").unwrap_err();
        assert_eq!(err, RecordError::validation("end", "must not be empty"));
    }

    #[test]
    fn test_node_labels_dedupe_secondary() {
        let node = NodeRecord::new("Acme", "Company").unwrap();
        let same = node.clone().with_entity_type("Company").unwrap();
        assert_eq!(same.labels(), vec![Label::sanitize("Company").unwrap()]);

        let other = node.with_entity_type("Organization").unwrap();
        assert_eq!(
            other.labels(),
            vec![Label::sanitize("Company").unwrap(), Label::sanitize("Organization").unwrap()]
        );
    }

    #[test]
    fn test_node_attributes_include_name() {
        let node = NodeRecord::new("Acme", "Company")
            .unwrap()
            .with_property("employees", 12i64)
            .with_property("name", "Impostor");
        let attributes = node.attributes();
        let keys: Vec<&str> = attributes.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "employees"]);
        assert_eq!(attributes["name"].as_string(), Some("Acme"));
    }

    #[test]
    fn test_relationship_identifier() {
        let rel = RelationshipRecord::new("A", "B", "Owns Stake").unwrap();
        assert_eq!(rel.identifier(), "A-[Owns_Stake]->B");
    }
}
