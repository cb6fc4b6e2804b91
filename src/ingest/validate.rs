//! Document validation
//!
//! Only the top-level shape can fail a document. Every record is checked on
//! its own; a bad record is reported with its index and excluded from the
//! operation list, and the rest of the document is still loaded.

use super::document::{
    json_type, NODES_KEY, NODE_ENTITY_TYPE, NODE_NAME, NODE_TYPE, PROPERTIES_KEY, RELATIONSHIPS_KEY,
    RESERVED_NODE_KEYS, RESERVED_RELATIONSHIP_KEYS, REL_END, REL_START, REL_TYPE,
};
use super::record::{NodeRecord, RelationshipRecord};
use super::result::{RecordFailure, RecordKind};
use crate::error::{IngestError, RecordError};
use crate::graph::{PropertyMap, PropertyValue};
use serde_json::{Map, Value};
use tracing::warn;

/// A record together with its position in the document
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed<T> {
    pub index: usize,
    pub record: T,
}

/// Outcome of validating a document
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub nodes: Vec<Indexed<NodeRecord>>,
    pub relationships: Vec<Indexed<RelationshipRecord>>,
    pub errors: Vec<RecordFailure>,
}

impl ValidationResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a parsed document.
///
/// Fails with [`IngestError::Schema`] when the document is not an object or
/// when `nodes` / `relationships` are present but not arrays. Missing keys
/// count as empty arrays.
pub fn validate_document(doc: &Value) -> Result<ValidationResult, IngestError> {
    let object = doc.as_object().ok_or_else(|| {
        IngestError::Schema(format!("document must be a JSON object, found {}", json_type(doc)))
    })?;

    let nodes = section(object, NODES_KEY)?;
    let relationships = section(object, RELATIONSHIPS_KEY)?;

    let mut result = ValidationResult::default();

    for (index, value) in nodes.iter().enumerate() {
        match parse_node(value) {
            Ok(record) => result.nodes.push(Indexed { index, record }),
            Err(cause) => {
                let failure = RecordFailure::new(RecordKind::Node, index, node_identifier(value), cause);
                warn!("Skipping {}", failure);
                result.errors.push(failure);
            }
        }
    }

    for (index, value) in relationships.iter().enumerate() {
        match parse_relationship(value) {
            Ok(record) => result.relationships.push(Indexed { index, record }),
            Err(cause) => {
                let failure = RecordFailure::new(
                    RecordKind::Relationship,
                    index,
                    relationship_identifier(value),
                    cause,
                );
                warn!("Skipping {}", failure);
                result.errors.push(failure);
            }
        }
    }

    Ok(result)
}

fn section<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], IngestError> {
    match object.get(key) {
        None => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(IngestError::Schema(format!(
            "`{}` must be an array, found {}",
            key,
            json_type(other)
        ))),
    }
}

/// Validate one node record
pub fn parse_node(value: &Value) -> Result<NodeRecord, RecordError> {
    let object = as_record(value)?;

    let name = required_string(object, NODE_NAME)?;
    let node_type = required_string(object, NODE_TYPE)?;
    let mut record = NodeRecord::new(name, &node_type)?;

    match object.get(NODE_ENTITY_TYPE) {
        None | Some(Value::Null) => {}
        Some(_) => {
            let raw = required_string(object, NODE_ENTITY_TYPE)?;
            record = record.with_entity_type(&raw)?;
        }
    }

    let properties = collect_properties(object, &RESERVED_NODE_KEYS)?;
    Ok(record.with_properties(properties))
}

/// Validate one relationship record
pub fn parse_relationship(value: &Value) -> Result<RelationshipRecord, RecordError> {
    let object = as_record(value)?;

    let start = required_string(object, REL_START)?;
    let end = required_string(object, REL_END)?;
    let relationship_type = required_string(object, REL_TYPE)?;
    let record = RelationshipRecord::new(start, end, &relationship_type)?;

    let properties = collect_properties(object, &RESERVED_RELATIONSHIP_KEYS)?;
    Ok(record.with_properties(properties))
}

fn as_record(value: &Value) -> Result<&Map<String, Value>, RecordError> {
    value.as_object().ok_or_else(|| {
        RecordError::validation("record", format!("expected an object, found {}", json_type(value)))
    })
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, RecordError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(RecordError::validation(field, "missing required field")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(RecordError::validation(field, "must not be empty"))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(RecordError::validation(
            field,
            format!("expected a string, found {}", json_type(other)),
        )),
    }
}

/// Gather attributes: entries of a nested `properties` object first, then
/// top-level keys, which win on conflict. Reserved keys are never attributes.
fn collect_properties(object: &Map<String, Value>, reserved: &[&str]) -> Result<PropertyMap, RecordError> {
    let mut properties = PropertyMap::new();

    if let Some(Value::Object(nested)) = object.get(PROPERTIES_KEY) {
        for (key, value) in nested {
            if reserved.contains(&key.as_str()) {
                continue;
            }
            insert_property(&mut properties, key, value)?;
        }
    }

    for (key, value) in object {
        if key == PROPERTIES_KEY && value.is_object() {
            continue;
        }
        if key != PROPERTIES_KEY && reserved.contains(&key.as_str()) {
            continue;
        }
        insert_property(&mut properties, key, value)?;
    }

    Ok(properties)
}

fn insert_property(properties: &mut PropertyMap, key: &str, value: &Value) -> Result<(), RecordError> {
    match PropertyValue::from_json(value) {
        Ok(Some(property)) => {
            properties.insert(key.to_string(), property);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(RecordError::validation(key, e.to_string())),
    }
}

fn node_identifier(value: &Value) -> Option<String> {
    value.get(NODE_NAME).and_then(Value::as_str).map(str::to_string)
}

fn relationship_identifier(value: &Value) -> Option<String> {
    let start = value.get(REL_START).and_then(Value::as_str);
    let end = value.get(REL_END).and_then(Value::as_str);
    match (start, end) {
        (None, None) => None,
        (start, end) => Some(format!("{}->{}", start.unwrap_or("?"), end.unwrap_or("?"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document() {
        let doc = json!({
            "nodes": [
                {"name": "A", "node_type": "Company"},
                {"name": "B", "node_type": "Company"}
            ],
            "relationships": [
                {"start": "A", "end": "B", "relationship_type": "Owns Stake"}
            ]
        });

        let result = validate_document(&doc).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.nodes.len(), 2);
        assert_eq!(result.relationships.len(), 1);
        assert_eq!(result.relationships[0].record.relationship_type().as_str(), "Owns_Stake");
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let result = validate_document(&json!({})).unwrap();
        assert!(result.nodes.is_empty());
        assert!(result.relationships.is_empty());
    }

    #[test]
    fn test_top_level_shape_errors() {
        assert!(matches!(validate_document(&json!([])), Err(IngestError::Schema(_))));
        assert!(matches!(
            validate_document(&json!({"nodes": "not-a-list"})),
            Err(IngestError::Schema(_))
        ));
        assert!(matches!(
            validate_document(&json!({"nodes": [], "relationships": {"a": 1}})),
            Err(IngestError::Schema(_))
        ));
        assert!(matches!(
            validate_document(&json!({"nodes": null})),
            Err(IngestError::Schema(_))
        ));
    }

    #[test]
    fn test_node_missing_name_reported_with_index() {
        let doc = json!({"nodes": [
            {"name": "A", "node_type": "Company"},
            {"node_type": "Company"}
        ]});

        let result = validate_document(&doc).unwrap();
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.errors.len(), 1);

        let failure = &result.errors[0];
        assert_eq!(failure.kind, RecordKind::Node);
        assert_eq!(failure.index, 1);
        assert_eq!(failure.identifier, None);
        assert_eq!(failure.cause, RecordError::validation("name", "missing required field"));
    }

    #[test]
    fn test_node_field_checks() {
        let err = parse_node(&json!({"name": "A"})).unwrap_err();
        assert_eq!(err, RecordError::validation("node_type", "missing required field"));

        let err = parse_node(&json!({"name": "  ", "node_type": "Company"})).unwrap_err();
        assert_eq!(err, RecordError::validation("name", "must not be empty"));

        let err = parse_node(&json!({"name": 5, "node_type": "Company"})).unwrap_err();
        assert_eq!(err, RecordError::validation("name", "expected a string, found number"));

        let err = parse_node(&json!({"name": "A", "node_type": "3D Printer"})).unwrap_err();
        assert!(matches!(err, RecordError::Validation { ref field, .. } if field == "node_type"));

        let err = parse_node(&json!("just a string")).unwrap_err();
        assert!(matches!(err, RecordError::Validation { ref field, .. } if field == "record"));
    }

    #[test]
    fn test_node_properties_and_entity_type() {
        let node = parse_node(&json!({
            "name": "Acme",
            "node_type": "Tech Provider/Vendor",
            "Entity_Type": "Organization",
            "country": "DE",
            "employees": 40,
            "listed": false,
            "ticker": null,
            "properties": {"country": "FR", "rating": 4.5, "name": "ignored"}
        }))
        .unwrap();

        assert_eq!(node.name(), "Acme");
        assert_eq!(node.node_type().as_str(), "Tech_Provider_Vendor");
        assert_eq!(node.entity_type().map(|l| l.as_str()), Some("Organization"));
        assert_eq!(node.properties()["country"].as_string(), Some("DE"));
        assert_eq!(node.properties()["employees"].as_integer(), Some(40));
        assert_eq!(node.properties()["listed"].as_boolean(), Some(false));
        assert_eq!(node.properties()["rating"].as_float(), Some(4.5));
        assert!(!node.properties().contains_key("ticker"));
        assert!(!node.properties().contains_key("name"));
        assert!(!node.properties().contains_key("Entity_Type"));
        assert!(!node.properties().contains_key("properties"));
    }

    #[test]
    fn test_nested_property_rejected() {
        let err = parse_node(&json!({"name": "A", "node_type": "Company", "tags": ["x"]})).unwrap_err();
        assert!(matches!(err, RecordError::Validation { ref field, .. } if field == "tags"));
    }

    #[test]
    fn test_scalar_properties_key_is_plain_attribute() {
        let node = parse_node(&json!({"name": "A", "node_type": "Company", "properties": "none"})).unwrap();
        assert_eq!(node.properties()["properties"].as_string(), Some("none"));
    }

    #[test]
    fn test_relationship_checks() {
        let rel = parse_relationship(&json!({
            "start": "A", "end": "B", "relationship_type": "Supplies/Partners", "since": 2020
        }))
        .unwrap();
        assert_eq!(rel.relationship_type().as_str(), "Supplies_Partners");
        assert_eq!(rel.properties()["since"].as_integer(), Some(2020));
        assert!(!rel.properties().contains_key("start"));

        let err = parse_relationship(&json!({"start": "A", "relationship_type": "X"})).unwrap_err();
        assert_eq!(err, RecordError::validation("end", "missing required field"));
    }

    #[test]
    fn test_relationship_failure_identifier() {
        let doc = json!({"relationships": [{"start": "A", "end": "B"}]});
        let result = validate_document(&doc).unwrap();
        assert_eq!(result.errors[0].identifier.as_deref(), Some("A->B"));
        assert_eq!(result.errors[0].kind, RecordKind::Relationship);
    }
}
