//! Property value types for graph nodes and edges
//!
//! Properties are a closed set of scalars so that every value has one
//! well-defined encoding in every store. Nested arrays and objects are
//! rejected when converting from JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scalar property value
///
/// Serializes as the bare JSON value (`"x"`, `42`, `1.5`, `true`), which is
/// also the shape query parameters are sent in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Why a JSON value could not become a property
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("nested arrays are not supported as property values")]
    Array,

    #[error("nested objects are not supported as property values")]
    Object,

    #[error("number {0} cannot be represented")]
    Number(String),
}

impl PropertyValue {
    /// Convert a JSON value into a property.
    ///
    /// `null` yields `Ok(None)`: the attribute is skipped rather than
    /// written, so an existing value in the store is left untouched.
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Self>, PropertyError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(PropertyValue::Boolean(*b))),
            Value::String(s) => Ok(Some(PropertyValue::String(s.clone()))),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Some(PropertyValue::Integer(i)))
                } else if let Some(f) = n.as_f64() {
                    Ok(Some(PropertyValue::Float(f)))
                } else {
                    Err(PropertyError::Number(n.to_string()))
                }
            }
            Value::Array(_) => Err(PropertyError::Array),
            Value::Object(_) => Err(PropertyError::Object),
        }
    }

    /// Encode as a JSON value (query parameters, failed-subset documents)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PropertyValue::Boolean(b) => serde_json::Value::Bool(*b),
            PropertyValue::Integer(i) => serde_json::Value::from(*i),
            PropertyValue::Float(f) => serde_json::Value::from(*f),
            PropertyValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

/// Property map for node and edge attributes, in document order
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Encode a property map as a JSON object
pub fn properties_to_json(properties: &PropertyMap) -> serde_json::Value {
    let map = properties
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}
