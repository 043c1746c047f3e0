//! Value types exchanged between settings objects and their backends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a persisted property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Boolean,
    Integer,
    Real,
    Text,
    /// Entries joined with `|` into a single text value.
    StringList,
    /// Any serde value, stored as JSON text.
    JsonBlob,
    /// Another settings object with its own scope.
    Nested,
}

impl SemanticType {
    /// Primitive kind used to read this type from a backend.
    ///
    /// Returns `None` for `Nested`, which has no storage of its own.
    pub fn stored_kind(self) -> Option<StoredKind> {
        match self {
            SemanticType::Boolean => Some(StoredKind::Boolean),
            SemanticType::Integer => Some(StoredKind::Integer),
            SemanticType::Real => Some(StoredKind::Real),
            SemanticType::Text | SemanticType::StringList | SemanticType::JsonBlob => {
                Some(StoredKind::Text)
            }
            SemanticType::Nested => None,
        }
    }
}

/// Typed value of a single property as seen by the settings object.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    StringList(Vec<String>),
    JsonBlob(serde_json::Value),
}

impl PropertyValue {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            PropertyValue::Boolean(_) => SemanticType::Boolean,
            PropertyValue::Integer(_) => SemanticType::Integer,
            PropertyValue::Real(_) => SemanticType::Real,
            PropertyValue::Text(_) => SemanticType::Text,
            PropertyValue::StringList(_) => SemanticType::StringList,
            PropertyValue::JsonBlob(_) => SemanticType::JsonBlob,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_integer(self) -> Option<i64> {
        match self {
            PropertyValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_real(self) -> Option<f64> {
        match self {
            PropertyValue::Real(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            PropertyValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_string_list(self) -> Option<Vec<String>> {
        match self {
            PropertyValue::StringList(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            PropertyValue::JsonBlob(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Boolean(value) => write!(f, "{value}"),
            PropertyValue::Integer(value) => write!(f, "{value}"),
            PropertyValue::Real(value) => write!(f, "{value}"),
            PropertyValue::Text(value) => write!(f, "{value:?}"),
            PropertyValue::StringList(values) => write!(f, "{values:?}"),
            PropertyValue::JsonBlob(value) => write!(f, "{value}"),
        }
    }
}

/// Primitive kinds a backend can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredKind {
    Boolean,
    Integer,
    Real,
    Text,
}

/// Primitive value as held by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl StoredValue {
    pub fn kind(&self) -> StoredKind {
        match self {
            StoredValue::Boolean(_) => StoredKind::Boolean,
            StoredValue::Integer(_) => StoredKind::Integer,
            StoredValue::Real(_) => StoredKind::Real,
            StoredValue::Text(_) => StoredKind::Text,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(text) => Some(text),
            _ => None,
        }
    }
}
