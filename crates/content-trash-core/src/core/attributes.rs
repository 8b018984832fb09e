// crates/content-trash-core/src/core/attributes.rs
// ============================================================================
// Module: Content Trash Attribute Maps
// Description: Open key/value maps for schema-extension columns.
// Purpose: Preserve unknown columns generically across capture and restore.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Other collaborators may add columns to the live item and block tables.
//! Their values are carried through the archive as an [`AttributeMap`] of
//! scalars and serialized as a JSON object only at the archive boundary.
//! Nothing here assumes specific keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Scalar Values
// ============================================================================

/// Scalar column value.
///
/// # Invariants
/// - Null is never represented; absent keys mean "no value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Integer(i64),
    /// Floating point value.
    Real(f64),
    /// Text value.
    Text(String),
}

impl Scalar {
    /// Builds a text scalar.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Interprets the value as an integer when it has an exact integer form.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(value) => Some(i64::from(*value)),
            Self::Integer(value) => Some(*value),
            Self::Real(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    format!("{value:.0}").parse().ok()
                } else {
                    None
                }
            }
            Self::Text(value) => value.trim().parse().ok(),
        }
    }

    /// Interprets the value as a truth flag (non-zero integers are true).
    #[must_use]
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(value) if value.trim().is_empty() => false,
            other => other.as_i64().is_some_and(|value| value != 0),
        }
    }

    /// Renders the value as display text.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::Integer(value) => value.fmt(f),
            Self::Real(value) => value.fmt(f),
            Self::Text(value) => value.fmt(f),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Open column-name to value map.
pub type AttributeMap = BTreeMap<String, Scalar>;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Attribute map serialization errors.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The map could not be encoded.
    #[error("attribute encode error: {0}")]
    Encode(String),
    /// The stored payload is not a JSON object of scalars.
    #[error("attribute decode error: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Archive Boundary
// ============================================================================

/// Encodes an attribute map as a JSON object.
///
/// # Errors
///
/// Returns [`AttributeError::Encode`] when serialization fails.
pub fn encode_attributes(attributes: &AttributeMap) -> Result<String, AttributeError> {
    serde_json::to_string(attributes).map_err(|err| AttributeError::Encode(err.to_string()))
}

/// Decodes a JSON object into an attribute map.
///
/// Null members are dropped. Nested arrays and objects are kept as their JSON
/// text so no stored data is lost.
///
/// # Errors
///
/// Returns [`AttributeError::Decode`] when the payload is not a JSON object.
pub fn decode_attributes(payload: &str) -> Result<AttributeMap, AttributeError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(AttributeMap::new());
    }
    let value: Value =
        serde_json::from_str(trimmed).map_err(|err| AttributeError::Decode(err.to_string()))?;
    let Value::Object(members) = value else {
        return Err(AttributeError::Decode("expected a JSON object".to_string()));
    };
    let mut attributes = AttributeMap::new();
    for (key, member) in members {
        let scalar = match member {
            Value::Null => continue,
            Value::Bool(flag) => Scalar::Bool(flag),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => Scalar::Integer(integer),
                None => Scalar::Real(number.as_f64().unwrap_or_default()),
            },
            Value::String(text) => Scalar::Text(text),
            nested @ (Value::Array(_) | Value::Object(_)) => Scalar::Text(nested.to_string()),
        };
        attributes.insert(key, scalar);
    }
    Ok(attributes)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;

    #[test]
    fn decode_drops_nulls_and_keeps_nested_json_as_text() {
        let map = decode_attributes(r#"{"a":1,"b":null,"c":[1,2],"d":"x","e":1.5}"#).unwrap();
        assert_eq!(map.get("a"), Some(&Scalar::Integer(1)));
        assert!(!map.contains_key("b"));
        assert_eq!(map.get("c"), Some(&Scalar::text("[1,2]")));
        assert_eq!(map.get("d"), Some(&Scalar::text("x")));
        assert_eq!(map.get("e"), Some(&Scalar::Real(1.5)));
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(decode_attributes("[1]").is_err());
        assert!(decode_attributes("").unwrap().is_empty());
    }

    #[test]
    fn scalar_integer_views() {
        assert_eq!(Scalar::text(" 42 ").as_i64(), Some(42));
        assert_eq!(Scalar::Real(3.0).as_i64(), Some(3));
        assert_eq!(Scalar::Real(3.5).as_i64(), None);
        assert!(Scalar::text("1").as_flag());
        assert!(!Scalar::text("").as_flag());
    }
}
