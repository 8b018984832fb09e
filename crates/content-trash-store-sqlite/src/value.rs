// crates/content-trash-store-sqlite/src/value.rs
// ============================================================================
// Module: SQLite Value Mapping
// Description: Conversions between core scalars and SQLite values.
// Purpose: Move open attribute maps across the SQL boundary.
// Dependencies: content-trash-core, rusqlite
// ============================================================================

//! ## Overview
//! SQLite has no boolean storage class, so booleans are written as 0/1.
//! Blobs are read back as lossy UTF-8 text; NULL columns are dropped from
//! attribute maps.

// ============================================================================
// SECTION: Imports
// ============================================================================

use content_trash_core::AttributeMap;
use content_trash_core::Scalar;
use rusqlite::Row;
use rusqlite::types::Value;
use rusqlite::types::ValueRef;

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Converts a scalar into an owned `SQLite` value.
pub(crate) fn to_sql_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Bool(flag) => Value::Integer(i64::from(*flag)),
        Scalar::Integer(value) => Value::Integer(*value),
        Scalar::Real(value) => Value::Real(*value),
        Scalar::Text(value) => Value::Text(value.clone()),
    }
}

/// Converts a borrowed `SQLite` value into a scalar (`None` for NULL).
pub(crate) fn from_sql_value(value: ValueRef<'_>) -> Option<Scalar> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(integer) => Some(Scalar::Integer(integer)),
        ValueRef::Real(real) => Some(Scalar::Real(real)),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(Scalar::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
    }
}

/// Reads every non-NULL column of `row` into an attribute map.
pub(crate) fn row_to_attributes(row: &Row<'_>, names: &[String]) -> rusqlite::Result<AttributeMap> {
    let mut attributes = AttributeMap::new();
    for (index, name) in names.iter().enumerate() {
        if let Some(scalar) = from_sql_value(row.get_ref(index)?) {
            attributes.insert(name.clone(), scalar);
        }
    }
    Ok(attributes)
}

/// Quotes an SQL identifier.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_identifier_escapes_embedded_quotes() {
        assert_eq!(quote_identifier("plain"), "\"plain\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn booleans_are_stored_as_integers() {
        assert_eq!(to_sql_value(&Scalar::Bool(true)), Value::Integer(1));
        assert_eq!(from_sql_value(ValueRef::Null), None);
        assert_eq!(from_sql_value(ValueRef::Text(b"x")), Some(Scalar::text("x")));
    }
}
