// crates/content-trash-core/src/core/fields.rs
// ============================================================================
// Module: Content Trash Block Field Families
// Description: Declarative table of the typed block field columns.
// Purpose: Drive capture, restore, schema reflection, and DDL from one table.
// Dependencies: crate::core::attributes
// ============================================================================

//! ## Overview
//! Every block carries five families of numbered, nullable field columns
//! (`value1..20`, `media1..10`, `medialist1..10`, `link1..10`,
//! `linklist1..10`). The families are listed once in [`FIELD_FAMILIES`];
//! every code path that needs the column names derives them from that table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use crate::core::attributes::Scalar;

// ============================================================================
// SECTION: Families
// ============================================================================

/// Block field family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldFamily {
    /// Free-form values.
    Value,
    /// Single media references.
    Media,
    /// Media reference lists.
    MediaList,
    /// Single item links.
    Link,
    /// Item link lists.
    LinkList,
}

/// Field families in column order.
pub const FIELD_FAMILIES: [FieldFamily; 5] = [
    FieldFamily::Value,
    FieldFamily::Media,
    FieldFamily::MediaList,
    FieldFamily::Link,
    FieldFamily::LinkList,
];

impl FieldFamily {
    /// Column name prefix for the family.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Media => "media",
            Self::MediaList => "medialist",
            Self::Link => "link",
            Self::LinkList => "linklist",
        }
    }

    /// Number of numbered columns in the family.
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Self::Value => 20,
            Self::Media | Self::MediaList | Self::Link | Self::LinkList => 10,
        }
    }
}

// ============================================================================
// SECTION: Field Keys
// ============================================================================

/// One numbered field column.
///
/// # Invariants
/// - `index` is within `1..=family.count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKey {
    /// Owning family.
    family: FieldFamily,
    /// One-based index within the family.
    index: u8,
}

impl FieldKey {
    /// Creates a field key when the index is in range for the family.
    #[must_use]
    pub const fn new(family: FieldFamily, index: u8) -> Option<Self> {
        if index == 0 || index > family.count() {
            return None;
        }
        Some(Self {
            family,
            index,
        })
    }

    /// Returns the family.
    #[must_use]
    pub const fn family(self) -> FieldFamily {
        self.family
    }

    /// Returns the one-based index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.index
    }

    /// Returns the column name, e.g. `medialist3`.
    #[must_use]
    pub fn column_name(self) -> String {
        format!("{}{}", self.family.prefix(), self.index)
    }

    /// Parses a column name back into a field key.
    #[must_use]
    pub fn parse(column: &str) -> Option<Self> {
        FIELD_FAMILIES.iter().find_map(|family| {
            let suffix = column.strip_prefix(family.prefix())?;
            let index: u8 = suffix.parse().ok()?;
            if index.to_string() != suffix {
                return None;
            }
            Self::new(*family, index)
        })
    }

    /// Iterates every field key in column order.
    pub fn all() -> impl Iterator<Item = Self> {
        FIELD_FAMILIES.into_iter().flat_map(|family| {
            (1..=family.count()).map(move |index| Self {
                family,
                index,
            })
        })
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family.prefix(), self.index)
    }
}

/// Returns every field column name in column order.
#[must_use]
pub fn field_column_names() -> Vec<String> {
    FieldKey::all().map(FieldKey::column_name).collect()
}

/// Field values a block actually has set. Unset fields are absent.
pub type BlockFields = BTreeMap<FieldKey, Scalar>;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_yields_sixty_columns() {
        let names = field_column_names();
        assert_eq!(names.len(), 60);
        assert_eq!(names.first().map(String::as_str), Some("value1"));
        assert_eq!(names.last().map(String::as_str), Some("linklist10"));
    }

    #[test]
    fn parse_resolves_overlapping_prefixes() {
        let key = FieldKey::parse("medialist3");
        assert_eq!(key.map(FieldKey::family), Some(FieldFamily::MediaList));
        assert_eq!(FieldKey::parse("link10").map(FieldKey::index), Some(10));
        assert_eq!(FieldKey::parse("link11"), None);
        assert_eq!(FieldKey::parse("value01"), None);
        assert_eq!(FieldKey::parse("value0"), None);
        assert_eq!(FieldKey::parse("name"), None);
    }
}
