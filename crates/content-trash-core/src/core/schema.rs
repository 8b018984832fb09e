// crates/content-trash-core/src/core/schema.rs
// ============================================================================
// Module: Content Trash Schema Reflector
// Description: Splits live table columns into fixed and extension columns.
// Purpose: Let capture and restore carry unknown columns generically.
// Dependencies: crate::core::fields, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! The live item and block tables may gain columns owned by other
//! collaborators. [`extension_columns`] computes `live - fixed` for a table
//! kind as a pure function. [`SchemaContext`] owns the per-operation cache of
//! reflected tables; one context lives for exactly one capture or restore.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::btree_map::Entry;
use std::fmt;

use thiserror::Error;

use crate::core::fields::FieldKey;
use crate::interfaces::ContentRepository;

// ============================================================================
// SECTION: Column Names
// ============================================================================

/// Host column names used by the core data model.
pub mod columns {
    /// Item id (blocks: live block id).
    pub const ID: &str = "id";
    /// Parent container id.
    pub const PARENT_ID: &str = "parent_id";
    /// Item name.
    pub const NAME: &str = "name";
    /// Container name.
    pub const CATEGORY_NAME: &str = "category_name";
    /// Ordering key among container siblings.
    pub const CATEGORY_PRIORITY: &str = "category_priority";
    /// Container flag.
    pub const IS_CONTAINER: &str = "is_container";
    /// Ordering key.
    pub const PRIORITY: &str = "priority";
    /// Hierarchy path.
    pub const PATH: &str = "path";
    /// Publication status code.
    pub const STATUS: &str = "status";
    /// Creation date.
    pub const CREATE_DATE: &str = "create_date";
    /// Update date.
    pub const UPDATE_DATE: &str = "update_date";
    /// Template id.
    pub const TEMPLATE_ID: &str = "template_id";
    /// Locale id.
    pub const LOCALE_ID: &str = "locale_id";
    /// Creating user.
    pub const CREATE_USER: &str = "create_user";
    /// Updating user.
    pub const UPDATE_USER: &str = "update_user";
    /// Owning item id on block rows.
    pub const ITEM_ID: &str = "item_id";
    /// Block type id.
    pub const BLOCK_TYPE_ID: &str = "block_type_id";
    /// Module id.
    pub const MODULE_ID: &str = "module_id";
    /// Revision.
    pub const REVISION: &str = "revision";
}

/// Fixed core columns shared by both tables.
pub const CORE_COLUMNS: [&str; 19] = [
    columns::ID,
    columns::PARENT_ID,
    columns::NAME,
    columns::CATEGORY_NAME,
    columns::CATEGORY_PRIORITY,
    columns::IS_CONTAINER,
    columns::PRIORITY,
    columns::PATH,
    columns::STATUS,
    columns::CREATE_DATE,
    columns::UPDATE_DATE,
    columns::TEMPLATE_ID,
    columns::LOCALE_ID,
    columns::CREATE_USER,
    columns::UPDATE_USER,
    columns::ITEM_ID,
    columns::BLOCK_TYPE_ID,
    columns::MODULE_ID,
    columns::REVISION,
];

// ============================================================================
// SECTION: Table Kinds
// ============================================================================

/// Live table reflected by the schema reflector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKind {
    /// Live item table.
    Item,
    /// Live block table.
    Block,
}

impl TableKind {
    /// Stable label for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns true when `column` belongs to the fixed data model of `kind`.
#[must_use]
pub fn is_fixed_column(kind: TableKind, column: &str) -> bool {
    if CORE_COLUMNS.contains(&column) {
        return true;
    }
    match kind {
        TableKind::Item => false,
        TableKind::Block => FieldKey::parse(column).is_some(),
    }
}

/// Computes the extension columns of a live table.
#[must_use]
pub fn extension_columns(kind: TableKind, live_columns: &[String]) -> BTreeSet<String> {
    live_columns.iter().filter(|column| !is_fixed_column(kind, column)).cloned().collect()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema reflection errors.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// Table introspection failed.
    #[error("schema unavailable for {table} table: {message}")]
    Unavailable {
        /// Table that could not be reflected.
        table: TableKind,
        /// Underlying failure.
        message: String,
    },
}

// ============================================================================
// SECTION: Reflected Tables
// ============================================================================

/// Reflected live table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table kind.
    kind: TableKind,
    /// Every live column.
    live: BTreeSet<String>,
    /// Live columns outside the fixed data model.
    extensions: BTreeSet<String>,
}

impl TableSchema {
    /// Builds a reflected table from its live columns.
    #[must_use]
    pub fn from_columns(kind: TableKind, live_columns: &[String]) -> Self {
        Self {
            kind,
            live: live_columns.iter().cloned().collect(),
            extensions: extension_columns(kind, live_columns),
        }
    }

    /// Returns the table kind.
    #[must_use]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    /// Returns true when the live table has `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.live.contains(column)
    }

    /// Returns the extension columns.
    #[must_use]
    pub const fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    /// Returns true when `column` is a live extension column that may be
    /// written back on restore.
    #[must_use]
    pub fn is_writable_extension(&self, column: &str) -> bool {
        self.has_column(column) && !is_fixed_column(self.kind, column)
    }
}

/// Per-operation cache of reflected tables.
///
/// # Invariants
/// - Scoped to one capture or restore; schema is assumed stable meanwhile.
#[derive(Debug, Default)]
pub struct SchemaContext {
    /// Reflected tables keyed by kind.
    tables: BTreeMap<TableKind, TableSchema>,
}

impl SchemaContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the reflected table, introspecting it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Unavailable`] when introspection fails.
    pub fn table<R>(&mut self, repository: &R, kind: TableKind) -> Result<&TableSchema, SchemaError>
    where
        R: ContentRepository + ?Sized,
    {
        match self.tables.entry(kind) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let live = repository.table_columns(kind).map_err(|err| {
                    SchemaError::Unavailable {
                        table: kind,
                        message: err.to_string(),
                    }
                })?;
                if live.is_empty() {
                    return Err(SchemaError::Unavailable {
                        table: kind,
                        message: "table has no columns".to_string(),
                    });
                }
                Ok(&*entry.insert(TableSchema::from_columns(kind, &live)))
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
