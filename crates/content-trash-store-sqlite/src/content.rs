// crates/content-trash-store-sqlite/src/content.rs
// ============================================================================
// Module: SQLite Content Repository
// Description: ContentRepository over the host's live content tables.
// Purpose: Read rows for capture and write rows back on restore.
// Dependencies: content-trash-core, rusqlite
// ============================================================================

//! ## Overview
//! The host owns `content_items`, `content_blocks`, and `content_locales`.
//! Columns are discovered at runtime with `pragma_table_info` so host
//! extensions flow through capture and restore without code changes. Rows
//! cross the boundary as open attribute maps; column names are always
//! quoted because archived meta keys are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use content_trash_core::AttributeMap;
use content_trash_core::BlockId;
use content_trash_core::ContentRepository;
use content_trash_core::FieldKey;
use content_trash_core::ItemId;
use content_trash_core::LocaleId;
use content_trash_core::OrderingSpace;
use content_trash_core::RepositoryError;
use content_trash_core::Revision;
use content_trash_core::TableKind;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::store::SqliteDatabase;
use crate::store::SqliteStoreError;
use crate::value::quote_identifier;
use crate::value::row_to_attributes;
use crate::value::to_sql_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Host item table.
pub const ITEM_TABLE: &str = "content_items";
/// Host block table.
pub const BLOCK_TABLE: &str = "content_blocks";
/// Host locale table.
pub const LOCALE_TABLE: &str = "content_locales";

// ============================================================================
// SECTION: Repository
// ============================================================================

/// `SQLite`-backed live content repository.
#[derive(Debug, Clone)]
pub struct SqliteContentRepository {
    /// Shared database handle.
    database: SqliteDatabase,
    /// Whether the host keeps a working revision.
    versioning: bool,
}

impl SqliteContentRepository {
    /// Creates a repository over the host tables of `database`.
    #[must_use]
    pub const fn new(database: SqliteDatabase, versioning: bool) -> Self {
        Self {
            database,
            versioning,
        }
    }

    /// Registers a host locale.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the locale cannot be written.
    pub fn add_locale(
        &self,
        locale: LocaleId,
        name: &str,
        priority: i64,
    ) -> Result<(), SqliteStoreError> {
        let guard = self.database.lock()?;
        guard.execute(
            &format!("INSERT INTO {LOCALE_TABLE} (id, name, priority) VALUES (?1, ?2, ?3)"),
            params![locale.get(), name, priority],
        )?;
        Ok(())
    }

    /// Returns the display name of every host locale.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the locale table cannot be read.
    pub fn locale_names(&self) -> Result<BTreeMap<LocaleId, String>, SqliteStoreError> {
        let guard = self.database.lock()?;
        let mut stmt = guard.prepare(&format!("SELECT id, name FROM {LOCALE_TABLE}"))?;
        let names = stmt
            .query_map([], |row| Ok((LocaleId::new(row.get(0)?), row.get::<_, String>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(names)
    }

    /// Selects rows of `table` and returns them as attribute maps.
    fn select_rows(
        &self,
        table: &str,
        tail: &str,
        args: &[Value],
    ) -> Result<Vec<AttributeMap>, SqliteStoreError> {
        let guard = self.database.lock()?;
        let mut stmt = guard.prepare(&format!("SELECT * FROM {table} {tail}"))?;
        let names: Vec<String> =
            stmt.column_names().into_iter().map(str::to_string).collect();
        let rows = stmt
            .query_map(params_from_iter(args.iter()), |row| row_to_attributes(row, &names))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Inserts `row` into `table` and returns the new row id.
    fn insert_row(&self, table: &str, row: &AttributeMap) -> Result<i64, SqliteStoreError> {
        if row.is_empty() {
            return Err(SqliteStoreError::Invalid(format!("empty row for {table}")));
        }
        let columns: Vec<String> = row.keys().map(|column| quote_identifier(column)).collect();
        let placeholders: Vec<String> =
            (1 ..= row.len()).map(|index| format!("?{index}")).collect();
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        let guard = self.database.lock()?;
        guard.execute(&sql, params_from_iter(row.values().map(to_sql_value)))?;
        Ok(guard.last_insert_rowid())
    }

    /// Updates `values` on the rows of `table` whose `keys` columns match.
    fn update_rows(
        &self,
        table: &str,
        values: &AttributeMap,
        keys: &[(&str, i64)],
    ) -> Result<usize, SqliteStoreError> {
        if values.is_empty() {
            return Ok(0);
        }
        let assignments: Vec<String> = values
            .keys()
            .enumerate()
            .map(|(index, column)| format!("{} = ?{}", quote_identifier(column), index + 1))
            .collect();
        let conditions: Vec<String> = keys
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{column} = ?{}", values.len() + index + 1))
            .collect();
        let mut args: Vec<Value> = values.values().map(to_sql_value).collect();
        args.extend(keys.iter().map(|(_, key)| Value::Integer(*key)));
        let sql = format!(
            "UPDATE {table} SET {} WHERE {}",
            assignments.join(", "),
            conditions.join(" AND ")
        );
        let guard = self.database.lock()?;
        Ok(guard.execute(&sql, params_from_iter(args))?)
    }
}

impl ContentRepository for SqliteContentRepository {
    fn locales(&self) -> Result<Vec<LocaleId>, RepositoryError> {
        let guard = self.database.lock()?;
        let mut stmt = guard
            .prepare(&format!("SELECT id FROM {LOCALE_TABLE} ORDER BY priority, id"))
            .map_err(SqliteStoreError::from)?;
        let locales = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(SqliteStoreError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(SqliteStoreError::from)?;
        Ok(locales.into_iter().map(LocaleId::new).collect())
    }

    fn versioning_enabled(&self) -> bool {
        self.versioning
    }

    fn table_columns(&self, table: TableKind) -> Result<Vec<String>, RepositoryError> {
        let name = match table {
            TableKind::Item => ITEM_TABLE,
            TableKind::Block => BLOCK_TABLE,
        };
        let guard = self.database.lock()?;
        let mut stmt = guard
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(SqliteStoreError::from)?;
        let columns = stmt
            .query_map(params![name], |row| row.get::<_, String>(0))
            .map_err(SqliteStoreError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(SqliteStoreError::from)?;
        Ok(columns)
    }

    fn load_item(
        &self,
        id: ItemId,
        locale: LocaleId,
    ) -> Result<Option<AttributeMap>, RepositoryError> {
        let rows = self.select_rows(
            ITEM_TABLE,
            "WHERE id = ?1 AND locale_id = ?2 LIMIT 1",
            &[Value::Integer(id.get()), Value::Integer(locale.get())],
        )?;
        Ok(rows.into_iter().next())
    }

    fn load_item_any_locale(&self, id: ItemId) -> Result<Option<AttributeMap>, RepositoryError> {
        let rows = self.select_rows(
            ITEM_TABLE,
            "WHERE id = ?1 ORDER BY locale_id LIMIT 1",
            &[Value::Integer(id.get())],
        )?;
        Ok(rows.into_iter().next())
    }

    fn load_blocks(
        &self,
        item: ItemId,
        locale: LocaleId,
        revision: Revision,
    ) -> Result<Vec<AttributeMap>, RepositoryError> {
        Ok(self.select_rows(
            BLOCK_TABLE,
            "WHERE item_id = ?1 AND locale_id = ?2 AND revision = ?3 ORDER BY priority, id",
            &[
                Value::Integer(item.get()),
                Value::Integer(locale.get()),
                Value::Integer(revision.get()),
            ],
        )?)
    }

    fn item_exists(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let guard = self.database.lock()?;
        let found: Option<i64> = guard
            .query_row(
                &format!("SELECT 1 FROM {ITEM_TABLE} WHERE id = ?1 LIMIT 1"),
                params![id.get()],
                |row| row.get(0),
            )
            .optional()
            .map_err(SqliteStoreError::from)?;
        Ok(found.is_some())
    }

    fn max_item_id(&self) -> Result<ItemId, RepositoryError> {
        let guard = self.database.lock()?;
        let max: i64 = guard
            .query_row(&format!("SELECT COALESCE(MAX(id), 0) FROM {ITEM_TABLE}"), [], |row| {
                row.get(0)
            })
            .map_err(SqliteStoreError::from)?;
        Ok(ItemId::new(max))
    }

    fn sibling_priorities(
        &self,
        parent: ItemId,
        space: OrderingSpace,
    ) -> Result<BTreeSet<i64>, RepositoryError> {
        let sql = match space {
            OrderingSpace::Containers => format!(
                "SELECT DISTINCT category_priority FROM {ITEM_TABLE} WHERE parent_id = ?1 AND \
                 is_container != 0 AND category_priority IS NOT NULL"
            ),
            OrderingSpace::Leaves => format!(
                "SELECT DISTINCT priority FROM {ITEM_TABLE} WHERE parent_id = ?1 AND \
                 is_container = 0 AND priority IS NOT NULL"
            ),
        };
        let guard = self.database.lock()?;
        let mut stmt = guard.prepare(&sql).map_err(SqliteStoreError::from)?;
        let taken = stmt
            .query_map(params![parent.get()], |row| row.get::<_, i64>(0))
            .map_err(SqliteStoreError::from)?
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(SqliteStoreError::from)?;
        Ok(taken)
    }

    fn insert_item(&self, row: &AttributeMap) -> Result<(), RepositoryError> {
        self.insert_row(ITEM_TABLE, row)?;
        Ok(())
    }

    fn update_item(
        &self,
        id: ItemId,
        locale: LocaleId,
        values: &AttributeMap,
    ) -> Result<(), RepositoryError> {
        let updated = self.update_rows(
            ITEM_TABLE,
            values,
            &[("id", id.get()), ("locale_id", locale.get())],
        )?;
        if updated == 0 && !values.is_empty() {
            return Err(RepositoryError::Invalid(format!("item {id} locale {locale} missing")));
        }
        Ok(())
    }

    fn remove_item(&self, id: ItemId) -> Result<(), RepositoryError> {
        let guard = self.database.lock()?;
        guard
            .execute(&format!("DELETE FROM {ITEM_TABLE} WHERE id = ?1"), params![id.get()])
            .map_err(SqliteStoreError::from)?;
        Ok(())
    }

    fn insert_block(&self, row: &AttributeMap) -> Result<BlockId, RepositoryError> {
        Ok(BlockId::new(self.insert_row(BLOCK_TABLE, row)?))
    }

    fn update_block(&self, id: BlockId, values: &AttributeMap) -> Result<(), RepositoryError> {
        let updated = self.update_rows(BLOCK_TABLE, values, &[("id", id.get())])?;
        if updated == 0 && !values.is_empty() {
            return Err(RepositoryError::Invalid(format!("block {id} missing")));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Host Schema
// ============================================================================

/// Creates the host content tables when they do not exist.
///
/// Hosts normally own these tables; this is used for standalone installs and
/// tests.
///
/// # Errors
///
/// Returns [`SqliteStoreError`] when the tables cannot be created.
pub fn install_host_schema(database: &SqliteDatabase) -> Result<(), SqliteStoreError> {
    let mut guard = database.lock()?;
    create_host_tables(&mut guard)
}

/// Creates the host tables in one transaction.
fn create_host_tables(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let fields: Vec<String> = FieldKey::all().map(FieldKey::column_name).collect();
    let tx = connection.transaction()?;
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {LOCALE_TABLE} (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            priority INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS {ITEM_TABLE} (
            id INTEGER NOT NULL,
            locale_id INTEGER NOT NULL,
            parent_id INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL DEFAULT '',
            category_name TEXT NOT NULL DEFAULT '',
            category_priority INTEGER NOT NULL DEFAULT 0,
            is_container INTEGER NOT NULL DEFAULT 0,
            priority INTEGER NOT NULL DEFAULT 0,
            path TEXT NOT NULL DEFAULT '',
            status INTEGER NOT NULL DEFAULT 1,
            template_id INTEGER NOT NULL DEFAULT 0,
            revision INTEGER NOT NULL DEFAULT 0,
            create_date TEXT,
            create_user TEXT,
            update_date TEXT,
            update_user TEXT,
            PRIMARY KEY (id, locale_id)
        );
        CREATE INDEX IF NOT EXISTS idx_content_items_parent
            ON {ITEM_TABLE} (parent_id);
        CREATE TABLE IF NOT EXISTS {BLOCK_TABLE} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL,
            locale_id INTEGER NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            block_type_id INTEGER NOT NULL DEFAULT 1,
            module_id INTEGER NOT NULL DEFAULT 0,
            priority INTEGER NOT NULL DEFAULT 0,
            status INTEGER NOT NULL DEFAULT 1,
            create_date TEXT,
            create_user TEXT,
            update_date TEXT,
            update_user TEXT,
            {}
        );
        CREATE INDEX IF NOT EXISTS idx_content_blocks_item
            ON {BLOCK_TABLE} (item_id, locale_id, revision);",
        fields.join(",\n            ")
    ))?;
    tx.commit()?;
    Ok(())
}
