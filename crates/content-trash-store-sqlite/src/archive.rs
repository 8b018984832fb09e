// crates/content-trash-store-sqlite/src/archive.rs
// ============================================================================
// Module: SQLite Archive Store
// Description: ArchiveStore over the trash_items, trash_blocks, and
//              trash_block_meta tables.
// Purpose: Persist trashed content durably and delete it atomically.
// Dependencies: content-trash-core, rusqlite, serde_json
// ============================================================================

//! ## Overview
//! Archive rows mirror the live tables: one item row, one row per block with
//! the 60 fixed field columns, and an optional meta row per block holding
//! extension columns as JSON. Every delete (single entry, purge, empty)
//! removes meta, blocks, and items in one transaction. Restore claims are an
//! optimistic `restore_claimed_at` stamp on the item row.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use content_trash_core::ArchiveBlockId;
use content_trash_core::ArchiveError;
use content_trash_core::ArchiveItemId;
use content_trash_core::ArchiveStore;
use content_trash_core::AttributeMap;
use content_trash_core::BlockFields;
use content_trash_core::BlockSnapshot;
use content_trash_core::ClaimOutcome;
use content_trash_core::FieldKey;
use content_trash_core::FixedAttributes;
use content_trash_core::ItemId;
use content_trash_core::ItemSnapshot;
use content_trash_core::LocaleId;
use content_trash_core::PublishStatus;
use content_trash_core::Revision;
use content_trash_core::Timestamp;
use content_trash_core::TrashedBlock;
use content_trash_core::TrashedBlockMeta;
use content_trash_core::TrashedItem;
use content_trash_core::TrashedItemSummary;
use content_trash_core::decode_attributes;
use content_trash_core::encode_attributes;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::store::SqliteDatabase;
use crate::store::SqliteStoreError;
use crate::value::from_sql_value;
use crate::value::quote_identifier;
use crate::value::to_sql_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Archive schema version.
const SCHEMA_VERSION: i64 = 1;
/// Item columns in select order.
const ITEM_COLUMNS: &str = "id, original_id, parent_id, name, category_name, priority, \
                            category_priority, status, is_container, deleted_at, attributes, \
                            dynamic_attributes";
/// Fixed block columns in select order (fields follow).
const BLOCK_COLUMNS: [&str; 9] = [
    "id",
    "trash_item_id",
    "original_item_id",
    "locale_id",
    "block_type_id",
    "module_id",
    "priority",
    "revision",
    "status",
];
/// Deletes the meta rows of the items selected by the trailing condition.
const DELETE_META: &str = "DELETE FROM trash_block_meta WHERE trash_block_id IN (SELECT \
                           trash_blocks.id FROM trash_blocks JOIN trash_items ON \
                           trash_items.id = trash_blocks.trash_item_id WHERE ";
/// Deletes the block rows of the items selected by the trailing condition.
const DELETE_BLOCKS: &str = "DELETE FROM trash_blocks WHERE trash_item_id IN (SELECT id FROM \
                             trash_items WHERE ";

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed archive store.
///
/// # Invariants
/// - The archive schema is created or validated on construction.
/// - `original_id` is unique across archive items.
#[derive(Debug, Clone)]
pub struct SqliteArchiveStore {
    /// Shared database handle.
    database: SqliteDatabase,
}

impl SqliteArchiveStore {
    /// Opens the archive tables on `database`, creating them when missing.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the schema cannot be created or has
    /// an unsupported version.
    pub fn new(database: SqliteDatabase) -> Result<Self, SqliteStoreError> {
        {
            let mut guard = database.lock()?;
            initialize_schema(&mut guard)?;
        }
        Ok(Self {
            database,
        })
    }

    /// Returns the shared database handle.
    #[must_use]
    pub const fn database(&self) -> &SqliteDatabase {
        &self.database
    }

    /// Deletes the rows matching `condition` (over `trash_items`) in one
    /// transaction and returns the number of items removed.
    fn delete_where(&self, condition: &str, args: &[Value]) -> Result<u64, SqliteStoreError> {
        let mut guard = self.database.lock()?;
        let tx = guard.transaction()?;
        let removed = delete_items_in_tx(&tx, condition, args)?;
        tx.commit()?;
        Ok(removed)
    }
}

impl ArchiveStore for SqliteArchiveStore {
    fn find_by_original_id(
        &self,
        original_id: ItemId,
    ) -> Result<Option<ArchiveItemId>, ArchiveError> {
        let guard = self.database.lock()?;
        let id: Option<i64> = guard
            .query_row(
                "SELECT id FROM trash_items WHERE original_id = ?1",
                params![original_id.get()],
                |row| row.get(0),
            )
            .optional()
            .map_err(SqliteStoreError::from)?;
        Ok(id.map(ArchiveItemId::new))
    }

    fn insert_item(&self, item: &ItemSnapshot) -> Result<ArchiveItemId, ArchiveError> {
        let attributes = serde_json::to_string(&item.attributes)
            .map_err(|err| ArchiveError::Invalid(err.to_string()))?;
        let dynamic = if item.dynamic_attributes.is_empty() {
            None
        } else {
            Some(
                encode_attributes(&item.dynamic_attributes)
                    .map_err(|err| ArchiveError::Invalid(err.to_string()))?,
            )
        };
        let guard = self.database.lock()?;
        guard
            .execute(
                "INSERT INTO trash_items (original_id, parent_id, name, category_name, priority, \
                 category_priority, status, is_container, deleted_at, attributes, \
                 dynamic_attributes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    item.original_id.get(),
                    item.parent_id.get(),
                    item.name,
                    item.category_name,
                    item.priority,
                    item.category_priority,
                    item.status.code(),
                    i64::from(item.is_container),
                    item.deleted_at.unix_seconds(),
                    attributes,
                    dynamic,
                ],
            )
            .map_err(SqliteStoreError::from)?;
        Ok(ArchiveItemId::new(guard.last_insert_rowid()))
    }

    fn insert_block(
        &self,
        archive_item: ArchiveItemId,
        block: &BlockSnapshot,
    ) -> Result<ArchiveBlockId, ArchiveError> {
        let mut columns: Vec<String> =
            BLOCK_COLUMNS[1 ..].iter().map(|column| (*column).to_string()).collect();
        let mut values = vec![
            Value::Integer(archive_item.get()),
            Value::Integer(block.original_item_id.get()),
            Value::Integer(block.locale.get()),
            Value::Integer(block.block_type_id),
            Value::Integer(block.module_id),
            Value::Integer(block.priority),
            Value::Integer(block.revision.get()),
            Value::Integer(block.status.code()),
        ];
        for (key, value) in &block.fields {
            columns.push(key.column_name());
            values.push(to_sql_value(value));
        }
        let placeholders: Vec<String> =
            (1 ..= values.len()).map(|index| format!("?{index}")).collect();
        let sql = format!(
            "INSERT INTO trash_blocks ({}) VALUES ({})",
            columns.iter().map(|column| quote_identifier(column)).collect::<Vec<_>>().join(", "),
            placeholders.join(", ")
        );
        let guard = self.database.lock()?;
        guard.execute(&sql, params_from_iter(values)).map_err(SqliteStoreError::from)?;
        Ok(ArchiveBlockId::new(guard.last_insert_rowid()))
    }

    fn insert_block_meta(&self, meta: &TrashedBlockMeta) -> Result<(), ArchiveError> {
        let payload = encode_attributes(&meta.meta_data)
            .map_err(|err| ArchiveError::Invalid(err.to_string()))?;
        let guard = self.database.lock()?;
        guard
            .execute(
                "INSERT INTO trash_block_meta (trash_block_id, meta_data) VALUES (?1, ?2)",
                params![meta.archive_block_id.get(), payload],
            )
            .map_err(SqliteStoreError::from)?;
        Ok(())
    }

    fn load_item(&self, id: ArchiveItemId) -> Result<Option<TrashedItem>, ArchiveError> {
        let guard = self.database.lock()?;
        let raw = guard
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM trash_items WHERE id = ?1"),
                params![id.get()],
                read_item_row,
            )
            .optional()
            .map_err(SqliteStoreError::from)?;
        drop(guard);
        Ok(raw.map(RawItem::decode).transpose()?)
    }

    fn list_items(&self) -> Result<Vec<TrashedItemSummary>, ArchiveError> {
        let guard = self.database.lock()?;
        let mut stmt = guard
            .prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM trash_items ORDER BY deleted_at DESC, id DESC"
            ))
            .map_err(SqliteStoreError::from)?;
        let raw_items = stmt
            .query_map([], read_item_row)
            .map_err(SqliteStoreError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(SqliteStoreError::from)?;
        drop(stmt);
        let mut stmt = guard
            .prepare(
                "SELECT trash_item_id, locale_id, COUNT(1) FROM trash_blocks GROUP BY \
                 trash_item_id, locale_id",
            )
            .map_err(SqliteStoreError::from)?;
        let groups = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?))
            })
            .map_err(SqliteStoreError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(SqliteStoreError::from)?;
        drop(stmt);
        drop(guard);

        let mut per_item: BTreeMap<i64, (u64, BTreeSet<LocaleId>)> = BTreeMap::new();
        for (item_id, locale_id, count) in groups {
            let entry = per_item.entry(item_id).or_default();
            entry.0 += u64::try_from(count).unwrap_or_default();
            entry.1.insert(LocaleId::new(locale_id));
        }
        raw_items
            .into_iter()
            .map(|raw| {
                let trashed = raw.decode()?;
                let (block_count, locales) =
                    per_item.remove(&trashed.archive_id.get()).unwrap_or_default();
                Ok(TrashedItemSummary {
                    trashed,
                    block_count,
                    locales: locales.into_iter().collect(),
                })
            })
            .collect()
    }

    fn load_blocks(&self, id: ArchiveItemId) -> Result<Vec<TrashedBlock>, ArchiveError> {
        let field_keys: Vec<FieldKey> = FieldKey::all().collect();
        let columns: Vec<String> = BLOCK_COLUMNS
            .iter()
            .map(|column| format!("trash_blocks.{column}"))
            .chain(field_keys.iter().map(|key| format!("trash_blocks.{}", key.column_name())))
            .collect();
        let sql = format!(
            "SELECT {}, trash_block_meta.meta_data FROM trash_blocks LEFT JOIN trash_block_meta \
             ON trash_block_meta.trash_block_id = trash_blocks.id WHERE \
             trash_blocks.trash_item_id = ?1 ORDER BY trash_blocks.locale_id, \
             trash_blocks.revision, trash_blocks.priority, trash_blocks.id",
            columns.join(", ")
        );
        let guard = self.database.lock()?;
        let mut stmt = guard.prepare(&sql).map_err(SqliteStoreError::from)?;
        let rows = stmt
            .query_map(params![id.get()], |row| read_block_row(row, &field_keys))
            .map_err(SqliteStoreError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(SqliteStoreError::from)?;
        drop(stmt);
        drop(guard);
        rows.into_iter()
            .map(|(block, meta)| {
                let meta = meta
                    .map(|payload| decode_attributes(&payload))
                    .transpose()
                    .map_err(|err| ArchiveError::Corrupt(err.to_string()))?;
                Ok(TrashedBlock {
                    meta,
                    ..block
                })
            })
            .collect()
    }

    fn delete_item(&self, id: ArchiveItemId) -> Result<bool, ArchiveError> {
        let removed = self.delete_where("trash_items.id = ?1", &[Value::Integer(id.get())])?;
        Ok(removed > 0)
    }

    fn delete_all(&self) -> Result<u64, ArchiveError> {
        Ok(self.delete_where("1 = 1", &[])?)
    }

    fn purge_deleted_before(&self, cutoff: Timestamp) -> Result<u64, ArchiveError> {
        Ok(self.delete_where(
            "trash_items.deleted_at < ?1",
            &[Value::Integer(cutoff.unix_seconds())],
        )?)
    }

    fn claim_for_restore(
        &self,
        id: ArchiveItemId,
        now: Timestamp,
        stale_before: Timestamp,
    ) -> Result<ClaimOutcome, ArchiveError> {
        let mut guard = self.database.lock()?;
        let tx = guard.transaction().map_err(SqliteStoreError::from)?;
        let claimed = tx
            .execute(
                "UPDATE trash_items SET restore_claimed_at = ?1 WHERE id = ?2 AND \
                 (restore_claimed_at IS NULL OR restore_claimed_at < ?3)",
                params![now.unix_seconds(), id.get(), stale_before.unix_seconds()],
            )
            .map_err(SqliteStoreError::from)?;
        let outcome = if claimed > 0 {
            ClaimOutcome::Claimed
        } else {
            let exists: Option<i64> = tx
                .query_row("SELECT 1 FROM trash_items WHERE id = ?1", params![id.get()], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(SqliteStoreError::from)?;
            if exists.is_some() { ClaimOutcome::InProgress } else { ClaimOutcome::NotFound }
        };
        tx.commit().map_err(SqliteStoreError::from)?;
        Ok(outcome)
    }

    fn release_claim(&self, id: ArchiveItemId) -> Result<(), ArchiveError> {
        let guard = self.database.lock()?;
        guard
            .execute(
                "UPDATE trash_items SET restore_claimed_at = NULL WHERE id = ?1",
                params![id.get()],
            )
            .map_err(SqliteStoreError::from)?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Archive item row before JSON decoding.
#[derive(Debug)]
struct RawItem {
    /// Archive id.
    id: i64,
    /// Original live id.
    original_id: i64,
    /// Parent id.
    parent_id: i64,
    /// Name.
    name: String,
    /// Category name.
    category_name: String,
    /// Leaf ordering key.
    priority: i64,
    /// Container ordering key.
    category_priority: i64,
    /// Status code.
    status: i64,
    /// Container flag.
    is_container: i64,
    /// Deletion time (unix seconds).
    deleted_at: i64,
    /// Fixed attributes JSON.
    attributes: String,
    /// Dynamic attributes JSON.
    dynamic_attributes: Option<String>,
}

impl RawItem {
    /// Decodes the JSON columns into a trashed item.
    fn decode(self) -> Result<TrashedItem, ArchiveError> {
        let attributes: FixedAttributes = serde_json::from_str(&self.attributes).map_err(|err| {
            ArchiveError::Corrupt(format!("attributes of archive item {}: {err}", self.id))
        })?;
        let dynamic_attributes = match self.dynamic_attributes.as_deref() {
            Some(payload) => decode_attributes(payload).map_err(|err| {
                ArchiveError::Corrupt(format!("dynamic attributes of archive item {}: {err}", self.id))
            })?,
            None => AttributeMap::new(),
        };
        Ok(TrashedItem {
            archive_id: ArchiveItemId::new(self.id),
            item: ItemSnapshot {
                original_id: ItemId::new(self.original_id),
                parent_id: ItemId::new(self.parent_id),
                name: self.name,
                category_name: self.category_name,
                priority: self.priority,
                category_priority: self.category_priority,
                status: PublishStatus::from_code(self.status),
                is_container: self.is_container != 0,
                deleted_at: Timestamp::from_unix_seconds(self.deleted_at),
                attributes,
                dynamic_attributes,
            },
        })
    }
}

/// Reads an item row selected with [`ITEM_COLUMNS`].
fn read_item_row(row: &Row<'_>) -> rusqlite::Result<RawItem> {
    Ok(RawItem {
        id: row.get(0)?,
        original_id: row.get(1)?,
        parent_id: row.get(2)?,
        name: row.get(3)?,
        category_name: row.get(4)?,
        priority: row.get(5)?,
        category_priority: row.get(6)?,
        status: row.get(7)?,
        is_container: row.get(8)?,
        deleted_at: row.get(9)?,
        attributes: row.get(10)?,
        dynamic_attributes: row.get(11)?,
    })
}

/// Reads a block row with its fields and raw meta payload.
fn read_block_row(
    row: &Row<'_>,
    field_keys: &[FieldKey],
) -> rusqlite::Result<(TrashedBlock, Option<String>)> {
    let offset = BLOCK_COLUMNS.len();
    let mut fields = BlockFields::new();
    for (index, key) in field_keys.iter().enumerate() {
        if let Some(value) = from_sql_value(row.get_ref(offset + index)?) {
            fields.insert(*key, value);
        }
    }
    let block = TrashedBlock {
        archive_block_id: ArchiveBlockId::new(row.get(0)?),
        archive_item_id: ArchiveItemId::new(row.get(1)?),
        block: BlockSnapshot {
            original_item_id: ItemId::new(row.get(2)?),
            locale: LocaleId::new(row.get(3)?),
            block_type_id: row.get(4)?,
            module_id: row.get(5)?,
            priority: row.get(6)?,
            revision: Revision::new(row.get(7)?),
            status: PublishStatus::from_code(row.get(8)?),
            fields,
        },
        meta: None,
    };
    let meta: Option<String> = row.get(offset + field_keys.len())?;
    Ok((block, meta))
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Deletes items matching `condition` with their blocks and meta.
fn delete_items_in_tx(
    tx: &Transaction<'_>,
    condition: &str,
    args: &[Value],
) -> Result<u64, SqliteStoreError> {
    tx.execute(&format!("{DELETE_META}{condition})"), params_from_iter(args.iter()))?;
    tx.execute(&format!("{DELETE_BLOCKS}{condition})"), params_from_iter(args.iter()))?;
    let removed =
        tx.execute(&format!("DELETE FROM trash_items WHERE {condition}"), params_from_iter(args.iter()))?;
    Ok(u64::try_from(removed).unwrap_or(u64::MAX))
}

/// Initializes the archive schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            let fields: Vec<String> = FieldKey::all().map(FieldKey::column_name).collect();
            tx.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS trash_items (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    original_id INTEGER NOT NULL UNIQUE,
                    parent_id INTEGER NOT NULL DEFAULT 0,
                    name TEXT NOT NULL DEFAULT '',
                    category_name TEXT NOT NULL DEFAULT '',
                    priority INTEGER NOT NULL DEFAULT 0,
                    category_priority INTEGER NOT NULL DEFAULT 0,
                    status INTEGER NOT NULL DEFAULT 1,
                    is_container INTEGER NOT NULL DEFAULT 0,
                    deleted_at INTEGER NOT NULL,
                    attributes TEXT NOT NULL,
                    dynamic_attributes TEXT,
                    restore_claimed_at INTEGER
                );
                CREATE INDEX IF NOT EXISTS idx_trash_items_deleted_at
                    ON trash_items (deleted_at);
                CREATE TABLE IF NOT EXISTS trash_blocks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    trash_item_id INTEGER NOT NULL REFERENCES trash_items (id),
                    original_item_id INTEGER NOT NULL,
                    locale_id INTEGER NOT NULL,
                    block_type_id INTEGER NOT NULL DEFAULT 1,
                    module_id INTEGER NOT NULL DEFAULT 0,
                    priority INTEGER NOT NULL DEFAULT 0,
                    revision INTEGER NOT NULL DEFAULT 0,
                    status INTEGER NOT NULL DEFAULT 1,
                    {}
                );
                CREATE INDEX IF NOT EXISTS idx_trash_blocks_item
                    ON trash_blocks (trash_item_id);
                CREATE TABLE IF NOT EXISTS trash_block_meta (
                    trash_block_id INTEGER PRIMARY KEY REFERENCES trash_blocks (id),
                    meta_data TEXT NOT NULL
                );",
                fields.join(",\n                    ")
            ))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit()?;
    Ok(())
}

/// Drops every archive table. Live content tables are left untouched.
///
/// # Errors
///
/// Returns [`SqliteStoreError`] when the tables cannot be dropped.
pub fn drop_archive_schema(database: &SqliteDatabase) -> Result<(), SqliteStoreError> {
    let mut guard = database.lock()?;
    let tx = guard.transaction()?;
    tx.execute_batch(
        "DROP TABLE IF EXISTS trash_block_meta;
         DROP TABLE IF EXISTS trash_blocks;
         DROP TABLE IF EXISTS trash_items;
         DROP TABLE IF EXISTS store_meta;",
    )?;
    tx.commit()?;
    Ok(())
}
