// crates/content-trash-core/src/runtime/memory.rs
// ============================================================================
// Module: Content Trash In-Memory Collaborators
// Description: In-memory archive store, content repository, and caches.
// Purpose: Provide deterministic collaborators for tests and local demos.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! These implementations keep all state in mutex-guarded maps. The content
//! repository supports failure injection (schema reflection, item inserts
//! per locale, block inserts per module) so partial-failure paths can be
//! exercised without a database. They are not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::attributes::AttributeMap;
use crate::core::attributes::Scalar;
use crate::core::fields::field_column_names;
use crate::core::identifiers::ArchiveBlockId;
use crate::core::identifiers::ArchiveItemId;
use crate::core::identifiers::BlockId;
use crate::core::identifiers::ItemId;
use crate::core::identifiers::LocaleId;
use crate::core::identifiers::Revision;
use crate::core::records::BlockSnapshot;
use crate::core::records::ItemSnapshot;
use crate::core::records::TrashedBlock;
use crate::core::records::TrashedBlockMeta;
use crate::core::records::TrashedItem;
use crate::core::records::TrashedItemSummary;
use crate::core::schema::TableKind;
use crate::core::schema::columns;
use crate::core::time::Timestamp;
use crate::interfaces::ArchiveError;
use crate::interfaces::ArchiveStore;
use crate::interfaces::CacheError;
use crate::interfaces::ClaimOutcome;
use crate::interfaces::ContentCache;
use crate::interfaces::ContentRepository;
use crate::interfaces::OrderingSpace;
use crate::interfaces::RepositoryError;

// ============================================================================
// SECTION: In-Memory Archive Store
// ============================================================================

/// Archive item row with its restore claim.
#[derive(Debug, Clone)]
struct ArchivedItemRow {
    /// Archived item.
    trashed: TrashedItem,
    /// Restore claim time, if claimed.
    claimed_at: Option<Timestamp>,
}

/// Archive tables.
#[derive(Debug, Default)]
struct ArchiveTables {
    /// Last issued item id.
    last_item_id: i64,
    /// Last issued block id.
    last_block_id: i64,
    /// Items keyed by archive id.
    items: BTreeMap<i64, ArchivedItemRow>,
    /// Blocks keyed by archive block id.
    blocks: BTreeMap<i64, (ArchiveItemId, BlockSnapshot)>,
    /// Block meta keyed by archive block id.
    meta: BTreeMap<i64, AttributeMap>,
    /// Module ids whose block inserts fail.
    failing_modules: BTreeSet<i64>,
    /// Whether delete transactions fail before touching any row.
    failing_deletes: bool,
}

impl ArchiveTables {
    /// Fails when delete transactions are set to fail.
    fn check_delete(&self) -> Result<(), ArchiveError> {
        if self.failing_deletes {
            return Err(ArchiveError::Store("delete transaction rolled back".to_string()));
        }
        Ok(())
    }

    /// Removes the given items with their blocks and meta.
    fn remove_items(&mut self, ids: &[i64]) {
        let block_ids: Vec<i64> = self
            .blocks
            .iter()
            .filter(|(_, (owner, _))| ids.contains(&owner.get()))
            .map(|(id, _)| *id)
            .collect();
        for block_id in &block_ids {
            self.meta.remove(block_id);
            self.blocks.remove(block_id);
        }
        for id in ids {
            self.items.remove(id);
        }
    }
}

/// In-memory archive store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryArchiveStore {
    /// Archive tables protected by a mutex.
    tables: Arc<Mutex<ArchiveTables>>,
}

impl InMemoryArchiveStore {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes block inserts fail for blocks rendered by `module_id`.
    pub fn fail_blocks_for_module(&self, module_id: i64) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.failing_modules.insert(module_id);
        }
    }

    /// Makes every delete, empty, and purge transaction fail and roll back.
    pub fn fail_deletes(&self) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.failing_deletes = true;
        }
    }

    /// Returns the number of archived items, blocks, and meta rows.
    #[must_use]
    pub fn row_counts(&self) -> (usize, usize, usize) {
        self.tables
            .lock()
            .map(|tables| (tables.items.len(), tables.blocks.len(), tables.meta.len()))
            .unwrap_or_default()
    }

    /// Overrides the deletion time of an archived item.
    pub fn set_deleted_at(&self, id: ArchiveItemId, deleted_at: Timestamp) {
        if let Ok(mut tables) = self.tables.lock()
            && let Some(row) = tables.items.get_mut(&id.get())
        {
            row.trashed.item.deleted_at = deleted_at;
        }
    }

    /// Locks the archive tables.
    fn lock(&self) -> Result<MutexGuard<'_, ArchiveTables>, ArchiveError> {
        self.tables.lock().map_err(|_| ArchiveError::Store("archive mutex poisoned".to_string()))
    }
}

impl ArchiveStore for InMemoryArchiveStore {
    fn find_by_original_id(
        &self,
        original_id: ItemId,
    ) -> Result<Option<ArchiveItemId>, ArchiveError> {
        let tables = self.lock()?;
        Ok(tables
            .items
            .values()
            .find(|row| row.trashed.item.original_id == original_id)
            .map(|row| row.trashed.archive_id))
    }

    fn insert_item(&self, item: &ItemSnapshot) -> Result<ArchiveItemId, ArchiveError> {
        let mut tables = self.lock()?;
        if tables.items.values().any(|row| row.trashed.item.original_id == item.original_id) {
            return Err(ArchiveError::Conflict(format!(
                "item {} is already archived",
                item.original_id
            )));
        }
        tables.last_item_id += 1;
        let archive_id = ArchiveItemId::new(tables.last_item_id);
        tables.items.insert(
            archive_id.get(),
            ArchivedItemRow {
                trashed: TrashedItem {
                    archive_id,
                    item: item.clone(),
                },
                claimed_at: None,
            },
        );
        Ok(archive_id)
    }

    fn insert_block(
        &self,
        archive_item: ArchiveItemId,
        block: &BlockSnapshot,
    ) -> Result<ArchiveBlockId, ArchiveError> {
        let mut tables = self.lock()?;
        if tables.failing_modules.contains(&block.module_id) {
            return Err(ArchiveError::Store(format!(
                "injected failure for module {}",
                block.module_id
            )));
        }
        if !tables.items.contains_key(&archive_item.get()) {
            return Err(ArchiveError::Invalid(format!("archive item {archive_item} missing")));
        }
        tables.last_block_id += 1;
        let id = tables.last_block_id;
        tables.blocks.insert(id, (archive_item, block.clone()));
        Ok(ArchiveBlockId::new(id))
    }

    fn insert_block_meta(&self, meta: &TrashedBlockMeta) -> Result<(), ArchiveError> {
        let mut tables = self.lock()?;
        let id = meta.archive_block_id.get();
        if !tables.blocks.contains_key(&id) {
            return Err(ArchiveError::Invalid(format!("archive block {id} missing")));
        }
        tables.meta.insert(id, meta.meta_data.clone());
        Ok(())
    }

    fn load_item(&self, id: ArchiveItemId) -> Result<Option<TrashedItem>, ArchiveError> {
        let tables = self.lock()?;
        Ok(tables.items.get(&id.get()).map(|row| row.trashed.clone()))
    }

    fn list_items(&self) -> Result<Vec<TrashedItemSummary>, ArchiveError> {
        let tables = self.lock()?;
        let mut summaries: Vec<TrashedItemSummary> = tables
            .items
            .values()
            .map(|row| {
                let owned = tables
                    .blocks
                    .values()
                    .filter(|(owner, _)| *owner == row.trashed.archive_id);
                let mut block_count = 0_u64;
                let mut locales = BTreeSet::new();
                for (_, block) in owned {
                    block_count += 1;
                    locales.insert(block.locale);
                }
                TrashedItemSummary {
                    trashed: row.trashed.clone(),
                    block_count,
                    locales: locales.into_iter().collect(),
                }
            })
            .collect();
        summaries.sort_by(|left, right| {
            right
                .trashed
                .item
                .deleted_at
                .cmp(&left.trashed.item.deleted_at)
                .then(right.trashed.archive_id.cmp(&left.trashed.archive_id))
        });
        Ok(summaries)
    }

    fn load_blocks(&self, id: ArchiveItemId) -> Result<Vec<TrashedBlock>, ArchiveError> {
        let tables = self.lock()?;
        let mut blocks: Vec<TrashedBlock> = tables
            .blocks
            .iter()
            .filter(|(_, (owner, _))| *owner == id)
            .map(|(block_id, (owner, block))| TrashedBlock {
                archive_block_id: ArchiveBlockId::new(*block_id),
                archive_item_id: *owner,
                block: block.clone(),
                meta: tables.meta.get(block_id).cloned(),
            })
            .collect();
        blocks.sort_by_key(|trashed| {
            (
                trashed.block.locale,
                trashed.block.revision,
                trashed.block.priority,
                trashed.archive_block_id,
            )
        });
        Ok(blocks)
    }

    fn delete_item(&self, id: ArchiveItemId) -> Result<bool, ArchiveError> {
        let mut tables = self.lock()?;
        tables.check_delete()?;
        if !tables.items.contains_key(&id.get()) {
            return Ok(false);
        }
        tables.remove_items(&[id.get()]);
        Ok(true)
    }

    fn delete_all(&self) -> Result<u64, ArchiveError> {
        let mut tables = self.lock()?;
        tables.check_delete()?;
        let count = tables.items.len() as u64;
        tables.items.clear();
        tables.blocks.clear();
        tables.meta.clear();
        Ok(count)
    }

    fn purge_deleted_before(&self, cutoff: Timestamp) -> Result<u64, ArchiveError> {
        let mut tables = self.lock()?;
        tables.check_delete()?;
        let expired: Vec<i64> = tables
            .items
            .iter()
            .filter(|(_, row)| row.trashed.item.deleted_at < cutoff)
            .map(|(id, _)| *id)
            .collect();
        tables.remove_items(&expired);
        Ok(expired.len() as u64)
    }

    fn claim_for_restore(
        &self,
        id: ArchiveItemId,
        now: Timestamp,
        stale_before: Timestamp,
    ) -> Result<ClaimOutcome, ArchiveError> {
        let mut tables = self.lock()?;
        let Some(row) = tables.items.get_mut(&id.get()) else {
            return Ok(ClaimOutcome::NotFound);
        };
        match row.claimed_at {
            Some(claimed_at) if claimed_at >= stale_before => Ok(ClaimOutcome::InProgress),
            _ => {
                row.claimed_at = Some(now);
                Ok(ClaimOutcome::Claimed)
            }
        }
    }

    fn release_claim(&self, id: ArchiveItemId) -> Result<(), ArchiveError> {
        let mut tables = self.lock()?;
        if let Some(row) = tables.items.get_mut(&id.get()) {
            row.claimed_at = None;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: In-Memory Content Repository
// ============================================================================

/// Live content tables.
#[derive(Debug, Default)]
struct ContentTables {
    /// Host locales in display order.
    locales: Vec<LocaleId>,
    /// Item table columns.
    item_columns: Vec<String>,
    /// Block table columns.
    block_columns: Vec<String>,
    /// Item rows keyed by (id, locale).
    items: BTreeMap<(i64, i64), AttributeMap>,
    /// Block rows keyed by block id.
    blocks: BTreeMap<i64, AttributeMap>,
    /// Last issued block id.
    last_block_id: i64,
    /// Tables whose reflection fails.
    unreadable_tables: BTreeSet<TableKind>,
    /// Locales whose item inserts fail.
    failing_item_locales: BTreeSet<LocaleId>,
    /// Module ids whose block inserts fail.
    failing_block_modules: BTreeSet<i64>,
}

impl ContentTables {
    /// Rejects rows carrying columns the table does not have.
    fn check_columns(columns: &[String], row: &AttributeMap) -> Result<(), RepositoryError> {
        match row.keys().find(|key| !columns.contains(key)) {
            Some(unknown) => Err(RepositoryError::Invalid(format!("unknown column {unknown}"))),
            None => Ok(()),
        }
    }
}

/// Returns the default live item columns.
fn default_item_columns() -> Vec<String> {
    [
        columns::ID,
        columns::LOCALE_ID,
        columns::PARENT_ID,
        columns::NAME,
        columns::CATEGORY_NAME,
        columns::CATEGORY_PRIORITY,
        columns::IS_CONTAINER,
        columns::PRIORITY,
        columns::PATH,
        columns::STATUS,
        columns::TEMPLATE_ID,
        columns::REVISION,
        columns::CREATE_DATE,
        columns::CREATE_USER,
        columns::UPDATE_DATE,
        columns::UPDATE_USER,
    ]
    .iter()
    .map(|column| (*column).to_string())
    .collect()
}

/// Returns the default live block columns.
fn default_block_columns() -> Vec<String> {
    let mut names: Vec<String> = [
        columns::ID,
        columns::ITEM_ID,
        columns::LOCALE_ID,
        columns::REVISION,
        columns::BLOCK_TYPE_ID,
        columns::MODULE_ID,
        columns::PRIORITY,
        columns::STATUS,
        columns::CREATE_DATE,
        columns::CREATE_USER,
        columns::UPDATE_DATE,
        columns::UPDATE_USER,
    ]
    .iter()
    .map(|column| (*column).to_string())
    .collect();
    names.extend(field_column_names());
    names
}

/// Reads an integer column from a row.
fn row_integer(row: &AttributeMap, column: &str) -> Option<i64> {
    row.get(column).and_then(Scalar::as_i64)
}

/// In-memory live content repository for tests and examples.
#[derive(Debug, Clone)]
pub struct InMemoryContentRepository {
    /// Content tables protected by a mutex.
    tables: Arc<Mutex<ContentTables>>,
    /// Whether the working revision is captured.
    versioning: bool,
}

impl InMemoryContentRepository {
    /// Creates a repository with the given locales and the default columns.
    #[must_use]
    pub fn new(locales: &[LocaleId]) -> Self {
        let tables = ContentTables {
            locales: locales.to_vec(),
            item_columns: default_item_columns(),
            block_columns: default_block_columns(),
            ..ContentTables::default()
        };
        Self {
            tables: Arc::new(Mutex::new(tables)),
            versioning: false,
        }
    }

    /// Enables or disables the working revision.
    #[must_use]
    pub const fn with_versioning(mut self, enabled: bool) -> Self {
        self.versioning = enabled;
        self
    }

    /// Adds an extension column to a table.
    pub fn add_column(&self, table: TableKind, column: &str) {
        if let Ok(mut tables) = self.tables.lock() {
            let columns = match table {
                TableKind::Item => &mut tables.item_columns,
                TableKind::Block => &mut tables.block_columns,
            };
            if !columns.iter().any(|existing| existing == column) {
                columns.push(column.to_string());
            }
        }
    }

    /// Drops a column from a table along with its stored values.
    pub fn drop_column(&self, table: TableKind, column: &str) {
        if let Ok(mut tables) = self.tables.lock() {
            let tables = &mut *tables;
            match table {
                TableKind::Item => {
                    tables.item_columns.retain(|existing| existing != column);
                    for row in tables.items.values_mut() {
                        row.remove(column);
                    }
                }
                TableKind::Block => {
                    tables.block_columns.retain(|existing| existing != column);
                    for row in tables.blocks.values_mut() {
                        row.remove(column);
                    }
                }
            }
        }
    }

    /// Makes reflection of `table` fail.
    pub fn make_unreadable(&self, table: TableKind) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.unreadable_tables.insert(table);
        }
    }

    /// Makes item inserts fail for `locale`.
    pub fn fail_item_inserts_for(&self, locale: LocaleId) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.failing_item_locales.insert(locale);
        }
    }

    /// Makes block inserts fail for blocks rendered by `module_id`.
    pub fn fail_block_inserts_for_module(&self, module_id: i64) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.failing_block_modules.insert(module_id);
        }
    }

    /// Stores an item row as-is (keyed by its `id` and `locale_id`).
    pub fn put_item(&self, row: AttributeMap) {
        let key = (
            row_integer(&row, columns::ID).unwrap_or_default(),
            row_integer(&row, columns::LOCALE_ID).unwrap_or_default(),
        );
        if let Ok(mut tables) = self.tables.lock() {
            tables.items.insert(key, row);
        }
    }

    /// Stores a block row as-is and returns its id.
    pub fn put_block(&self, mut row: AttributeMap) -> BlockId {
        let Ok(mut tables) = self.tables.lock() else {
            return BlockId::new(0);
        };
        tables.last_block_id += 1;
        let id = tables.last_block_id;
        row.insert(columns::ID.to_string(), Scalar::Integer(id));
        tables.blocks.insert(id, row);
        BlockId::new(id)
    }

    /// Deletes every row of an item, as the host does after capture.
    pub fn delete_item(&self, id: ItemId) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.items.retain(|(item_id, _), _| *item_id != id.get());
            tables
                .blocks
                .retain(|_, row| row_integer(row, columns::ITEM_ID) != Some(id.get()));
        }
    }

    /// Returns the stored row of an item in one locale.
    #[must_use]
    pub fn item(&self, id: ItemId, locale: LocaleId) -> Option<AttributeMap> {
        self.tables.lock().ok().and_then(|tables| tables.items.get(&(id.get(), locale.get())).cloned())
    }

    /// Returns the number of stored item rows.
    #[must_use]
    pub fn item_row_count(&self) -> usize {
        self.tables.lock().map(|tables| tables.items.len()).unwrap_or_default()
    }

    /// Locks the content tables.
    fn lock(&self) -> Result<MutexGuard<'_, ContentTables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Store("content mutex poisoned".to_string()))
    }
}

impl ContentRepository for InMemoryContentRepository {
    fn locales(&self) -> Result<Vec<LocaleId>, RepositoryError> {
        Ok(self.lock()?.locales.clone())
    }

    fn versioning_enabled(&self) -> bool {
        self.versioning
    }

    fn table_columns(&self, table: TableKind) -> Result<Vec<String>, RepositoryError> {
        let tables = self.lock()?;
        if tables.unreadable_tables.contains(&table) {
            return Err(RepositoryError::Store(format!("{table} table is unreadable")));
        }
        Ok(match table {
            TableKind::Item => tables.item_columns.clone(),
            TableKind::Block => tables.block_columns.clone(),
        })
    }

    fn load_item(
        &self,
        id: ItemId,
        locale: LocaleId,
    ) -> Result<Option<AttributeMap>, RepositoryError> {
        Ok(self.lock()?.items.get(&(id.get(), locale.get())).cloned())
    }

    fn load_item_any_locale(&self, id: ItemId) -> Result<Option<AttributeMap>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .items
            .range((id.get(), i64::MIN)..=(id.get(), i64::MAX))
            .next()
            .map(|(_, row)| row.clone()))
    }

    fn load_blocks(
        &self,
        item: ItemId,
        locale: LocaleId,
        revision: Revision,
    ) -> Result<Vec<AttributeMap>, RepositoryError> {
        let tables = self.lock()?;
        let mut rows: Vec<AttributeMap> = tables
            .blocks
            .values()
            .filter(|row| {
                row_integer(row, columns::ITEM_ID) == Some(item.get())
                    && row_integer(row, columns::LOCALE_ID) == Some(locale.get())
                    && row_integer(row, columns::REVISION).unwrap_or_default() == revision.get()
            })
            .cloned()
            .collect();
        rows.sort_by_key(|row| {
            (
                row_integer(row, columns::PRIORITY).unwrap_or_default(),
                row_integer(row, columns::ID).unwrap_or_default(),
            )
        });
        Ok(rows)
    }

    fn item_exists(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.items.range((id.get(), i64::MIN)..=(id.get(), i64::MAX)).next().is_some())
    }

    fn max_item_id(&self) -> Result<ItemId, RepositoryError> {
        let tables = self.lock()?;
        Ok(ItemId::new(tables.items.keys().map(|(id, _)| *id).max().unwrap_or_default()))
    }

    fn sibling_priorities(
        &self,
        parent: ItemId,
        space: OrderingSpace,
    ) -> Result<BTreeSet<i64>, RepositoryError> {
        let tables = self.lock()?;
        let (want_container, column) = match space {
            OrderingSpace::Containers => (true, columns::CATEGORY_PRIORITY),
            OrderingSpace::Leaves => (false, columns::PRIORITY),
        };
        Ok(tables
            .items
            .values()
            .filter(|row| row_integer(row, columns::PARENT_ID).unwrap_or_default() == parent.get())
            .filter(|row| {
                row.get(columns::IS_CONTAINER).is_some_and(Scalar::as_flag) == want_container
            })
            .filter_map(|row| row_integer(row, column))
            .collect())
    }

    fn insert_item(&self, row: &AttributeMap) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        ContentTables::check_columns(&tables.item_columns, row)?;
        let id = row_integer(row, columns::ID)
            .ok_or_else(|| RepositoryError::Invalid("item row without id".to_string()))?;
        let locale = row_integer(row, columns::LOCALE_ID)
            .ok_or_else(|| RepositoryError::Invalid("item row without locale".to_string()))?;
        if tables.failing_item_locales.contains(&LocaleId::new(locale)) {
            return Err(RepositoryError::Store(format!("injected failure for locale {locale}")));
        }
        if tables.items.contains_key(&(id, locale)) {
            return Err(RepositoryError::Conflict(format!("item {id} locale {locale} exists")));
        }
        tables.items.insert((id, locale), row.clone());
        Ok(())
    }

    fn update_item(
        &self,
        id: ItemId,
        locale: LocaleId,
        values: &AttributeMap,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        ContentTables::check_columns(&tables.item_columns, values)?;
        let row = tables
            .items
            .get_mut(&(id.get(), locale.get()))
            .ok_or_else(|| RepositoryError::Invalid(format!("item {id} locale {locale} missing")))?;
        row.extend(values.iter().map(|(key, value)| (key.clone(), value.clone())));
        Ok(())
    }

    fn remove_item(&self, id: ItemId) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        tables.items.retain(|(item_id, _), _| *item_id != id.get());
        Ok(())
    }

    fn insert_block(&self, row: &AttributeMap) -> Result<BlockId, RepositoryError> {
        let mut tables = self.lock()?;
        ContentTables::check_columns(&tables.block_columns, row)?;
        if let Some(module_id) = row_integer(row, columns::MODULE_ID)
            && tables.failing_block_modules.contains(&module_id)
        {
            return Err(RepositoryError::Store(format!("injected failure for module {module_id}")));
        }
        tables.last_block_id += 1;
        let id = tables.last_block_id;
        let mut stored = row.clone();
        stored.insert(columns::ID.to_string(), Scalar::Integer(id));
        tables.blocks.insert(id, stored);
        Ok(BlockId::new(id))
    }

    fn update_block(&self, id: BlockId, values: &AttributeMap) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        ContentTables::check_columns(&tables.block_columns, values)?;
        let row = tables
            .blocks
            .get_mut(&id.get())
            .ok_or_else(|| RepositoryError::Invalid(format!("block {id} missing")))?;
        row.extend(values.iter().map(|(key, value)| (key.clone(), value.clone())));
        Ok(())
    }
}

// ============================================================================
// SECTION: Content Caches
// ============================================================================

/// Content cache that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopContentCache;

impl ContentCache for NoopContentCache {
    fn invalidate_item(&self, _item: ItemId) -> Result<(), CacheError> {
        Ok(())
    }

    fn regenerate(
        &self,
        _item: ItemId,
        _locale: LocaleId,
        _revision: Revision,
    ) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Cache request observed by [`RecordingContentCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheRequest {
    /// Invalidation of an item.
    Invalidate(ItemId),
    /// Regeneration of one locale and revision.
    Regenerate(ItemId, LocaleId, Revision),
}

/// Content cache that records requests for inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingContentCache {
    /// Recorded requests.
    requests: Arc<Mutex<Vec<CacheRequest>>>,
}

impl RecordingContentCache {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded requests in order.
    #[must_use]
    pub fn requests(&self) -> Vec<CacheRequest> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }

    /// Appends a request.
    fn push(&self, request: CacheRequest) -> Result<(), CacheError> {
        self.requests
            .lock()
            .map_err(|_| CacheError::Cache("cache mutex poisoned".to_string()))?
            .push(request);
        Ok(())
    }
}

impl ContentCache for RecordingContentCache {
    fn invalidate_item(&self, item: ItemId) -> Result<(), CacheError> {
        self.push(CacheRequest::Invalidate(item))
    }

    fn regenerate(
        &self,
        item: ItemId,
        locale: LocaleId,
        revision: Revision,
    ) -> Result<(), CacheError> {
        self.push(CacheRequest::Regenerate(item, locale, revision))
    }
}
