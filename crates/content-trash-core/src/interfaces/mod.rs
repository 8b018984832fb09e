// crates/content-trash-core/src/interfaces/mod.rs
// ============================================================================
// Module: Content Trash Interfaces
// Description: Backend-agnostic contracts for the archive, live content, caches, and logs.
// Purpose: Define the seams the trash engine is built against.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The engine never touches a database directly. The durable archive, the
//! host's live content tables, its render cache, its clock, and its log
//! pipeline are all reached through the traits in this module. Every method
//! takes `&self`; implementations handle their own interior locking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::attributes::AttributeMap;
use crate::core::events::TrashEvent;
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
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Archive Store
// ============================================================================

/// Archive store errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Store I/O error.
    #[error("archive store io error: {0}")]
    Io(String),
    /// Stored data is corrupted.
    #[error("archive store corruption: {0}")]
    Corrupt(String),
    /// Stored schema version is incompatible.
    #[error("archive store version mismatch: {0}")]
    VersionMismatch(String),
    /// Input or stored data is invalid.
    #[error("archive store invalid data: {0}")]
    Invalid(String),
    /// A uniqueness constraint rejected the write.
    #[error("archive store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("archive store error: {0}")]
    Store(String),
}

/// Result of trying to claim an archive entry for restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The caller now owns the restore.
    Claimed,
    /// Another restore holds a fresh claim.
    InProgress,
    /// No such archive entry.
    NotFound,
}

/// Durable archive of trashed items, blocks, and block meta.
///
/// # Invariants
/// - Deleting an item removes its blocks' meta, then its blocks, then the item.
/// - [`ArchiveStore::delete_all`] and [`ArchiveStore::purge_deleted_before`]
///   are all-or-nothing.
pub trait ArchiveStore {
    /// Returns the archive id holding `original_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the lookup fails.
    fn find_by_original_id(&self, original_id: ItemId)
    -> Result<Option<ArchiveItemId>, ArchiveError>;

    /// Inserts an archived item and returns its generated id.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Conflict`] when `original_id` is already archived.
    fn insert_item(&self, item: &ItemSnapshot) -> Result<ArchiveItemId, ArchiveError>;

    /// Inserts an archived block under `archive_item` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the insert fails.
    fn insert_block(
        &self,
        archive_item: ArchiveItemId,
        block: &BlockSnapshot,
    ) -> Result<ArchiveBlockId, ArchiveError>;

    /// Inserts the extension attributes of an archived block.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the insert fails.
    fn insert_block_meta(&self, meta: &TrashedBlockMeta) -> Result<(), ArchiveError>;

    /// Loads one archived item.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when loading fails.
    fn load_item(&self, id: ArchiveItemId) -> Result<Option<TrashedItem>, ArchiveError>;

    /// Lists every archived item with block count and locales, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the query fails.
    fn list_items(&self) -> Result<Vec<TrashedItemSummary>, ArchiveError>;

    /// Loads the blocks of an archived item ordered by locale, revision, priority.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the query fails.
    fn load_blocks(&self, id: ArchiveItemId) -> Result<Vec<TrashedBlock>, ArchiveError>;

    /// Deletes one archived item with its blocks and meta in one transaction.
    /// Returns false when the item did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the transaction fails and was rolled back.
    fn delete_item(&self, id: ArchiveItemId) -> Result<bool, ArchiveError>;

    /// Deletes every archive row in one transaction and returns the item count.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the transaction fails and was rolled back.
    fn delete_all(&self) -> Result<u64, ArchiveError>;

    /// Deletes every item with `deleted_at < cutoff`, with its blocks and
    /// meta, in one transaction. Returns the item count.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the transaction fails and was rolled back.
    fn purge_deleted_before(&self, cutoff: Timestamp) -> Result<u64, ArchiveError>;

    /// Claims an item for restore unless a claim newer than `stale_before`
    /// already exists.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the update fails.
    fn claim_for_restore(
        &self,
        id: ArchiveItemId,
        now: Timestamp,
        stale_before: Timestamp,
    ) -> Result<ClaimOutcome, ArchiveError>;

    /// Releases a restore claim.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the update fails.
    fn release_claim(&self, id: ArchiveItemId) -> Result<(), ArchiveError>;
}

// ============================================================================
// SECTION: Content Repository
// ============================================================================

/// Live content repository errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A row with the same key already exists.
    #[error("content repository conflict: {0}")]
    Conflict(String),
    /// Input data is invalid.
    #[error("content repository invalid data: {0}")]
    Invalid(String),
    /// Repository reported an error.
    #[error("content repository error: {0}")]
    Store(String),
}

/// Independent sibling ordering spaces under one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingSpace {
    /// Container siblings, ordered by `category_priority`.
    Containers,
    /// Leaf siblings, ordered by `priority`.
    Leaves,
}

impl OrderingSpace {
    /// Returns the ordering space an item belongs to.
    #[must_use]
    pub const fn for_item(is_container: bool) -> Self {
        if is_container { Self::Containers } else { Self::Leaves }
    }
}

/// Host live content storage.
///
/// Rows are exchanged as [`AttributeMap`] keyed by column name. Null columns
/// are omitted from loaded rows.
pub trait ContentRepository {
    /// Returns every locale known to the host.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails.
    fn locales(&self) -> Result<Vec<LocaleId>, RepositoryError>;

    /// Returns true when the host keeps a working revision besides the live one.
    fn versioning_enabled(&self) -> bool;

    /// Returns the live column names of a table.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when introspection fails.
    fn table_columns(&self, table: TableKind) -> Result<Vec<String>, RepositoryError>;

    /// Loads the row of an item in one locale.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails.
    fn load_item(
        &self,
        id: ItemId,
        locale: LocaleId,
    ) -> Result<Option<AttributeMap>, RepositoryError>;

    /// Loads any row of an item regardless of locale.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails.
    fn load_item_any_locale(&self, id: ItemId) -> Result<Option<AttributeMap>, RepositoryError>;

    /// Loads the blocks of an item for one locale and revision, by priority.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails.
    fn load_blocks(
        &self,
        item: ItemId,
        locale: LocaleId,
        revision: Revision,
    ) -> Result<Vec<AttributeMap>, RepositoryError>;

    /// Returns true when any locale row exists for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails.
    fn item_exists(&self, id: ItemId) -> Result<bool, RepositoryError>;

    /// Returns the largest live item id, or zero when empty.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails.
    fn max_item_id(&self) -> Result<ItemId, RepositoryError>;

    /// Returns the ordering keys taken under `parent` in `space`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the query fails.
    fn sibling_priorities(
        &self,
        parent: ItemId,
        space: OrderingSpace,
    ) -> Result<BTreeSet<i64>, RepositoryError>;

    /// Inserts one item row (one locale).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] when the (id, locale) row exists.
    fn insert_item(&self, row: &AttributeMap) -> Result<(), RepositoryError>;

    /// Updates columns of one item row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the update fails.
    fn update_item(
        &self,
        id: ItemId,
        locale: LocaleId,
        values: &AttributeMap,
    ) -> Result<(), RepositoryError>;

    /// Removes every locale row of an item.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the delete fails.
    fn remove_item(&self, id: ItemId) -> Result<(), RepositoryError>;

    /// Inserts one block row and returns its generated id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the insert fails.
    fn insert_block(&self, row: &AttributeMap) -> Result<BlockId, RepositoryError>;

    /// Updates columns of one block row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the update fails.
    fn update_block(&self, id: BlockId, values: &AttributeMap) -> Result<(), RepositoryError>;
}

// ============================================================================
// SECTION: Content Cache
// ============================================================================

/// Content cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache reported an error.
    #[error("content cache error: {0}")]
    Cache(String),
}

/// Host render cache.
pub trait ContentCache {
    /// Drops cached state for an item.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when invalidation fails.
    fn invalidate_item(&self, item: ItemId) -> Result<(), CacheError>;

    /// Regenerates rendered content for one locale and revision.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when regeneration fails.
    fn regenerate(
        &self,
        item: ItemId,
        locale: LocaleId,
        revision: Revision,
    ) -> Result<(), CacheError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Wall-clock source.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Structured event sink.
pub trait TrashEventSink: Send + Sync {
    /// Records an event. Sinks never fail the calling operation.
    fn record(&self, event: &TrashEvent);
}
