// crates/content-trash-core/src/runtime/restore.rs
// ============================================================================
// Module: Content Trash Restore Engine
// Description: Rebuilds a live item and its blocks from an archive entry.
// Purpose: Resolve id and ordering collisions and reattach extension columns.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`TrashEngine::restore`] runs these steps:
//!
//! 1. claim the archive entry so a concurrent restore of it is refused,
//! 2. load the entry and reflect both live tables,
//! 3. fall back to the root container when the parent is gone,
//! 4. allocate a new id when the original one is taken again,
//! 5. probe for a free ordering key,
//! 6. insert one item row per host locale at the live revision,
//! 7. reapply dynamic attributes still present on the live table,
//! 8. reinsert blocks per archived (locale, revision) with compacted priorities,
//! 9. delete the archive entry,
//! 10. invalidate and regenerate cached content.
//!
//! Steps up to and including the item insert are fatal: a failure rolls back
//! inserted item rows and leaves the archive entry untouched. Block and
//! attribute failures after that are tolerated and surface as warnings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::core::attributes::AttributeMap;
use crate::core::attributes::Scalar;
use crate::core::events::EventLevel;
use crate::core::identifiers::ArchiveItemId;
use crate::core::identifiers::BlockId;
use crate::core::identifiers::ItemId;
use crate::core::identifiers::LocaleId;
use crate::core::identifiers::Revision;
use crate::core::records::ItemSnapshot;
use crate::core::records::TrashedBlock;
use crate::core::schema::SchemaContext;
use crate::core::schema::SchemaError;
use crate::core::schema::TableKind;
use crate::core::schema::TableSchema;
use crate::core::schema::columns;
use crate::core::time::Timestamp;
use crate::interfaces::ArchiveError;
use crate::interfaces::ArchiveStore;
use crate::interfaces::ClaimOutcome;
use crate::interfaces::ContentCache;
use crate::interfaces::ContentRepository;
use crate::interfaces::OrderingSpace;
use crate::interfaces::RepositoryError;
use crate::runtime::engine::BlockError;
use crate::runtime::engine::TrashEngine;
use crate::runtime::ordering::desired_priority;
use crate::runtime::ordering::group_blocks;
use crate::runtime::ordering::probe_priority;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Operation label for restore events.
const OPERATION: &str = "restore";
/// Upper bound on ids probed past the current maximum.
const MAX_ID_PROBES: i64 = 10_000;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Non-fatal conditions met during a restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreWarning {
    /// The archived parent no longer exists; the item went under the root.
    ParentMissing {
        /// Archived parent id.
        parent_id: ItemId,
    },
    /// The original id was taken; the item was restored under a new id.
    IdentityCollision {
        /// Archived id.
        original_id: ItemId,
        /// Allocated id.
        new_id: ItemId,
    },
    /// The desired ordering key was taken; the next free one was used.
    OrderingCollision {
        /// Archived ordering key.
        desired: i64,
        /// Assigned ordering key.
        assigned: i64,
    },
    /// Dynamic attributes could not be written for one locale.
    AttributesFailed {
        /// Affected locale.
        locale: LocaleId,
        /// Underlying failure.
        message: String,
    },
    /// One block or its meta could not be written.
    PartialWrite(BlockError),
    /// The archive entry could not be deleted after the restore.
    CleanupFailed(String),
    /// The content cache rejected an invalidation or regeneration.
    CacheFailed(String),
}

impl fmt::Display for RestoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentMissing {
                parent_id,
            } => write!(f, "parent {parent_id} is missing, restored under the root"),
            Self::IdentityCollision {
                original_id,
                new_id,
            } => write!(f, "id {original_id} is taken, restored as {new_id}"),
            Self::OrderingCollision {
                desired,
                assigned,
            } => write!(f, "priority {desired} is taken, assigned {assigned}"),
            Self::AttributesFailed {
                locale,
                message,
            } => write!(f, "attributes for locale {locale} not restored: {message}"),
            Self::PartialWrite(error) => write!(f, "{error}"),
            Self::CleanupFailed(message) => write!(f, "archive cleanup failed: {message}"),
            Self::CacheFailed(message) => write!(f, "cache update failed: {message}"),
        }
    }
}

/// Outcome of a successful restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreResult {
    /// Consumed archive entry.
    pub archive_id: ArchiveItemId,
    /// Archived item id.
    pub original_id: ItemId,
    /// Live id of the restored item.
    pub new_item_id: ItemId,
    /// True when `new_item_id` differs from `original_id`.
    pub id_changed: bool,
    /// Parent the item was restored under.
    pub parent_id: ItemId,
    /// Ordering key assigned in the item's ordering space.
    pub priority: i64,
    /// Locales an item row was written for.
    pub locales: Vec<LocaleId>,
    /// Blocks written back.
    pub blocks_restored: usize,
    /// Non-fatal conditions.
    pub warnings: Vec<RestoreWarning>,
}

impl RestoreResult {
    /// Returns the block failures among the warnings.
    pub fn block_failures(&self) -> impl Iterator<Item = &BlockError> {
        self.warnings.iter().filter_map(|warning| match warning {
            RestoreWarning::PartialWrite(error) => Some(error),
            _ => None,
        })
    }
}

/// Restore failures.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// No archive entry with this id.
    #[error("archive entry {0} not found")]
    NotFound(ArchiveItemId),
    /// Another restore of this entry is running.
    #[error("archive entry {0} is already being restored")]
    InProgress(ArchiveItemId),
    /// A live table could not be reflected.
    #[error(transparent)]
    SchemaUnavailable(#[from] SchemaError),
    /// The host reports no locales.
    #[error("host has no locales to restore into")]
    NoLocales,
    /// No free item id was found.
    #[error("no free item id found above {0}")]
    IdExhausted(ItemId),
    /// No free ordering key was found.
    #[error("no free priority found at or above {0}")]
    PriorityExhausted(i64),
    /// An item row could not be inserted; earlier rows were rolled back.
    #[error("item insert failed for locale {locale}: {message}")]
    InsertFailed {
        /// Locale being inserted.
        locale: LocaleId,
        /// Underlying failure.
        message: String,
    },
    /// The archive store failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    /// The content repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Blocks written back by one restore.
#[derive(Debug, Default)]
struct BlockRestore {
    /// Per-block outcomes in processing order.
    outcomes: Vec<Result<BlockId, BlockError>>,
    /// (locale, revision) groups that received at least one block.
    touched: BTreeSet<(LocaleId, Revision)>,
}

// ============================================================================
// SECTION: Restore
// ============================================================================

impl<A, R, C> TrashEngine<A, R, C>
where
    A: ArchiveStore,
    R: ContentRepository,
    C: ContentCache,
{
    /// Restores an archive entry, recording the configured operator as the
    /// updating user.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError`] when the entry is missing, already being
    /// restored, or the item rows cannot be written.
    pub fn restore(&self, archive_id: ArchiveItemId) -> Result<RestoreResult, RestoreError> {
        let operator = self.config.operator.clone();
        self.restore_as(archive_id, &operator)
    }

    /// Restores an archive entry on behalf of `operator`.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError`] when the entry is missing, already being
    /// restored, or the item rows cannot be written.
    pub fn restore_as(
        &self,
        archive_id: ArchiveItemId,
        operator: &str,
    ) -> Result<RestoreResult, RestoreError> {
        let now = self.now();
        let stale_before = now
            .checked_sub_seconds(self.config.claim_ttl_secs)
            .unwrap_or(Timestamp::from_unix_seconds(i64::MIN));
        match self.archive.claim_for_restore(archive_id, now, stale_before)? {
            ClaimOutcome::Claimed => {}
            ClaimOutcome::InProgress => {
                self.emit(
                    &self
                        .event("restore_in_progress", EventLevel::Warn, OPERATION, "claim held")
                        .with_archive_id(archive_id.get()),
                );
                return Err(RestoreError::InProgress(archive_id));
            }
            ClaimOutcome::NotFound => return Err(RestoreError::NotFound(archive_id)),
        }
        match self.restore_claimed(archive_id, operator, now) {
            Ok(result) => {
                self.emit(
                    &self
                        .event(
                            "restore_completed",
                            EventLevel::Info,
                            OPERATION,
                            format!(
                                "restored as {} with {} blocks and {} warnings",
                                result.new_item_id,
                                result.blocks_restored,
                                result.warnings.len()
                            ),
                        )
                        .with_archive_id(archive_id.get())
                        .with_item_id(result.new_item_id.get()),
                );
                Ok(result)
            }
            Err(err) => {
                if let Err(release) = self.archive.release_claim(archive_id) {
                    self.emit(
                        &self
                            .event(
                                "restore_release_failed",
                                EventLevel::Error,
                                OPERATION,
                                release.to_string(),
                            )
                            .with_archive_id(archive_id.get()),
                    );
                }
                self.emit(
                    &self
                        .event("restore_failed", EventLevel::Error, OPERATION, err.to_string())
                        .with_archive_id(archive_id.get()),
                );
                Err(err)
            }
        }
    }

    /// Runs the restore once the claim is held.
    fn restore_claimed(
        &self,
        archive_id: ArchiveItemId,
        operator: &str,
        now: Timestamp,
    ) -> Result<RestoreResult, RestoreError> {
        let trashed =
            self.archive.load_item(archive_id)?.ok_or(RestoreError::NotFound(archive_id))?;
        let item = &trashed.item;
        let mut schema = SchemaContext::new();
        let item_table = schema.table(&self.repository, TableKind::Item)?.clone();
        let block_table = schema.table(&self.repository, TableKind::Block)?.clone();
        let blocks = self.archive.load_blocks(archive_id)?;
        let locales = self.repository.locales()?;
        if locales.is_empty() {
            return Err(RestoreError::NoLocales);
        }
        let mut warnings = Vec::new();

        let mut parent_id = item.parent_id;
        if !parent_id.is_root() && !self.repository.item_exists(parent_id)? {
            warnings.push(RestoreWarning::ParentMissing {
                parent_id,
            });
            parent_id = ItemId::ROOT;
        }

        let (new_item_id, id_changed) = if self.repository.item_exists(item.original_id)? {
            let new_id = self.allocate_item_id()?;
            warnings.push(RestoreWarning::IdentityCollision {
                original_id: item.original_id,
                new_id,
            });
            (new_id, true)
        } else {
            (item.original_id, false)
        };

        let space = OrderingSpace::for_item(item.is_container);
        let desired = desired_priority(match space {
            OrderingSpace::Containers => item.category_priority,
            OrderingSpace::Leaves => item.priority,
        });
        let taken = self.repository.sibling_priorities(parent_id, space)?;
        let priority =
            probe_priority(desired, &taken).ok_or(RestoreError::PriorityExhausted(desired))?;
        if priority != desired {
            warnings.push(RestoreWarning::OrderingCollision {
                desired,
                assigned: priority,
            });
        }

        let placement = Placement {
            id: new_item_id,
            parent_id,
            space,
            priority,
        };
        self.insert_item_rows(item, &placement, &locales, operator, now)?;

        let dynamic: AttributeMap = item
            .dynamic_attributes
            .iter()
            .filter(|(column, _)| item_table.is_writable_extension(column))
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect();
        if !dynamic.is_empty() {
            for locale in &locales {
                if let Err(err) = self.repository.update_item(new_item_id, *locale, &dynamic) {
                    warnings.push(RestoreWarning::AttributesFailed {
                        locale: *locale,
                        message: err.to_string(),
                    });
                }
            }
        }

        let restored = self.restore_blocks(&blocks, new_item_id, &block_table, operator, now);
        let mut blocks_restored = 0;
        for outcome in restored.outcomes {
            match outcome {
                Ok(_) => blocks_restored += 1,
                Err(failure) => {
                    self.emit(
                        &self
                            .event("restore_block_failed", EventLevel::Warn, OPERATION, failure.to_string())
                            .with_archive_id(archive_id.get())
                            .with_item_id(new_item_id.get())
                            .with_scope(failure.locale.get(), failure.revision.get()),
                    );
                    warnings.push(RestoreWarning::PartialWrite(failure));
                }
            }
        }

        match self.archive.delete_item(archive_id) {
            Ok(_) => {}
            Err(err) => {
                if self.archive.release_claim(archive_id).is_err() {
                    self.emit(
                        &self
                            .event("restore_release_failed", EventLevel::Error, OPERATION, "claim kept")
                            .with_archive_id(archive_id.get()),
                    );
                }
                warnings.push(RestoreWarning::CleanupFailed(err.to_string()));
            }
        }

        let mut regenerate: BTreeSet<(LocaleId, Revision)> =
            locales.iter().map(|locale| (*locale, Revision::LIVE)).collect();
        regenerate.extend(restored.touched);
        if let Err(err) = self.cache.invalidate_item(new_item_id) {
            warnings.push(RestoreWarning::CacheFailed(err.to_string()));
        }
        for (locale, revision) in regenerate {
            if let Err(err) = self.cache.regenerate(new_item_id, locale, revision) {
                warnings.push(RestoreWarning::CacheFailed(err.to_string()));
            }
        }

        Ok(RestoreResult {
            archive_id,
            original_id: item.original_id,
            new_item_id,
            id_changed,
            parent_id,
            priority,
            locales,
            blocks_restored,
            warnings,
        })
    }

    /// Probes upward from `max(id) + 1` for an unused item id.
    fn allocate_item_id(&self) -> Result<ItemId, RestoreError> {
        let max = self.repository.max_item_id()?;
        let mut candidate = max.get().max(0);
        for _ in 0..MAX_ID_PROBES {
            candidate = candidate.checked_add(1).ok_or(RestoreError::IdExhausted(max))?;
            let id = ItemId::new(candidate);
            if !self.repository.item_exists(id)? {
                return Ok(id);
            }
        }
        Err(RestoreError::IdExhausted(max))
    }

    /// Inserts one live row per locale, removing inserted rows on failure.
    fn insert_item_rows(
        &self,
        item: &ItemSnapshot,
        placement: &Placement,
        locales: &[LocaleId],
        operator: &str,
        now: Timestamp,
    ) -> Result<(), RestoreError> {
        let mut inserted = 0_usize;
        for locale in locales {
            let row = self.live_item_row(item, placement, *locale, operator, now);
            if let Err(err) = self.repository.insert_item(&row) {
                if inserted > 0
                    && let Err(cleanup) = self.repository.remove_item(placement.id)
                {
                    self.emit(
                        &self
                            .event("restore_rollback_failed", EventLevel::Error, OPERATION, cleanup.to_string())
                            .with_item_id(placement.id.get()),
                    );
                }
                return Err(RestoreError::InsertFailed {
                    locale: *locale,
                    message: err.to_string(),
                });
            }
            inserted += 1;
        }
        Ok(())
    }

    /// Builds the live row of a restored item for one locale.
    fn live_item_row(
        &self,
        item: &ItemSnapshot,
        placement: &Placement,
        locale: LocaleId,
        operator: &str,
        now: Timestamp,
    ) -> AttributeMap {
        let attributes = &item.attributes;
        let (priority, category_priority) = match placement.space {
            OrderingSpace::Containers => (desired_priority(item.priority), placement.priority),
            OrderingSpace::Leaves => (placement.priority, desired_priority(item.category_priority)),
        };
        let path = if placement.parent_id.is_root() || attributes.path.is_empty() {
            self.config.root_path.clone()
        } else {
            attributes.path.clone()
        };
        let template_id = if attributes.template_id > 0 {
            attributes.template_id
        } else {
            self.config.default_template_id
        };
        let create_date = if attributes.create_date.is_empty() {
            now.to_canonical()
        } else {
            attributes.create_date.clone()
        };
        let create_user = if attributes.create_user.is_empty() {
            operator.to_string()
        } else {
            attributes.create_user.clone()
        };
        let mut row = AttributeMap::new();
        row.insert(columns::ID.to_string(), Scalar::Integer(placement.id.get()));
        row.insert(columns::LOCALE_ID.to_string(), Scalar::Integer(locale.get()));
        row.insert(columns::PARENT_ID.to_string(), Scalar::Integer(placement.parent_id.get()));
        row.insert(columns::NAME.to_string(), Scalar::text(item.name.clone()));
        row.insert(columns::CATEGORY_NAME.to_string(), Scalar::text(item.category_name.clone()));
        row.insert(columns::CATEGORY_PRIORITY.to_string(), Scalar::Integer(category_priority));
        row.insert(columns::IS_CONTAINER.to_string(), Scalar::Integer(i64::from(item.is_container)));
        row.insert(columns::PRIORITY.to_string(), Scalar::Integer(priority));
        row.insert(columns::PATH.to_string(), Scalar::text(path));
        row.insert(columns::STATUS.to_string(), Scalar::Integer(item.status.code()));
        row.insert(columns::TEMPLATE_ID.to_string(), Scalar::Integer(template_id));
        row.insert(columns::REVISION.to_string(), Scalar::Integer(Revision::LIVE.get()));
        row.insert(columns::CREATE_DATE.to_string(), Scalar::text(create_date));
        row.insert(columns::CREATE_USER.to_string(), Scalar::text(create_user));
        row.insert(columns::UPDATE_DATE.to_string(), Scalar::text(now.to_canonical()));
        row.insert(columns::UPDATE_USER.to_string(), Scalar::text(operator));
        row
    }

    /// Reinserts archived blocks with compacted priorities.
    fn restore_blocks(
        &self,
        blocks: &[TrashedBlock],
        item_id: ItemId,
        table: &TableSchema,
        operator: &str,
        now: Timestamp,
    ) -> BlockRestore {
        let mut restore = BlockRestore::default();
        for ((locale, revision), group) in group_blocks(blocks) {
            let mut next_priority = 1_i64;
            for (index, trashed) in group.into_iter().enumerate() {
                let position = index + 1;
                let block = &trashed.block;
                let mut row = AttributeMap::new();
                row.insert(columns::ITEM_ID.to_string(), Scalar::Integer(item_id.get()));
                row.insert(columns::LOCALE_ID.to_string(), Scalar::Integer(locale.get()));
                row.insert(columns::REVISION.to_string(), Scalar::Integer(revision.get()));
                row.insert(columns::BLOCK_TYPE_ID.to_string(), Scalar::Integer(block.block_type_id));
                row.insert(columns::MODULE_ID.to_string(), Scalar::Integer(block.module_id));
                row.insert(columns::PRIORITY.to_string(), Scalar::Integer(next_priority));
                row.insert(columns::STATUS.to_string(), Scalar::Integer(block.status.code()));
                row.insert(columns::CREATE_DATE.to_string(), Scalar::text(now.to_canonical()));
                row.insert(columns::CREATE_USER.to_string(), Scalar::text(operator));
                row.insert(columns::UPDATE_DATE.to_string(), Scalar::text(now.to_canonical()));
                row.insert(columns::UPDATE_USER.to_string(), Scalar::text(operator));
                for (key, value) in &block.fields {
                    row.insert(key.column_name(), value.clone());
                }
                let block_id = match self.repository.insert_block(&row) {
                    Ok(block_id) => block_id,
                    Err(err) => {
                        restore.outcomes.push(Err(BlockError::new(
                            locale,
                            revision,
                            position,
                            err.to_string(),
                        )));
                        continue;
                    }
                };
                next_priority += 1;
                restore.touched.insert((locale, revision));
                restore.outcomes.push(Ok(block_id));

                let meta: AttributeMap = trashed
                    .meta
                    .iter()
                    .flatten()
                    .filter(|(column, _)| table.is_writable_extension(column))
                    .map(|(column, value)| (column.clone(), value.clone()))
                    .collect();
                if !meta.is_empty()
                    && let Err(err) = self.repository.update_block(block_id, &meta)
                {
                    restore.outcomes.push(Err(BlockError::new(
                        locale,
                        revision,
                        position,
                        format!("block meta: {err}"),
                    )));
                }
            }
        }
        restore
    }
}

/// Resolved location of a restored item.
#[derive(Debug, Clone, Copy)]
struct Placement {
    /// Live id.
    id: ItemId,
    /// Parent container.
    parent_id: ItemId,
    /// Ordering space.
    space: OrderingSpace,
    /// Assigned ordering key.
    priority: i64,
}
