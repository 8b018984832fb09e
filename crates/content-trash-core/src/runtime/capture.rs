// crates/content-trash-core/src/runtime/capture.rs
// ============================================================================
// Module: Content Trash Capture Pipeline
// Description: Archives a live item and all of its blocks before deletion.
// Purpose: Preserve as much content as possible without ever blocking the delete.
// Dependencies: crate::{core, interfaces, runtime::engine}
// ============================================================================

//! ## Overview
//! [`TrashEngine::capture`] runs synchronously inside the host's pre-delete
//! hook. It deduplicates on the original item id (the host notifies once per
//! locale), snapshots the item, then walks every host locale and captured
//! revision archiving each block and its extension columns.
//!
//! Capture is deliberately not transactional: the item row is written first
//! and each block succeeds or fails on its own. Failures are returned in
//! [`CaptureReport`] and logged; none of them propagate to the host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::attributes::AttributeMap;
use crate::core::attributes::Scalar;
use crate::core::events::EventLevel;
use crate::core::fields::BlockFields;
use crate::core::fields::FieldKey;
use crate::core::identifiers::ArchiveBlockId;
use crate::core::identifiers::ArchiveItemId;
use crate::core::identifiers::ItemId;
use crate::core::identifiers::LocaleId;
use crate::core::identifiers::Revision;
use crate::core::records::BlockSnapshot;
use crate::core::records::FixedAttributes;
use crate::core::records::ItemSnapshot;
use crate::core::records::PreDeleteNotice;
use crate::core::records::PublishStatus;
use crate::core::records::TrashedBlockMeta;
use crate::core::schema::SchemaContext;
use crate::core::schema::TableKind;
use crate::core::schema::columns;
use crate::core::time::Timestamp;
use crate::core::time::normalize_datetime;
use crate::interfaces::ArchiveError;
use crate::interfaces::ArchiveStore;
use crate::interfaces::ContentCache;
use crate::interfaces::ContentRepository;
use crate::runtime::engine::BlockError;
use crate::runtime::engine::TrashEngine;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Operation label for capture events.
const OPERATION: &str = "capture";
/// Block type assigned when the live row has none.
const DEFAULT_BLOCK_TYPE_ID: i64 = 1;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Where the archived item fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// The row of the deleted locale.
    Localized,
    /// Any row of the item (locale-specific load failed).
    RawRow,
    /// Only the notification payload (no live row readable).
    Notice,
}

/// Final state of a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    /// A new archive entry was written.
    Archived,
    /// The item was already archived; nothing was written.
    AlreadyArchived,
    /// The item row could not be archived.
    Failed(String),
}

/// Capture outcome reported back to the hook caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Item the notification was for.
    pub item_id: ItemId,
    /// Archive entry holding the item, when one exists.
    pub archive_id: Option<ArchiveItemId>,
    /// Final state.
    pub status: CaptureStatus,
    /// Source of the item fields (absent when nothing was written).
    pub source: Option<ItemSource>,
    /// Blocks written to the archive.
    pub blocks_archived: usize,
    /// Blocks (or block meta rows) that failed.
    pub block_failures: Vec<BlockError>,
}

impl CaptureReport {
    /// Returns true when some blocks could not be archived.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.block_failures.is_empty()
    }
}

// ============================================================================
// SECTION: Capture
// ============================================================================

impl<A, R, C> TrashEngine<A, R, C>
where
    A: ArchiveStore,
    R: ContentRepository,
    C: ContentCache,
{
    /// Archives an item about to be deleted. Never fails: every error is
    /// logged and reported in the returned [`CaptureReport`].
    pub fn capture(&self, notice: &PreDeleteNotice) -> CaptureReport {
        match self.try_capture(notice) {
            Ok(report) => report,
            Err(err) => {
                self.emit(
                    &self
                        .event("capture_failed", EventLevel::Error, OPERATION, err.to_string())
                        .with_item_id(notice.item_id.get()),
                );
                CaptureReport {
                    item_id: notice.item_id,
                    archive_id: None,
                    status: CaptureStatus::Failed(err.to_string()),
                    source: None,
                    blocks_archived: 0,
                    block_failures: Vec::new(),
                }
            }
        }
    }

    /// Runs the capture, surfacing failures of the item row itself.
    fn try_capture(&self, notice: &PreDeleteNotice) -> Result<CaptureReport, ArchiveError> {
        if let Some(existing) = self.archive.find_by_original_id(notice.item_id)? {
            self.emit(
                &self
                    .event("capture_deduplicated", EventLevel::Info, OPERATION, "already archived")
                    .with_item_id(notice.item_id.get())
                    .with_archive_id(existing.get()),
            );
            return Ok(CaptureReport {
                item_id: notice.item_id,
                archive_id: Some(existing),
                status: CaptureStatus::AlreadyArchived,
                source: None,
                blocks_archived: 0,
                block_failures: Vec::new(),
            });
        }

        let now = self.now();
        let mut schema = SchemaContext::new();
        let (row, source) = self.load_capture_row(notice);
        let mut snapshot = item_snapshot(notice, &row, now);
        match schema.table(&self.repository, TableKind::Item) {
            Ok(table) => {
                snapshot.dynamic_attributes = collect_values(&row, table.extensions());
            }
            Err(err) => self.emit(
                &self
                    .event("capture_schema_unavailable", EventLevel::Warn, OPERATION, err.to_string())
                    .with_item_id(notice.item_id.get()),
            ),
        }
        let archive_id = self.archive.insert_item(&snapshot)?;

        let outcomes = self.capture_blocks(&mut schema, notice.item_id, archive_id);
        let mut blocks_archived = 0;
        let mut block_failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(_) => blocks_archived += 1,
                Err(err) => block_failures.push(err),
            }
        }
        self.emit(
            &self
                .event(
                    "capture_archived",
                    EventLevel::Info,
                    OPERATION,
                    format!("{blocks_archived} blocks archived, {} failed", block_failures.len()),
                )
                .with_item_id(notice.item_id.get())
                .with_archive_id(archive_id.get()),
        );
        Ok(CaptureReport {
            item_id: notice.item_id,
            archive_id: Some(archive_id),
            status: CaptureStatus::Archived,
            source: Some(source),
            blocks_archived,
            block_failures,
        })
    }

    /// Loads the live row, falling back to any locale and then to the notice.
    fn load_capture_row(&self, notice: &PreDeleteNotice) -> (AttributeMap, ItemSource) {
        match self.repository.load_item(notice.item_id, notice.locale) {
            Ok(Some(row)) => return (row, ItemSource::Localized),
            Ok(None) => {}
            Err(err) => self.emit(
                &self
                    .event("capture_item_load_failed", EventLevel::Warn, OPERATION, err.to_string())
                    .with_item_id(notice.item_id.get()),
            ),
        }
        match self.repository.load_item_any_locale(notice.item_id) {
            Ok(Some(row)) => return (row, ItemSource::RawRow),
            Ok(None) => {}
            Err(err) => self.emit(
                &self
                    .event("capture_row_load_failed", EventLevel::Warn, OPERATION, err.to_string())
                    .with_item_id(notice.item_id.get()),
            ),
        }
        (AttributeMap::new(), ItemSource::Notice)
    }

    /// Archives every block of the item across locales and revisions.
    fn capture_blocks(
        &self,
        schema: &mut SchemaContext,
        item: ItemId,
        archive_id: ArchiveItemId,
    ) -> Vec<Result<ArchiveBlockId, BlockError>> {
        let locales = match self.repository.locales() {
            Ok(locales) => locales,
            Err(err) => {
                self.emit(
                    &self
                        .event("capture_locales_failed", EventLevel::Error, OPERATION, err.to_string())
                        .with_item_id(item.get())
                        .with_archive_id(archive_id.get()),
                );
                return Vec::new();
            }
        };
        let revisions = Revision::captured(self.repository.versioning_enabled());
        let mut outcomes = Vec::new();
        for locale in locales {
            for revision in &revisions {
                let rows = match self.repository.load_blocks(item, locale, *revision) {
                    Ok(rows) => rows,
                    Err(err) => {
                        let failure = BlockError::new(locale, *revision, 0, err.to_string());
                        self.report_block_failure(item, archive_id, &failure);
                        outcomes.push(Err(failure));
                        continue;
                    }
                };
                for (index, row) in rows.iter().enumerate() {
                    let outcome = self.capture_block(
                        schema,
                        archive_id,
                        BlockScope {
                            item,
                            locale,
                            revision: *revision,
                            position: index + 1,
                        },
                        row,
                    );
                    if let Err(failure) = &outcome {
                        self.report_block_failure(item, archive_id, failure);
                    }
                    outcomes.push(outcome);
                }
            }
        }
        outcomes
    }

    /// Archives one block and its extension columns.
    fn capture_block(
        &self,
        schema: &mut SchemaContext,
        archive_id: ArchiveItemId,
        scope: BlockScope,
        row: &AttributeMap,
    ) -> Result<ArchiveBlockId, BlockError> {
        let fail = |message: String| {
            BlockError::new(scope.locale, scope.revision, scope.position, message)
        };
        let snapshot = block_snapshot(&scope, row);
        let archive_block_id =
            self.archive.insert_block(archive_id, &snapshot).map_err(|err| fail(err.to_string()))?;
        let meta_data = match schema.table(&self.repository, TableKind::Block) {
            Ok(table) => collect_values(row, table.extensions()),
            Err(err) => {
                self.emit(
                    &self
                        .event("capture_schema_unavailable", EventLevel::Warn, OPERATION, err.to_string())
                        .with_item_id(scope.item.get())
                        .with_scope(scope.locale.get(), scope.revision.get()),
                );
                AttributeMap::new()
            }
        };
        if !meta_data.is_empty() {
            let meta = TrashedBlockMeta {
                archive_block_id,
                meta_data,
            };
            self.archive
                .insert_block_meta(&meta)
                .map_err(|err| fail(format!("block meta: {err}")))?;
        }
        Ok(archive_block_id)
    }

    /// Logs one failed block.
    fn report_block_failure(&self, item: ItemId, archive_id: ArchiveItemId, failure: &BlockError) {
        self.emit(
            &self
                .event("capture_block_failed", EventLevel::Warn, OPERATION, failure.to_string())
                .with_item_id(item.get())
                .with_archive_id(archive_id.get())
                .with_scope(failure.locale.get(), failure.revision.get()),
        );
    }
}

// ============================================================================
// SECTION: Snapshot Builders
// ============================================================================

/// Position of one live block being captured.
#[derive(Debug, Clone, Copy)]
struct BlockScope {
    /// Owning live item.
    item: ItemId,
    /// Block locale.
    locale: LocaleId,
    /// Block revision.
    revision: Revision,
    /// One-based position within the (locale, revision) group.
    position: usize,
}

/// Builds the item snapshot from the live row, falling back to the notice.
fn item_snapshot(notice: &PreDeleteNotice, row: &AttributeMap, now: Timestamp) -> ItemSnapshot {
    let attributes = FixedAttributes {
        path: text(row, columns::PATH).unwrap_or_default(),
        template_id: integer(row, columns::TEMPLATE_ID).unwrap_or_default(),
        create_date: normalize_datetime(row.get(columns::CREATE_DATE), now).to_canonical(),
        create_user: text(row, columns::CREATE_USER).unwrap_or_default(),
        update_date: normalize_datetime(row.get(columns::UPDATE_DATE), now).to_canonical(),
        update_user: text(row, columns::UPDATE_USER).unwrap_or_default(),
    };
    ItemSnapshot {
        original_id: notice.item_id,
        parent_id: integer(row, columns::PARENT_ID).map_or(notice.parent_id, ItemId::new),
        name: text(row, columns::NAME).unwrap_or_else(|| notice.name.clone()),
        category_name: text(row, columns::CATEGORY_NAME).unwrap_or_default(),
        priority: integer(row, columns::PRIORITY).unwrap_or_default(),
        category_priority: integer(row, columns::CATEGORY_PRIORITY).unwrap_or_default(),
        status: integer(row, columns::STATUS).map_or(notice.status, PublishStatus::from_code),
        is_container: row.get(columns::IS_CONTAINER).is_some_and(Scalar::as_flag),
        deleted_at: now,
        attributes,
        dynamic_attributes: AttributeMap::new(),
    }
}

/// Builds a block snapshot copying only the fields the block has set.
fn block_snapshot(scope: &BlockScope, row: &AttributeMap) -> BlockSnapshot {
    let fields: BlockFields = FieldKey::all()
        .filter_map(|key| row.get(&key.column_name()).map(|value| (key, value.clone())))
        .collect();
    BlockSnapshot {
        original_item_id: scope.item,
        locale: scope.locale,
        block_type_id: integer(row, columns::BLOCK_TYPE_ID).unwrap_or(DEFAULT_BLOCK_TYPE_ID),
        module_id: integer(row, columns::MODULE_ID).unwrap_or_default(),
        priority: integer(row, columns::PRIORITY).unwrap_or_default(),
        revision: scope.revision,
        status: integer(row, columns::STATUS)
            .map_or(PublishStatus::Published, PublishStatus::from_code),
        fields,
    }
}

/// Copies the values of `keys` present in `row`.
fn collect_values<'a>(
    row: &AttributeMap,
    keys: impl IntoIterator<Item = &'a String>,
) -> AttributeMap {
    keys.into_iter()
        .filter_map(|key| row.get(key).map(|value| (key.clone(), value.clone())))
        .collect()
}

/// Reads an integer column.
fn integer(row: &AttributeMap, column: &str) -> Option<i64> {
    row.get(column).and_then(Scalar::as_i64)
}

/// Reads a text column.
fn text(row: &AttributeMap, column: &str) -> Option<String> {
    row.get(column).map(Scalar::to_text)
}
