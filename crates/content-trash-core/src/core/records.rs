// crates/content-trash-core/src/core/records.rs
// ============================================================================
// Module: Content Trash Records
// Description: Archived item, block, and block-meta records.
// Purpose: Define the archive data model shared by every store backend.
// Dependencies: crate::core::{attributes, fields, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! An archive entry is one [`TrashedItem`] owning any number of
//! [`TrashedBlock`] rows, each with an optional [`TrashedBlockMeta`] holding
//! the block's extension columns.
//!
//! ## Invariants
//! - At most one trashed item exists per original live id.
//! - Blocks belong to exactly one trashed item and are removed with it.
//! - Block meta exists only when the source block had an extension value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::attributes::AttributeMap;
use crate::core::fields::BlockFields;
use crate::core::identifiers::ArchiveBlockId;
use crate::core::identifiers::ArchiveItemId;
use crate::core::identifiers::ItemId;
use crate::core::identifiers::LocaleId;
use crate::core::identifiers::Revision;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Publication status of an item or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// Offline.
    Unpublished,
    /// Online.
    Published,
}

impl PublishStatus {
    /// Maps a host status code (zero is offline).
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        if code == 0 { Self::Unpublished } else { Self::Published }
    }

    /// Returns the host status code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Unpublished => 0,
            Self::Published => 1,
        }
    }
}

// ============================================================================
// SECTION: Items
// ============================================================================

/// Fixed extension attributes stored in the archive `attributes` column.
///
/// # Invariants
/// - Date fields hold canonical `YYYY-MM-DD HH:MM:SS` text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FixedAttributes {
    /// Hierarchy path of the item (`|`-delimited ancestor ids).
    #[serde(default)]
    pub path: String,
    /// Rendering template id.
    #[serde(default)]
    pub template_id: i64,
    /// Creation date.
    #[serde(default)]
    pub create_date: String,
    /// Creating user login.
    #[serde(default)]
    pub create_user: String,
    /// Last update date.
    #[serde(default)]
    pub update_date: String,
    /// Last updating user login.
    #[serde(default)]
    pub update_user: String,
}

/// Item state captured at deletion time.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSnapshot {
    /// Live id at the time of deletion.
    pub original_id: ItemId,
    /// Parent container id (root is `0`).
    pub parent_id: ItemId,
    /// Item name.
    pub name: String,
    /// Container name when the item is a container.
    pub category_name: String,
    /// Ordering key among leaf siblings.
    pub priority: i64,
    /// Ordering key among container siblings.
    pub category_priority: i64,
    /// Publication status.
    pub status: PublishStatus,
    /// True when the item was a container.
    pub is_container: bool,
    /// Time the item was archived.
    pub deleted_at: Timestamp,
    /// Fixed extension attributes.
    pub attributes: FixedAttributes,
    /// Schema-extension columns present on the live item.
    pub dynamic_attributes: AttributeMap,
}

/// Archived item row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrashedItem {
    /// Archive identifier.
    pub archive_id: ArchiveItemId,
    /// Captured item state.
    pub item: ItemSnapshot,
}

/// Listing row: an archived item annotated with its block coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct TrashedItemSummary {
    /// Archived item.
    pub trashed: TrashedItem,
    /// Number of archived blocks.
    pub block_count: u64,
    /// Distinct locales present among the archived blocks, ascending.
    pub locales: Vec<LocaleId>,
}

// ============================================================================
// SECTION: Blocks
// ============================================================================

/// Block state captured at deletion time.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSnapshot {
    /// Live id of the owning item.
    pub original_item_id: ItemId,
    /// Block locale.
    pub locale: LocaleId,
    /// Block type (content area) id.
    pub block_type_id: i64,
    /// Module id rendering the block.
    pub module_id: i64,
    /// Ordering key within the (locale, revision) group.
    pub priority: i64,
    /// Block revision.
    pub revision: Revision,
    /// Publication status.
    pub status: PublishStatus,
    /// Field values the block had set.
    pub fields: BlockFields,
}

/// Archived block row, joined with its meta when present.
#[derive(Debug, Clone, PartialEq)]
pub struct TrashedBlock {
    /// Archive block identifier.
    pub archive_block_id: ArchiveBlockId,
    /// Owning archived item.
    pub archive_item_id: ArchiveItemId,
    /// Captured block state.
    pub block: BlockSnapshot,
    /// Extension columns of the block, if any were set.
    pub meta: Option<AttributeMap>,
}

/// Archived extension attributes of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct TrashedBlockMeta {
    /// Owning archived block.
    pub archive_block_id: ArchiveBlockId,
    /// Extension column values.
    pub meta_data: AttributeMap,
}

// ============================================================================
// SECTION: Host Notifications
// ============================================================================

/// Pre-delete notification payload sent by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreDeleteNotice {
    /// Item about to be deleted.
    pub item_id: ItemId,
    /// Locale the delete was issued for.
    pub locale: LocaleId,
    /// Parent container id.
    pub parent_id: ItemId,
    /// Item name.
    pub name: String,
    /// Publication status.
    pub status: PublishStatus,
}
