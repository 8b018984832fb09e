// crates/content-trash-cli/src/render.rs
// ============================================================================
// Module: CLI Rendering
// Description: Localized rendering of trash listings and operation outcomes.
// Purpose: Keep every user-facing line in one testable place.
// Dependencies: content-trash-core, serde
// ============================================================================

//! ## Overview
//! Converts engine results into output lines. Listings have a stable JSON
//! shape ([`ListRow`]) and a localized text form; restore, purge, and
//! capture outcomes render to one or more localized lines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use content_trash_core::CaptureReport;
use content_trash_core::CaptureStatus;
use content_trash_core::LocaleId;
use content_trash_core::PublishStatus;
use content_trash_core::PurgeOutcome;
use content_trash_core::RestoreResult;
use content_trash_core::RestoreWarning;
use content_trash_core::TrashedItemSummary;
use serde::Serialize;

use crate::t;

// ============================================================================
// SECTION: Listing
// ============================================================================

/// Locale of an archived item with its host display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleLabel {
    /// Host locale id.
    pub id: i64,
    /// Display name, `None` when the host no longer knows the locale.
    pub name: Option<String>,
}

/// One archived item as shown by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    /// Archive entry id.
    pub archive_id: i64,
    /// Id the item had when deleted.
    pub original_id: i64,
    /// Archived parent id.
    pub parent_id: i64,
    /// Item name.
    pub name: String,
    /// Whether the item is a container.
    pub is_container: bool,
    /// `online` or `offline`.
    pub status: &'static str,
    /// Deletion time as canonical date text.
    pub deleted_at: String,
    /// Number of archived blocks.
    pub block_count: u64,
    /// Locales the archived blocks belong to.
    pub locales: Vec<LocaleLabel>,
}

/// Builds listing rows, resolving locale ids through `locale_names`.
#[must_use]
pub fn list_rows(
    entries: &[TrashedItemSummary],
    locale_names: &BTreeMap<LocaleId, String>,
) -> Vec<ListRow> {
    entries
        .iter()
        .map(|entry| {
            let item = &entry.trashed.item;
            ListRow {
                archive_id: entry.trashed.archive_id.get(),
                original_id: item.original_id.get(),
                parent_id: item.parent_id.get(),
                name: item.name.clone(),
                is_container: item.is_container,
                status: match item.status {
                    PublishStatus::Published => "online",
                    PublishStatus::Unpublished => "offline",
                },
                deleted_at: item.deleted_at.to_canonical(),
                block_count: entry.block_count,
                locales: entry
                    .locales
                    .iter()
                    .map(|locale| LocaleLabel {
                        id: locale.get(),
                        name: locale_names.get(locale).cloned(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Renders listing rows as localized text.
#[must_use]
pub fn render_list_text(rows: &[ListRow]) -> String {
    if rows.is_empty() {
        return t!("list.empty");
    }
    let mut lines = vec![t!("list.header", count = rows.len())];
    for row in rows {
        let container = if row.is_container { t!("list.yes") } else { t!("list.no") };
        let status = if row.status == "online" {
            t!("list.status.online")
        } else {
            t!("list.status.offline")
        };
        let locales: Vec<String> = row
            .locales
            .iter()
            .map(|label| label.name.clone().unwrap_or_else(|| t!("list.locale.unknown")))
            .collect();
        lines.push(t!(
            "list.row",
            archive_id = row.archive_id,
            name = row.name,
            original_id = row.original_id,
            parent_id = row.parent_id,
            container = container,
            status = status,
            deleted_at = row.deleted_at,
            blocks = row.block_count,
            locales = locales.join(", "),
        ));
    }
    lines.join("\n")
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Renders a successful restore: the success line, then one line per warning.
#[must_use]
pub fn restore_lines(result: &RestoreResult) -> Vec<String> {
    let mut lines = vec![t!(
        "restore.ok",
        archive_id = result.archive_id,
        item_id = result.new_item_id
    )];
    for warning in &result.warnings {
        lines.push(match warning {
            RestoreWarning::ParentMissing {
                parent_id,
            } => t!("restore.warn.parent_missing", parent_id = parent_id),
            RestoreWarning::IdentityCollision {
                original_id,
                new_id,
            } => t!("restore.new_id", new_id = new_id, original_id = original_id),
            RestoreWarning::OrderingCollision {
                desired,
                assigned,
            } => t!("restore.info.ordering", desired = desired, assigned = assigned),
            other => t!("restore.warn.other", warning = other),
        });
    }
    lines
}

/// Renders the outcome of a retention purge.
#[must_use]
pub fn purge_line(outcome: &PurgeOutcome) -> String {
    match outcome {
        PurgeOutcome::Disabled => t!("purge.disabled"),
        PurgeOutcome::Purged {
            count: 0,
            ..
        } => t!("purge.none"),
        PurgeOutcome::Purged {
            count,
            ..
        } => t!("purge.deleted", count = count),
    }
}

/// Renders a capture report. Failures render as warnings, never errors.
#[must_use]
pub fn capture_lines(report: &CaptureReport) -> Vec<String> {
    let mut lines = Vec::new();
    match (&report.status, report.archive_id) {
        (CaptureStatus::Archived, Some(archive_id)) => lines.push(t!(
            "capture.archived",
            item_id = report.item_id,
            archive_id = archive_id,
            blocks = report.blocks_archived
        )),
        (CaptureStatus::Archived, None) => lines.push(t!(
            "capture.failed",
            item_id = report.item_id,
            error = "missing archive id"
        )),
        (CaptureStatus::AlreadyArchived, _) => {
            lines.push(t!("capture.already", item_id = report.item_id));
        }
        (CaptureStatus::Failed(message), _) => {
            lines.push(t!("capture.failed", item_id = report.item_id, error = message));
        }
    }
    if !report.block_failures.is_empty() {
        lines.push(t!(
            "capture.partial",
            count = report.block_failures.len(),
            item_id = report.item_id
        ));
    }
    lines
}
