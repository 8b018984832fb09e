// crates/content-trash-core/tests/admin.rs
// ============================================================================
// Module: Admin Action Tests
// Description: Listing, restoring, and deleting archive entries as an operator.
// Purpose: Ensure admin actions are guarded and map store failures correctly.
// Dependencies: content-trash-core
// ============================================================================
//! ## Overview
//! Validates the admin guard and the list, restore, delete, and empty actions.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use content_trash_core::AdminContext;
use content_trash_core::AdminError;
use content_trash_core::ArchiveItemId;
use content_trash_core::ItemId;
use content_trash_core::Revision;
use content_trash_core::core::schema::columns;

use crate::common::DE;
use crate::common::EN;
use crate::common::Fixture;
use crate::common::block_row;
use crate::common::fixture;
use crate::common::notice;
use crate::common::seed_item;
use crate::common::text_of;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Archives one item with blocks in both locales.
fn archive_item(fx: &Fixture, id: i64) -> ArchiveItemId {
    seed_item(&fx.repository, id, 0, &[EN, DE]);
    fx.repository.put_block(block_row(id, EN, Revision::LIVE, 5, 1, "en"));
    fx.repository.put_block(block_row(id, DE, Revision::LIVE, 5, 1, "de"));
    let archive_id = fx.engine.capture(&notice(id, EN)).archive_id.unwrap();
    fx.repository.delete_item(ItemId::new(id));
    archive_id
}

/// Non-admin caller.
fn visitor() -> AdminContext {
    AdminContext {
        login: "visitor".to_string(),
        is_admin: false,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn admin_list_returns_newest_first_with_block_summary() {
    let fx = fixture();
    archive_item(&fx, 1);
    fx.clock.advance(10);
    archive_item(&fx, 2);

    let entries = fx.engine.admin_list(&AdminContext::admin("root")).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].trashed.item.original_id, ItemId::new(2));
    assert_eq!(entries[0].block_count, 2);
    assert_eq!(entries[0].locales, vec![EN, DE]);
    assert_eq!(entries[1].trashed.item.original_id, ItemId::new(1));
}

#[test]
fn admin_actions_refuse_non_admin_callers() {
    let fx = fixture();
    let archive_id = archive_item(&fx, 1);

    assert!(matches!(fx.engine.admin_list(&visitor()), Err(AdminError::Forbidden(_))));
    assert!(matches!(fx.engine.admin_restore(&visitor(), archive_id), Err(AdminError::Forbidden(_))));
    assert!(matches!(fx.engine.admin_delete(&visitor(), archive_id), Err(AdminError::Forbidden(_))));
    assert!(matches!(fx.engine.admin_empty(&visitor()), Err(AdminError::Forbidden(_))));
    assert_eq!(fx.archive.row_counts(), (1, 2, 0));
    assert!(fx.events.names().contains(&"admin_forbidden"));
}

#[test]
fn admin_restore_records_caller_as_updating_user() {
    let fx = fixture();
    let archive_id = archive_item(&fx, 1);

    let result = fx.engine.admin_restore(&AdminContext::admin("alice"), archive_id).unwrap();

    let row = fx.repository.item(result.new_item_id, EN).unwrap();
    assert_eq!(text_of(&row, columns::UPDATE_USER).as_deref(), Some("alice"));
}

#[test]
fn admin_restore_of_missing_entry_is_not_found() {
    let fx = fixture();

    let err = fx.engine.admin_restore(&AdminContext::admin("root"), ArchiveItemId::new(5)).unwrap_err();

    assert!(matches!(err, AdminError::NotFound(id) if id == ArchiveItemId::new(5)));
}

#[test]
fn admin_delete_removes_entry_blocks_and_meta() {
    let fx = fixture();
    let doomed = archive_item(&fx, 1);
    archive_item(&fx, 2);

    fx.engine.admin_delete(&AdminContext::admin("root"), doomed).unwrap();

    assert_eq!(fx.archive.row_counts(), (1, 2, 0));
    let err = fx.engine.admin_delete(&AdminContext::admin("root"), doomed).unwrap_err();
    assert!(matches!(err, AdminError::NotFound(_)));
}

#[test]
fn admin_empty_clears_the_archive() {
    let fx = fixture();
    archive_item(&fx, 1);
    archive_item(&fx, 2);

    let removed = fx.engine.admin_empty(&AdminContext::admin("root")).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(fx.archive.row_counts(), (0, 0, 0));
    assert!(fx.engine.admin_list(&AdminContext::admin("root")).unwrap().is_empty());
}

#[test]
fn failed_delete_and_empty_keep_every_entry() {
    let fx = fixture();
    let archive_id = archive_item(&fx, 1);
    archive_item(&fx, 2);
    fx.archive.fail_deletes();

    let delete = fx.engine.admin_delete(&AdminContext::admin("root"), archive_id).unwrap_err();
    let empty = fx.engine.admin_empty(&AdminContext::admin("root")).unwrap_err();

    assert!(matches!(delete, AdminError::Transaction(_)));
    assert!(matches!(empty, AdminError::Transaction(_)));
    assert_eq!(fx.archive.row_counts(), (2, 4, 0));
    let names = fx.events.names();
    assert!(names.contains(&"admin_delete_failed"));
    assert!(names.contains(&"admin_empty_failed"));
}
