// crates/content-trash-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Store Unit Tests
// Description: Targeted tests for the SQLite archive store and repository.
// Purpose: Validate path safety, schema versioning, archive integrity,
//          atomic deletes, restore claims, and end-to-end trash cycles.
// ============================================================================

//! ## Overview
//! Unit-level tests for the `SQLite` backends:
//! - Path safety checks (directory rejection)
//! - Schema version validation
//! - Archive uniqueness, listing, claims, and fail-closed decoding
//! - Capture and restore through the engine against real tables

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::Path;
use std::sync::Arc;

use content_trash_core::ArchiveError;
use content_trash_core::ArchiveItemId;
use content_trash_core::ArchiveStore;
use content_trash_core::AttributeMap;
use content_trash_core::BlockSnapshot;
use content_trash_core::ClaimOutcome;
use content_trash_core::Clock;
use content_trash_core::ContentRepository;
use content_trash_core::FieldKey;
use content_trash_core::FixedAttributes;
use content_trash_core::FixedClock;
use content_trash_core::ItemId;
use content_trash_core::ItemSnapshot;
use content_trash_core::LocaleId;
use content_trash_core::NoopContentCache;
use content_trash_core::NoopEventSink;
use content_trash_core::PreDeleteNotice;
use content_trash_core::PublishStatus;
use content_trash_core::ReaperError;
use content_trash_core::RepositoryError;
use content_trash_core::Revision;
use content_trash_core::Scalar;
use content_trash_core::TableKind;
use content_trash_core::Timestamp;
use content_trash_core::TrashEngine;
use content_trash_core::TrashEngineConfig;
use content_trash_core::TrashEventSink;
use content_trash_core::TrashedBlockMeta;
use content_trash_store_sqlite::SqliteArchiveStore;
use content_trash_store_sqlite::SqliteContentRepository;
use content_trash_store_sqlite::SqliteDatabase;
use content_trash_store_sqlite::SqliteStoreConfig;
use content_trash_store_sqlite::SqliteStoreError;
use content_trash_store_sqlite::drop_archive_schema;
use content_trash_store_sqlite::install_host_schema;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const EN: LocaleId = LocaleId::new(1);
const DE: LocaleId = LocaleId::new(2);
const NOW: i64 = 1_700_000_000;

type SqliteEngine = TrashEngine<SqliteArchiveStore, SqliteContentRepository, NoopContentCache>;

fn open(path: &Path) -> SqliteDatabase {
    SqliteDatabase::open(&SqliteStoreConfig::new(path)).unwrap()
}

fn host(path: &Path, versioning: bool) -> (SqliteDatabase, SqliteContentRepository) {
    let database = open(path);
    install_host_schema(&database).unwrap();
    let repository = SqliteContentRepository::new(database.clone(), versioning);
    repository.add_locale(EN, "English", 1).unwrap();
    repository.add_locale(DE, "Deutsch", 2).unwrap();
    (database, repository)
}

fn engine(database: &SqliteDatabase, repository: SqliteContentRepository) -> (SqliteEngine, Arc<FixedClock>) {
    let archive = SqliteArchiveStore::new(database.clone()).unwrap();
    let clock = Arc::new(FixedClock::new(Timestamp::from_unix_seconds(NOW)));
    let time: Arc<dyn Clock> = clock.clone();
    let sink: Arc<dyn TrashEventSink> = Arc::new(NoopEventSink);
    let engine = TrashEngine::new(
        TrashEngineConfig::default(),
        archive,
        repository,
        NoopContentCache,
        sink,
        time,
    );
    (engine, clock)
}

fn item_row(id: i64, locale: LocaleId, parent: i64, name: &str) -> AttributeMap {
    let mut row = AttributeMap::new();
    row.insert("id".to_string(), Scalar::Integer(id));
    row.insert("locale_id".to_string(), Scalar::Integer(locale.get()));
    row.insert("parent_id".to_string(), Scalar::Integer(parent));
    row.insert("name".to_string(), Scalar::text(name));
    row.insert("priority".to_string(), Scalar::Integer(1));
    row.insert("path".to_string(), Scalar::text("|1|"));
    row.insert("template_id".to_string(), Scalar::Integer(4));
    row.insert("create_date".to_string(), Scalar::text("2023-01-02 03:04:05"));
    row.insert("create_user".to_string(), Scalar::text("author"));
    row
}

fn block_row(item: i64, locale: LocaleId, revision: Revision, priority: i64, text: &str) -> AttributeMap {
    let mut row = AttributeMap::new();
    row.insert("item_id".to_string(), Scalar::Integer(item));
    row.insert("locale_id".to_string(), Scalar::Integer(locale.get()));
    row.insert("revision".to_string(), Scalar::Integer(revision.get()));
    row.insert("module_id".to_string(), Scalar::Integer(5));
    row.insert("priority".to_string(), Scalar::Integer(priority));
    row.insert("value1".to_string(), Scalar::text(text));
    row.insert("media1".to_string(), Scalar::Integer(77));
    row
}

fn snapshot(original_id: i64, deleted_at: i64) -> ItemSnapshot {
    ItemSnapshot {
        original_id: ItemId::new(original_id),
        parent_id: ItemId::new(1),
        name: format!("item-{original_id}"),
        category_name: String::new(),
        priority: 1,
        category_priority: 0,
        status: PublishStatus::Published,
        is_container: false,
        deleted_at: Timestamp::from_unix_seconds(deleted_at),
        attributes: FixedAttributes::default(),
        dynamic_attributes: AttributeMap::new(),
    }
}

fn block(original_item_id: i64, locale: LocaleId) -> BlockSnapshot {
    BlockSnapshot {
        original_item_id: ItemId::new(original_item_id),
        locale,
        block_type_id: 1,
        module_id: 5,
        priority: 1,
        revision: Revision::LIVE,
        status: PublishStatus::Published,
        fields: [(FieldKey::parse("value2").unwrap(), Scalar::text("body"))].into_iter().collect(),
    }
}

fn notice(id: i64) -> PreDeleteNotice {
    PreDeleteNotice {
        item_id: ItemId::new(id),
        locale: EN,
        parent_id: ItemId::new(1),
        name: format!("item-{id}"),
        status: PublishStatus::Published,
    }
}

fn count_rows(path: &Path, table: &str) -> i64 {
    let connection = Connection::open(path).unwrap();
    connection.query_row(&format!("SELECT COUNT(1) FROM {table}"), [], |row| row.get(0)).unwrap()
}

// ============================================================================
// SECTION: Path and Schema
// ============================================================================

#[test]
fn sqlite_rejects_directory_paths() {
    let temp = TempDir::new().unwrap();

    let err = SqliteDatabase::open(&SqliteStoreConfig::new(temp.path())).unwrap_err();

    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn sqlite_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/dir/trash.db");

    let database = open(&path);

    database.readiness().unwrap();
    assert!(path.exists());
}

#[test]
fn sqlite_rejects_unknown_schema_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    SqliteArchiveStore::new(open(&path)).unwrap();
    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = ?1", params![99]).unwrap();
    drop(connection);

    let err = SqliteArchiveStore::new(open(&path)).unwrap_err();

    assert!(matches!(err, SqliteStoreError::VersionMismatch(_)));
}

#[test]
fn sqlite_reopen_keeps_archived_rows() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    let store = SqliteArchiveStore::new(open(&path)).unwrap();
    let id = store.insert_item(&snapshot(10, NOW)).unwrap();
    drop(store);

    let reopened = SqliteArchiveStore::new(open(&path)).unwrap();

    let loaded = reopened.load_item(id).unwrap().unwrap();
    assert_eq!(loaded.item, snapshot(10, NOW));
}

#[test]
fn sqlite_drop_archive_schema_leaves_host_tables() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    let (database, _repository) = host(&path, false);
    SqliteArchiveStore::new(database.clone()).unwrap();

    drop_archive_schema(&database).unwrap();

    let connection = Connection::open(&path).unwrap();
    let tables: Vec<String> = connection
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(tables.iter().all(|table| !table.starts_with("trash_")));
    assert!(tables.contains(&"content_items".to_string()));
}

// ============================================================================
// SECTION: Archive Store
// ============================================================================

#[test]
fn sqlite_archive_rejects_duplicate_original_ids() {
    let temp = TempDir::new().unwrap();
    let store = SqliteArchiveStore::new(open(&temp.path().join("trash.db"))).unwrap();
    store.insert_item(&snapshot(10, NOW)).unwrap();

    let err = store.insert_item(&snapshot(10, NOW)).unwrap_err();

    assert!(matches!(err, ArchiveError::Conflict(_)));
    assert!(store.find_by_original_id(ItemId::new(10)).unwrap().is_some());
    assert!(store.find_by_original_id(ItemId::new(11)).unwrap().is_none());
}

#[test]
fn sqlite_archive_round_trips_blocks_and_meta() {
    let temp = TempDir::new().unwrap();
    let store = SqliteArchiveStore::new(open(&temp.path().join("trash.db"))).unwrap();
    let item = store.insert_item(&snapshot(10, NOW)).unwrap();
    let first = store.insert_block(item, &block(10, DE)).unwrap();
    store.insert_block(item, &block(10, EN)).unwrap();
    let meta: AttributeMap = [("css_class".to_string(), Scalar::text("wide"))].into_iter().collect();
    store
        .insert_block_meta(&TrashedBlockMeta {
            archive_block_id: first,
            meta_data: meta.clone(),
        })
        .unwrap();

    let blocks = store.load_blocks(item).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].block.locale, EN);
    assert_eq!(blocks[0].meta, None);
    assert_eq!(blocks[1].archive_block_id, first);
    assert_eq!(blocks[1].block, block(10, DE));
    assert_eq!(blocks[1].meta, Some(meta));
}

#[test]
fn sqlite_archive_lists_newest_first_with_block_summary() {
    let temp = TempDir::new().unwrap();
    let store = SqliteArchiveStore::new(open(&temp.path().join("trash.db"))).unwrap();
    let older = store.insert_item(&snapshot(10, NOW - 5)).unwrap();
    let newer = store.insert_item(&snapshot(11, NOW)).unwrap();
    store.insert_block(older, &block(10, EN)).unwrap();
    store.insert_block(older, &block(10, DE)).unwrap();

    let entries = store.list_items().unwrap();

    assert_eq!(entries[0].trashed.archive_id, newer);
    assert_eq!(entries[0].block_count, 0);
    assert_eq!(entries[1].trashed.archive_id, older);
    assert_eq!(entries[1].block_count, 2);
    assert_eq!(entries[1].locales, vec![EN, DE]);
}

#[test]
fn sqlite_archive_deletes_are_complete() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    let store = SqliteArchiveStore::new(open(&path)).unwrap();
    let doomed = store.insert_item(&snapshot(10, NOW)).unwrap();
    let kept = store.insert_item(&snapshot(11, NOW)).unwrap();
    for item in [doomed, kept] {
        let block_id = store.insert_block(item, &block(10, EN)).unwrap();
        store
            .insert_block_meta(&TrashedBlockMeta {
                archive_block_id: block_id,
                meta_data: [("k".to_string(), Scalar::Integer(1))].into_iter().collect(),
            })
            .unwrap();
    }

    assert!(store.delete_item(doomed).unwrap());
    assert!(!store.delete_item(doomed).unwrap());

    assert_eq!(count_rows(&path, "trash_items"), 1);
    assert_eq!(count_rows(&path, "trash_blocks"), 1);
    assert_eq!(count_rows(&path, "trash_block_meta"), 1);
    assert_eq!(store.delete_all().unwrap(), 1);
    assert_eq!(count_rows(&path, "trash_block_meta"), 0);
}

#[test]
fn sqlite_archive_purge_cutoff_is_exclusive() {
    let temp = TempDir::new().unwrap();
    let store = SqliteArchiveStore::new(open(&temp.path().join("trash.db"))).unwrap();
    store.insert_item(&snapshot(10, NOW - 1)).unwrap();
    store.insert_item(&snapshot(11, NOW)).unwrap();
    store.insert_item(&snapshot(12, NOW + 1)).unwrap();

    let removed = store.purge_deleted_before(Timestamp::from_unix_seconds(NOW)).unwrap();

    assert_eq!(removed, 1);
    assert!(store.find_by_original_id(ItemId::new(10)).unwrap().is_none());
    assert!(store.find_by_original_id(ItemId::new(11)).unwrap().is_some());
}

#[test]
fn sqlite_archive_deletes_roll_back_as_a_unit() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    let (database, repository) = host(&path, false);
    let (engine, _) = engine(&database, repository);
    let store = SqliteArchiveStore::new(database.clone()).unwrap();
    let item = store.insert_item(&snapshot(10, NOW - 40 * 86_400)).unwrap();
    let block_id = store.insert_block(item, &block(10, EN)).unwrap();
    store
        .insert_block_meta(&TrashedBlockMeta {
            archive_block_id: block_id,
            meta_data: [("k".to_string(), Scalar::Integer(1))].into_iter().collect(),
        })
        .unwrap();
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER keep_items BEFORE DELETE ON trash_items \
             BEGIN SELECT RAISE(ABORT, 'items are locked'); END;",
        )
        .unwrap();

    let purge = engine.purge(30).unwrap_err();
    let delete = store.delete_item(item).unwrap_err();
    let empty = store.delete_all().unwrap_err();

    assert!(matches!(purge, ReaperError::Transaction(_)));
    assert!(delete.to_string().contains("items are locked"));
    assert!(empty.to_string().contains("items are locked"));
    assert_eq!(count_rows(&path, "trash_items"), 1);
    assert_eq!(count_rows(&path, "trash_blocks"), 1);
    assert_eq!(count_rows(&path, "trash_block_meta"), 1);
}

#[test]
fn sqlite_archive_claims_are_exclusive_until_stale() {
    let temp = TempDir::new().unwrap();
    let store = SqliteArchiveStore::new(open(&temp.path().join("trash.db"))).unwrap();
    let id = store.insert_item(&snapshot(10, NOW)).unwrap();
    let now = Timestamp::from_unix_seconds(NOW);
    let stale = Timestamp::from_unix_seconds(NOW - 600);

    assert_eq!(store.claim_for_restore(id, now, stale).unwrap(), ClaimOutcome::Claimed);
    assert_eq!(store.claim_for_restore(id, now, stale).unwrap(), ClaimOutcome::InProgress);
    let later = Timestamp::from_unix_seconds(NOW + 601);
    let later_stale = Timestamp::from_unix_seconds(NOW + 1);
    assert_eq!(store.claim_for_restore(id, later, later_stale).unwrap(), ClaimOutcome::Claimed);
    store.release_claim(id).unwrap();
    assert_eq!(store.claim_for_restore(id, now, stale).unwrap(), ClaimOutcome::Claimed);
    assert_eq!(
        store.claim_for_restore(ArchiveItemId::new(404), now, stale).unwrap(),
        ClaimOutcome::NotFound
    );
}

#[test]
fn sqlite_archive_fails_closed_on_corrupt_attributes() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    let store = SqliteArchiveStore::new(open(&path)).unwrap();
    let id = store.insert_item(&snapshot(10, NOW)).unwrap();
    let connection = Connection::open(&path).unwrap();
    connection
        .execute("UPDATE trash_items SET attributes = 'not json' WHERE id = ?1", params![id.get()])
        .unwrap();

    let err = store.load_item(id).unwrap_err();

    assert!(matches!(err, ArchiveError::Corrupt(_)));
}

// ============================================================================
// SECTION: Content Repository
// ============================================================================

#[test]
fn sqlite_repository_reflects_host_extension_columns() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    let (_database, repository) = host(&path, false);
    let connection = Connection::open(&path).unwrap();
    connection.execute_batch("ALTER TABLE content_items ADD COLUMN seo_title TEXT;").unwrap();

    let columns = repository.table_columns(TableKind::Item).unwrap();
    let block_columns = repository.table_columns(TableKind::Block).unwrap();

    assert!(columns.contains(&"seo_title".to_string()));
    assert!(block_columns.contains(&"link10".to_string()));
    assert_eq!(repository.locales().unwrap(), vec![EN, DE]);
}

#[test]
fn sqlite_repository_reports_duplicate_items_as_conflicts() {
    let temp = TempDir::new().unwrap();
    let (_database, repository) = host(&temp.path().join("trash.db"), false);
    repository.insert_item(&item_row(3, EN, 0, "once")).unwrap();

    let err = repository.insert_item(&item_row(3, EN, 0, "twice")).unwrap_err();

    assert!(matches!(err, RepositoryError::Conflict(_)));
    assert_eq!(repository.max_item_id().unwrap(), ItemId::new(3));
}

// ============================================================================
// SECTION: End To End
// ============================================================================

#[test]
fn sqlite_capture_and_restore_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trash.db");
    let (database, repository) = host(&path, true);
    {
        let connection = Connection::open(&path).unwrap();
        connection
            .execute_batch(
                "ALTER TABLE content_items ADD COLUMN seo_title TEXT;
                 ALTER TABLE content_blocks ADD COLUMN css_class TEXT;",
            )
            .unwrap();
    }
    repository.insert_item(&item_row(1, EN, 0, "root")).unwrap();
    let mut about = item_row(10, EN, 1, "About");
    about.insert("seo_title".to_string(), Scalar::text("About us"));
    repository.insert_item(&about).unwrap();
    repository.insert_item(&item_row(10, DE, 1, "Uber")).unwrap();
    let mut styled = block_row(10, EN, Revision::LIVE, 4, "first");
    styled.insert("css_class".to_string(), Scalar::text("wide"));
    repository.insert_block(&styled).unwrap();
    repository.insert_block(&block_row(10, EN, Revision::LIVE, 9, "second")).unwrap();
    repository.insert_block(&block_row(10, EN, Revision::WORKING, 1, "draft")).unwrap();
    let (engine, clock) = engine(&database, repository.clone());

    let report = engine.capture(&notice(10));
    assert_eq!(report.blocks_archived, 3);
    let archive_id = report.archive_id.unwrap();
    let connection = Connection::open(&path).unwrap();
    connection.execute("DELETE FROM content_blocks WHERE item_id = 10", []).unwrap();
    connection.execute("DELETE FROM content_items WHERE id = 10", []).unwrap();
    drop(connection);
    clock.advance(30);

    let result = engine.restore(archive_id).unwrap();

    assert_eq!(result.new_item_id, ItemId::new(10));
    assert_eq!(result.blocks_restored, 3);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let en = repository.load_item(ItemId::new(10), EN).unwrap().unwrap();
    assert_eq!(en.get("seo_title"), Some(&Scalar::text("About us")));
    assert_eq!(en.get("update_user"), Some(&Scalar::text("content-trash")));
    assert!(repository.load_item(ItemId::new(10), DE).unwrap().is_some());
    let live = repository.load_blocks(ItemId::new(10), EN, Revision::LIVE).unwrap();
    let priorities: Vec<_> = live.iter().map(|row| row.get("priority").cloned()).collect();
    assert_eq!(priorities, vec![Some(Scalar::Integer(1)), Some(Scalar::Integer(2))]);
    assert_eq!(live[0].get("css_class"), Some(&Scalar::text("wide")));
    assert_eq!(live[0].get("media1"), Some(&Scalar::Integer(77)));
    let working = repository.load_blocks(ItemId::new(10), EN, Revision::WORKING).unwrap();
    assert_eq!(working.len(), 1);
    assert_eq!(count_rows(&path, "trash_items"), 0);
    assert_eq!(count_rows(&path, "trash_blocks"), 0);
    assert_eq!(count_rows(&path, "trash_block_meta"), 0);
}
