// crates/content-trash-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared fixtures for content-trash-core integration tests.
// Purpose: Build engines over in-memory collaborators and seed live content.
// Dependencies: content-trash-core
// ============================================================================

//! ## Overview
//! Provides a [`Fixture`] wiring a [`TrashEngine`] to in-memory stores, a
//! recording cache, a memory event sink, and a fixed clock, plus builders
//! for live item and block rows.

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
    dead_code,
    reason = "Test-only helpers are permitted and not every binary uses all of them."
)]

use std::sync::Arc;

use content_trash_core::AttributeMap;
use content_trash_core::Clock;
use content_trash_core::FixedClock;
use content_trash_core::InMemoryArchiveStore;
use content_trash_core::InMemoryContentRepository;
use content_trash_core::ItemId;
use content_trash_core::LocaleId;
use content_trash_core::MemoryEventSink;
use content_trash_core::PreDeleteNotice;
use content_trash_core::PublishStatus;
use content_trash_core::RecordingContentCache;
use content_trash_core::Revision;
use content_trash_core::Scalar;
use content_trash_core::Timestamp;
use content_trash_core::TrashEngine;
use content_trash_core::TrashEngineConfig;
use content_trash_core::TrashEventSink;
use content_trash_core::core::schema::columns;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// English locale.
pub const EN: LocaleId = LocaleId::new(1);
/// German locale.
pub const DE: LocaleId = LocaleId::new(2);
/// Fixed clock start (2023-11-14 22:13:20 UTC).
pub const NOW: i64 = 1_700_000_000;

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Engine type used by the tests.
pub type TestEngine = TrashEngine<InMemoryArchiveStore, InMemoryContentRepository, RecordingContentCache>;

/// Engine plus handles onto its collaborators.
pub struct Fixture {
    /// Engine under test.
    pub engine: TestEngine,
    /// Shared handle onto the archive.
    pub archive: InMemoryArchiveStore,
    /// Shared handle onto the live content.
    pub repository: InMemoryContentRepository,
    /// Shared handle onto the cache recorder.
    pub cache: RecordingContentCache,
    /// Shared handle onto the event sink.
    pub events: MemoryEventSink,
    /// Shared handle onto the clock.
    pub clock: Arc<FixedClock>,
}

/// Builds a fixture over `repository`.
pub fn fixture_with(repository: InMemoryContentRepository) -> Fixture {
    let archive = InMemoryArchiveStore::new();
    let cache = RecordingContentCache::new();
    let events = MemoryEventSink::new();
    let clock = Arc::new(FixedClock::new(Timestamp::from_unix_seconds(NOW)));
    let sink: Arc<dyn TrashEventSink> = Arc::new(events.clone());
    let time: Arc<dyn Clock> = clock.clone();
    let config = TrashEngineConfig {
        operator: "tester".to_string(),
        ..TrashEngineConfig::default()
    };
    let engine =
        TrashEngine::new(config, archive.clone(), repository.clone(), cache.clone(), sink, time);
    Fixture {
        engine,
        archive,
        repository,
        cache,
        events,
        clock,
    }
}

/// Builds a fixture with English and German locales.
pub fn fixture() -> Fixture {
    fixture_with(InMemoryContentRepository::new(&[EN, DE]))
}

// ============================================================================
// SECTION: Row Builders
// ============================================================================

/// Builds a live item row.
pub fn item_row(id: i64, locale: LocaleId, parent: i64, name: &str) -> AttributeMap {
    let mut row = AttributeMap::new();
    row.insert(columns::ID.to_string(), Scalar::Integer(id));
    row.insert(columns::LOCALE_ID.to_string(), Scalar::Integer(locale.get()));
    row.insert(columns::PARENT_ID.to_string(), Scalar::Integer(parent));
    row.insert(columns::NAME.to_string(), Scalar::text(name));
    row.insert(columns::CATEGORY_NAME.to_string(), Scalar::text(""));
    row.insert(columns::CATEGORY_PRIORITY.to_string(), Scalar::Integer(0));
    row.insert(columns::IS_CONTAINER.to_string(), Scalar::Integer(0));
    row.insert(columns::PRIORITY.to_string(), Scalar::Integer(1));
    row.insert(columns::PATH.to_string(), Scalar::text("|1|"));
    row.insert(columns::STATUS.to_string(), Scalar::Integer(1));
    row.insert(columns::TEMPLATE_ID.to_string(), Scalar::Integer(3));
    row.insert(columns::REVISION.to_string(), Scalar::Integer(0));
    row.insert(columns::CREATE_DATE.to_string(), Scalar::text("2023-01-02 03:04:05"));
    row.insert(columns::CREATE_USER.to_string(), Scalar::text("author"));
    row.insert(columns::UPDATE_DATE.to_string(), Scalar::text("2023-06-07 08:09:10"));
    row.insert(columns::UPDATE_USER.to_string(), Scalar::text("editor"));
    row
}

/// Builds a container row with a category priority.
pub fn container_row(id: i64, locale: LocaleId, parent: i64, category_priority: i64) -> AttributeMap {
    let mut row = item_row(id, locale, parent, &format!("container-{id}"));
    row.insert(columns::IS_CONTAINER.to_string(), Scalar::Integer(1));
    row.insert(columns::CATEGORY_PRIORITY.to_string(), Scalar::Integer(category_priority));
    row
}

/// Builds a live block row with one text field.
pub fn block_row(
    item: i64,
    locale: LocaleId,
    revision: Revision,
    module: i64,
    priority: i64,
    value: &str,
) -> AttributeMap {
    let mut row = AttributeMap::new();
    row.insert(columns::ITEM_ID.to_string(), Scalar::Integer(item));
    row.insert(columns::LOCALE_ID.to_string(), Scalar::Integer(locale.get()));
    row.insert(columns::REVISION.to_string(), Scalar::Integer(revision.get()));
    row.insert(columns::BLOCK_TYPE_ID.to_string(), Scalar::Integer(2));
    row.insert(columns::MODULE_ID.to_string(), Scalar::Integer(module));
    row.insert(columns::PRIORITY.to_string(), Scalar::Integer(priority));
    row.insert(columns::STATUS.to_string(), Scalar::Integer(1));
    row.insert("value1".to_string(), Scalar::text(value));
    row
}

/// Seeds an item row in every given locale.
pub fn seed_item(repository: &InMemoryContentRepository, id: i64, parent: i64, locales: &[LocaleId]) {
    for locale in locales {
        repository.put_item(item_row(id, *locale, parent, &format!("item-{id}")));
    }
}

/// Builds the notification the host sends before deleting `id`.
pub fn notice(id: i64, locale: LocaleId) -> PreDeleteNotice {
    PreDeleteNotice {
        item_id: ItemId::new(id),
        locale,
        parent_id: ItemId::new(1),
        name: format!("notice-{id}"),
        status: PublishStatus::Published,
    }
}

/// Reads the text of `column` in `row`.
pub fn text_of(row: &AttributeMap, column: &str) -> Option<String> {
    row.get(column).map(Scalar::to_text)
}

/// Reads the integer in `column` of `row`.
pub fn int_of(row: &AttributeMap, column: &str) -> Option<i64> {
    row.get(column).and_then(Scalar::as_i64)
}
