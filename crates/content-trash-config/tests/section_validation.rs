//! Section validation tests for content-trash-config.
// crates/content-trash-config/tests/section_validation.rs
// =============================================================================
// Module: Config Section Validation Tests
// Description: Validate defaults and per-section constraints.
// Purpose: Ensure each section reports the offending key when invalid.
// =============================================================================

mod common;

use std::path::Path;
use std::path::PathBuf;

use content_trash_config::LogSink;
use content_trash_config::TrashConfig;
use content_trash_store_sqlite::SqliteStoreMode;
use content_trash_store_sqlite::SqliteSyncMode;

use crate::common::TestResult;
use crate::common::assert_invalid;
use crate::common::minimal_config;

fn check(condition: bool, message: &str) -> TestResult {
    if condition { Ok(()) } else { Err(message.to_string()) }
}

#[test]
fn defaults_are_valid_and_fail_closed_for_admin() -> TestResult {
    let config = minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    check(config.database.path == Path::new("content-trash.db"), "default database path")?;
    check(config.database.busy_timeout_ms == 5_000, "default busy timeout")?;
    check(config.retention.max_age_days == 30, "default retention")?;
    check(config.restore.claim_ttl_secs == 600, "default claim ttl")?;
    check(config.host.root_path == "|", "default root path")?;
    check(!config.host.versioning, "versioning off by default")?;
    check(config.logging.sink == LogSink::Stderr, "stderr sink by default")?;
    check(!config.admin.is_admin, "admin privileges must be opt-in")
}

#[test]
fn retention_rejects_values_outside_the_choice_list() -> TestResult {
    assert_invalid(
        TrashConfig::from_toml_str("[retention]\nmax_age_days = 45\n"),
        "retention.max_age_days must be one of 0, 1, 7, 14, 30, 60, 90, 180, 365",
    )?;
    assert_invalid(TrashConfig::from_toml_str("[retention]\nmax_age_days = -1\n"), "retention")
}

#[test]
fn retention_accepts_every_choice() -> TestResult {
    for days in [0, 1, 7, 14, 30, 60, 90, 180, 365] {
        let config = TrashConfig::from_toml_str(&format!("[retention]\nmax_age_days = {days}\n"))
            .map_err(|err| err.to_string())?;
        check(config.retention.max_age_days == days, "retention value kept")?;
    }
    Ok(())
}

#[test]
fn restore_rejects_non_positive_claim_ttl() -> TestResult {
    assert_invalid(
        TrashConfig::from_toml_str("[restore]\nclaim_ttl_secs = 0\n"),
        "restore.claim_ttl_secs must be between 1 and 86400",
    )
}

#[test]
fn restore_rejects_blank_operator() -> TestResult {
    assert_invalid(
        TrashConfig::from_toml_str("[restore]\noperator = \"  \"\n"),
        "restore.operator must be non-empty",
    )
}

#[test]
fn host_rejects_invalid_template_and_root_path() -> TestResult {
    assert_invalid(
        TrashConfig::from_toml_str("[host]\ndefault_template_id = 0\n"),
        "host.default_template_id must be greater than zero",
    )?;
    assert_invalid(TrashConfig::from_toml_str("[host]\nroot_path = \"\"\n"), "host.root_path")
}

#[test]
fn database_rejects_blank_path_and_huge_timeout() -> TestResult {
    assert_invalid(
        TrashConfig::from_toml_str("[database]\npath = \"\"\n"),
        "database.path must be non-empty",
    )?;
    assert_invalid(
        TrashConfig::from_toml_str("[database]\nbusy_timeout_ms = 600001\n"),
        "database.busy_timeout_ms must be at most 600000",
    )
}

#[test]
fn database_maps_to_store_config() -> TestResult {
    let config = TrashConfig::from_toml_str(
        "[database]\npath = \"data/trash.db\"\njournal_mode = \"delete\"\nsync_mode = \
         \"normal\"\nbusy_timeout_ms = 250\n",
    )
    .map_err(|err| err.to_string())?;
    let store = config.database.store_config();
    check(store.path == PathBuf::from("data/trash.db"), "store path")?;
    check(store.busy_timeout_ms == 250, "store busy timeout")?;
    check(store.journal_mode == SqliteStoreMode::Delete, "journal mode")?;
    check(store.sync_mode == SqliteSyncMode::Normal, "sync mode")
}

#[test]
fn logging_file_sink_requires_path() -> TestResult {
    assert_invalid(
        TrashConfig::from_toml_str("[logging]\nsink = \"file\"\n"),
        "file logging requires logging.path",
    )?;
    assert_invalid(
        TrashConfig::from_toml_str("[logging]\nsink = \"none\"\npath = \"x.log\"\n"),
        "logging.path is only valid with sink = \"file\"",
    )?;
    let config = TrashConfig::from_toml_str("[logging]\nsink = \"none\"\n")
        .map_err(|err| err.to_string())?;
    check(config.logging.sink == LogSink::Disabled, "none sink parses")
}

#[test]
fn admin_rejects_blank_login() -> TestResult {
    assert_invalid(
        TrashConfig::from_toml_str("[admin]\nlogin = \"\"\nis_admin = true\n"),
        "admin.login must be non-empty",
    )
}

#[test]
fn engine_and_admin_views_follow_sections() -> TestResult {
    let config = TrashConfig::from_toml_str(
        "[host]\nroot_path = \"|root|\"\ndefault_template_id = 9\n\n[restore]\noperator = \
         \"robot\"\nclaim_ttl_secs = 30\n\n[admin]\nlogin = \"ada\"\nis_admin = true\n",
    )
    .map_err(|err| err.to_string())?;
    let engine = config.engine_config();
    check(engine.operator == "robot", "operator")?;
    check(engine.claim_ttl_secs == 30, "claim ttl")?;
    check(engine.root_path == "|root|", "root path")?;
    check(engine.default_template_id == 9, "template")?;
    let admin = config.admin_context();
    check(admin.login == "ada" && admin.is_admin, "admin context")
}
