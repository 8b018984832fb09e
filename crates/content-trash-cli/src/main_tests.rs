// crates/content-trash-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Command Tests
// Description: Unit tests for argument parsing and command handlers.
// Purpose: Exercise every command against a temporary SQLite database.
// Dependencies: content-trash-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Drives the command handlers with configs pointing at a temporary
//! database: install, capture, list, restore, delete, empty, purge, and
//! uninstall, plus locale resolution and clap parsing.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use content_trash_config::TrashConfig;
use content_trash_core::ArchiveStore;
use content_trash_core::AttributeMap;
use content_trash_core::ContentRepository;
use content_trash_core::ItemId;
use content_trash_core::LocaleId;
use content_trash_core::Scalar;
use content_trash_store_sqlite::SqliteArchiveStore;
use content_trash_store_sqlite::SqliteContentRepository;
use content_trash_store_sqlite::SqliteDatabase;
use tempfile::TempDir;

use super::ArchiveIdCommand;
use super::CaptureCommand;
use super::Cli;
use super::Commands;
use super::ConfirmCommand;
use super::InstallCommand;
use super::LangArg;
use super::ListCommand;
use super::Locale;
use super::PurgeCommand;
use super::command_capture;
use super::command_delete;
use super::command_empty;
use super::command_install;
use super::command_list;
use super::command_purge;
use super::command_restore;
use super::command_uninstall;
use super::dispatch;
use super::load_and_dispatch;
use super::resolve_locale;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn config_for(dir: &Path, is_admin: bool) -> TrashConfig {
    let database = dir.join("trash.db");
    TrashConfig::from_toml_str(&format!(
        "[database]\npath = \"{}\"\n\n[logging]\nsink = \"none\"\n\n[admin]\nlogin = \
         \"ada\"\nis_admin = {is_admin}\n",
        database.display().to_string().replace('\\', "/")
    ))
    .unwrap()
}

fn installed(dir: &Path) -> TrashConfig {
    let config = config_for(dir, true);
    let code = command_install(&config, &InstallCommand {
        with_host_schema: true,
    })
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    config
}

fn repository(config: &TrashConfig) -> (SqliteDatabase, SqliteContentRepository) {
    let database = SqliteDatabase::open(&config.database.store_config()).unwrap();
    let repository = SqliteContentRepository::new(database.clone(), false);
    (database, repository)
}

fn seed_item(repository: &SqliteContentRepository, id: i64) {
    let mut row = AttributeMap::new();
    row.insert("id".to_string(), Scalar::Integer(id));
    row.insert("locale_id".to_string(), Scalar::Integer(1));
    row.insert("parent_id".to_string(), Scalar::Integer(0));
    row.insert("name".to_string(), Scalar::text(format!("page-{id}")));
    row.insert("priority".to_string(), Scalar::Integer(1));
    row.insert("status".to_string(), Scalar::Integer(1));
    repository.insert_item(&row).unwrap();
    let mut block = AttributeMap::new();
    block.insert("item_id".to_string(), Scalar::Integer(id));
    block.insert("locale_id".to_string(), Scalar::Integer(1));
    block.insert("revision".to_string(), Scalar::Integer(0));
    block.insert("value1".to_string(), Scalar::text("hello"));
    repository.insert_block(&block).unwrap();
}

fn capture_command(id: i64) -> CaptureCommand {
    CaptureCommand {
        item_id: id,
        locale: 1,
        parent: 0,
        name: format!("page-{id}"),
        status: 1,
    }
}

fn capture(config: &TrashConfig, id: i64) {
    let code = command_capture(config, &capture_command(id)).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

fn archived_ids(database: &SqliteDatabase) -> Vec<i64> {
    let store = SqliteArchiveStore::new(database.clone()).unwrap();
    store.list_items().unwrap().iter().map(|entry| entry.trashed.archive_id.get()).collect()
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn parses_global_config_and_purge_override() {
    let cli = Cli::try_parse_from([
        "content-trash",
        "--config",
        "custom.toml",
        "purge",
        "--max-age-days",
        "7",
    ])
    .unwrap();
    assert_eq!(cli.config.as_deref(), Some(Path::new("custom.toml")));
    match cli.command {
        Some(Commands::Purge(PurgeCommand {
            max_age_days,
        })) => assert_eq!(max_age_days, Some(7)),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn parses_capture_hook_arguments() {
    let cli = Cli::try_parse_from([
        "content-trash",
        "capture",
        "--item",
        "10",
        "--locale",
        "2",
        "--parent",
        "1",
        "--name",
        "About",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Capture(command)) => {
            assert_eq!(command.item_id, 10);
            assert_eq!(command.locale, 2);
            assert_eq!(command.parent, 1);
            assert_eq!(command.name, "About");
            assert_eq!(command.status, 0);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn restore_requires_an_archive_id() {
    assert!(Cli::try_parse_from(["content-trash", "restore"]).is_err());
    assert!(Cli::try_parse_from(["content-trash", "restore", "abc"]).is_err());
}

#[test]
fn locale_resolution_prefers_flag_then_env() {
    assert_eq!(resolve_locale(Some(LangArg::De), Some("en")).unwrap(), Locale::De);
    assert_eq!(resolve_locale(None, Some("de-DE")).unwrap(), Locale::De);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
    let err = resolve_locale(None, Some("xx")).unwrap_err();
    assert!(err.to_string().contains("CONTENT_TRASH_LANG"));
}

// ============================================================================
// SECTION: Commands
// ============================================================================

#[test]
fn capture_list_and_restore_round_trip() {
    let temp = TempDir::new().unwrap();
    let config = installed(temp.path());
    let (database, repository) = repository(&config);
    repository.add_locale(LocaleId::new(1), "English", 1).unwrap();
    seed_item(&repository, 10);

    capture(&config, 10);
    repository.remove_item(ItemId::new(10)).unwrap();
    let ids = archived_ids(&database);
    assert_eq!(ids.len(), 1);
    assert_eq!(
        command_list(&config, &ListCommand {
            json: true,
        })
        .unwrap(),
        ExitCode::SUCCESS
    );

    let code = command_restore(&config, &ArchiveIdCommand {
        archive_id: ids[0],
    })
    .unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(repository.item_exists(ItemId::new(10)).unwrap());
    let restored = repository.load_item(ItemId::new(10), LocaleId::new(1)).unwrap().unwrap();
    assert_eq!(restored.get("update_user"), Some(&Scalar::text("ada")));
    assert!(archived_ids(&database).is_empty());
    let again = command_restore(&config, &ArchiveIdCommand {
        archive_id: ids[0],
    });
    assert!(again.unwrap_err().to_string().contains("not found"));
}

#[test]
fn capture_never_fails_the_hook() {
    let temp = TempDir::new().unwrap();
    let config = installed(temp.path());

    capture(&config, 404);
    capture(&config, 404);

    let (database, _) = repository(&config);
    assert_eq!(archived_ids(&database).len(), 1);
}

#[test]
fn admin_commands_require_admin_privileges() {
    let temp = TempDir::new().unwrap();
    installed(temp.path());
    let config = config_for(temp.path(), false);

    let err = command_list(&config, &ListCommand {
        json: false,
    })
    .unwrap_err();

    assert!(err.to_string().contains("no permission"), "{err}");
}

#[test]
fn delete_and_empty_remove_archive_entries() {
    let temp = TempDir::new().unwrap();
    let config = installed(temp.path());
    let (database, _) = repository(&config);
    for id in [1, 2, 3] {
        capture(&config, id);
    }
    let ids = archived_ids(&database);

    command_delete(&config, &ArchiveIdCommand {
        archive_id: ids[0],
    })
    .unwrap();
    assert_eq!(archived_ids(&database).len(), 2);
    assert!(
        command_delete(&config, &ArchiveIdCommand {
            archive_id: ids[0],
        })
        .is_err()
    );

    let refused = command_empty(&config, &ConfirmCommand {
        yes: false,
    });
    assert!(refused.unwrap_err().to_string().contains("--yes"));
    assert_eq!(archived_ids(&database).len(), 2);
    command_empty(&config, &ConfirmCommand {
        yes: true,
    })
    .unwrap();
    assert!(archived_ids(&database).is_empty());
}

#[test]
fn purge_validates_override_and_keeps_fresh_entries() {
    let temp = TempDir::new().unwrap();
    let config = installed(temp.path());
    let (database, _) = repository(&config);
    capture(&config, 5);

    let err = command_purge(&config, &PurgeCommand {
        max_age_days: Some(45),
    })
    .unwrap_err();
    assert!(err.to_string().contains("--max-age-days must be one of 0, 1, 7"), "{err}");

    for days in [None, Some(0), Some(1)] {
        let code = command_purge(&config, &PurgeCommand {
            max_age_days: days,
        })
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
    assert_eq!(archived_ids(&database).len(), 1);
}

#[test]
fn uninstall_requires_confirmation_and_drops_tables() {
    let temp = TempDir::new().unwrap();
    let config = installed(temp.path());

    assert!(
        dispatch(&config, Commands::Uninstall(ConfirmCommand {
            yes: false,
        }))
        .is_err()
    );
    command_uninstall(&config, &ConfirmCommand {
        yes: true,
    })
    .unwrap();

    let (database, repository) = repository(&config);
    assert!(repository.locales().unwrap().is_empty());
    database.readiness().unwrap();
    let reinstalled = SqliteArchiveStore::new(database).unwrap();
    assert!(reinstalled.list_items().unwrap().is_empty());
}

#[test]
fn capture_succeeds_when_the_store_cannot_open() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("trash.log");
    let config = TrashConfig::from_toml_str(&format!(
        "[database]\npath = \"{}\"\n\n[logging]\nsink = \"file\"\npath = \"{}\"\n",
        temp.path().display(),
        log.display()
    ))
    .unwrap();

    let code = command_capture(&config, &capture_command(7)).unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    let recorded = std::fs::read_to_string(&log).unwrap();
    assert!(recorded.contains("\"capture_failed\""), "{recorded}");
    assert!(recorded.contains("\"item_id\":7"), "{recorded}");
}

#[test]
fn capture_succeeds_when_the_config_cannot_load() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.toml");

    let code = load_and_dispatch(Some(&missing), Commands::Capture(capture_command(7))).unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    let listed = load_and_dispatch(
        Some(&missing),
        Commands::List(ListCommand {
            json: false,
        }),
    );
    assert!(listed.is_err());
}
