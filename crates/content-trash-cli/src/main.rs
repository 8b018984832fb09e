// crates/content-trash-cli/src/main.rs
// ============================================================================
// Module: Content Trash CLI Entry Point
// Description: Command dispatcher for trash administration and hook entry.
// Purpose: Provide a localized CLI over the archive, restore, and purge flows.
// Dependencies: clap, content-trash-config, content-trash-core,
//               content-trash-store-sqlite, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The `content-trash` binary wires the `SQLite` archive store and host
//! repository into a [`TrashEngine`] and exposes the admin actions, the
//! pre-delete hook, the scheduled purge, and schema installation. All
//! user-facing strings are routed through the i18n catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use content_trash_cli::i18n::Locale;
use content_trash_cli::i18n::set_locale;
use content_trash_cli::render::capture_lines;
use content_trash_cli::render::list_rows;
use content_trash_cli::render::purge_line;
use content_trash_cli::render::render_list_text;
use content_trash_cli::render::restore_lines;
use content_trash_cli::t;
use content_trash_config::LogSink;
use content_trash_config::LoggingConfig;
use content_trash_config::TrashConfig;
use content_trash_config::config_toml_example;
use content_trash_core::ArchiveItemId;
use content_trash_core::Clock;
use content_trash_core::EventLevel;
use content_trash_core::FileEventSink;
use content_trash_core::ItemId;
use content_trash_core::LocaleId;
use content_trash_core::NoopContentCache;
use content_trash_core::NoopEventSink;
use content_trash_core::PreDeleteNotice;
use content_trash_core::PublishStatus;
use content_trash_core::RETENTION_CHOICES;
use content_trash_core::StderrEventSink;
use content_trash_core::SystemClock;
use content_trash_core::TrashEngine;
use content_trash_core::TrashEvent;
use content_trash_core::TrashEventSink;
use content_trash_core::is_retention_choice;
use content_trash_store_sqlite::SqliteArchiveStore;
use content_trash_store_sqlite::SqliteContentRepository;
use content_trash_store_sqlite::SqliteDatabase;
use content_trash_store_sqlite::drop_archive_schema;
use content_trash_store_sqlite::install_host_schema;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the output language.
const LANG_ENV: &str = "CONTENT_TRASH_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "content-trash", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `CONTENT_TRASH_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Config file path (defaults to content-trash.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List archived items, newest first.
    List(ListCommand),
    /// Restore an archived item into live storage.
    Restore(ArchiveIdCommand),
    /// Permanently delete one archived item.
    Delete(ArchiveIdCommand),
    /// Permanently delete every archived item.
    Empty(ConfirmCommand),
    /// Delete archived items older than the retention window.
    Purge(PurgeCommand),
    /// Archive an item that is about to be deleted (pre-delete hook).
    Capture(CaptureCommand),
    /// Create the archive tables.
    Install(InstallCommand),
    /// Drop the archive tables.
    Uninstall(ConfirmCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Print a canonical example configuration.
    Example,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
struct ListCommand {
    /// Emit JSON instead of text.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

/// Arguments naming one archive entry.
#[derive(Args, Debug)]
struct ArchiveIdCommand {
    /// Archive entry id.
    #[arg(value_name = "ARCHIVE_ID")]
    archive_id: i64,
}

/// Arguments for destructive commands.
#[derive(Args, Debug)]
struct ConfirmCommand {
    /// Confirm the destructive operation.
    #[arg(long, action = ArgAction::SetTrue)]
    yes: bool,
}

/// Arguments for `purge`.
#[derive(Args, Debug)]
struct PurgeCommand {
    /// Retention window override in days.
    #[arg(long = "max-age-days", value_name = "DAYS")]
    max_age_days: Option<i64>,
}

/// Arguments for `capture`.
#[derive(Args, Debug)]
struct CaptureCommand {
    /// Id of the item being deleted.
    #[arg(long = "item", value_name = "ID")]
    item_id: i64,
    /// Locale the deletion was issued in.
    #[arg(long, value_name = "LOCALE_ID")]
    locale: i64,
    /// Parent id from the delete notification.
    #[arg(long, value_name = "ID", default_value_t = 0)]
    parent: i64,
    /// Item name from the delete notification.
    #[arg(long, value_name = "NAME", default_value = "")]
    name: String,
    /// Publish status code from the delete notification.
    #[arg(long, value_name = "CODE", default_value_t = 0)]
    status: i64,
}

/// Arguments for `install`.
#[derive(Args, Debug)]
struct InstallCommand {
    /// Also create the host content tables (standalone installs).
    #[arg(long = "with-host-schema", action = ArgAction::SetTrue)]
    with_host_schema: bool,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// German.
    De,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::De => Self::De,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Engine over the `SQLite` backends.
type SqliteEngine = TrashEngine<SqliteArchiveStore, SqliteContentRepository, NoopContentCache>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    if let Commands::Config {
        command: ConfigCommand::Example,
    } = command
    {
        return command_config_example();
    }

    load_and_dispatch(cli.config.as_deref(), command)
}

/// Loads the configuration and dispatches `command` against it.
///
/// `capture` reports an unloadable configuration as a warning and succeeds.
fn load_and_dispatch(config_path: Option<&Path>, command: Commands) -> CliResult<ExitCode> {
    let config = match TrashConfig::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            let message = t!("config.load_failed", error = err);
            if let Commands::Capture(command) = &command {
                return Ok(capture_setup_failed(None, command, &message));
            }
            return Err(CliError::new(message));
        }
    };
    dispatch(&config, command)
}

/// Routes a parsed command against a loaded configuration.
fn dispatch(config: &TrashConfig, command: Commands) -> CliResult<ExitCode> {
    match command {
        Commands::List(command) => command_list(config, &command),
        Commands::Restore(command) => command_restore(config, &command),
        Commands::Delete(command) => command_delete(config, &command),
        Commands::Empty(command) => command_empty(config, &command),
        Commands::Purge(command) => command_purge(config, &command),
        Commands::Capture(command) => command_capture(config, &command),
        Commands::Install(command) => command_install(config, &command),
        Commands::Uninstall(command) => command_uninstall(config, &command),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(),
        Commands::Config {
            command: ConfigCommand::Example,
        } => command_config_example(),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Admin Commands
// ============================================================================

/// Executes `list`.
fn command_list(config: &TrashConfig, command: &ListCommand) -> CliResult<ExitCode> {
    let engine = open_engine(config)?;
    let entries = engine
        .admin_list(&config.admin_context())
        .map_err(|err| CliError::new(t!("list.failed", error = err)))?;
    let names = engine
        .repository()
        .locale_names()
        .map_err(|err| CliError::new(t!("list.failed", error = err)))?;
    let rows = list_rows(&entries, &names);
    if command.json {
        let payload = serde_json::to_string_pretty(&rows)
            .map_err(|err| CliError::new(t!("list.serialize_failed", error = err)))?;
        write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    } else {
        write_stdout_line(&render_list_text(&rows))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `restore`.
fn command_restore(config: &TrashConfig, command: &ArchiveIdCommand) -> CliResult<ExitCode> {
    let engine = open_engine(config)?;
    let result = engine
        .admin_restore(&config.admin_context(), ArchiveItemId::new(command.archive_id))
        .map_err(|err| CliError::new(t!("restore.failed", error = err)))?;
    for line in restore_lines(&result) {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `delete`.
fn command_delete(config: &TrashConfig, command: &ArchiveIdCommand) -> CliResult<ExitCode> {
    let engine = open_engine(config)?;
    let archive_id = ArchiveItemId::new(command.archive_id);
    engine
        .admin_delete(&config.admin_context(), archive_id)
        .map_err(|err| CliError::new(t!("delete.failed", error = err)))?;
    write_stdout_line(&t!("delete.ok", archive_id = archive_id))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `empty`.
fn command_empty(config: &TrashConfig, command: &ConfirmCommand) -> CliResult<ExitCode> {
    if !command.yes {
        return Err(CliError::new(t!("empty.confirm_required")));
    }
    let engine = open_engine(config)?;
    let count = engine
        .admin_empty(&config.admin_context())
        .map_err(|err| CliError::new(t!("empty.failed", error = err)))?;
    write_stdout_line(&t!("empty.ok", count = count))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Scheduled and Hook Commands
// ============================================================================

/// Executes `purge`.
fn command_purge(config: &TrashConfig, command: &PurgeCommand) -> CliResult<ExitCode> {
    let max_age_days = command.max_age_days.unwrap_or(config.retention.max_age_days);
    if !is_retention_choice(max_age_days) {
        let choices: Vec<String> = RETENTION_CHOICES.iter().map(ToString::to_string).collect();
        return Err(CliError::new(t!("purge.invalid_age", choices = choices.join(", "))));
    }
    let engine = open_engine(config)?;
    let outcome = engine
        .purge(max_age_days)
        .map_err(|err| CliError::new(t!("purge.failed", error = err)))?;
    write_stdout_line(&purge_line(&outcome))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `capture`. Capture problems are reported but never fail the hook.
fn command_capture(config: &TrashConfig, command: &CaptureCommand) -> CliResult<ExitCode> {
    let engine = match open_engine(config) {
        Ok(engine) => engine,
        Err(err) => {
            return Ok(capture_setup_failed(Some(&config.logging), command, &err.to_string()));
        }
    };
    let notice = PreDeleteNotice {
        item_id: ItemId::new(command.item_id),
        locale: LocaleId::new(command.locale),
        parent_id: ItemId::new(command.parent),
        name: command.name.clone(),
        status: PublishStatus::from_code(command.status),
    };
    let report = engine.capture(&notice);
    for line in capture_lines(&report) {
        let _ = write_stderr_line(&line);
    }
    Ok(ExitCode::SUCCESS)
}

/// Reports a capture that could not start and lets the host delete proceed.
///
/// The event is recorded when `logging` is known and its sink can be opened.
fn capture_setup_failed(
    logging: Option<&LoggingConfig>,
    command: &CaptureCommand,
    message: &str,
) -> ExitCode {
    if let Some(sink) = logging.and_then(|logging| build_sink(logging).ok()) {
        sink.record(
            &TrashEvent::new(
                "capture_failed",
                EventLevel::Error,
                "capture",
                SystemClock.now(),
                message,
            )
            .with_item_id(command.item_id),
        );
    }
    let _ = write_stderr_line(&t!("capture.failed", item_id = command.item_id, error = message));
    ExitCode::SUCCESS
}

// ============================================================================
// SECTION: Schema Commands
// ============================================================================

/// Executes `install`.
fn command_install(config: &TrashConfig, command: &InstallCommand) -> CliResult<ExitCode> {
    let database = open_database(config)?;
    SqliteArchiveStore::new(database.clone())
        .map_err(|err| CliError::new(t!("install.failed", error = err)))?;
    write_stdout_line(&t!("install.ok", path = config.database.path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if command.with_host_schema {
        install_host_schema(&database)
            .map_err(|err| CliError::new(t!("install.failed", error = err)))?;
        write_stdout_line(&t!("install.host_ok"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `uninstall`.
fn command_uninstall(config: &TrashConfig, command: &ConfirmCommand) -> CliResult<ExitCode> {
    if !command.yes {
        return Err(CliError::new(t!("uninstall.confirm_required")));
    }
    let database = open_database(config)?;
    drop_archive_schema(&database)
        .map_err(|err| CliError::new(t!("uninstall.failed", error = err)))?;
    write_stdout_line(&t!("uninstall.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config validate`; loading already validated the file.
fn command_config_validate() -> CliResult<ExitCode> {
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config example`; needs no config file.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_line(config_toml_example().trim_end())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Opens the configured database.
fn open_database(config: &TrashConfig) -> CliResult<SqliteDatabase> {
    SqliteDatabase::open(&config.database.store_config())
        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))
}

/// Builds the event sink selected by `[logging]`.
fn build_sink(logging: &LoggingConfig) -> CliResult<Arc<dyn TrashEventSink>> {
    match (logging.sink, &logging.path) {
        (LogSink::File, Some(path)) => {
            let sink = FileEventSink::new(path).map_err(|err| {
                CliError::new(t!("logging.open_failed", path = path.display(), error = err))
            })?;
            Ok(Arc::new(sink))
        }
        (LogSink::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        _ => Ok(Arc::new(NoopEventSink)),
    }
}

/// Opens the engine over the configured database.
fn open_engine(config: &TrashConfig) -> CliResult<SqliteEngine> {
    let database = open_database(config)?;
    let archive = SqliteArchiveStore::new(database.clone())
        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))?;
    let repository = SqliteContentRepository::new(database, config.host.versioning);
    let events = build_sink(&config.logging)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    Ok(TrashEngine::new(
        config.engine_config(),
        archive,
        repository,
        NoopContentCache,
        events,
        clock,
    ))
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
