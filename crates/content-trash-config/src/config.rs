// crates/content-trash-config/src/config.rs
// ============================================================================
// Module: Content Trash Configuration
// Description: Configuration loading and validation for the content trash.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: content-trash-core, content-trash-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and falls back to documented defaults; unknown
//! keys and out-of-range values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use content_trash_core::AdminContext;
use content_trash_core::DEFAULT_RETENTION_DAYS;
use content_trash_core::RETENTION_CHOICES;
use content_trash_core::TrashEngineConfig;
use content_trash_core::is_retention_choice;
use content_trash_core::runtime::engine::DEFAULT_CLAIM_TTL_SECS;
use content_trash_core::runtime::engine::DEFAULT_OPERATOR;
use content_trash_core::runtime::engine::DEFAULT_ROOT_PATH;
use content_trash_core::runtime::engine::DEFAULT_TEMPLATE_ID;
use content_trash_store_sqlite::SqliteStoreConfig;
use content_trash_store_sqlite::SqliteStoreMode;
use content_trash_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "content-trash.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONTENT_TRASH_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default database filename.
const DEFAULT_DATABASE_PATH: &str = "content-trash.db";
/// Maximum `SQLite` busy timeout in milliseconds.
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 600_000;
/// Maximum restore claim TTL in seconds (one day).
pub(crate) const MAX_CLAIM_TTL_SECS: i64 = 86_400;
/// Maximum length of a login or operator name.
pub(crate) const MAX_LOGIN_LENGTH: usize = 128;
/// Maximum length of the root container path.
pub(crate) const MAX_ROOT_PATH_LENGTH: usize = 255;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Content trash configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrashConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Host content system settings.
    #[serde(default)]
    pub host: HostConfig,
    /// Retention window for archived items.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Restore settings.
    #[serde(default)]
    pub restore: RestoreConfig,
    /// Structured event logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Caller presented to admin actions.
    #[serde(default)]
    pub admin: AdminConfig,
}

impl TrashConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.host.validate()?;
        self.retention.validate()?;
        self.restore.validate()?;
        self.logging.validate()?;
        self.admin.validate()?;
        Ok(())
    }

    /// Returns the engine configuration derived from `[host]` and `[restore]`.
    #[must_use]
    pub fn engine_config(&self) -> TrashEngineConfig {
        TrashEngineConfig {
            operator: self.restore.operator.clone(),
            claim_ttl_secs: self.restore.claim_ttl_secs,
            root_path: self.host.root_path.clone(),
            default_template_id: self.host.default_template_id,
        }
    }

    /// Returns the admin caller described by `[admin]`.
    #[must_use]
    pub fn admin_context(&self) -> AdminContext {
        AdminContext {
            login: self.admin.login.clone(),
            is_admin: self.admin.is_admin,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `SQLite` database path shared by the archive and the host tables.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl DatabaseConfig {
    /// Validates database configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("database.path", &self.path.to_string_lossy())?;
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "database.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    /// Returns the `SQLite` store configuration.
    #[must_use]
    pub fn store_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }
}

/// Host content system settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Whether the host keeps a working revision next to the live one.
    #[serde(default)]
    pub versioning: bool,
    /// Template assigned when an archived item carries none.
    #[serde(default = "default_template_id")]
    pub default_template_id: i64,
    /// Path assigned to items restored under the root container.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            versioning: false,
            default_template_id: default_template_id(),
            root_path: default_root_path(),
        }
    }
}

impl HostConfig {
    /// Validates host settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_template_id <= 0 {
            return Err(ConfigError::Invalid(
                "host.default_template_id must be greater than zero".to_string(),
            ));
        }
        if self.root_path.is_empty() || self.root_path.len() > MAX_ROOT_PATH_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "host.root_path must be 1 to {MAX_ROOT_PATH_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// Retention window for archived items.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Days an archived item is kept; `0` disables purging.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_days: default_max_age_days(),
        }
    }
}

impl RetentionConfig {
    /// Validates the retention choice.
    fn validate(&self) -> Result<(), ConfigError> {
        if !is_retention_choice(self.max_age_days) {
            let choices: Vec<String> =
                RETENTION_CHOICES.iter().map(ToString::to_string).collect();
            return Err(ConfigError::Invalid(format!(
                "retention.max_age_days must be one of {}",
                choices.join(", ")
            )));
        }
        Ok(())
    }
}

/// Restore settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestoreConfig {
    /// Login recorded on restored rows when no caller is known.
    #[serde(default = "default_operator")]
    pub operator: String,
    /// Seconds after which an abandoned restore claim may be taken over.
    #[serde(default = "default_claim_ttl_secs")]
    pub claim_ttl_secs: i64,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            operator: default_operator(),
            claim_ttl_secs: default_claim_ttl_secs(),
        }
    }
}

impl RestoreConfig {
    /// Validates restore settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_login("restore.operator", &self.operator)?;
        if self.claim_ttl_secs <= 0 || self.claim_ttl_secs > MAX_CLAIM_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "restore.claim_ttl_secs must be between 1 and {MAX_CLAIM_TTL_SECS}"
            )));
        }
        Ok(())
    }
}

/// Event sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSink {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `logging.path`.
    File,
    /// Discard events.
    #[serde(rename = "none")]
    Disabled,
}

/// Structured event logging.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Sink receiving trash events.
    #[serde(default)]
    pub sink: LogSink,
    /// Log file path for the `file` sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Validates logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSink::File, Some(path)) => {
                validate_path_string("logging.path", &path.to_string_lossy())
            }
            (LogSink::File, None) => {
                Err(ConfigError::Invalid("file logging requires logging.path".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "logging.path is only valid with sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// Caller presented to admin actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Caller login.
    #[serde(default = "default_operator")]
    pub login: String,
    /// Whether the caller holds admin privileges.
    #[serde(default)]
    pub is_admin: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            login: default_operator(),
            is_admin: false,
        }
    }
}

impl AdminConfig {
    /// Validates admin settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_login("admin.login", &self.login)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a login-style identifier.
fn validate_login(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_LOGIN_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "{field} must be at most {MAX_LOGIN_LENGTH} characters"
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ConfigError::Invalid(format!("{field} must not contain control characters")));
    }
    Ok(())
}

/// Default database path.
fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

/// Default busy timeout for the `SQLite` store (ms).
pub(crate) const fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Default template id for restored items.
pub(crate) const fn default_template_id() -> i64 {
    DEFAULT_TEMPLATE_ID
}

/// Default root container path.
fn default_root_path() -> String {
    DEFAULT_ROOT_PATH.to_string()
}

/// Default retention window in days.
pub(crate) const fn default_max_age_days() -> i64 {
    DEFAULT_RETENTION_DAYS
}

/// Default operator login.
fn default_operator() -> String {
    DEFAULT_OPERATOR.to_string()
}

/// Default restore claim TTL in seconds.
pub(crate) const fn default_claim_ttl_secs() -> i64 {
    DEFAULT_CLAIM_TTL_SECS
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use std::path::Path;

    use super::resolve_path;
    use super::validate_login;
    use super::validate_path_string;

    #[test]
    fn explicit_path_wins_over_defaults() {
        let resolved = resolve_path(Some(Path::new("custom.toml"))).unwrap();
        assert_eq!(resolved, Path::new("custom.toml"));
    }

    #[test]
    fn blank_paths_are_rejected() {
        assert!(validate_path_string("database.path", "   ").is_err());
        assert!(validate_path_string("database.path", "data/trash.db").is_ok());
    }

    #[test]
    fn logins_reject_control_characters() {
        assert!(validate_login("admin.login", "ad\nmin").is_err());
        assert!(validate_login("admin.login", "editor").is_ok());
    }
}
