// crates/content-trash-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for localization.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The content trash CLI stores user-facing strings in a small translation
//! catalog so messages stay consistent across commands and locales. All
//! runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// German.
    De,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "de" => Some(Self::De),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::De];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "content-trash {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config is valid."),
    ("store.open_failed", "Failed to open database: {error}"),
    ("logging.open_failed", "Failed to open event log {path}: {error}"),
    ("list.empty", "The trash is empty."),
    ("list.header", "{count} archived item(s):"),
    (
        "list.row",
        "#{archive_id} {name} (item {original_id}, parent {parent_id}) container: {container}, \
         status: {status}, deleted: {deleted_at}, blocks: {blocks}, locales: {locales}",
    ),
    ("list.yes", "yes"),
    ("list.no", "no"),
    ("list.status.online", "online"),
    ("list.status.offline", "offline"),
    ("list.locale.unknown", "unknown"),
    ("list.failed", "Failed to list the trash: {error}"),
    ("list.serialize_failed", "Failed to render JSON: {error}"),
    ("restore.ok", "Restored archive entry {archive_id} as item {item_id}."),
    ("restore.new_id", "Restored with new id {new_id} (was {original_id})."),
    (
        "restore.warn.parent_missing",
        "Warning: parent {parent_id} no longer exists; the item was restored under the root.",
    ),
    ("restore.info.ordering", "Info: priority {desired} was taken; assigned {assigned}."),
    ("restore.warn.other", "Warning: {warning}"),
    ("restore.failed", "Restore failed: {error}"),
    ("delete.ok", "Deleted archive entry {archive_id}."),
    ("delete.failed", "Delete failed: {error}"),
    ("empty.confirm_required", "Refusing to empty the trash without --yes."),
    ("empty.ok", "Removed {count} archived item(s)."),
    ("empty.failed", "Emptying the trash failed: {error}"),
    ("purge.disabled", "Retention is disabled; nothing purged."),
    ("purge.none", "No entries found."),
    ("purge.deleted", "{count} entries deleted."),
    ("purge.invalid_age", "--max-age-days must be one of {choices}."),
    ("purge.failed", "Purge failed: {error}"),
    ("capture.archived", "Archived item {item_id} as entry {archive_id} ({blocks} block(s))."),
    ("capture.already", "Item {item_id} is already in the trash."),
    ("capture.partial", "Warning: {count} block(s) of item {item_id} could not be archived."),
    ("capture.failed", "Warning: item {item_id} could not be archived: {error}"),
    ("install.ok", "Archive tables installed in {path}."),
    ("install.host_ok", "Host content tables installed."),
    ("install.failed", "Install failed: {error}"),
    ("uninstall.confirm_required", "Refusing to drop the archive tables without --yes."),
    ("uninstall.ok", "Archive tables removed."),
    ("uninstall.failed", "Uninstall failed: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'de'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static German catalog entries.
const CATALOG_DE: &[(&str, &str)] = &[
    ("main.version", "content-trash {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "Ausgabe"),
    ("output.write_failed", "Schreiben nach {stream} fehlgeschlagen: {error}"),
    ("config.load_failed", "Konfiguration konnte nicht geladen werden: {error}"),
    ("config.validate.ok", "Konfiguration ist gültig."),
    ("store.open_failed", "Datenbank konnte nicht geöffnet werden: {error}"),
    ("logging.open_failed", "Ereignisprotokoll {path} konnte nicht geöffnet werden: {error}"),
    ("list.empty", "Der Papierkorb ist leer."),
    ("list.header", "{count} archivierte(s) Element(e):"),
    (
        "list.row",
        "#{archive_id} {name} (Element {original_id}, Eltern {parent_id}) Container: \
         {container}, Status: {status}, gelöscht: {deleted_at}, Blöcke: {blocks}, Sprachen: \
         {locales}",
    ),
    ("list.yes", "ja"),
    ("list.no", "nein"),
    ("list.status.online", "online"),
    ("list.status.offline", "offline"),
    ("list.locale.unknown", "unbekannt"),
    ("list.failed", "Papierkorb konnte nicht gelistet werden: {error}"),
    ("list.serialize_failed", "JSON konnte nicht erzeugt werden: {error}"),
    ("restore.ok", "Archiveintrag {archive_id} als Element {item_id} wiederhergestellt."),
    ("restore.new_id", "Mit neuer ID {new_id} wiederhergestellt (vorher {original_id})."),
    (
        "restore.warn.parent_missing",
        "Warnung: Eltern {parent_id} existiert nicht mehr; das Element wurde unter der Wurzel \
         wiederhergestellt.",
    ),
    ("restore.info.ordering", "Info: Priorität {desired} war belegt; {assigned} vergeben."),
    ("restore.warn.other", "Warnung: {warning}"),
    ("restore.failed", "Wiederherstellung fehlgeschlagen: {error}"),
    ("delete.ok", "Archiveintrag {archive_id} gelöscht."),
    ("delete.failed", "Löschen fehlgeschlagen: {error}"),
    ("empty.confirm_required", "Der Papierkorb wird ohne --yes nicht geleert."),
    ("empty.ok", "{count} archivierte(s) Element(e) entfernt."),
    ("empty.failed", "Leeren des Papierkorbs fehlgeschlagen: {error}"),
    ("purge.disabled", "Aufbewahrung ist deaktiviert; nichts gelöscht."),
    ("purge.none", "Keine Einträge gefunden."),
    ("purge.deleted", "{count} Einträge gelöscht."),
    ("purge.invalid_age", "--max-age-days muss einer dieser Werte sein: {choices}."),
    ("purge.failed", "Bereinigung fehlgeschlagen: {error}"),
    (
        "capture.archived",
        "Element {item_id} als Eintrag {archive_id} archiviert ({blocks} Block/Blöcke).",
    ),
    ("capture.already", "Element {item_id} liegt bereits im Papierkorb."),
    (
        "capture.partial",
        "Warnung: {count} Block/Blöcke von Element {item_id} konnten nicht archiviert werden.",
    ),
    ("capture.failed", "Warnung: Element {item_id} konnte nicht archiviert werden: {error}"),
    ("install.ok", "Archivtabellen in {path} angelegt."),
    ("install.host_ok", "Host-Inhaltstabellen angelegt."),
    ("install.failed", "Installation fehlgeschlagen: {error}"),
    ("uninstall.confirm_required", "Die Archivtabellen werden ohne --yes nicht entfernt."),
    ("uninstall.ok", "Archivtabellen entfernt."),
    ("uninstall.failed", "Deinstallation fehlgeschlagen: {error}"),
    ("i18n.lang.invalid_env", "Ungültiger Wert für {env}: {value}. Erwartet 'en' oder 'de'."),
    (
        "i18n.disclaimer.machine_translated",
        "Hinweis: Nicht-englische Ausgaben sind maschinell übersetzt und können ungenau sein.",
    ),
];

/// Returns the raw catalog entries for the requested locale.
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::De => CATALOG_DE,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_DE_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::De => CATALOG_DE_MAP.get_or_init(|| CATALOG_DE.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_for(current_locale(), key, args)
}

/// Translates `key` for an explicit `locale`.
#[must_use]
pub fn translate_for(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
