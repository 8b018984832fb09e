// crates/content-trash-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Ensure CLI localization remains consistent across supported locales.
// Dependencies: content-trash-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the CLI message catalogs stay in sync, locale parsing is tolerant,
//! and locale templates preserve placeholder parity with English.

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::MessageArg;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;
use crate::i18n::translate;
use crate::i18n::translate_for;

fn placeholder_names(template: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1 ..];
        let end = after.find('}').unwrap_or_else(|| panic!("unclosed placeholder in {template}"));
        let name = &after[.. end];
        assert!(
            !name.is_empty() && name.chars().all(|ch| ch.is_ascii_lowercase() || ch == '_'),
            "placeholder '{name}' in {template} must use [a-z_]"
        );
        names.insert(name.to_string());
        rest = &after[end + 1 ..];
    }
    names
}

#[test]
fn catalogs_have_matching_keys() {
    assert!(SUPPORTED_LOCALES.contains(&Locale::En), "English must remain the baseline locale");
    let en_keys: BTreeSet<&'static str> = catalog_for(Locale::En).keys().copied().collect();
    for locale in SUPPORTED_LOCALES {
        let locale_keys: BTreeSet<&'static str> = catalog_for(*locale).keys().copied().collect();
        assert_eq!(en_keys, locale_keys, "locale catalogs must stay in parity ({locale:?})");
    }
}

#[test]
fn catalogs_have_no_duplicate_keys() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        let unique: BTreeSet<&str> = entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(unique.len(), entries.len(), "duplicate catalog keys in {locale:?}");
    }
}

#[test]
fn catalogs_preserve_placeholders() {
    for (key, template) in catalog_entries_for(Locale::En) {
        let expected = placeholder_names(template);
        for locale in SUPPORTED_LOCALES {
            let localized = catalog_for(*locale).get(key).copied().unwrap();
            assert_eq!(
                placeholder_names(localized),
                expected,
                "placeholders differ for {key} in {}",
                locale.as_str()
            );
        }
    }
}

#[test]
fn locale_parse_is_tolerant() {
    assert_eq!(Locale::parse("EN"), Some(Locale::En));
    assert_eq!(Locale::parse("de-AT"), Some(Locale::De));
    assert_eq!(Locale::parse(" de_DE "), Some(Locale::De));
    assert_eq!(Locale::parse("fr"), None);
    assert_eq!(Locale::parse(""), None);
}

#[test]
fn translate_substitutes_arguments() {
    let message = translate("delete.ok", vec![MessageArg::new("archive_id", "42")]);
    assert_eq!(message, "Deleted archive entry 42.");
}

#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

#[test]
fn translate_for_german_uses_german_catalog() {
    let message = translate_for(Locale::De, "purge.deleted", vec![MessageArg::new("count", "3")]);
    assert_eq!(message, "3 Einträge gelöscht.");
}
