// crates/localized-pages-core/src/catalog.rs
// ============================================================================
// Module: Locale Catalog
// Description: Compiled-in translation tables keyed by locale code.
// Purpose: Provide the read-only base and override tables used per request.
// Dependencies: Standard library collections and synchronization primitives.
// ============================================================================

//! ## Overview
//! The locale catalog maps a locale code to a flat key -> string translation
//! table. The base table (`en`) is always present and complete; every other
//! table may be partial and only overrides the keys it names.
//!
//! ## Invariants
//! - The catalog is built once and read-only thereafter.
//! - [`LocaleCatalog::base`] always returns the `en` table.
//! - Unknown locale codes resolve to "not found", never to an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::localization::LocaleResolution;
use crate::merge::merge_into;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Locale code of the base (fallback) table.
pub const BASE_LOCALE: &str = "en";

/// Compiled-in English entries; this table is complete.
const CATALOG_EN: &[(&str, &str)] = &[
    ("Application", "Application"),
    ("Home", "Home"),
    ("No content.", "No content."),
    ("Index Page", "Index Page"),
    ("Home Page", "Home Page"),
    ("Hello", "Hello"),
    ("Hello, {name}!", "Hello, %s!"),
];

/// Compiled-in Spanish entries; partial override of the English table.
const CATALOG_ES: &[(&str, &str)] = &[
    ("Home Page", "Página de inicio"),
    ("Hello", "Hola"),
    ("Hello, {name}!", "¡Hola, %s!"),
];

// ============================================================================
// SECTION: Translation Table
// ============================================================================

/// Immutable key -> translated string mapping for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    /// Ordered translation entries.
    entries: BTreeMap<&'static str, &'static str>,
}

impl TranslationTable {
    /// Builds a table from a static entry slice; later duplicates win.
    #[must_use]
    pub fn from_entries(entries: &'static [(&'static str, &'static str)]) -> Self {
        let mut table = BTreeMap::new();
        merge_into(&mut table, entries.iter().copied());
        Self {
            entries: table,
        }
    }

    /// Returns the translation for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries.get(key).copied()
    }

    /// Returns true when the table has an entry for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, *value))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Read-only mapping from locale code to translation table.
///
/// # Invariants
/// - The base table is stored separately and can never be absent.
/// - Override codes are lowercase primary language subtags.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    /// Base (`en`) table.
    base: TranslationTable,
    /// Partial override tables keyed by locale code.
    overrides: BTreeMap<&'static str, TranslationTable>,
}

impl LocaleCatalog {
    /// Creates a catalog holding only the base table.
    #[must_use]
    pub const fn new(base: TranslationTable) -> Self {
        Self {
            base,
            overrides: BTreeMap::new(),
        }
    }

    /// Adds a locale table. Supplying [`BASE_LOCALE`] replaces the base table.
    #[must_use]
    pub fn with_locale(mut self, code: &'static str, table: TranslationTable) -> Self {
        if code == BASE_LOCALE {
            self.base = table;
        } else {
            self.overrides.insert(code, table);
        }
        self
    }

    /// Returns the process-wide compiled-in catalog.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<LocaleCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::new(TranslationTable::from_entries(CATALOG_EN))
                .with_locale("es", TranslationTable::from_entries(CATALOG_ES))
        })
    }

    /// Returns the base table.
    #[must_use]
    pub const fn base(&self) -> &TranslationTable {
        &self.base
    }

    /// Looks up the table for a locale code, including the base code.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&TranslationTable> {
        let normalized = normalize_locale_code(code)?;
        if normalized == BASE_LOCALE {
            return Some(&self.base);
        }
        self.overrides.get(normalized.as_str())
    }

    /// Looks up an override table; the base code never yields one.
    #[must_use]
    pub fn override_for(&self, code: &str) -> Option<(&'static str, &TranslationTable)> {
        let normalized = normalize_locale_code(code)?;
        self.overrides.get_key_value(normalized.as_str()).map(|(code, table)| (*code, table))
    }

    /// Lists every known locale code, base first.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(BASE_LOCALE).chain(self.overrides.keys().copied())
    }

    /// Resolves the translations for an optional requested locale.
    ///
    /// The base table is always applied first; a recognized non-base locale
    /// is merged over it. Absent, empty, base, or unknown codes yield only
    /// the base table.
    #[must_use]
    pub fn resolve(
        &self,
        requested: Option<&str>,
    ) -> (BTreeMap<&'static str, &'static str>, LocaleResolution) {
        let mut translations = BTreeMap::new();
        merge_into(&mut translations, self.base.iter());
        match requested.and_then(|code| self.override_for(code)) {
            Some((code, table)) => {
                merge_into(&mut translations, table.iter());
                (translations, LocaleResolution::Override(code))
            }
            None => (translations, LocaleResolution::Base),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Normalizes a locale code to its lowercase primary language subtag.
///
/// Subtags are separated by `-` or `_` and matched case-insensitively
/// (`"ES-mx"` becomes `"es"`). Returns `None` unless the primary subtag is
/// ASCII alphabetic and every further subtag is non-empty ASCII alphanumeric.
/// Surrounding whitespace is not trimmed and makes the code malformed.
#[must_use]
pub fn normalize_locale_code(value: &str) -> Option<String> {
    let mut subtags = value.split(['-', '_']);
    let primary = subtags.next()?;
    if primary.is_empty() || !primary.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return None;
    }
    let well_formed = subtags
        .all(|subtag| !subtag.is_empty() && subtag.chars().all(|ch| ch.is_ascii_alphanumeric()));
    well_formed.then(|| primary.to_ascii_lowercase())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
