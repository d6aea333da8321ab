// crates/localized-pages-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Route every user-facing CLI string through one localized catalog.
// Dependencies: localized-pages-core
// ============================================================================

//! ## Overview
//! CLI messages live in a [`LocaleCatalog`] with the same fallback rules the
//! server applies to page translations: English is the complete base table,
//! other locales override a subset of keys, and anything missing falls back to
//! English. All runtime output should be routed through the [`t!`](crate::t)
//! macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use localized_pages_core::LocaleCatalog;
use localized_pages_core::TranslationTable;
use localized_pages_core::normalize_locale_code;

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
    /// Spanish.
    Es,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_locale_code(value)?.as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Es];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
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

/// English catalog entries; every key must appear here.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "localized-pages {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("serve.init_failed", "Failed to initialize server: {error}"),
    ("serve.listening", "Listening on http://{addr}"),
    ("serve.failed", "Server failed: {error}"),
    ("serve.stopped", "Server stopped."),
    ("templates.load_failed", "Failed to load templates from {path}: {error}"),
    ("templates.list.header", "Templates in {path}:"),
    ("templates.list.entry", "  {name}"),
    ("templates.list.missing", "  {name} (missing; required by a route)"),
    ("templates.list.empty", "  (none)"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected en or es."),
];

/// Spanish overrides; keys must be a subset of the English catalog.
const CATALOG_ES: &[(&str, &str)] = &[
    ("output.write_failed", "No se pudo escribir en {stream}: {error}"),
    ("output.stream.unknown", "salida"),
    ("config.load_failed", "No se pudo cargar la configuración: {error}"),
    ("config.validate.ok", "Configuración válida."),
    ("serve.init_failed", "No se pudo inicializar el servidor: {error}"),
    ("serve.listening", "Escuchando en http://{addr}"),
    ("serve.failed", "El servidor falló: {error}"),
    ("serve.stopped", "Servidor detenido."),
    ("templates.load_failed", "No se pudieron cargar las plantillas de {path}: {error}"),
    ("templates.list.header", "Plantillas en {path}:"),
    ("templates.list.missing", "  {name} (falta; la requiere una ruta)"),
    ("templates.list.empty", "  (ninguna)"),
    ("i18n.lang.invalid_env", "Valor no válido para {env}: {value}. Se esperaba en o es."),
];

/// Returns the CLI message catalog.
#[must_use]
pub fn catalog() -> &'static LocaleCatalog {
    static CATALOG: OnceLock<LocaleCatalog> = OnceLock::new();

    CATALOG.get_or_init(|| {
        LocaleCatalog::new(TranslationTable::from_entries(CATALOG_EN))
            .with_locale(Locale::Es.as_str(), TranslationTable::from_entries(CATALOG_ES))
    })
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
    let catalog = catalog();
    let template = catalog
        .lookup(locale.as_str())
        .and_then(|table| table.get(key))
        .or_else(|| catalog.base().get(key))
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
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
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
