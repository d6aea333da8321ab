// crates/localized-pages-core/src/context.rs
// ============================================================================
// Module: Request Context
// Description: Per-request template variables and resolved translations.
// Purpose: Carry request-scoped state from middleware to the render step.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`RequestContext`] is created empty for every request, enriched by each
//! pipeline stage, and consumed by the render step. It is owned by exactly one
//! request and is never cloned or shared, so it needs no synchronization.
//!
//! Templates see the serialized form:
//! `{ "vars": {..}, "t": {..}, "locale": "en" }`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::BASE_LOCALE;
use crate::catalog::TranslationTable;
use crate::merge::merge_into;
use crate::stage::RequestStage;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Mutable per-request state handed to templates.
///
/// # Invariants
/// - One instance per request; the type is intentionally not `Clone`.
/// - After localization, `translations` holds at least the base entries.
#[derive(Debug, Serialize)]
pub struct RequestContext {
    /// Request-derived template variables.
    vars: BTreeMap<String, String>,
    /// Resolved translation table for the request.
    #[serde(rename = "t")]
    translations: BTreeMap<&'static str, &'static str>,
    /// Effective locale code.
    locale: &'static str,
    /// Pipeline stage reached so far.
    #[serde(skip)]
    stage: RequestStage,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// Creates an empty, unbound context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
            translations: BTreeMap::new(),
            locale: BASE_LOCALE,
            stage: RequestStage::Unbound,
        }
    }

    /// Returns a template variable by name.
    #[must_use]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Sets a template variable, replacing any previous value.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Returns all template variables.
    #[must_use]
    pub const fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    /// Returns the translation for `key`.
    #[must_use]
    pub fn t(&self, key: &str) -> Option<&'static str> {
        self.translations.get(key).copied()
    }

    /// Returns the resolved translations.
    #[must_use]
    pub const fn translations(&self) -> &BTreeMap<&'static str, &'static str> {
        &self.translations
    }

    /// Merges a table into the translations; its entries win on conflict.
    pub fn merge_translations(&mut self, table: &TranslationTable) {
        merge_into(&mut self.translations, table.iter());
    }

    /// Merges an already resolved map into the translations.
    pub(crate) fn merge_resolved(&mut self, resolved: BTreeMap<&'static str, &'static str>) {
        merge_into(&mut self.translations, resolved);
    }

    /// Returns the effective locale code.
    #[must_use]
    pub const fn locale(&self) -> &'static str {
        self.locale
    }

    /// Records the effective locale code.
    pub(crate) const fn set_locale(&mut self, locale: &'static str) {
        self.locale = locale;
    }

    /// Returns the pipeline stage reached so far.
    #[must_use]
    pub const fn stage(&self) -> RequestStage {
        self.stage
    }

    /// Records entry into `stage`.
    pub const fn enter(&mut self, stage: RequestStage) {
        self.stage = stage;
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
