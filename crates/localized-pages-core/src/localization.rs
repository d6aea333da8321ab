// crates/localized-pages-core/src/localization.rs
// ============================================================================
// Module: Localization Step
// Description: Merges base and requested locale tables into a request context.
// Purpose: Resolve per-request translations with silent base fallback.
// Dependencies: crate::{catalog, context, stage}
// ============================================================================

//! ## Overview
//! [`localize`] applies the base table, then the requested locale's table when
//! the catalog recognizes it. Missing, empty, base, malformed, and unknown
//! locale codes are not errors: the context simply keeps the base table.

use crate::catalog::BASE_LOCALE;
use crate::catalog::LocaleCatalog;
use crate::context::RequestContext;
use crate::stage::RequestStage;

/// Outcome of resolving a requested locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleResolution {
    /// Only the base table applies.
    Base,
    /// The named override table was merged over the base table.
    Override(&'static str),
}

impl LocaleResolution {
    /// Returns the effective locale code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Base => BASE_LOCALE,
            Self::Override(code) => code,
        }
    }
}

/// Populates `context` translations for the `requested` locale code.
///
/// Existing keys in the context are overwritten by the base table first and
/// by the override table second; keys unknown to both are kept.
pub fn localize(
    context: &mut RequestContext,
    catalog: &LocaleCatalog,
    requested: Option<&str>,
) -> LocaleResolution {
    let (resolved, resolution) = catalog.resolve(requested);
    context.merge_resolved(resolved);
    context.set_locale(resolution.code());
    context.enter(RequestStage::LocalizationResolved);
    resolution
}
