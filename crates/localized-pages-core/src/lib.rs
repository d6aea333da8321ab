// crates/localized-pages-core/src/lib.rs
// ============================================================================
// Module: Localized Pages Core Library
// Description: Public API surface for the request-context pipeline primitives.
// Purpose: Expose the locale catalog, request context, and localization step.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Localized Pages core holds everything a request needs before a template is
//! rendered: the compiled-in [`LocaleCatalog`], the per-request
//! [`RequestContext`], and the [`localize`] step that merges the base locale and
//! an optional override into that context. It performs no I/O and knows
//! nothing about HTTP; the server crate threads these types through its
//! middleware chain.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod context;
pub mod format;
pub mod localization;
pub mod merge;
pub mod stage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::BASE_LOCALE;
pub use catalog::LocaleCatalog;
pub use catalog::TranslationTable;
pub use catalog::normalize_locale_code;
pub use context::RequestContext;
pub use format::format_positional;
pub use localization::LocaleResolution;
pub use localization::localize;
pub use merge::merge_into;
pub use stage::RequestStage;
