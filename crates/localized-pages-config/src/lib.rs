// crates/localized-pages-config/src/lib.rs
// ============================================================================
// Module: Localized Pages Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for localized-pages.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `localized-pages-config` defines the configuration model for the Localized
//! Pages server. It provides strict, fail-closed validation: an invalid file
//! never yields a partially applied configuration.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
