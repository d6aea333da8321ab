// crates/localized-pages-core/src/stage.rs
// ============================================================================
// Module: Request Stages
// Description: Per-request pipeline stage labels.
// Purpose: Record how far a request progressed through the pipeline.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each request moves through a fixed sequence of stages: context bound,
//! localization resolved, content type set, then rendering. The stage is
//! carried on the request context and reported in render log events.

use serde::Serialize;

/// Pipeline stage reached by a request.
///
/// Stages advance strictly in declaration order and each transition happens
/// at most once per request. `Rendered` and `RenderFailed` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStage {
    /// No context has been bound yet.
    #[default]
    Unbound,
    /// A fresh context is bound to the request.
    ContextBound,
    /// Translations have been merged into the context.
    LocalizationResolved,
    /// The response content type is fixed.
    ContentTypeSet,
    /// The template engine is executing.
    Rendering,
    /// Rendering finished successfully.
    Rendered,
    /// Rendering failed; the response status is 500.
    RenderFailed,
}

impl RequestStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::ContextBound => "context_bound",
            Self::LocalizationResolved => "localization_resolved",
            Self::ContentTypeSet => "content_type_set",
            Self::Rendering => "rendering",
            Self::Rendered => "rendered",
            Self::RenderFailed => "render_failed",
        }
    }

    /// Returns true for `Rendered` and `RenderFailed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rendered | Self::RenderFailed)
    }
}
