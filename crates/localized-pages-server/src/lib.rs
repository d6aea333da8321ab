// crates/localized-pages-server/src/lib.rs
// ============================================================================
// Module: Localized Pages Server
// Description: HTTP server rendering localized templates.
// Purpose: Thread a per-request context through middleware into templates.
// Dependencies: localized-pages-core, localized-pages-config, axum, minijinja, tokio
// ============================================================================

//! ## Overview
//! The server runs every request through a fixed chain: bind a fresh
//! [`localized_pages_core::RequestContext`], merge translations for the
//! requested locale, fix the response content type, then hand the context to
//! a route handler whose render step executes a template. Render failures are
//! logged and become 500 responses; they never affect other requests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod middleware;
pub mod render;
pub mod render_log;
pub mod routes;
pub mod server;
pub mod templates;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use middleware::SharedRequestContext;
pub use render::render_template;
pub use render_log::FailureOnlyRenderLogSink;
pub use render_log::FileRenderLogSink;
pub use render_log::RenderLogEvent;
pub use render_log::RenderLogSink;
pub use render_log::RenderOutcome;
pub use render_log::StderrRenderLogSink;
pub use routes::ROUTE_TEMPLATES;
pub use routes::build_router;
pub use server::PageServer;
pub use server::ServerError;
pub use server::ServerState;
pub use templates::RenderError;
pub use templates::TemplateError;
pub use templates::TemplateRegistry;
