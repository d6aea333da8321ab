// crates/localized-pages-server/src/render.rs
// ============================================================================
// Module: Render Step
// Description: Final stage executing a template against the request context.
// Purpose: Turn a populated context into a response, failing closed to 500.
// Dependencies: localized-pages-core, axum
// ============================================================================

//! ## Overview
//! The render step is the only consumer of a fully populated context. The body
//! is buffered so a failing template never leaks partial output: the client
//! sees either the complete page or an empty 500.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use localized_pages_core::RequestStage;

use crate::middleware::SharedRequestContext;
use crate::render_log::RenderLogEvent;
use crate::server::ServerState;

// ============================================================================
// SECTION: Render
// ============================================================================

/// Renders `name` with the bound context.
pub fn render_template(state: &ServerState, name: &str, shared: &SharedRequestContext) -> Response {
    shared.with(|context| {
        context.enter(RequestStage::Rendering);
        match state.templates().render(name, context) {
            Ok(body) => {
                context.enter(RequestStage::Rendered);
                if state.log_success() {
                    state.log().record(&RenderLogEvent::rendered(name, context));
                }
                Response::new(Body::from(body))
            }
            Err(err) => {
                context.enter(RequestStage::RenderFailed);
                state.log().record(&RenderLogEvent::render_failed(name, context, &err.to_string()));
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    })
}
