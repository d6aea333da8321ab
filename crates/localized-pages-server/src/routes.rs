// crates/localized-pages-server/src/routes.rs
// ============================================================================
// Module: Routes
// Description: Route table and handlers for the page server.
// Purpose: Map request paths onto templates behind the middleware chain.
// Dependencies: axum
// ============================================================================

//! ## Overview
//! Three routes render templates. Middleware is layered so that, for every
//! request, the stages run in a fixed order: context binding, localization,
//! content type, then the handler.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::middleware;
use axum::response::Response;
use axum::routing::get;

use crate::middleware::SharedRequestContext;
use crate::middleware::bind_request_context;
use crate::middleware::localize_request;
use crate::middleware::set_content_type;
use crate::render::render_template;
use crate::server::ServerState;

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Template rendered for `GET /`.
pub const INDEX_TEMPLATE: &str = "index.tmpl";
/// Template rendered for `GET /home`.
pub const HOME_TEMPLATE: &str = "views/home.tmpl";
/// Template rendered for `GET /hello/{name}`.
pub const HELLO_TEMPLATE: &str = "views/hello.tmpl";
/// Every template a route renders.
pub const ROUTE_TEMPLATES: [&str; 3] = [INDEX_TEMPLATE, HOME_TEMPLATE, HELLO_TEMPLATE];

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the page router over shared state.
pub fn build_router(state: Arc<ServerState>) -> Router {
    // Layers added later wrap earlier ones, so they run first.
    Router::new()
        .route("/", get(index))
        .route("/home", get(home))
        .route("/hello/{name}", get(hello))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), set_content_type))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), localize_request))
        .layer(middleware::from_fn(bind_request_context))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /`
async fn index(State(state): State<Arc<ServerState>>, context: SharedRequestContext) -> Response {
    render_template(&state, INDEX_TEMPLATE, &context)
}

/// `GET /home`
async fn home(State(state): State<Arc<ServerState>>, context: SharedRequestContext) -> Response {
    render_template(&state, HOME_TEMPLATE, &context)
}

/// `GET /hello/{name}`: exposes the path segment as `vars.name`.
async fn hello(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    context: SharedRequestContext,
) -> Response {
    context.with(|context| context.set_var("name", name));
    render_template(&state, HELLO_TEMPLATE, &context)
}
