// crates/localized-pages-server/src/middleware.rs
// ============================================================================
// Module: Request Middleware
// Description: Context binding, localization, and content-type stages.
// Purpose: Populate one request context per request before the handler runs.
// Dependencies: localized-pages-core, axum
// ============================================================================

//! ## Overview
//! Each request gets exactly one [`RequestContext`]. The binding stage wraps
//! it in a [`SharedRequestContext`] handle stored in the request extensions;
//! later stages and the handler clone the handle and mutate the same instance.
//! A stage that finds no handle answers 500 and records a `context_missing`
//! event instead of fabricating a context.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use axum::extract::FromRequestParts;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use localized_pages_core::RequestContext;
use localized_pages_core::RequestStage;
use localized_pages_core::localize;

use crate::render_log::RenderLogEvent;
use crate::server::ServerState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Query parameter naming the requested locale.
pub const LOCALE_QUERY_KEY: &str = "locale";

// ============================================================================
// SECTION: Shared Context
// ============================================================================

/// Handle to the request context bound for a single request.
///
/// # Invariants
/// - Clones share one context; the handle never outlives its request.
#[derive(Debug, Clone)]
pub struct SharedRequestContext(Arc<Mutex<RequestContext>>);

impl SharedRequestContext {
    /// Wraps a freshly created context.
    #[must_use]
    pub fn new(context: RequestContext) -> Self {
        Self(Arc::new(Mutex::new(context)))
    }

    /// Runs `f` with exclusive access to the context.
    pub fn with<R>(&self, f: impl FnOnce(&mut RequestContext) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Returns true when both handles refer to the same context.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl FromRequestParts<Arc<ServerState>> for SharedRequestContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerState>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| context_missing(state, "render"))
    }
}

/// Records a missing-context setup failure and builds the 500 response.
fn context_missing(state: &ServerState, step: &str) -> Response {
    state.log().record(&RenderLogEvent::context_missing(step));
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

// ============================================================================
// SECTION: Stages
// ============================================================================

/// Binds a fresh request context to the request.
pub async fn bind_request_context(mut request: Request, next: Next) -> Response {
    let mut context = RequestContext::new();
    context.enter(RequestStage::ContextBound);
    request.extensions_mut().insert(SharedRequestContext::new(context));
    next.run(request).await
}

/// Merges translations for the requested locale into the bound context.
pub async fn localize_request(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(shared) = request.extensions().get::<SharedRequestContext>() else {
        return context_missing(&state, "localize");
    };
    let requested = requested_locale(request.uri());
    shared.with(|context| localize(context, state.catalog(), requested.as_deref()));
    next.run(request).await
}

/// Marks the content type stage and stamps the configured header on the
/// outgoing response, replacing any value set downstream.
pub async fn set_content_type(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(shared) = request.extensions().get::<SharedRequestContext>() else {
        return context_missing(&state, "set_content_type");
    };
    shared.with(|context| context.enter(RequestStage::ContentTypeSet));
    let mut response = next.run(request).await;
    response.headers_mut().insert(CONTENT_TYPE, state.content_type().clone());
    response
}

/// First `locale` query value; unparseable query strings count as absent.
fn requested_locale(uri: &Uri) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    pairs.into_iter().find(|(key, _)| key == LOCALE_QUERY_KEY).map(|(_, value)| value)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
