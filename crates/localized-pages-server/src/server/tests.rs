// crates/localized-pages-server/src/server/tests.rs
// ============================================================================
// Module: Page Server Unit Tests
// Description: In-process router tests for the middleware chain.
// Purpose: Validate stage ordering, localization, and failure isolation.
// Dependencies: localized-pages-server, tower
// ============================================================================

//! ## Overview
//! Drives the assembled router with `tower::ServiceExt::oneshot` against
//! in-memory templates and a recording render log sink.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only router assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::body::Body;
use axum::body::to_bytes;
use axum::extract::State;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use axum::routing::get;
use localized_pages_config::LogSinkType;
use localized_pages_config::PagesConfig;
use localized_pages_core::LocaleCatalog;
use localized_pages_core::RequestStage;
use localized_pages_core::TranslationTable;
use tower::ServiceExt;

use super::PageServer;
use super::ServerError;
use super::ServerState;
use crate::middleware::SharedRequestContext;
use crate::render::render_template;
use crate::render_log::FailureOnlyRenderLogSink;
use crate::render_log::RenderLogEvent;
use crate::render_log::RenderLogSink;
use crate::render_log::RenderOutcome;
use crate::routes::build_router;
use crate::templates::TemplateRegistry;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<RenderLogEvent>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<RenderLogEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

impl RenderLogSink for RecordingSink {
    fn record(&self, event: &RenderLogEvent) {
        self.events.lock().expect("events lock").push(event.clone());
    }
}

const LAYOUT: &str = "<html lang=\"{{ locale }}\"><title>{{ t[\"Application\"] }}</title>\
{% block content %}{{ t[\"No content.\"] }}{% endblock %}</html>";

fn registry(hello: &str) -> TemplateRegistry {
    TemplateRegistry::from_sources([
        ("layout.tmpl", LAYOUT),
        (
            "index.tmpl",
            "{% extends \"layout.tmpl\" %}{% block content %}<h1>{{ t[\"Index Page\"] }}</h1>{% endblock %}",
        ),
        (
            "views/home.tmpl",
            "{% extends \"layout.tmpl\" %}{% block content %}<h1>{{ t[\"Home Page\"] }}</h1>{% endblock %}",
        ),
        ("views/hello.tmpl", hello),
    ])
    .unwrap()
}

const HELLO: &str = "{% extends \"layout.tmpl\" %}{% block content %}<h1>{{ t[\"Hello\"] }}</h1>\
<p>{{ format(t[\"Hello, {name}!\"], vars.name) }}</p>{% endblock %}";

fn fixture(hello: &str) -> (Router, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let state = ServerState::new(registry(hello), sink.clone());
    (build_router(Arc::new(state)), sink)
}

async fn get_page(router: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

// ============================================================================
// SECTION: Routing and Localization
// ============================================================================

#[tokio::test]
async fn index_renders_base_locale_with_content_type() {
    let (router, sink) = fixture(HELLO);
    let (status, content_type, body) = get_page(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert!(body.contains("<html lang=\"en\">"));
    assert!(body.contains("<h1>Index Page</h1>"));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, RenderOutcome::Ok);
    assert_eq!(events[0].stage, RequestStage::Rendered);
    assert_eq!(events[0].template.as_deref(), Some("index.tmpl"));
}

#[tokio::test]
async fn home_uses_spanish_override_and_base_fallback() {
    let (router, _) = fixture(HELLO);
    let (status, _, body) = get_page(&router, "/home?locale=es").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html lang=\"es\">"));
    assert!(body.contains("<h1>Página de inicio</h1>"));
    assert!(body.contains("<title>Application</title>"));
}

#[tokio::test]
async fn hello_formats_path_name_per_locale() {
    let (router, _) = fixture(HELLO);
    let (_, _, english) = get_page(&router, "/hello/Ana").await;
    assert!(english.contains("<h1>Hello</h1>"));
    assert!(english.contains("<p>Hello, Ana!</p>"));
    let (_, _, spanish) = get_page(&router, "/hello/Ana?locale=es").await;
    assert!(spanish.contains("<h1>Hola</h1>"));
    assert!(spanish.contains("<p>¡Hola, Ana!</p>"));
}

#[tokio::test]
async fn locale_codes_are_case_and_region_tolerant() {
    let (router, _) = fixture(HELLO);
    let (_, _, body) = get_page(&router, "/home?locale=ES-mx").await;
    assert!(body.contains("Página de inicio"));
}

#[tokio::test]
async fn malformed_region_subtags_fall_back_to_base() {
    let (router, _) = fixture(HELLO);
    for query in ["es-%40%40", "es_!!", "es-", "%20es%20"] {
        let (status, _, body) = get_page(&router, &format!("/hello/Ana?locale={query}")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<html lang=\"en\">"), "locale {query}");
        assert!(body.contains("<p>Hello, Ana!</p>"), "locale {query}");
    }
}

#[tokio::test]
async fn unknown_locale_falls_back_to_base() {
    let (router, _) = fixture(HELLO);
    let (status, _, body) = get_page(&router, "/home?locale=fr").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html lang=\"en\">"));
    assert!(body.contains("<h1>Home Page</h1>"));
}

#[tokio::test]
async fn first_locale_pair_wins() {
    let (router, _) = fixture(HELLO);
    let (_, _, body) = get_page(&router, "/home?locale=es&locale=en").await;
    assert!(body.contains("Página de inicio"));
}

#[tokio::test]
async fn requests_do_not_share_context() {
    let (router, _) = fixture(HELLO);
    let (_, _, spanish) = get_page(&router, "/hello/Ana?locale=es").await;
    let (_, _, english) = get_page(&router, "/hello/Bob").await;
    assert!(spanish.contains("¡Hola, Ana!"));
    assert!(english.contains("Hello, Bob!"));
    assert!(!english.contains("Ana"));
    assert!(!english.contains("Hola"));
}

#[tokio::test]
async fn custom_catalog_adds_locales() {
    const FR: &[(&str, &str)] = &[("Home Page", "Page d'accueil")];
    let catalog = LocaleCatalog::builtin()
        .clone()
        .with_locale("fr", TranslationTable::from_entries(FR));
    let sink = Arc::new(RecordingSink::default());
    let state = ServerState::new(registry(HELLO), sink).with_catalog(Arc::new(catalog));
    let router = build_router(Arc::new(state));
    let (_, _, body) = get_page(&router, "/home?locale=fr").await;
    assert!(body.contains("<html lang=\"fr\">"));
    assert!(body.contains("Page d&#x27;accueil"));
    assert!(body.contains("<title>Application</title>"));
}

// ============================================================================
// SECTION: Failure Handling
// ============================================================================

#[tokio::test]
async fn render_failure_returns_empty_500_and_logs() {
    let (router, sink) = fixture("partial output {{ vars.nickname }}");
    let (status, content_type, body) = get_page(&router, "/hello/Ana?locale=es").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, RenderOutcome::Error);
    assert_eq!(events[0].stage, RequestStage::RenderFailed);
    assert_eq!(events[0].locale, Some("es"));
    assert_eq!(events[0].status, 500);
    assert!(events[0].error.is_some());

    let (status, _, body) = get_page(&router, "/home").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Home Page"));
}

#[tokio::test]
async fn missing_template_returns_500() {
    let sink = Arc::new(RecordingSink::default());
    let templates = TemplateRegistry::from_sources([("layout.tmpl", LAYOUT)]).unwrap();
    let router = build_router(Arc::new(ServerState::new(templates, sink.clone())));
    let (status, _, _) = get_page(&router, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let events = sink.events();
    assert!(events[0].error.as_deref().unwrap().contains("not found"));
}

#[tokio::test]
async fn handler_without_bound_context_fails_closed() {
    async fn unbound_index(
        State(state): State<Arc<ServerState>>,
        context: SharedRequestContext,
    ) -> Response {
        render_template(&state, "index.tmpl", &context)
    }

    let sink = Arc::new(RecordingSink::default());
    let state = Arc::new(ServerState::new(registry(HELLO), sink.clone()));
    let router = Router::new().route("/", get(unbound_index)).with_state(state);
    let (status, _, body) = get_page(&router, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "context_missing");
}

#[tokio::test]
async fn success_logging_can_be_disabled() {
    let sink = Arc::new(RecordingSink::default());
    let state = ServerState::new(registry(HELLO), sink.clone()).with_log_success(false);
    let router = build_router(Arc::new(state));
    let (status, _, _) = get_page(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn disabled_sink_still_reports_render_failures() {
    let sink = Arc::new(RecordingSink::default());
    let failures = Arc::new(FailureOnlyRenderLogSink::new(sink.clone()));
    let state = ServerState::new(registry("{{ vars.nickname }}"), failures);
    let router = build_router(Arc::new(state));
    let (status, _, _) = get_page(&router, "/home").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = get_page(&router, "/hello/Ana").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, RenderOutcome::Error);
    assert_eq!(events[0].template.as_deref(), Some("views/hello.tmpl"));
}

#[tokio::test]
async fn configured_content_type_is_applied() {
    let sink = Arc::new(RecordingSink::default());
    let state = ServerState::new(registry(HELLO), sink)
        .with_content_type("application/xhtml+xml")
        .unwrap();
    let router = build_router(Arc::new(state));
    let (_, content_type, _) = get_page(&router, "/home").await;
    assert_eq!(content_type.as_deref(), Some("application/xhtml+xml"));
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

#[test]
fn from_config_fails_on_missing_template_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = PagesConfig::default();
    config.templates.dir = dir.path().join("absent");
    config.logging.sink = LogSinkType::None;
    let err = PageServer::from_config(config).err().unwrap();
    assert!(matches!(err, ServerError::Init(_)));
}

#[test]
fn from_config_fails_on_invalid_config() {
    let mut config = PagesConfig::default();
    config.server.bind = "not an address".to_string();
    let err = PageServer::from_config(config).err().unwrap();
    assert!(matches!(err, ServerError::Config(_)));
}

#[test]
fn from_config_opens_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.tmpl"), "ok").unwrap();
    let mut config = PagesConfig::default();
    config.templates.dir = dir.path().to_path_buf();
    config.logging.sink = LogSinkType::File;
    config.logging.path = Some(dir.path().join("render.log"));
    config.logging.log_success = false;
    let server = PageServer::from_config(config).unwrap();
    assert!(server.state().templates().contains("index.tmpl"));
    assert!(!server.state().log_success());
    assert!(dir.path().join("render.log").exists());
}
