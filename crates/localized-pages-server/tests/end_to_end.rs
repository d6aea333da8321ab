// crates/localized-pages-server/tests/end_to_end.rs
// ============================================================================
// Module: End-to-End Page Tests
// Description: Live HTTP tests against the shipped templates.
// Purpose: Exercise the full middleware chain over a real socket.
// ============================================================================

//! End-to-end tests serving the workspace templates over loopback.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use localized_pages_config::LogSinkType;
use localized_pages_config::PagesConfig;
use localized_pages_server::PageServer;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn workspace_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RunningServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap();
    }
}

async fn start(config: PagesConfig) -> RunningServer {
    let server = PageServer::from_config(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, signal) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve_with_shutdown(listener, async move {
                let _ = signal.await;
            })
            .await
            .unwrap();
    });
    RunningServer {
        addr,
        shutdown,
        handle,
    }
}

fn config_for(dir: PathBuf) -> PagesConfig {
    let mut config = PagesConfig::default();
    config.templates.dir = dir;
    config.logging.sink = LogSinkType::None;
    config
}

async fn fetch(url: &str) -> (u16, Option<String>, String) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|value| value.to_str().unwrap().to_string());
    (status, content_type, response.text().await.unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn shipped_templates_render_every_route() -> TestResult {
    let server = start(config_for(workspace_templates())).await;

    let (status, content_type, body) = fetch(&server.url("/")).await;
    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert!(body.contains("<html lang=\"en\">"));
    assert!(body.contains("<h1>Index Page</h1>"));

    let (_, _, body) = fetch(&server.url("/home?locale=es")).await;
    assert!(body.contains("<h1>Página de inicio</h1>"));
    assert!(body.contains("<title>Application</title>"));

    let (_, _, body) = fetch(&server.url("/hello/Ana?locale=es")).await;
    assert!(body.contains("<h1>Hola</h1>"));
    assert!(body.contains("¡Hola, Ana!"));

    let (_, _, body) = fetch(&server.url("/hello/Ana?locale=fr")).await;
    assert!(body.contains("<h1>Hello</h1>"));
    assert!(body.contains("Hello, Ana!"));

    server.stop().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_requests_keep_their_own_locale() -> TestResult {
    let server = start(config_for(workspace_templates())).await;
    let mut tasks = Vec::new();
    for index in 0 .. 16 {
        let (locale, greeting) = if index % 2 == 0 { ("es", "¡Hola") } else { ("en", "Hello,") };
        let url = server.url(&format!("/hello/user{index}?locale={locale}"));
        tasks.push(tokio::spawn(async move {
            let (status, _, body) = fetch(&url).await;
            assert_eq!(status, 200);
            assert!(body.contains(&format!("{greeting} user{index}!")), "{body}");
        }));
    }
    for task in tasks {
        task.await?;
    }
    server.stop().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn broken_template_fails_only_its_route() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("views"))?;
    fs::copy(workspace_templates().join("layout.tmpl"), dir.path().join("layout.tmpl"))?;
    fs::copy(workspace_templates().join("index.tmpl"), dir.path().join("index.tmpl"))?;
    fs::copy(
        workspace_templates().join("views/home.tmpl"),
        dir.path().join("views/home.tmpl"),
    )?;
    fs::write(dir.path().join("views/hello.tmpl"), "<p>{{ vars.nickname }}</p>")?;

    let server = start(config_for(dir.path().to_path_buf())).await;
    let (status, _, body) = fetch(&server.url("/hello/Ana")).await;
    assert_eq!(status, 500);
    assert!(body.is_empty());

    let (status, _, body) = fetch(&server.url("/home")).await;
    assert_eq!(status, 200);
    assert!(body.contains("Home Page"));
    server.stop().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn render_failures_reach_file_log() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("index.tmpl"), "{{ vars.missing }}")?;
    let log_path = dir.path().join("render.log");
    let mut config = config_for(dir.path().to_path_buf());
    config.logging.sink = LogSinkType::File;
    config.logging.path = Some(log_path.clone());

    let server = start(config).await;
    let (status, _, _) = fetch(&server.url("/?locale=es")).await;
    assert_eq!(status, 500);
    server.stop().await;

    let contents = fs::read_to_string(&log_path)?;
    let event: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap())?;
    assert_eq!(event["event"], "render");
    assert_eq!(event["outcome"], "error");
    assert_eq!(event["stage"], "render_failed");
    assert_eq!(event["locale"], "es");
    assert_eq!(event["template"], "index.tmpl");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_locale_serves_base_greeting() -> TestResult {
    let server = start(config_for(workspace_templates())).await;
    let (status, _, body) = fetch(&server.url("/hello/Ada?locale=es-%40%40")).await;
    assert_eq!(status, 200);
    assert!(body.contains("Hello, Ada!"));
    assert!(!body.contains("Hola"));
    server.stop().await;
    Ok(())
}
