// crates/localized-pages-server/src/render_log.rs
// ============================================================================
// Module: Render Logging
// Description: Structured render events for page requests.
// Purpose: Report render outcomes and setup failures as JSON lines.
// Dependencies: localized-pages-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Render events are serialized as one JSON object per line and handed to a
//! [`RenderLogSink`]. Sink write failures are swallowed: logging must never
//! change the outcome of a request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use localized_pages_core::RequestContext;
use localized_pages_core::RequestStage;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Render outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    /// Template rendered.
    Ok,
    /// Request failed with a server error.
    Error,
}

/// Render event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RenderLogEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Template name when known.
    pub template: Option<String>,
    /// Effective locale when a context was available.
    pub locale: Option<&'static str>,
    /// Stage the request reached.
    pub stage: RequestStage,
    /// HTTP status returned.
    pub status: u16,
    /// Outcome classification.
    pub outcome: RenderOutcome,
    /// Error description on failure.
    pub error: Option<String>,
}

impl RenderLogEvent {
    /// Event for a successful render.
    #[must_use]
    pub fn rendered(template: &str, context: &RequestContext) -> Self {
        Self {
            event: "render",
            timestamp_ms: now_ms(),
            template: Some(template.to_string()),
            locale: Some(context.locale()),
            stage: context.stage(),
            status: 200,
            outcome: RenderOutcome::Ok,
            error: None,
        }
    }

    /// Event for a failed render.
    #[must_use]
    pub fn render_failed(template: &str, context: &RequestContext, error: &str) -> Self {
        Self {
            event: "render",
            timestamp_ms: now_ms(),
            template: Some(template.to_string()),
            locale: Some(context.locale()),
            stage: context.stage(),
            status: 500,
            outcome: RenderOutcome::Error,
            error: Some(error.to_string()),
        }
    }

    /// Event for a request that reached `step` without a bound context.
    #[must_use]
    pub fn context_missing(step: &str) -> Self {
        Self {
            event: "context_missing",
            timestamp_ms: now_ms(),
            template: None,
            locale: None,
            stage: RequestStage::Unbound,
            status: 500,
            outcome: RenderOutcome::Error,
            error: Some(format!("request context not bound before {step}")),
        }
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for render events.
pub trait RenderLogSink: Send + Sync {
    /// Record a render event.
    fn record(&self, event: &RenderLogEvent);
}

/// Sink that logs JSON lines to stderr.
pub struct StderrRenderLogSink;

impl RenderLogSink for StderrRenderLogSink {
    fn record(&self, event: &RenderLogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileRenderLogSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileRenderLogSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RenderLogSink for FileRenderLogSink {
    fn record(&self, event: &RenderLogEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that forwards only failure events and drops successful renders.
///
/// Selected by `sink = "none"`: render failures are always reported.
pub struct FailureOnlyRenderLogSink {
    /// Sink receiving failure events.
    inner: Arc<dyn RenderLogSink>,
}

impl FailureOnlyRenderLogSink {
    /// Wraps `inner` so that only failure events reach it.
    #[must_use]
    pub fn new(inner: Arc<dyn RenderLogSink>) -> Self {
        Self {
            inner,
        }
    }
}

impl RenderLogSink for FailureOnlyRenderLogSink {
    fn record(&self, event: &RenderLogEvent) {
        if event.outcome == RenderOutcome::Error {
            self.inner.record(event);
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only file sink assertions."
    )]

    use std::sync::Arc;

    use localized_pages_core::LocaleCatalog;
    use localized_pages_core::RequestContext;
    use localized_pages_core::localize;
    use serde_json::Value;

    use super::FailureOnlyRenderLogSink;
    use super::FileRenderLogSink;
    use super::RenderLogEvent;
    use super::RenderLogSink;

    #[test]
    fn file_sink_appends_one_json_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.log");
        let sink = FileRenderLogSink::new(&path).unwrap();
        let mut context = RequestContext::new();
        localize(&mut context, LocaleCatalog::builtin(), Some("es"));
        sink.record(&RenderLogEvent::rendered("index.tmpl", &context));
        sink.record(&RenderLogEvent::render_failed("views/hello.tmpl", &context, "boom"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> =
            contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["outcome"], "ok");
        assert_eq!(lines[0]["locale"], "es");
        assert_eq!(lines[0]["stage"], "localization_resolved");
        assert_eq!(lines[1]["status"], 500);
        assert_eq!(lines[1]["error"], "boom");
    }

    #[test]
    fn failure_only_sink_drops_successes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.log");
        let file = Arc::new(FileRenderLogSink::new(&path).unwrap());
        let sink = FailureOnlyRenderLogSink::new(file);
        let context = RequestContext::new();
        sink.record(&RenderLogEvent::rendered("index.tmpl", &context));
        sink.record(&RenderLogEvent::render_failed("index.tmpl", &context, "boom"));
        sink.record(&RenderLogEvent::context_missing("render"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> =
            contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "render");
        assert_eq!(lines[0]["error"], "boom");
        assert_eq!(lines[1]["event"], "context_missing");
        assert!(lines.iter().all(|line| line["outcome"] == "error"));
    }

    #[test]
    fn context_missing_event_names_step() {
        let event = RenderLogEvent::context_missing("localize");
        assert_eq!(event.event, "context_missing");
        assert!(event.error.unwrap().contains("localize"));
    }
}
