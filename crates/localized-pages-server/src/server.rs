// crates/localized-pages-server/src/server.rs
// ============================================================================
// Module: Page Server
// Description: Server state assembly and HTTP lifecycle.
// Purpose: Build immutable shared state from config and serve the router.
// Dependencies: localized-pages-config, localized-pages-core, axum, tokio
// ============================================================================

//! ## Overview
//! [`PageServer`] validates configuration, loads templates, and selects the
//! render log sink before any socket is bound. Every setup failure is fatal:
//! the server never starts with a partial template set. Once built, the
//! [`ServerState`] is read-only and shared by all requests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use localized_pages_config::LogSinkType;
use localized_pages_config::LoggingConfig;
use localized_pages_config::PagesConfig;
use localized_pages_core::LocaleCatalog;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::render_log::FailureOnlyRenderLogSink;
use crate::render_log::FileRenderLogSink;
use crate::render_log::RenderLogSink;
use crate::render_log::StderrRenderLogSink;
use crate::routes::build_router;
use crate::templates::TemplateRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type used when none is configured.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Read-only state shared by every request.
pub struct ServerState {
    /// Locale catalog consulted by the localization stage.
    catalog: Arc<LocaleCatalog>,
    /// Registered templates.
    templates: TemplateRegistry,
    /// Render event sink.
    log: Arc<dyn RenderLogSink>,
    /// Content-Type stamped on every routed response.
    content_type: HeaderValue,
    /// Whether successful renders are logged.
    log_success: bool,
}

impl ServerState {
    /// Builds state with the built-in catalog and default response settings.
    #[must_use]
    pub fn new(templates: TemplateRegistry, log: Arc<dyn RenderLogSink>) -> Self {
        Self {
            catalog: Arc::new(LocaleCatalog::builtin().clone()),
            templates,
            log,
            content_type: HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
            log_success: true,
        }
    }

    /// Builds state from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when templates or the log sink fail to load.
    pub fn from_config(config: &PagesConfig) -> Result<Self, ServerError> {
        let templates =
            TemplateRegistry::load_dir(&config.templates.dir, &config.templates.extensions)
                .map_err(|err| ServerError::Init(err.to_string()))?;
        let log = build_log_sink(&config.logging)?;
        Self::new(templates, log)
            .with_content_type(&config.server.content_type)
            .map(|state| state.with_log_success(config.logging.log_success))
    }

    /// Replaces the locale catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<LocaleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the response content type.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when the value is not a valid header.
    pub fn with_content_type(mut self, content_type: &str) -> Result<Self, ServerError> {
        self.content_type = HeaderValue::from_str(content_type)
            .map_err(|_| ServerError::Config("invalid content type header".to_string()))?;
        Ok(self)
    }

    /// Enables or disables logging of successful renders.
    #[must_use]
    pub const fn with_log_success(mut self, log_success: bool) -> Self {
        self.log_success = log_success;
        self
    }

    /// Locale catalog.
    #[must_use]
    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    /// Template registry.
    #[must_use]
    pub const fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Render log sink.
    #[must_use]
    pub fn log(&self) -> &dyn RenderLogSink {
        self.log.as_ref()
    }

    /// Response content type.
    #[must_use]
    pub const fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    /// Whether successful renders are logged.
    #[must_use]
    pub const fn log_success(&self) -> bool {
        self.log_success
    }
}

/// Selects the render log sink from configuration.
fn build_log_sink(config: &LoggingConfig) -> Result<Arc<dyn RenderLogSink>, ServerError> {
    let sink: Arc<dyn RenderLogSink> = match config.sink {
        LogSinkType::Stderr => Arc::new(StderrRenderLogSink),
        LogSinkType::None => {
            Arc::new(FailureOnlyRenderLogSink::new(Arc::new(StderrRenderLogSink)))
        }
        LogSinkType::File => {
            let path = config.path.as_ref().ok_or_else(|| {
                ServerError::Config("file log sink requires logging.path".to_string())
            })?;
            let sink =
                FileRenderLogSink::new(path).map_err(|err| ServerError::Init(err.to_string()))?;
            Arc::new(sink)
        }
    };
    Ok(sink)
}

// ============================================================================
// SECTION: Page Server
// ============================================================================

/// Page server instance.
pub struct PageServer {
    /// Server configuration.
    config: PagesConfig,
    /// Shared request state.
    state: Arc<ServerState>,
}

impl PageServer {
    /// Builds a new page server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when initialization fails.
    pub fn from_config(mut config: PagesConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let state = Arc::new(ServerState::from_config(&config)?);
        Ok(Self {
            config,
            state,
        })
    }

    /// Shared request state.
    #[must_use]
    pub const fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Assembled router with the full middleware chain.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Binds a listener on the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the address is invalid or binding fails.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr: SocketAddr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))
    }

    /// Serves requests on the configured address until the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serves requests on `listener` until `signal` resolves, then drains
    /// in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the server fails.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Page server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
