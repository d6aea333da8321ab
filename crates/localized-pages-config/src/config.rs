// crates/localized-pages-config/src/config.rs
// ============================================================================
// Module: Localized Pages Configuration
// Description: Configuration loading and validation for the page server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! An explicitly named file must exist; when only the default name applies and
//! no such file is present, built-in defaults are used. Every loaded value is
//! validated before it is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "localized-pages.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LOCALIZED_PAGES_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of template file extensions.
pub(crate) const MAX_TEMPLATE_EXTENSIONS: usize = 16;
/// Maximum length of a template file extension.
pub(crate) const MAX_TEMPLATE_EXTENSION_LENGTH: usize = 32;
/// Maximum length of the configured content type.
pub(crate) const MAX_CONTENT_TYPE_LENGTH: usize = 256;
/// Default bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default response content type.
const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";
/// Default template directory.
const DEFAULT_TEMPLATE_DIR: &str = "templates";
/// Default template file extension.
const DEFAULT_TEMPLATE_EXTENSION: &str = ".tmpl";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Localized Pages configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagesConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Template directory configuration.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Render log configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PagesConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let mut config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parses and validates configuration from raw TOML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the payload is oversized, not UTF-8,
    /// malformed, or invalid.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.templates.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address (`host:port`).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Value of the `Content-Type` header for every response.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            content_type: default_content_type(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid server.bind: {}", self.bind)))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        let content_type = self.content_type.trim();
        if content_type.is_empty() {
            return Err(ConfigError::Invalid("server.content_type must be set".to_string()));
        }
        if content_type.len() > MAX_CONTENT_TYPE_LENGTH {
            return Err(ConfigError::Invalid("server.content_type exceeds max length".to_string()));
        }
        if !content_type.bytes().all(|byte| byte == b' ' || byte.is_ascii_graphic()) {
            return Err(ConfigError::Invalid(
                "server.content_type must be visible ascii".to_string(),
            ));
        }
        Ok(())
    }
}

/// Template directory configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Directory scanned for templates at startup.
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
    /// File extensions registered as templates (including the leading dot).
    #[serde(default = "default_template_extensions")]
    pub extensions: Vec<String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            extensions: default_template_extensions(),
        }
    }
}

impl TemplatesConfig {
    /// Validates template configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("templates.dir", &self.dir.to_string_lossy())?;
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid("templates.extensions must be non-empty".to_string()));
        }
        if self.extensions.len() > MAX_TEMPLATE_EXTENSIONS {
            return Err(ConfigError::Invalid(
                "templates.extensions has too many entries".to_string(),
            ));
        }
        for extension in &self.extensions {
            let valid = extension.len() > 1
                && extension.len() <= MAX_TEMPLATE_EXTENSION_LENGTH
                && extension.starts_with('.')
                && !extension.contains(['/', '\\']);
            if !valid {
                return Err(ConfigError::Invalid(format!(
                    "templates.extensions entry {extension:?} must look like .ext"
                )));
            }
        }
        Ok(())
    }
}

/// Render log sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Drop successful renders; failures still go to stderr.
    None,
}

/// Render log configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Sink receiving render events.
    #[serde(default)]
    pub sink: LogSinkType,
    /// Log file path (required for the file sink).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Whether successful renders are logged in addition to failures.
    #[serde(default = "default_log_success")]
    pub log_success: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            sink: LogSinkType::Stderr,
            path: None,
            log_success: default_log_success(),
        }
    }
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkType::File, None) => {
                Err(ConfigError::Invalid("logging.path is required for file sink".to_string()))
            }
            (LogSinkType::File, Some(path)) => {
                validate_path_string("logging.path", &path.to_string_lossy())
            }
            (_, _) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default response content type.
fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Default template directory.
fn default_template_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_DIR)
}

/// Default template extensions.
fn default_template_extensions() -> Vec<String> {
    vec![DEFAULT_TEMPLATE_EXTENSION.to_string()]
}

/// Successful renders are logged by default.
const fn default_log_success() -> bool {
    true
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// The returned flag is true when the path was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
