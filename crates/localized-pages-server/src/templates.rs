// crates/localized-pages-server/src/templates.rs
// ============================================================================
// Module: Template Registry
// Description: Startup loading and execution of page templates.
// Purpose: Register a template directory once and render by logical name.
// Dependencies: localized-pages-core, minijinja, thiserror
// ============================================================================

//! ## Overview
//! Templates are discovered by walking a directory at startup. Each matching
//! file is registered under its `/`-separated path relative to the root
//! (`views/hello.tmpl`). The environment renders strictly: any undefined
//! value printed or iterated is an error, so a template that references data
//! the request never supplied fails instead of emitting an empty string.
//!
//! Security posture: template sources are trusted operator assets. Request
//! data reaches templates only as serialized context values and is HTML
//! escaped on output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use localized_pages_core::RequestContext;
use localized_pages_core::format_positional;
use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::Error as EngineError;
use minijinja::ErrorKind;
use minijinja::UndefinedBehavior;
use minijinja::value::Rest;
use minijinja::value::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Template loading errors. All of them are setup-fatal.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Directory or file could not be read.
    #[error("template io error at {path}: {message}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Template source was not UTF-8.
    #[error("template {name} must be utf-8")]
    Encoding {
        /// Logical template name.
        name: String,
    },
    /// Template failed to parse.
    #[error("template syntax error in {name}: {message}")]
    Syntax {
        /// Logical template name.
        name: String,
        /// Engine error message.
        message: String,
    },
}

/// Per-request render errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template registered under the name.
    #[error("template not found: {0}")]
    NotFound(String),
    /// Template execution failed.
    #[error("template execution failed: {0}")]
    Execution(String),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Named templates registered once at startup.
#[derive(Debug)]
pub struct TemplateRegistry {
    /// Configured template environment.
    env: Environment<'static>,
    /// Registered names in sorted order.
    names: Vec<String>,
}

impl TemplateRegistry {
    /// Loads every file under `dir` whose name ends with one of `extensions`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the directory cannot be walked or a
    /// template cannot be read or parsed.
    pub fn load_dir(dir: &Path, extensions: &[String]) -> Result<Self, TemplateError> {
        let mut files = Vec::new();
        collect_files(dir, dir, extensions, &mut files)?;
        let mut sources = Vec::with_capacity(files.len());
        for (name, path) in files {
            let bytes = fs::read(&path).map_err(|err| TemplateError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
            let source = String::from_utf8(bytes).map_err(|_| TemplateError::Encoding {
                name: name.clone(),
            })?;
            sources.push((name, source));
        }
        Self::from_sources(sources)
    }

    /// Builds a registry from in-memory `(name, source)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Syntax`] when a source fails to parse.
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = new_environment();
        let mut names = Vec::new();
        for (name, source) in sources {
            let name: String = name.into();
            let source: String = source.into();
            env.add_template_owned(name.clone(), source).map_err(|err| {
                TemplateError::Syntax {
                    name: name.clone(),
                    message: err.to_string(),
                }
            })?;
            names.push(name);
        }
        names.sort();
        names.dedup();
        Ok(Self { env, names })
    }

    /// Renders `name` against the serialized request context.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the template is unknown or execution fails.
    /// No partial output is returned on failure.
    pub fn render(&self, name: &str, context: &RequestContext) -> Result<String, RenderError> {
        let template = self.env.get_template(name).map_err(|err| match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::NotFound(name.to_string()),
            _ => RenderError::Execution(err.to_string()),
        })?;
        template.render(context).map_err(|err| RenderError::Execution(err.to_string()))
    }

    /// Registered template names, sorted.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|entry| entry.as_str().cmp(name)).is_ok()
    }
}

/// Creates the shared environment configuration.
fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_function("format", format_function);
    env
}

/// Template `format(pattern, args...)` global.
fn format_function(pattern: &str, args: Rest<Value>) -> Result<String, EngineError> {
    if args.iter().any(Value::is_undefined) {
        return Err(EngineError::new(ErrorKind::UndefinedError, "format argument is undefined"));
    }
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    Ok(format_positional(pattern, &args))
}

/// Recursively collects `(logical name, path)` pairs under `dir`.
fn collect_files(
    root: &Path,
    dir: &Path,
    extensions: &[String],
    out: &mut Vec<(String, PathBuf)>,
) -> Result<(), TemplateError> {
    let io_error = |path: &Path, err: std::io::Error| TemplateError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    };
    let entries = fs::read_dir(dir).map_err(|err| io_error(dir, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| io_error(dir, err))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|err| io_error(&path, err))?;
        if file_type.is_dir() {
            collect_files(root, &path, extensions, out)?;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if !extensions.iter().any(|extension| file_name.ends_with(extension.as_str())) {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        out.push((name, path));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
