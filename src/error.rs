//! Unified error types for routehook.
//!
//! Defines [`RouteHookError`] (the main crate error enum) and
//! [`ValidationError`] for config validation failures. Lookup failures
//! (`RouteNotFound`, `AmbiguousRoute`, `DuplicateRegistration`) are
//! distinct variants so operators can tell them apart in startup logs.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub scope: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}: {}", self.scope, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RouteHookError {
    #[error("No route manifest found.\n\n  {hint}")]
    NoManifestSource { hint: String },

    #[error("Route manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("No patch config found.\n\n  {hint}")]
    NoPatchConfig { hint: String },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Failed to serialize {format} output: {source}")]
    Serialize {
        format: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("Route manifest {} changed on disk while it was being patched", path.display())]
    ManifestChanged { path: PathBuf },

    #[error("API '{api}' is not registered with the host")]
    ApiNotFound { api: String },

    #[error("API '{api}' has no router named '{router}'")]
    RouterNotFound { api: String, router: String },

    #[error("No route matches {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("{matches} routes match {method} {path}, refusing to pick one")]
    AmbiguousRoute {
        method: String,
        path: String,
        matches: usize,
    },

    #[error("Middleware '{middleware}' is already registered on {method} {path}")]
    DuplicateRegistration {
        middleware: String,
        method: String,
        path: String,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_includes_suggestion() {
        let err = ValidationError {
            scope: "patch".into(),
            field: "path".into(),
            message: "path must start with '/'".into(),
            suggestion: Some("did you mean '/specials'?".into()),
        };
        assert_eq!(
            err.to_string(),
            "  patch: path: path must start with '/' (did you mean '/specials'?)"
        );
    }

    #[test]
    fn route_not_found_names_the_criteria() {
        let err = RouteHookError::RouteNotFound {
            method: "GET".into(),
            path: "/specials".into(),
        };
        assert_eq!(err.to_string(), "No route matches GET /specials");
    }

    #[test]
    fn config_validation_lists_every_error() {
        let err = RouteHookError::ConfigValidation {
            errors: vec![
                ValidationError {
                    scope: "patch".into(),
                    field: "method".into(),
                    message: "'FETCH' is not a valid HTTP method".into(),
                    suggestion: None,
                },
                ValidationError {
                    scope: "patch".into(),
                    field: "middlewareName".into(),
                    message: "middleware name cannot be empty".into(),
                    suggestion: None,
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("FETCH"));
        assert!(text.contains("middleware name cannot be empty"));
        assert_eq!(text.lines().count(), 3);
    }
}
