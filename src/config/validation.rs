//! Configuration validation with detailed error reporting.
//!
//! [`validate`] checks a parsed [`PatchConfig`] before it is handed to the
//! host: the API name, method, path and middleware name must all be
//! usable. [`lint_manifest`] looks over the route tables of a
//! [`HostManifest`] and reports entries no patch could ever match, without
//! rejecting the table.

use super::model::{HostManifest, PatchConfig};
use crate::error::ValidationError;

pub const VALID_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

const PATCH_SCOPE: &str = "patch";

/// Validate a single route path. Returns `Ok(())` or a human-readable error.
pub fn validate_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err("path must start with '/'".into());
    }
    Ok(())
}

/// Validate an HTTP method string. Matching is case-sensitive, so a
/// lowercase method would never find a route.
pub fn validate_method(method: &str) -> Result<(), String> {
    if VALID_METHODS.contains(&method) {
        Ok(())
    } else if VALID_METHODS.contains(&method.to_uppercase().as_str()) {
        Err(format!("'{method}' must be uppercase"))
    } else {
        Err(format!("'{method}' is not a valid HTTP method"))
    }
}

/// Validate a middleware reference. The token is opaque, so only emptiness
/// and embedded whitespace are rejected.
pub fn validate_middleware_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("middleware name cannot be empty".into());
    }
    if name.chars().any(char::is_whitespace) {
        return Err(format!("'{name}' contains whitespace"));
    }
    Ok(())
}

pub fn validate(config: &PatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api.trim().is_empty() {
        errors.push(ValidationError {
            scope: PATCH_SCOPE.into(),
            field: "api".into(),
            message: "api name cannot be empty".into(),
            suggestion: None,
        });
    }

    if config.router.as_deref().is_some_and(|r| r.trim().is_empty()) {
        errors.push(ValidationError {
            scope: PATCH_SCOPE.into(),
            field: "router".into(),
            message: "router name cannot be empty when set".into(),
            suggestion: Some("omit it to use the api name".into()),
        });
    }

    if let Err(msg) = validate_method(&config.method) {
        let upper = config.method.to_uppercase();
        errors.push(ValidationError {
            scope: PATCH_SCOPE.into(),
            field: "method".into(),
            message: msg,
            suggestion: VALID_METHODS
                .contains(&upper.as_str())
                .then(|| format!("did you mean '{upper}'?")),
        });
    }

    if let Err(msg) = validate_path(&config.path) {
        errors.push(ValidationError {
            scope: PATCH_SCOPE.into(),
            field: "path".into(),
            message: msg,
            suggestion: if !config.path.is_empty() && !config.path.starts_with('/') {
                Some(format!("did you mean '/{}'?", config.path))
            } else {
                None
            },
        });
    }

    if let Err(msg) = validate_middleware_name(&config.middleware_name) {
        errors.push(ValidationError {
            scope: PATCH_SCOPE.into(),
            field: "middlewareName".into(),
            message: msg,
            suggestion: None,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Flag route entries that can never be the target of a patch.
///
/// The host owns its route tables, so nothing here is fatal: methods outside
/// [`VALID_METHODS`] and middleware names are left alone, and only empty
/// methods and malformed paths are reported.
#[must_use]
pub fn lint_manifest(manifest: &HostManifest) -> Vec<ValidationError> {
    let mut warnings = Vec::new();

    for (api_name, api) in &manifest.apis {
        for (router_name, router) in &api.routes {
            for (i, route) in router.routes.iter().enumerate() {
                let scope = format!("{api_name}.{router_name}.routes[{i}]");

                if route.method.trim().is_empty() {
                    warnings.push(ValidationError {
                        scope: scope.clone(),
                        field: "method".into(),
                        message: "method is empty".into(),
                        suggestion: None,
                    });
                }

                if let Err(msg) = validate_path(&route.path) {
                    warnings.push(ValidationError {
                        scope,
                        field: "path".into(),
                        message: msg,
                        suggestion: None,
                    });
                }
            }
        }
    }

    warnings
}

#[must_use]
pub fn format_validation_report(path: &str, config: &PatchConfig) -> String {
    let mut lines = vec![format!("{path} is valid\n")];
    lines.push(format!(
        "  {} {}  -> {}",
        config.method, config.path, config.middleware_name
    ));
    lines.push(format!("    api: {}", config.api));
    lines.push(format!(
        "    router: {}{}",
        config.router_name(),
        if config.router.is_none() { " (default)" } else { "" }
    ));
    lines.push(format!("    on duplicate: {:?}", config.on_duplicate).to_lowercase());
    lines.push(format!("    on ambiguous: {:?}", config.on_ambiguous).to_lowercase());
    lines.join("\n")
}
