//! `routehook init`: generate a starter patch config.
//!
//! Creates a YAML, JSON, or TOML patch config with either minimal or
//! fully documented templates. Existing files are never overwritten.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::RouteHookError;

pub fn execute(args: &InitArgs) -> Result<(), RouteHookError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("routehook.{}", args.format.extension())));

    if output.exists() {
        return Err(RouteHookError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        // JSON has no comments, so both variants spell out every option
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# routehook patch config

api: "special"
method: "GET"
path: "/specials"
middlewareName: "global::customMiddleware"
"#;

const YAML_FULL: &str = r#"# routehook patch config
#
# Attaches one middleware reference to one route of the host manifest.
# Values shown for optional keys are the defaults.

# API group holding the route
api: "special"

# Router inside the API group (defaults to the api name)
# router: "special"

# Exact, case-sensitive match criteria
method: "GET"
path: "/specials"

# Opaque middleware reference, resolved later by the host
middlewareName: "global::customMiddleware"

# When the middleware is already attached: skip | append | fail
# onDuplicate: "skip"

# When several routes match: first | fail
# onAmbiguous: "first"
"#;

const JSON_MINIMAL: &str = r#"{
  "api": "special",
  "method": "GET",
  "path": "/specials",
  "middlewareName": "global::customMiddleware"
}
"#;

const JSON_FULL: &str = r#"{
  "api": "special",
  "router": "special",
  "method": "GET",
  "path": "/specials",
  "middlewareName": "global::customMiddleware",
  "onDuplicate": "skip",
  "onAmbiguous": "first"
}
"#;

const TOML_MINIMAL: &str = r#"# routehook patch config

api = "special"
method = "GET"
path = "/specials"
middlewareName = "global::customMiddleware"
"#;

const TOML_FULL: &str = r#"# routehook patch config
#
# Attaches one middleware reference to one route of the host manifest.
# Values shown for optional keys are the defaults.

# API group holding the route
api = "special"

# Router inside the API group (defaults to the api name)
# router = "special"

# Exact, case-sensitive match criteria
method = "GET"
path = "/specials"

# Opaque middleware reference, resolved later by the host
middlewareName = "global::customMiddleware"

# When the middleware is already attached: skip | append | fail
# onDuplicate = "skip"

# When several routes match: first | fail
# onAmbiguous = "first"
"#;
