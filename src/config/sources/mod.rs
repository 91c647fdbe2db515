//! Concrete [`ManifestSource`](super::ManifestSource) implementations.
//!
//! Provides file-based sources (YAML, JSON, TOML) gated by feature flags,
//! plus the format helpers shared by every command: [`parse_str`] for
//! extension-driven deserialization and [`serialize`] for writing the
//! patched manifest back out.

pub mod file_source;

#[cfg(feature = "yaml")]
pub mod yaml;

pub mod json;

#[cfg(feature = "toml")]
pub mod toml_source;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::ManifestSource;
use crate::cli::ConfigFormat;
use crate::error::RouteHookError;

/// File extension of `path`, or `""` when it has none.
#[must_use]
pub fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// Parse a config or manifest string based on file extension.
pub fn parse_str<T: DeserializeOwned>(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<T, RouteHookError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| RouteHookError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        "json" => serde_json::from_str(content).map_err(|e| RouteHookError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| RouteHookError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(RouteHookError::UnsupportedFormat(other.to_string())),
    }
}

/// Serialize `value` to a formatted string in the given format.
pub fn serialize<T: Serialize>(value: &T, format: &ConfigFormat) -> Result<String, RouteHookError> {
    match format {
        #[cfg(feature = "yaml")]
        ConfigFormat::Yaml => serde_yml::to_string(value).map_err(|e| RouteHookError::Serialize {
            format: "yaml",
            source: Box::new(e),
        }),

        #[cfg(not(feature = "yaml"))]
        ConfigFormat::Yaml => Err(RouteHookError::UnsupportedFormat("yaml".into())),

        ConfigFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| RouteHookError::Serialize {
                format: "json",
                source: Box::new(e),
            }),

        #[cfg(feature = "toml")]
        ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| RouteHookError::Serialize {
            format: "toml",
            source: Box::new(e),
        }),

        #[cfg(not(feature = "toml"))]
        ConfigFormat::Toml => Err(RouteHookError::UnsupportedFormat("toml".into())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Pick the manifest source matching the file extension of `path`.
pub fn create_file_source(path: &Path) -> Result<Box<dyn ManifestSource>, RouteHookError> {
    match extension(path) {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(yaml::new(path.to_path_buf()))),

        "json" => Ok(Box::new(json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(toml_source::new(path.to_path_buf()))),

        other => Err(RouteHookError::UnsupportedFormat(other.to_string())),
    }
}
