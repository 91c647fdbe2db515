//! Generic async file-based manifest source with SHA256 change detection.
//!
//! [`FileSource`] implements [`ManifestSource`] for any file format by
//! accepting a deserialization function at construction time. It reads the
//! file asynchronously via Tokio, lints the route tables, and computes a
//! SHA256 hash so a later write-back can detect concurrent edits.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::sha256_hex;
use crate::config::model::HostManifest;
use crate::config::validation::lint_manifest;
use crate::config::{ManifestSource, ManifestVersion};
use crate::error::RouteHookError;

type DeserializeFn = fn(&str) -> Result<HostManifest, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: DeserializeFn,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: DeserializeFn) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_content(&self) -> Result<String, RouteHookError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RouteHookError::ManifestNotFound {
                    path: self.path.clone(),
                }
            } else {
                RouteHookError::Io(e)
            }
        })
    }
}

#[async_trait]
impl ManifestSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> Result<(HostManifest, ManifestVersion), RouteHookError> {
        let content = self.read_content().await?;

        let manifest =
            (self.deserialize)(&content).map_err(|e| RouteHookError::ConfigParse {
                path: self.path.display().to_string(),
                source: e,
            })?;

        for warning in lint_manifest(&manifest) {
            tracing::warn!(path = %self.path.display(), "{warning}");
        }

        let hash = sha256_hex(content.as_bytes());
        tracing::debug!(
            source = self.name,
            path = %self.path.display(),
            routes = manifest.total_routes(),
            "route manifest loaded"
        );
        Ok((manifest, ManifestVersion::Hash(hash)))
    }

    async fn has_changed(&self, current: &ManifestVersion) -> Result<bool, RouteHookError> {
        let content = self.read_content().await?;
        let hash = sha256_hex(content.as_bytes());
        Ok(*current != ManifestVersion::Hash(hash))
    }
}
