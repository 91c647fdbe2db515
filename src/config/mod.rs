//! Configuration and host manifest loading.
//!
//! Defines the [`ManifestSource`] trait for pluggable route manifest
//! backends and the [`ManifestVersion`] enum used to detect on-disk
//! changes between load and write-back. Submodules provide the data model,
//! validation logic, and concrete file-based sources.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::RouteHookError;
use model::HostManifest;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ManifestVersion {
    Hash(String),
}

// async_trait is required here because ManifestSource is used as Box<dyn ManifestSource>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(HostManifest, ManifestVersion), RouteHookError>;
    async fn has_changed(&self, current: &ManifestVersion) -> Result<bool, RouteHookError>;
}

/// Read and parse a patch config file, choosing the format from its extension.
///
/// The result is not validated; callers validate after applying overrides.
pub fn read_patch_config(path: &std::path::Path) -> Result<model::PatchConfig, RouteHookError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RouteHookError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RouteHookError::Io(e)
        }
    })?;
    sources::parse_str(
        sources::extension(path),
        &content,
        &path.display().to_string(),
    )
}
