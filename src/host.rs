//! The host runtime context seen by plugins during startup.
//!
//! [`HostContext`] owns the [`HostManifest`] while plugins run and hands
//! out exclusive access to individual route tables. [`PluginRegistry`]
//! invokes each plugin's registration hook once, in insertion order, and
//! stops at the first failure.

use crate::config::model::{HostManifest, RouteDescriptor};
use crate::error::RouteHookError;
use crate::patch::PatchOutcome;

/// A startup hook invoked once with exclusive access to the host.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;
    fn register(&self, host: &mut HostContext) -> Result<(), RouteHookError>;
}

/// One middleware attachment made during registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    pub plugin: String,
    pub api: String,
    pub router: String,
    pub method: String,
    pub path: String,
    pub middleware: String,
    pub outcome: PatchOutcome,
}

#[derive(Debug, Default)]
pub struct HostContext {
    manifest: HostManifest,
    records: Vec<PatchRecord>,
}

impl HostContext {
    #[must_use]
    pub fn new(manifest: HostManifest) -> Self {
        Self {
            manifest,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn manifest(&self) -> &HostManifest {
        &self.manifest
    }

    #[must_use]
    pub fn into_manifest(self) -> HostManifest {
        self.manifest
    }

    #[must_use]
    pub fn records(&self) -> &[PatchRecord] {
        &self.records
    }

    pub fn record(&mut self, record: PatchRecord) {
        self.records.push(record);
    }

    /// Route table of router `router` in API group `api`.
    pub fn routes(&self, api: &str, router: &str) -> Result<&[RouteDescriptor], RouteHookError> {
        let group = self
            .manifest
            .apis
            .get(api)
            .ok_or_else(|| RouteHookError::ApiNotFound { api: api.into() })?;
        group
            .routes
            .get(router)
            .map(|r| r.routes.as_slice())
            .ok_or_else(|| RouteHookError::RouterNotFound {
                api: api.into(),
                router: router.into(),
            })
    }

    pub fn routes_mut(
        &mut self,
        api: &str,
        router: &str,
    ) -> Result<&mut Vec<RouteDescriptor>, RouteHookError> {
        let group = self
            .manifest
            .apis
            .get_mut(api)
            .ok_or_else(|| RouteHookError::ApiNotFound { api: api.into() })?;
        group
            .routes
            .get_mut(router)
            .map(|r| &mut r.routes)
            .ok_or_else(|| RouteHookError::RouterNotFound {
                api: api.into(),
                router: router.into(),
            })
    }
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, plugin: Box<dyn Plugin>) {
        tracing::debug!(plugin = plugin.name(), "plugin added");
        self.plugins.push(plugin);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn register_all(&self, host: &mut HostContext) -> Result<(), RouteHookError> {
        for plugin in &self.plugins {
            tracing::info!(plugin = plugin.name(), "registering plugin");
            plugin.register(host).inspect_err(|e| {
                tracing::error!(plugin = plugin.name(), error = %e, "plugin registration failed");
            })?;
        }
        Ok(())
    }
}
