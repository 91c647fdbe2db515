//! Serde data structures for the host manifest and the patch config.
//!
//! [`HostManifest`] is the host's view of its API groups, each holding
//! named routers with an ordered route table of [`RouteDescriptor`]s.
//! [`PatchConfig`] names the route to patch and the middleware to attach.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostManifest {
    #[serde(default)]
    pub apis: BTreeMap<String, Api>,
}

impl HostManifest {
    #[must_use]
    pub fn total_routes(&self) -> usize {
        self.apis
            .values()
            .flat_map(|api| api.routes.values())
            .map(|router| router.routes.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Api {
    #[serde(default)]
    pub routes: BTreeMap<String, Router>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Router {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub routes: Vec<RouteDescriptor>,
}

/// One entry of a host route table.
///
/// Only `method`, `path` and `config.middlewares` are interpreted. Every other
/// key is carried through `extra` so untouched routes serialize back to what
/// was read.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteDescriptor {
    pub method: String,

    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RouteConfig>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RouteDescriptor {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            handler: None,
            config: None,
            extra: BTreeMap::new(),
        }
    }

    /// Exact, case-sensitive match on both method and path.
    #[must_use]
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method == method && self.path == path
    }

    #[must_use]
    pub fn middlewares(&self) -> Option<&Vec<String>> {
        self.config.as_ref()?.middlewares.as_ref()
    }

    /// The middleware list, created along with `config` when absent.
    pub fn middlewares_mut(&mut self) -> &mut Vec<String> {
        self.config
            .get_or_insert_with(RouteConfig::default)
            .middlewares
            .get_or_insert_with(Vec::new)
    }
}

/// Per-route settings. Keys routehook does not know about are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RouteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlewares: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// What to do when the middleware is already on the route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Leave the list as it is.
    #[default]
    Skip,
    /// Append another copy.
    Append,
    /// Refuse with `DuplicateRegistration`.
    Fail,
}

/// What to do when more than one route matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguityPolicy {
    /// Patch the first match in table order.
    #[default]
    First,
    /// Refuse with `AmbiguousRoute`.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PatchConfig {
    pub api: String,

    /// Defaults to the API name, the usual layout for generated routers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<String>,

    pub method: String,

    pub path: String,

    pub middleware_name: String,

    #[serde(default, skip_serializing_if = "is_default")]
    pub on_duplicate: DuplicatePolicy,

    #[serde(default, skip_serializing_if = "is_default")]
    pub on_ambiguous: AmbiguityPolicy,
}

impl PatchConfig {
    #[must_use]
    pub fn router_name(&self) -> &str {
        self.router.as_deref().unwrap_or(&self.api)
    }
}
