//! The middleware registration plugin.
//!
//! [`MiddlewarePlugin`] attaches one middleware reference to one route of
//! the host, as described by a validated [`PatchConfig`]. The reference is
//! an opaque token; the host resolves and runs it later.

use crate::config::model::PatchConfig;
use crate::config::validation;
use crate::error::RouteHookError;
use crate::host::{HostContext, PatchRecord, Plugin};
use crate::patch::{self, PatchTarget};

pub const PLUGIN_NAME: &str = "middleware-hook";

#[derive(Debug, Clone)]
pub struct MiddlewarePlugin {
    config: PatchConfig,
}

impl MiddlewarePlugin {
    /// Validates `config` up front so a bad config never reaches the host.
    pub fn new(config: PatchConfig) -> Result<Self, RouteHookError> {
        validation::validate(&config).map_err(|errors| RouteHookError::ConfigValidation { errors })?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &PatchConfig {
        &self.config
    }
}

impl Plugin for MiddlewarePlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn register(&self, host: &mut HostContext) -> Result<(), RouteHookError> {
        let config = &self.config;
        let router = config.router_name();

        tracing::debug!(
            api = %config.api,
            router,
            method = %config.method,
            path = %config.path,
            middleware = %config.middleware_name,
            "looking up route"
        );

        let routes = host.routes_mut(&config.api, router)?;
        let outcome = patch::patch(routes, &PatchTarget::from(config))?;

        host.record(PatchRecord {
            plugin: PLUGIN_NAME.to_string(),
            api: config.api.clone(),
            router: router.to_string(),
            method: config.method.clone(),
            path: config.path.clone(),
            middleware: config.middleware_name.clone(),
            outcome,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{Api, DuplicatePolicy, HostManifest, RouteDescriptor, Router};
    use crate::patch::PatchOutcome;

    fn config() -> PatchConfig {
        PatchConfig {
            api: "special".into(),
            router: None,
            method: "GET".into(),
            path: "/specials".into(),
            middleware_name: "global::customMiddleware".into(),
            on_duplicate: DuplicatePolicy::Skip,
            on_ambiguous: Default::default(),
        }
    }

    fn host() -> HostContext {
        let mut api = Api::default();
        api.routes.insert(
            "special".into(),
            Router {
                kind: None,
                routes: vec![
                    RouteDescriptor::new("GET", "/specials"),
                    RouteDescriptor::new("POST", "/specials"),
                ],
            },
        );
        let mut manifest = HostManifest::default();
        manifest.apis.insert("special".into(), api);
        HostContext::new(manifest)
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut bad = config();
        bad.middleware_name = String::new();
        assert!(matches!(
            MiddlewarePlugin::new(bad),
            Err(RouteHookError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn register_patches_and_records() {
        let plugin = MiddlewarePlugin::new(config()).unwrap();
        let mut host = host();
        plugin.register(&mut host).unwrap();

        let routes = host.routes("special", "special").unwrap();
        assert_eq!(
            routes[0].middlewares(),
            Some(&vec!["global::customMiddleware".to_string()])
        );
        assert_eq!(routes[1].middlewares(), None);

        let records = host.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].router, "special");
        assert_eq!(
            records[0].outcome,
            PatchOutcome::Appended { index: 0, position: 0 }
        );
    }

    #[test]
    fn register_twice_is_idempotent() {
        let plugin = MiddlewarePlugin::new(config()).unwrap();
        let mut host = host();
        plugin.register(&mut host).unwrap();
        plugin.register(&mut host).unwrap();

        let routes = host.routes("special", "special").unwrap();
        assert_eq!(routes[0].middlewares().map(Vec::len), Some(1));
        assert!(!host.records()[1].outcome.changed());
    }

    #[test]
    fn explicit_router_overrides_api_name() {
        let mut cfg = config();
        cfg.router = Some("custom".into());
        let plugin = MiddlewarePlugin::new(cfg).unwrap();
        let mut host = host();
        assert!(matches!(
            plugin.register(&mut host),
            Err(RouteHookError::RouterNotFound { ref router, .. }) if router == "custom"
        ));
    }
}
