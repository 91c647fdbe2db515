//! Integration tests for attaching middleware through the host plugin hook.

use routehook::config::model::{
    AmbiguityPolicy, Api, DuplicatePolicy, HostManifest, PatchConfig, RouteDescriptor, Router,
};
use routehook::error::RouteHookError;
use routehook::host::{HostContext, Plugin, PluginRegistry};
use routehook::middleware::MiddlewarePlugin;
use routehook::patch::{patch, PatchTarget};

const MIDDLEWARE: &str = "global::customMiddleware";

fn route(method: &str, path: &str, middlewares: Option<&[&str]>) -> RouteDescriptor {
    let mut route = RouteDescriptor::new(method, path);
    if let Some(list) = middlewares {
        route
            .middlewares_mut()
            .extend(list.iter().map(|s| (*s).to_string()));
    }
    route
}

fn host_with(routes: Vec<RouteDescriptor>) -> HostContext {
    let mut api = Api::default();
    api.routes.insert(
        "special".into(),
        Router {
            kind: Some("content-api".into()),
            routes,
        },
    );
    let mut manifest = HostManifest::default();
    manifest.apis.insert("special".into(), api);
    HostContext::new(manifest)
}

fn patch_config() -> PatchConfig {
    PatchConfig {
        api: "special".into(),
        router: None,
        method: "GET".into(),
        path: "/specials".into(),
        middleware_name: MIDDLEWARE.into(),
        on_duplicate: DuplicatePolicy::Skip,
        on_ambiguous: AmbiguityPolicy::First,
    }
}

fn middlewares(host: &HostContext, index: usize) -> Option<Vec<String>> {
    host.routes("special", "special").unwrap()[index]
        .middlewares()
        .cloned()
}

#[test]
fn route_without_middlewares_gets_a_new_list() {
    let mut host = host_with(vec![route("GET", "/specials", None)]);
    MiddlewarePlugin::new(patch_config())
        .unwrap()
        .register(&mut host)
        .unwrap();
    assert_eq!(middlewares(&host, 0), Some(vec![MIDDLEWARE.to_string()]));
}

#[test]
fn existing_middlewares_keep_their_order() {
    let mut host = host_with(vec![route("GET", "/specials", Some(&["global::other"]))]);
    MiddlewarePlugin::new(patch_config())
        .unwrap()
        .register(&mut host)
        .unwrap();
    assert_eq!(
        middlewares(&host, 0),
        Some(vec!["global::other".to_string(), MIDDLEWARE.to_string()])
    );
}

#[test]
fn no_match_fails_and_leaves_manifest_alone() {
    let mut host = host_with(vec![
        route("POST", "/specials", None),
        route("GET", "/specials/:id", None),
    ]);
    let before = host.manifest().clone();

    let err = MiddlewarePlugin::new(patch_config())
        .unwrap()
        .register(&mut host)
        .unwrap_err();

    assert!(matches!(err, RouteHookError::RouteNotFound { .. }));
    assert_eq!(host.manifest(), &before);
    assert!(host.records().is_empty());
}

#[test]
fn two_matches_patch_only_the_first() {
    let mut host = host_with(vec![
        route("GET", "/specials", None),
        route("GET", "/specials", None),
    ]);
    MiddlewarePlugin::new(patch_config())
        .unwrap()
        .register(&mut host)
        .unwrap();
    assert_eq!(middlewares(&host, 0), Some(vec![MIDDLEWARE.to_string()]));
    assert_eq!(middlewares(&host, 1), None);
}

#[test]
fn repeated_registration_dedupes_by_default() {
    let mut host = host_with(vec![route("GET", "/specials", None)]);
    let mut registry = PluginRegistry::new();
    registry.add(Box::new(MiddlewarePlugin::new(patch_config()).unwrap()));

    registry.register_all(&mut host).unwrap();
    registry.register_all(&mut host).unwrap();

    assert_eq!(middlewares(&host, 0), Some(vec![MIDDLEWARE.to_string()]));
    assert_eq!(host.records().len(), 2);
}

#[test]
fn repeated_registration_with_append_policy_duplicates() {
    let mut config = patch_config();
    config.on_duplicate = DuplicatePolicy::Append;
    let plugin = MiddlewarePlugin::new(config).unwrap();
    let mut host = host_with(vec![route("GET", "/specials", None)]);

    plugin.register(&mut host).unwrap();
    plugin.register(&mut host).unwrap();

    assert_eq!(
        middlewares(&host, 0),
        Some(vec![MIDDLEWARE.to_string(), MIDDLEWARE.to_string()])
    );
}

#[test]
fn unmatched_descriptors_are_unchanged() {
    let routes = vec![
        route("GET", "/specials/:id", Some(&["global::cache"])),
        route("GET", "/specials", None),
        route("POST", "/specials", None),
        route("get", "/specials", None),
    ];
    let mut patched = routes.clone();
    patch(&mut patched, &PatchTarget::new("GET", "/specials", MIDDLEWARE)).unwrap();

    for i in [0, 2, 3] {
        assert_eq!(patched[i], routes[i]);
    }
    assert_ne!(patched[1], routes[1]);
}

#[test]
fn unknown_api_is_reported_before_any_lookup() {
    let mut config = patch_config();
    config.api = "menu".into();
    let mut host = host_with(vec![route("GET", "/specials", None)]);
    assert!(matches!(
        MiddlewarePlugin::new(config).unwrap().register(&mut host),
        Err(RouteHookError::ApiNotFound { ref api }) if api == "menu"
    ));
}
