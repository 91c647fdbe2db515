//! Integration tests for the apply pipeline: load, patch, serialize.

use std::path::{Path, PathBuf};

use routehook::cli::ConfigFormat;
use routehook::cmd::apply::{patch_manifest, write_output};
use routehook::config::model::{DuplicatePolicy, HostManifest, PatchConfig};
use routehook::config::sources::{create_file_source, parse_str, serialize};
use routehook::error::RouteHookError;

fn copy_example(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let target = dir.path().join(name);
    std::fs::copy(format!("example/{name}"), &target).unwrap();
    target
}

/// Patch the fixture `name` and check the serialized output against its
/// source document: only `GET /specials` may differ, by its new middleware.
async fn assert_round_trip_preserves_document(name: &str, ext: &str, format: ConfigFormat) {
    let dir = tempfile::tempdir().unwrap();
    let path = copy_example(&dir, name);
    let original: serde_json::Value =
        parse_str(ext, &std::fs::read_to_string(&path).unwrap(), name).unwrap();

    let source = create_file_source(&path).unwrap();
    let applied = patch_manifest(source.as_ref(), patch_config()).await.unwrap();
    let out = serialize(&applied.manifest, &format).unwrap();
    let written: serde_json::Value = parse_str(ext, &out, name).unwrap();

    let mut expected = original.clone();
    expected["apis"]["special"]["routes"]["special"]["routes"][0]["config"]["middlewares"] =
        serde_json::json!(["global::customMiddleware"]);
    assert_eq!(written, expected);

    let reparsed: HostManifest = parse_str(ext, &out, name).unwrap();
    assert_eq!(reparsed, applied.manifest);
}

fn patch_config() -> PatchConfig {
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

#[tokio::test]
async fn json_manifest_is_patched_and_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let path = copy_example(&dir, "routes.json");
    let source = create_file_source(&path).unwrap();

    let applied = patch_manifest(source.as_ref(), patch_config()).await.unwrap();
    assert!(applied.changed());
    assert_eq!(applied.records.len(), 1);

    let out = serialize(&applied.manifest, &ConfigFormat::Json).unwrap();
    let reparsed: HostManifest = parse_str("json", &out, "out.json").unwrap();
    assert_eq!(reparsed, applied.manifest);

    let routes = &reparsed.apis["special"].routes["special"].routes;
    assert_eq!(
        routes[0].middlewares(),
        Some(&vec!["global::customMiddleware".to_string()])
    );
    assert_eq!(routes[1].middlewares(), Some(&vec!["global::cache".to_string()]));
}

#[tokio::test]
async fn json_output_keeps_untouched_routes_verbatim() {
    assert_round_trip_preserves_document("routes.json", "json", ConfigFormat::Json).await;
}

#[tokio::test]
async fn host_route_keys_survive_patching() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.json");
    let original = serde_json::json!({"apis": {"special": {"routes": {"special": {"routes": [
        {"method": "GET", "path": "/specials", "info": {"apiName": "special"}},
        {"method": "POST", "path": "/specials", "handler": "special.create",
         "info": {"apiName": "special", "type": "content-api"}},
        {"method": "TRACE", "path": "/debug", "config": {"middlewares": ["plugin::my plugin"]}}
    ]}}}}});
    std::fs::write(&path, original.to_string()).unwrap();
    let source = create_file_source(&path).unwrap();

    let applied = patch_manifest(source.as_ref(), patch_config()).await.unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&serialize(&applied.manifest, &ConfigFormat::Json).unwrap()).unwrap();

    let mut expected = original.clone();
    expected["apis"]["special"]["routes"]["special"]["routes"][0]["config"] =
        serde_json::json!({"middlewares": ["global::customMiddleware"]});
    assert_eq!(written, expected);
}

#[tokio::test]
async fn output_path_errors_are_not_mistaken_for_absence() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = copy_example(&dir, "routes.json");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let output = blocker.join("patched.json");

    let err = write_output(&output, &manifest, &patched(&manifest).await, false)
        .await
        .unwrap_err();
    assert!(matches!(err, RouteHookError::Io(_)));
    assert!(!output.exists());
}

async fn patched(path: &Path) -> routehook::cmd::apply::Applied {
    let source = create_file_source(path).unwrap();
    patch_manifest(source.as_ref(), patch_config()).await.unwrap()
}

#[tokio::test]
async fn patching_an_already_patched_manifest_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = copy_example(&dir, "routes.json");
    let source = create_file_source(&path).unwrap();

    let first = patch_manifest(source.as_ref(), patch_config()).await.unwrap();
    std::fs::write(&path, serialize(&first.manifest, &ConfigFormat::Json).unwrap()).unwrap();

    let second = patch_manifest(source.as_ref(), patch_config()).await.unwrap();
    assert!(!second.changed());
    assert_eq!(second.manifest, first.manifest);
}

#[tokio::test]
async fn missing_route_aborts_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = copy_example(&dir, "routes.json");
    let source = create_file_source(&path).unwrap();

    let mut config = patch_config();
    config.path = "/specials/featured".into();
    let err = patch_manifest(source.as_ref(), config).await.unwrap_err();
    assert!(matches!(err, RouteHookError::RouteNotFound { ref path, .. } if path == "/specials/featured"));
}

#[tokio::test]
async fn invalid_config_is_rejected_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    // The manifest does not exist: validation must fail first
    let source = create_file_source(&dir.path().join("routes.json")).unwrap();

    let mut config = patch_config();
    config.method = "get".into();
    let err = patch_manifest(source.as_ref(), config).await.unwrap_err();
    assert!(matches!(err, RouteHookError::ConfigValidation { .. }));
}

#[tokio::test]
async fn concurrent_edit_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = copy_example(&dir, "routes.json");
    let source = create_file_source(&path).unwrap();

    let applied = patch_manifest(source.as_ref(), patch_config()).await.unwrap();
    assert!(!source.has_changed(&applied.version).await.unwrap());

    std::fs::write(&path, "{\"apis\": {}}").unwrap();
    assert!(source.has_changed(&applied.version).await.unwrap());
}

#[cfg(feature = "yaml")]
#[tokio::test]
async fn yaml_output_keeps_untouched_routes_verbatim() {
    assert_round_trip_preserves_document("routes.yaml", "yaml", ConfigFormat::Yaml).await;
}

#[cfg(feature = "toml")]
#[tokio::test]
async fn toml_output_keeps_untouched_routes_verbatim() {
    assert_round_trip_preserves_document("routes.toml", "toml", ConfigFormat::Toml).await;
}
