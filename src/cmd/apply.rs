//! `routehook apply`: attach the middleware and write the result.
//!
//! Loads the host route manifest and the patch config, applies CLI
//! overrides, runs the middleware plugin through a [`PluginRegistry`], and
//! writes the patched manifest in place, to a new file, or to stdout.

use std::path::{Path, PathBuf};

use crate::cli::{ApplyArgs, ConfigFormat, PatchOverrides, ReportFormat};
use crate::config::model::{HostManifest, PatchConfig};
use crate::config::sources::{self, create_file_source};
use crate::config::{read_patch_config, ManifestSource, ManifestVersion};
use crate::error::RouteHookError;
use crate::host::{HostContext, PatchRecord, PluginRegistry};
use crate::logging;
use crate::middleware::MiddlewarePlugin;

const MANIFEST_CANDIDATES: [&str; 4] = ["routes.yaml", "routes.yml", "routes.json", "routes.toml"];

const CONFIG_CANDIDATES: [&str; 4] = [
    "routehook.yaml",
    "routehook.yml",
    "routehook.json",
    "routehook.toml",
];

/// A manifest after every plugin has registered.
#[derive(Debug)]
pub struct Applied {
    pub manifest: HostManifest,
    pub version: ManifestVersion,
    pub records: Vec<PatchRecord>,
}

impl Applied {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.records.iter().any(|r| r.outcome.changed())
    }
}

pub async fn execute(args: ApplyArgs) -> Result<(), RouteHookError> {
    logging::init(&args.log_level, logging::resolve_format(args.pretty, args.json));

    let manifest_path = resolve_manifest_path(args.manifest.as_deref())?;
    let config = resolve_patch_config(args.config.as_deref(), &args.overrides)?;

    let source = create_file_source(&manifest_path)?;
    let applied = patch_manifest(source.as_ref(), config).await?;

    print_report(&applied, &args.report);

    if args.dry_run {
        tracing::info!("dry run, nothing written");
        return Ok(());
    }

    if args.in_place {
        write_in_place(source.as_ref(), &manifest_path, &applied).await
    } else if let Some(ref output) = args.output {
        write_output(output, &manifest_path, &applied, args.force).await
    } else {
        let format = format_for(&manifest_path)?;
        print!("{}", sources::serialize(&applied.manifest, &format)?);
        Ok(())
    }
}

/// Load the manifest from `source` and register the middleware plugin on it.
pub async fn patch_manifest(
    source: &dyn ManifestSource,
    config: PatchConfig,
) -> Result<Applied, RouteHookError> {
    let plugin = MiddlewarePlugin::new(config)?;
    let (manifest, version) = source.load().await?;

    tracing::info!(
        source = source.name(),
        routes = manifest.total_routes(),
        "route manifest loaded"
    );

    let mut registry = PluginRegistry::new();
    registry.add(Box::new(plugin));

    let mut host = HostContext::new(manifest);
    registry.register_all(&mut host)?;

    let records = host.records().to_vec();
    Ok(Applied {
        manifest: host.into_manifest(),
        version,
        records,
    })
}

/// Merge the patch config file (explicit or auto-detected) with CLI overrides.
///
/// When no file is found the overrides alone must name every required key.
pub fn resolve_patch_config(
    explicit: Option<&Path>,
    overrides: &PatchOverrides,
) -> Result<PatchConfig, RouteHookError> {
    let from_file = match explicit {
        Some(path) => Some(read_patch_config(path)?),
        None => match auto_detect(&CONFIG_CANDIDATES) {
            Some(path) => {
                tracing::info!(path = %path.display(), "auto-detected patch config");
                Some(read_patch_config(&path)?)
            }
            None => None,
        },
    };

    merge_overrides(from_file, overrides)
}

pub fn merge_overrides(
    base: Option<PatchConfig>,
    overrides: &PatchOverrides,
) -> Result<PatchConfig, RouteHookError> {
    let mut config = match base {
        Some(config) => config,
        None if overrides.is_complete() => PatchConfig {
            api: String::new(),
            router: None,
            method: String::new(),
            path: String::new(),
            middleware_name: String::new(),
            on_duplicate: Default::default(),
            on_ambiguous: Default::default(),
        },
        None => {
            return Err(RouteHookError::NoPatchConfig {
                hint: "Provide --config <file>, or --api, --method, --path and --middleware.\n  \
                       Run 'routehook init' to create a config file."
                    .into(),
            })
        }
    };

    if let Some(ref api) = overrides.api {
        config.api.clone_from(api);
    }
    if let Some(ref router) = overrides.router {
        config.router = Some(router.clone());
    }
    if let Some(ref method) = overrides.method {
        config.method.clone_from(method);
    }
    if let Some(ref path) = overrides.path {
        config.path.clone_from(path);
    }
    if let Some(ref middleware) = overrides.middleware {
        config.middleware_name.clone_from(middleware);
    }
    if let Some(policy) = overrides.on_duplicate {
        config.on_duplicate = policy;
    }
    if let Some(policy) = overrides.on_ambiguous {
        config.on_ambiguous = policy;
    }

    Ok(config)
}

fn resolve_manifest_path(explicit: Option<&Path>) -> Result<PathBuf, RouteHookError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = auto_detect(&MANIFEST_CANDIDATES) {
        tracing::info!(path = %path.display(), "auto-detected route manifest");
        return Ok(path);
    }

    Err(RouteHookError::NoManifestSource {
        hint: "Provide --manifest <file> or place routes.yaml in the current directory.".into(),
    })
}

fn auto_detect(candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().map(PathBuf::from).find(|p| p.is_file())
}

fn format_for(path: &Path) -> Result<ConfigFormat, RouteHookError> {
    let ext = sources::extension(path);
    ConfigFormat::from_extension(ext).ok_or_else(|| RouteHookError::UnsupportedFormat(ext.into()))
}

async fn write_in_place(
    source: &dyn ManifestSource,
    path: &Path,
    applied: &Applied,
) -> Result<(), RouteHookError> {
    if !applied.changed() {
        tracing::info!(path = %path.display(), "manifest unchanged, nothing to write");
        return Ok(());
    }

    if source.has_changed(&applied.version).await? {
        return Err(RouteHookError::ManifestChanged {
            path: path.to_path_buf(),
        });
    }

    let content = sources::serialize(&applied.manifest, &format_for(path)?)?;
    tokio::fs::write(path, content).await?;
    tracing::info!(path = %path.display(), "manifest written");
    Ok(())
}

/// Write the patched manifest to `output`. An existing file is only replaced
/// with `force`; errors probing for it are returned, not read as absence.
pub async fn write_output(
    output: &Path,
    manifest_path: &Path,
    applied: &Applied,
    force: bool,
) -> Result<(), RouteHookError> {
    if !force && tokio::fs::try_exists(output).await? {
        return Err(RouteHookError::FileExists {
            path: output.to_path_buf(),
        });
    }

    // Output without a known extension keeps the manifest's format
    let format = format_for(output).or_else(|_| format_for(manifest_path))?;
    let content = sources::serialize(&applied.manifest, &format)?;
    tokio::fs::write(output, content).await?;
    tracing::info!(path = %output.display(), "patched manifest written");
    Ok(())
}

fn print_report(applied: &Applied, format: &ReportFormat) {
    match format {
        ReportFormat::Text => {
            for record in &applied.records {
                let verb = if record.outcome.changed() {
                    "\u{2713} attached"
                } else {
                    "= already attached"
                };
                eprintln!(
                    "{verb} {} to {} {} ({}.{}, route #{})",
                    record.middleware,
                    record.method,
                    record.path,
                    record.api,
                    record.router,
                    record.outcome.index(),
                );
            }
        }
        ReportFormat::Json => {
            let patches: Vec<serde_json::Value> = applied
                .records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "plugin": r.plugin,
                        "api": r.api,
                        "router": r.router,
                        "method": r.method,
                        "path": r.path,
                        "middleware": r.middleware,
                        "index": r.outcome.index(),
                        "changed": r.outcome.changed(),
                    })
                })
                .collect();
            eprintln!(
                "{}",
                serde_json::json!({
                    "changed": applied.changed(),
                    "patches": patches,
                })
            );
        }
    }
}
