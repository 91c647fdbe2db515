//! `routehook validate`: check a patch config for errors.
//!
//! Parses and validates the patch config, and when a manifest is given
//! also resolves the target route without modifying anything. Results are
//! reported as human-readable text or machine-readable JSON.

use crate::cli::{ReportFormat, ValidateArgs};
use crate::config::model::PatchConfig;
use crate::config::sources::create_file_source;
use crate::config::{read_patch_config, validation};
use crate::error::RouteHookError;
use crate::host::HostContext;
use crate::patch::{count_matches, find_route};

/// Where the target route sits in a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub index: usize,
    pub matches: usize,
    pub already_attached: bool,
}

pub async fn execute(args: &ValidateArgs) -> Result<(), RouteHookError> {
    let path = &args.config;

    if !path.exists() {
        return Err(RouteHookError::ConfigFileNotFound { path: path.clone() });
    }

    let config = read_patch_config(path)?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            ReportFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ReportFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "scope": e.scope,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(RouteHookError::ConfigValidation { errors });
    }

    let resolution = match args.manifest {
        Some(ref manifest_path) => {
            let source = create_file_source(manifest_path)?;
            let (manifest, _) = source.load().await?;
            Some(resolve(&HostContext::new(manifest), &config)?)
        }
        None => None,
    };

    match args.format {
        ReportFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &config)
            );
            if let Some(r) = resolution {
                println!("    target: route #{} ({} match)", r.index, r.matches);
                if r.already_attached {
                    println!("    middleware already attached");
                }
            }
        }
        ReportFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "api": config.api,
                    "router": config.router_name(),
                    "method": config.method,
                    "path": config.path,
                    "middleware": config.middleware_name,
                    "target": resolution.map(|r| serde_json::json!({
                        "index": r.index,
                        "matches": r.matches,
                        "alreadyAttached": r.already_attached,
                    })),
                })
            );
        }
    }

    Ok(())
}

/// Find the route `config` would patch, without patching it.
pub fn resolve(host: &HostContext, config: &PatchConfig) -> Result<Resolution, RouteHookError> {
    let routes = host.routes(&config.api, config.router_name())?;
    let index = find_route(routes, &config.method, &config.path).ok_or_else(|| {
        RouteHookError::RouteNotFound {
            method: config.method.clone(),
            path: config.path.clone(),
        }
    })?;

    let already_attached = routes[index]
        .middlewares()
        .is_some_and(|list| list.contains(&config.middleware_name));

    Ok(Resolution {
        index,
        matches: count_matches(routes, &config.method, &config.path),
        already_attached,
    })
}
