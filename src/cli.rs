//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (apply, validate, init), and their associated argument
//! structs. Every patch option has an environment variable equivalent so
//! the hook can be driven from a container entrypoint.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::model::{AmbiguityPolicy, DuplicatePolicy};

#[derive(Parser)]
#[command(
    name = "routehook",
    version,
    about = "Attach a middleware reference to a route in a host route manifest",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        routehook init                              Create a starter patch config\n  \
        routehook apply -m routes.yaml --in-place   Patch the manifest in place\n  \
        routehook validate -m routes.yaml           Check the target route exists"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Attach the middleware and write the patched manifest
    Apply(Box<ApplyArgs>),

    /// Validate a patch config without applying it
    Validate(ValidateArgs),

    /// Generate a starter patch config
    Init(InitArgs),
}

/// Command-line replacements for individual patch config keys.
#[derive(Args, Default)]
pub struct PatchOverrides {
    /// API group holding the route
    #[arg(long, env = "ROUTEHOOK_API", help_heading = "Patch")]
    pub api: Option<String>,

    /// Router within the API group (defaults to the API name)
    #[arg(long, env = "ROUTEHOOK_ROUTER", help_heading = "Patch")]
    pub router: Option<String>,

    /// HTTP method of the target route
    #[arg(long, env = "ROUTEHOOK_METHOD", help_heading = "Patch")]
    pub method: Option<String>,

    /// Path of the target route
    #[arg(long, env = "ROUTEHOOK_PATH", help_heading = "Patch")]
    pub path: Option<String>,

    /// Middleware reference to attach
    #[arg(long, env = "ROUTEHOOK_MIDDLEWARE", help_heading = "Patch")]
    pub middleware: Option<String>,

    /// What to do when the middleware is already attached
    #[arg(long, env = "ROUTEHOOK_ON_DUPLICATE", help_heading = "Patch")]
    pub on_duplicate: Option<DuplicatePolicy>,

    /// What to do when several routes match
    #[arg(long, env = "ROUTEHOOK_ON_AMBIGUOUS", help_heading = "Patch")]
    pub on_ambiguous: Option<AmbiguityPolicy>,
}

impl PatchOverrides {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.api.is_some() && self.method.is_some() && self.path.is_some() && self.middleware.is_some()
    }
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        routehook apply                                       Auto-detect files, print to stdout\n  \
        routehook apply -m routes.yaml --in-place             Rewrite routes.yaml\n  \
        routehook apply -m routes.json -o patched.json        Write to a new file\n  \
        routehook apply --middleware global::audit --dry-run  Preview only")]
pub struct ApplyArgs {
    /// Route manifest path (.yaml, .json, .toml)
    #[arg(short, long, env = "ROUTEHOOK_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Patch config path (.yaml, .json, .toml)
    #[arg(short, long, env = "ROUTEHOOK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: PatchOverrides,

    // -- Output --
    /// Write the patched manifest back to the manifest file
    #[arg(long, conflicts_with = "output", help_heading = "Output")]
    pub in_place: bool,

    /// Write the patched manifest to this file
    #[arg(short, long, help_heading = "Output")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long, requires = "output", help_heading = "Output")]
    pub force: bool,

    /// Apply the patch but do not write anything
    #[arg(long, help_heading = "Output")]
    pub dry_run: bool,

    /// Summary printed to stderr after applying
    #[arg(long, default_value = "text", help_heading = "Output")]
    pub report: ReportFormat,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Patch config to validate
    #[arg(default_value = "routehook.yaml")]
    pub config: PathBuf,

    /// Also check that the target route exists in this manifest
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        routehook init                            Starter config (yaml)\n  \
        routehook init -f toml -o patch.toml      TOML format, custom path")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include documentation for every option as comments
    #[arg(long)]
    pub full: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
