//! routehook attaches a middleware reference to one route of a host
//! framework's route table during startup.
//!
//! The host exposes its API groups through a [`HostContext`](host::HostContext).
//! A [`Plugin`](host::Plugin) registered with the host receives exclusive
//! access to that context once, before any request is served. The
//! [`MiddlewarePlugin`](middleware::MiddlewarePlugin) finds the route matching
//! a configured method and path and appends the middleware to its list.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (apply, validate, init).
//! - [`config`] -- Data model, validation, and file-based manifest sources
//!   behind the [`ManifestSource`](config::ManifestSource) trait.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`host`] -- Host runtime context, the plugin trait, and the registry.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- The middleware registration plugin.
//! - [`patch`] -- Route lookup and the in-place middleware patch.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML manifest and config support _(enabled by default)_ |
//! | `toml` | TOML manifest and config support |
//! | `file-backends` | All file formats |
//! | `full` | All features |
//!
//! JSON is always available.

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod middleware;
pub mod patch;
