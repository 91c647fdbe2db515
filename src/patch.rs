//! Route lookup and middleware patching.
//!
//! [`find_route`] locates the first [`RouteDescriptor`] whose method and
//! path equal the target, and [`patch`] appends a middleware reference to
//! that descriptor's list, creating the list when it is absent. Nothing is
//! mutated unless the lookup succeeds and the configured duplicate and
//! ambiguity policies allow the append.

use crate::config::model::{AmbiguityPolicy, DuplicatePolicy, PatchConfig, RouteDescriptor};
use crate::error::RouteHookError;

/// Match criteria and middleware for a single patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchTarget<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub middleware: &'a str,
    pub on_duplicate: DuplicatePolicy,
    pub on_ambiguous: AmbiguityPolicy,
}

impl<'a> PatchTarget<'a> {
    #[must_use]
    pub fn new(method: &'a str, path: &'a str, middleware: &'a str) -> Self {
        Self {
            method,
            path,
            middleware,
            on_duplicate: DuplicatePolicy::default(),
            on_ambiguous: AmbiguityPolicy::default(),
        }
    }

    #[must_use]
    pub const fn on_duplicate(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    #[must_use]
    pub const fn on_ambiguous(mut self, policy: AmbiguityPolicy) -> Self {
        self.on_ambiguous = policy;
        self
    }
}

impl<'a> From<&'a PatchConfig> for PatchTarget<'a> {
    fn from(config: &'a PatchConfig) -> Self {
        Self {
            method: &config.method,
            path: &config.path,
            middleware: &config.middleware_name,
            on_duplicate: config.on_duplicate,
            on_ambiguous: config.on_ambiguous,
        }
    }
}

/// Result of a successful [`patch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The middleware was appended at `position` in the list of route `index`.
    Appended { index: usize, position: usize },
    /// The middleware was already at `position`; the list is unchanged.
    AlreadyPresent { index: usize, position: usize },
}

impl PatchOutcome {
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Appended { index, .. } | Self::AlreadyPresent { index, .. } => *index,
        }
    }

    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Appended { .. })
    }
}

/// Index of the first route matching `method` and `path` in table order.
#[must_use]
pub fn find_route(routes: &[RouteDescriptor], method: &str, path: &str) -> Option<usize> {
    routes.iter().position(|r| r.matches(method, path))
}

#[must_use]
pub fn count_matches(routes: &[RouteDescriptor], method: &str, path: &str) -> usize {
    routes.iter().filter(|r| r.matches(method, path)).count()
}

/// Append `target.middleware` to the matching route's middleware list.
pub fn patch(
    routes: &mut [RouteDescriptor],
    target: &PatchTarget<'_>,
) -> Result<PatchOutcome, RouteHookError> {
    let Some(index) = find_route(routes, target.method, target.path) else {
        return Err(RouteHookError::RouteNotFound {
            method: target.method.to_string(),
            path: target.path.to_string(),
        });
    };

    let matches = count_matches(&routes[index..], target.method, target.path);
    if matches > 1 {
        match target.on_ambiguous {
            AmbiguityPolicy::First => {
                tracing::warn!(
                    method = target.method,
                    path = target.path,
                    matches,
                    index,
                    "several routes match, patching the first"
                );
            }
            AmbiguityPolicy::Fail => {
                return Err(RouteHookError::AmbiguousRoute {
                    method: target.method.to_string(),
                    path: target.path.to_string(),
                    matches,
                });
            }
        }
    }

    let route = &mut routes[index];
    let existing = route
        .middlewares()
        .and_then(|list| list.iter().position(|m| m == target.middleware));

    if let Some(position) = existing {
        match target.on_duplicate {
            DuplicatePolicy::Skip => {
                tracing::info!(
                    middleware = target.middleware,
                    method = target.method,
                    path = target.path,
                    position,
                    "middleware already registered, skipping"
                );
                return Ok(PatchOutcome::AlreadyPresent { index, position });
            }
            DuplicatePolicy::Fail => {
                return Err(RouteHookError::DuplicateRegistration {
                    middleware: target.middleware.to_string(),
                    method: target.method.to_string(),
                    path: target.path.to_string(),
                });
            }
            DuplicatePolicy::Append => {}
        }
    }

    let list = route.middlewares_mut();
    list.push(target.middleware.to_string());
    let position = list.len() - 1;

    tracing::info!(
        middleware = target.middleware,
        method = target.method,
        path = target.path,
        index,
        position,
        "middleware attached"
    );

    Ok(PatchOutcome::Appended { index, position })
}
