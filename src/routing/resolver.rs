//! Route → template identity resolution.
//!
//! # Responsibilities
//! - Map route segments to a template identity
//! - Apply the nested-folder convention with flat and single-segment fallbacks
//!
//! # Design Decisions
//! - Strict precedence: nested (`a/b/b`) > flat (`a/b`) > first segment (`a`)
//! - The nested convention always wins so a migrated site never serves the
//!   stale flat template
//! - No fallback after the third tier; the caller renders 404 and stops
//! - Segments, not the identity, are what rendering and navigation use

use crate::routing::path::is_safe_segment;

/// Identity of the page served for the root URL.
pub const HOME: &str = "home";

/// Identity of the not-found page.
pub const NOT_FOUND: &str = "404";

/// Result of resolving a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    /// Route segments used for breadcrumbs and labels. Never empty when `found`.
    pub segments: Vec<String>,
    /// Template identity to load.
    pub identity: String,
    /// Trailing segments not consumed by the route.
    pub params: Vec<String>,
    pub found: bool,
}

impl RouteResult {
    fn not_found(segments: Vec<String>) -> Self {
        Self {
            segments,
            identity: NOT_FOUND.to_string(),
            params: Vec::new(),
            found: false,
        }
    }

    /// Route path joined with `/`, e.g. `guides/installation`.
    pub fn route_path(&self) -> String {
        self.segments.join("/")
    }

    pub fn is_home(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == HOME
    }
}

/// Nested-convention identity: `a/b` → `a/b/b`.
pub fn nested_identity(segments: &[String]) -> Option<String> {
    let last = segments.last()?;
    Some(format!("{}/{}", segments.join("/"), last))
}

/// Resolve `segments` against the template store.
///
/// `exists` answers whether a template is stored under an identity.
pub fn resolve<F>(segments: &[String], exists: F) -> RouteResult
where
    F: Fn(&str) -> bool,
{
    let segments: Vec<String> = if segments.is_empty() {
        vec![HOME.to_string()]
    } else {
        segments.to_vec()
    };

    if !segments.iter().all(|s| is_safe_segment(s)) {
        tracing::debug!(?segments, "Rejecting unsafe route segments");
        return RouteResult::not_found(segments);
    }

    // Tier A: nested convention.
    if let Some(identity) = nested_identity(&segments) {
        if exists(&identity) {
            return RouteResult {
                segments,
                identity,
                params: Vec::new(),
                found: true,
            };
        }
    }

    // Tier B: flat legacy layout.
    let flat = segments.join("/");
    if exists(&flat) {
        return RouteResult {
            segments,
            identity: flat,
            params: Vec::new(),
            found: true,
        };
    }

    // Tier C: single-segment legacy layout.
    let first = segments[0].clone();
    if exists(&first) {
        return RouteResult {
            params: segments[1..].to_vec(),
            segments: vec![first.clone()],
            identity: first,
            found: true,
        };
    }

    RouteResult::not_found(segments)
}
