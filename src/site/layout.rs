//! Per-route chrome visibility.
//!
//! `config/route-layout.json` holds overrides keyed by route path:
//!
//! ```json
//! {"routes": {"guides": {"menu": false}, "guides/install": {"menu": true}}}
//! ```
//!
//! A route without an entry inherits each flag from its nearest ancestor
//! that sets it. The root (`""`) and the built-in default (both shown)
//! come last.

use serde::Deserialize;
use std::collections::HashMap;

use crate::routing::path::trim_slashes;

/// Effective menu and footer visibility for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLayout {
    pub menu: bool,
    pub footer: bool,
}

impl Default for RouteLayout {
    fn default() -> Self {
        Self {
            menu: true,
            footer: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LayoutEntry {
    menu: Option<bool>,
    footer: Option<bool>,
}

/// Parsed layout overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteLayouts {
    #[serde(default)]
    routes: HashMap<String, LayoutEntry>,
}

impl RouteLayouts {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: RouteLayouts = serde_json::from_str(json)?;
        let routes = parsed
            .routes
            .into_iter()
            .map(|(k, v)| (trim_slashes(&k).to_string(), v))
            .collect();
        Ok(Self { routes })
    }

    /// Layout for `route`, e.g. `guides/install/step1`.
    pub fn effective(&self, route: &str) -> RouteLayout {
        let mut layout = RouteLayout::default();
        let mut menu_set = false;
        let mut footer_set = false;

        for ancestor in ancestors(trim_slashes(route)) {
            let Some(entry) = self.routes.get(ancestor) else {
                continue;
            };
            if let (false, Some(menu)) = (menu_set, entry.menu) {
                layout.menu = menu;
                menu_set = true;
            }
            if let (false, Some(footer)) = (footer_set, entry.footer) {
                layout.footer = footer;
                footer_set = true;
            }
            if menu_set && footer_set {
                break;
            }
        }
        layout
    }
}

/// `a/b/c` → `a/b/c`, `a/b`, `a`, `""`.
fn ancestors(route: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(route);
    std::iter::from_fn(move || {
        let current = next?;
        next = match current.rfind('/') {
            Some(i) => Some(&current[..i]),
            None if current.is_empty() => None,
            None => Some(""),
        };
        Some(current)
    })
}
