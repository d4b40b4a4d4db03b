//! Admin URL parsing: `/admin/{page}/{command|workflow}/{params...}`.

use crate::routing::path;

/// Pages the admin panel knows how to render.
pub const ADMIN_PAGES: &[&str] = &[
    "login",
    "dashboard",
    "command",
    "history",
    "settings",
    "structure",
    "batch",
    "docs",
    "workflows",
    "ai-settings",
    "preview",
    "logout",
];

pub const LOGIN: &str = "login";
pub const DASHBOARD: &str = "dashboard";
pub const LOGOUT: &str = "logout";

/// Parsed admin request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRoute {
    pub page: String,
    /// Command name on `command` pages.
    pub command: Option<String>,
    /// Workflow id on `workflows` pages: `new`, `edit/<id>` or a bare id.
    pub workflow: Option<String>,
    pub params: Vec<String>,
}

impl AdminRoute {
    pub fn parse(request_path: &str) -> Self {
        let mut parts = path::segments(request_path).into_iter().peekable();
        if parts.peek().map(String::as_str) == Some("admin") {
            parts.next();
        }

        let page = parts.next().unwrap_or_else(|| LOGIN.to_string());
        let mut command = None;
        let mut workflow = None;

        match page.as_str() {
            "command" => command = parts.next(),
            "workflows" => {
                workflow = match parts.next() {
                    Some(first) if first == "edit" => match parts.next() {
                        Some(id) => Some(format!("edit/{id}")),
                        None => Some(first),
                    },
                    other => other,
                };
            }
            _ => {}
        }

        Self {
            page,
            command,
            workflow,
            params: parts.collect(),
        }
    }

    pub fn is_known_page(&self) -> bool {
        ADMIN_PAGES.contains(&self.page.as_str())
    }
}
