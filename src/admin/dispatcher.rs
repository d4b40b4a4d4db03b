//! Admin dispatch state machine.
//!
//! # Responsibilities
//! - Restore a valid remembered token into an empty session
//! - Handle logout
//! - Gate every page except `login` behind a valid token
//! - Pick the view, including workflow sub-routes
//!
//! # Design Decisions
//! - Pure with respect to HTTP: inputs are the parsed route and cookie
//!   values, the output says what to render or where to redirect
//! - Session storage and token validation are injected

use axum::http::StatusCode;

use crate::admin::route::{AdminRoute, DASHBOARD, LOGIN, LOGOUT};
use crate::admin::session::{new_session_id, SessionStore, TokenValidator};
use crate::error::SiteError;
use crate::observability::metrics;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowView {
    Index,
    Spec { id: String },
    /// `id` is `None` for a new workflow.
    Editor { id: Option<String> },
}

impl WorkflowView {
    fn from_route(workflow: Option<&str>) -> Self {
        match workflow {
            None => WorkflowView::Index,
            Some("new") => WorkflowView::Editor { id: None },
            Some(w) => match w.strip_prefix("edit/") {
                Some(id) => WorkflowView::Editor {
                    id: Some(id.to_string()),
                },
                None => WorkflowView::Spec { id: w.to_string() },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminView {
    Login,
    Dashboard,
    Command { name: Option<String> },
    History,
    Settings,
    Structure,
    Batch,
    Docs,
    Workflows(WorkflowView),
    AiSettings,
    Preview,
    NotFound { page: String },
}

impl AdminView {
    /// State name, used to tag rendered pages.
    pub fn name(&self) -> &str {
        match self {
            AdminView::Login => "login",
            AdminView::Dashboard => "dashboard",
            AdminView::Command { .. } => "command",
            AdminView::History => "history",
            AdminView::Settings => "settings",
            AdminView::Structure => "structure",
            AdminView::Batch => "batch",
            AdminView::Docs => "docs",
            AdminView::Workflows(_) => "workflows",
            AdminView::AiSettings => "ai-settings",
            AdminView::Preview => "preview",
            AdminView::NotFound { .. } => "404",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AdminView::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::OK,
        }
    }

    fn for_route(route: &AdminRoute) -> Self {
        match route.page.as_str() {
            "login" => AdminView::Login,
            "dashboard" => AdminView::Dashboard,
            "command" => AdminView::Command {
                name: route.command.clone(),
            },
            "history" => AdminView::History,
            "settings" => AdminView::Settings,
            "structure" => AdminView::Structure,
            "batch" => AdminView::Batch,
            "docs" => AdminView::Docs,
            "workflows" => AdminView::Workflows(WorkflowView::from_route(route.workflow.as_deref())),
            "ai-settings" => AdminView::AiSettings,
            "preview" => AdminView::Preview,
            other => AdminView::NotFound {
                page: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    /// Redirect to another admin page.
    Redirect { page: &'static str },
    Render(AdminView),
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDispatch {
    pub outcome: AdminOutcome,
    /// Session created while restoring a remembered token; the caller
    /// must hand its id back to the client.
    pub new_session: Option<String>,
    /// The remembered-token cookie must be expired.
    pub forget_token: bool,
}

impl AdminDispatch {
    fn redirect(page: &'static str, new_session: Option<String>) -> Self {
        Self {
            outcome: AdminOutcome::Redirect { page },
            new_session,
            forget_token: false,
        }
    }
}

pub struct AdminDispatcher<'a> {
    sessions: &'a dyn SessionStore,
    validator: &'a dyn TokenValidator,
}

impl<'a> AdminDispatcher<'a> {
    pub fn new(sessions: &'a dyn SessionStore, validator: &'a dyn TokenValidator) -> Self {
        Self {
            sessions,
            validator,
        }
    }

    /// True if the session holds a valid token. An invalid token is dropped.
    pub fn authenticated(&self, session_id: Option<&str>) -> bool {
        let Some(id) = session_id else {
            return false;
        };
        match self.sessions.get(id) {
            Some(token) if self.validator.is_valid(&token) => true,
            Some(_) => {
                tracing::debug!("Dropping session with invalid token");
                self.sessions.clear(id);
                false
            }
            None => false,
        }
    }

    pub fn dispatch(
        &self,
        route: &AdminRoute,
        session_id: Option<&str>,
        remembered_token: Option<&str>,
    ) -> AdminDispatch {
        let (session_id, new_session) = self.restore(session_id, remembered_token);
        let session_id = session_id.as_deref();

        let dispatch = if route.page == LOGOUT {
            if let Some(id) = session_id {
                self.sessions.clear(id);
            }
            AdminDispatch {
                outcome: AdminOutcome::Redirect { page: LOGIN },
                new_session: None,
                forget_token: true,
            }
        } else {
            let authenticated = self.authenticated(session_id);
            if route.page != LOGIN && !authenticated {
                tracing::debug!(
                    page = %route.page,
                    error = %SiteError::Unauthenticated,
                    "Redirecting to login"
                );
                AdminDispatch::redirect(LOGIN, new_session)
            } else if route.page == LOGIN && authenticated {
                AdminDispatch::redirect(DASHBOARD, new_session)
            } else {
                AdminDispatch {
                    outcome: AdminOutcome::Render(AdminView::for_route(route)),
                    new_session,
                    forget_token: false,
                }
            }
        };

        let outcome = match &dispatch.outcome {
            AdminOutcome::Redirect { .. } => "redirect",
            AdminOutcome::Render(AdminView::NotFound { .. }) => "not_found",
            AdminOutcome::Render(_) => "render",
        };
        tracing::debug!(page = %route.page, outcome, "Admin dispatch");
        metrics::record_admin_dispatch(&route.page, outcome);
        dispatch
    }

    /// Copy a valid remembered token into an empty session.
    ///
    /// Returns the effective session id and, if one had to be created, its id.
    fn restore(
        &self,
        session_id: Option<&str>,
        remembered_token: Option<&str>,
    ) -> (Option<String>, Option<String>) {
        let session_id = session_id.map(str::to_string);
        let Some(token) = remembered_token.filter(|t| !t.is_empty()) else {
            return (session_id, None);
        };
        if !self.validator.is_valid(token) {
            tracing::debug!("Ignoring invalid remembered token");
            return (session_id, None);
        }
        if let Some(id) = &session_id {
            if self.sessions.get(id).is_some() {
                return (session_id, None);
            }
            self.sessions.set(id, token.to_string());
            return (session_id, None);
        }
        let id = new_session_id();
        self.sessions.set(&id, token.to_string());
        (Some(id.clone()), Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::session::{ConfigTokenValidator, MemorySessionStore};

    struct Fixture {
        sessions: MemorySessionStore,
        validator: ConfigTokenValidator,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                sessions: MemorySessionStore::new(),
                validator: ConfigTokenValidator::new(vec!["good".into()]),
            }
        }

        fn dispatch(&self, path: &str, session: Option<&str>, cookie: Option<&str>) -> AdminDispatch {
            AdminDispatcher::new(&self.sessions, &self.validator).dispatch(
                &AdminRoute::parse(path),
                session,
                cookie,
            )
        }
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let f = Fixture::new();
        let d = f.dispatch("/admin/dashboard", None, None);
        assert_eq!(d.outcome, AdminOutcome::Redirect { page: "login" });
    }

    #[test]
    fn test_login_page_renders_when_anonymous() {
        let f = Fixture::new();
        let d = f.dispatch("/admin", None, None);
        assert_eq!(d.outcome, AdminOutcome::Render(AdminView::Login));
    }

    #[test]
    fn test_login_when_authenticated_goes_to_dashboard() {
        let f = Fixture::new();
        f.sessions.set("s", "good".into());
        let d = f.dispatch("/admin/login", Some("s"), None);
        assert_eq!(d.outcome, AdminOutcome::Redirect { page: "dashboard" });
    }

    #[test]
    fn test_cookie_restores_session() {
        let f = Fixture::new();
        let d = f.dispatch("/admin/history", None, Some("good"));
        assert_eq!(d.outcome, AdminOutcome::Render(AdminView::History));
        let id = d.new_session.expect("session created");
        assert_eq!(f.sessions.get(&id).as_deref(), Some("good"));
    }

    #[test]
    fn test_cookie_does_not_override_session() {
        let f = Fixture::new();
        f.sessions.set("s", "good".into());
        let d = f.dispatch("/admin/docs", Some("s"), Some("stale"));
        assert_eq!(d.outcome, AdminOutcome::Render(AdminView::Docs));
        assert_eq!(f.sessions.get("s").as_deref(), Some("good"));
    }

    #[test]
    fn test_invalid_token_is_cleared() {
        let f = Fixture::new();
        f.sessions.set("s", "revoked".into());
        let d = f.dispatch("/admin/settings", Some("s"), None);
        assert_eq!(d.outcome, AdminOutcome::Redirect { page: "login" });
        assert!(f.sessions.get("s").is_none());
    }

    #[test]
    fn test_invalid_cookie_creates_no_session() {
        let f = Fixture::new();
        let d = f.dispatch("/admin/settings", None, Some("bad"));
        assert_eq!(d.outcome, AdminOutcome::Redirect { page: "login" });
        assert_eq!(d.new_session, None);
        assert!(f.sessions.is_empty());
    }

    #[test]
    fn test_logout_clears_everything() {
        let f = Fixture::new();
        f.sessions.set("s", "good".into());
        let d = f.dispatch("/admin/logout", Some("s"), Some("good"));
        assert_eq!(d.outcome, AdminOutcome::Redirect { page: "login" });
        assert!(d.forget_token);
        assert!(f.sessions.is_empty());
    }

    #[test]
    fn test_workflow_views() {
        let f = Fixture::new();
        f.sessions.set("s", "good".into());
        let view = |path: &str| match f.dispatch(path, Some("s"), None).outcome {
            AdminOutcome::Render(view) => view,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(view("/admin/workflows"), AdminView::Workflows(WorkflowView::Index));
        assert_eq!(
            view("/admin/workflows/new"),
            AdminView::Workflows(WorkflowView::Editor { id: None })
        );
        assert_eq!(
            view("/admin/workflows/edit/7"),
            AdminView::Workflows(WorkflowView::Editor { id: Some("7".into()) })
        );
        assert_eq!(
            view("/admin/workflows/seo-audit"),
            AdminView::Workflows(WorkflowView::Spec { id: "seo-audit".into() })
        );
    }

    #[test]
    fn test_unknown_page_is_404_when_authenticated() {
        let f = Fixture::new();
        f.sessions.set("s", "good".into());
        let d = f.dispatch("/admin/favorites", Some("s"), None);
        let AdminOutcome::Render(view) = d.outcome else {
            panic!("expected render");
        };
        assert_eq!(view.status(), StatusCode::NOT_FOUND);
        assert_eq!(f.dispatch("/admin/favorites", None, None).outcome, AdminOutcome::Redirect { page: "login" });
    }
}
