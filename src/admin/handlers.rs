//! Admin HTTP handlers.
//!
//! # Responsibilities
//! - Read the session and remember-me cookies
//! - Run the dispatcher and turn its outcome into a response
//! - Accept the login form and start a session
//!
//! Pages are minimal HTML shells tagged with their state name; the panel's
//! client-side code fills them in.

use axum::{
    extract::{Form, State},
    http::{header::COOKIE, HeaderMap, StatusCode, Uri},
    response::Response,
};
use serde::Deserialize;

use crate::admin::dispatcher::{AdminDispatcher, AdminOutcome, AdminView, WorkflowView};
use crate::admin::route::{AdminRoute, DASHBOARD, LOGIN};
use crate::admin::session::{new_session_id, ConfigTokenValidator, SessionStore, TokenValidator};
use crate::config::AdminConfig;
use crate::http::response::{append_cookie, html, redirect};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::render::html::escape_html;

/// Value of cookie `name`, if present and non-empty.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

fn session_cookie(config: &AdminConfig, session_id: &str) -> String {
    format!(
        "{}={session_id}; Path=/admin; HttpOnly; SameSite=Strict",
        config.session_cookie
    )
}

fn remember_cookie(config: &AdminConfig, token: &str) -> String {
    format!(
        "{}={token}; Max-Age={}; Path=/admin; HttpOnly; SameSite=Strict",
        config.remember_cookie,
        u64::from(config.remember_days) * 24 * 60 * 60
    )
}

fn expired_cookie(name: &str) -> String {
    format!("{name}=; Max-Age=0; Path=/admin; HttpOnly; SameSite=Strict")
}

fn admin_location(page: &str) -> String {
    format!("/admin/{page}")
}

fn view_body(view: &AdminView, error: Option<&str>) -> String {
    match view {
        AdminView::Login => {
            let error = error
                .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
                .unwrap_or_default();
            format!(
                concat!(
                    "<h1>Admin login</h1>{error}",
                    r#"<form method="post" action="/admin/login">"#,
                    r#"<input type="password" name="token" required>"#,
                    r#"<label><input type="checkbox" name="remember" value="1"> Remember me</label>"#,
                    r#"<button type="submit">Sign in</button></form>"#
                ),
                error = error
            )
        }
        AdminView::Command { name } => format!(
            r#"<h1>Command</h1><div data-command="{}"></div>"#,
            escape_html(name.as_deref().unwrap_or_default())
        ),
        AdminView::Workflows(WorkflowView::Index) => {
            r#"<h1>Workflows</h1><div data-workflow-view="index"></div>"#.to_string()
        }
        AdminView::Workflows(WorkflowView::Spec { id }) => format!(
            r#"<h1>Workflow</h1><div data-workflow-view="spec" data-workflow="{}"></div>"#,
            escape_html(id)
        ),
        AdminView::Workflows(WorkflowView::Editor { id }) => format!(
            r#"<h1>Workflow editor</h1><div data-workflow-view="editor" data-workflow="{}"></div>"#,
            escape_html(id.as_deref().unwrap_or("new"))
        ),
        AdminView::NotFound { page } => format!(
            "<h1>Page not found</h1><p>{}</p>",
            escape_html(page)
        ),
        other => format!("<h1>{}</h1>", escape_html(other.name())),
    }
}

/// Full admin page for `view`.
pub fn render_view(view: &AdminView, error: Option<&str>) -> String {
    let name = escape_html(view.name());
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>Admin - {name}</title></head><body data-admin-page="{name}">{}</body></html>"#,
        view_body(view, error)
    )
}

/// `GET /admin/*`
pub async fn admin_page(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let config = state.config.load_full();
    let admin = &config.admin;
    let route = AdminRoute::parse(uri.path());
    let session_id = cookie_value(&headers, &admin.session_cookie);
    let remembered = cookie_value(&headers, &admin.remember_cookie);
    let validator = ConfigTokenValidator::new(admin.tokens.clone());

    let dispatch = AdminDispatcher::new(state.sessions.as_ref(), &validator).dispatch(
        &route,
        session_id.as_deref(),
        remembered.as_deref(),
    );

    let mut response = match &dispatch.outcome {
        AdminOutcome::Redirect { page } => redirect(StatusCode::FOUND, &admin_location(page)),
        AdminOutcome::Render(view) => html(view.status(), render_view(view, None)),
    };

    if let Some(id) = &dispatch.new_session {
        append_cookie(&mut response, &session_cookie(admin, id));
    }
    if dispatch.forget_token {
        append_cookie(&mut response, &expired_cookie(&admin.session_cookie));
        append_cookie(&mut response, &expired_cookie(&admin.remember_cookie));
    }

    metrics::record_request("GET", response.status().as_u16(), "admin");
    response
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
    pub remember: Option<String>,
}

impl LoginForm {
    fn remember(&self) -> bool {
        matches!(self.remember.as_deref(), Some(v) if !v.is_empty() && v != "0")
    }
}

/// `POST /admin/login`
pub async fn admin_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let config = state.config.load_full();
    let admin = &config.admin;
    let validator = ConfigTokenValidator::new(admin.tokens.clone());

    // Already signed in: same as visiting the login page.
    let current = cookie_value(&headers, &admin.session_cookie);
    if AdminDispatcher::new(state.sessions.as_ref(), &validator).authenticated(current.as_deref()) {
        return redirect(StatusCode::FOUND, &admin_location(DASHBOARD));
    }

    if !validator.is_valid(form.token.trim()) {
        tracing::warn!("Rejected admin login");
        metrics::record_admin_dispatch(LOGIN, "rejected");
        let response = html(
            StatusCode::UNAUTHORIZED,
            render_view(&AdminView::Login, Some("Invalid token")),
        );
        metrics::record_request("POST", response.status().as_u16(), "admin");
        return response;
    }

    let token = form.token.trim().to_string();
    let session_id = new_session_id();
    state.sessions.set(&session_id, token.clone());
    tracing::info!(remember = form.remember(), "Admin login");
    metrics::record_admin_dispatch(LOGIN, "accepted");

    let mut response = redirect(StatusCode::FOUND, &admin_location(DASHBOARD));
    append_cookie(&mut response, &session_cookie(admin, &session_id));
    if form.remember() {
        append_cookie(&mut response, &remember_cookie(admin, &token));
    }
    metrics::record_request("POST", response.status().as_u16(), "admin");
    response
}
