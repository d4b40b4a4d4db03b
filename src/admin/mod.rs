//! Admin control plane.
//!
//! # Data Flow
//! ```text
//! /admin/* request
//!     → route.rs (page, command, workflow, params)
//!     → dispatcher.rs (cookie restore → logout → auth gate → view)
//!         → session.rs (SessionStore, TokenValidator)
//!     → handlers.rs (cookies, redirect or page)
//! ```

pub mod dispatcher;
pub mod handlers;
pub mod route;
pub mod session;

use axum::{routing::get, Router};

use crate::http::server::AppState;
use self::handlers::{admin_login, admin_page};

pub use dispatcher::{AdminDispatch, AdminDispatcher, AdminOutcome, AdminView, WorkflowView};
pub use route::AdminRoute;
pub use session::{ConfigTokenValidator, MemorySessionStore, SessionStore, TokenValidator};

pub fn setup_admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_page))
        .route("/admin/login", get(admin_page).post(admin_login))
        .route("/admin/{*path}", get(admin_page))
}
