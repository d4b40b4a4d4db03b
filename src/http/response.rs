//! Response helpers.
//!
//! # Responsibilities
//! - Turn pipeline results into HTTP responses
//! - Attach cookies and security headers
//!
//! # Design Decisions
//! - Bodies are always complete HTML documents; nothing is streamed
//! - Security headers never overwrite a header a handler already set

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::site::SiteResponse;

pub fn html(status: StatusCode, body: String) -> Response {
    (status, Html(body)).into_response()
}

pub fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location, error = %e, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Append a `Set-Cookie` header. Invalid cookie text is logged and skipped.
pub fn append_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::warn!(error = %e, "Dropping invalid Set-Cookie value"),
    }
}

impl IntoResponse for SiteResponse {
    fn into_response(self) -> Response {
        match self {
            SiteResponse::Html { status, body } => html(status, body),
            SiteResponse::Redirect { location } => {
                redirect(StatusCode::MOVED_PERMANENTLY, &location)
            }
        }
    }
}

/// Add the standard hardening headers to every response.
pub fn with_security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    const HEADERS: &[(&str, &str)] = &[
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "SAMEORIGIN"),
        ("referrer-policy", "strict-origin-when-cross-origin"),
    ];

    HEADERS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}
