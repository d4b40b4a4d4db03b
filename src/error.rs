//! Error kinds shared by the resolution pipeline and the renderer.
//!
//! Every kind maps to a fallback render or a redirect; only
//! [`SiteError::TemplateMissing`] stops a request (as a 404). No render
//! failure becomes a 5xx.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    /// No backing document after every fallback tier.
    #[error("template not found: {identity}")]
    TemplateMissing { identity: String },

    /// Alias target empty or malformed; resolution continues without the alias.
    #[error("alias '{source_path}' has an invalid target '{target}'")]
    AliasTargetInvalid { source_path: String, target: String },

    /// Isolated component render could not locate or parse the component.
    #[error("component not found: {name}")]
    ComponentNotFound { name: String },

    /// Admin request without a valid session.
    #[error("authentication required")]
    Unauthenticated,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SiteError {
    /// HTTP status a caller should surface for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::TemplateMissing { .. } => StatusCode::NOT_FOUND,
            SiteError::AliasTargetInvalid { .. } | SiteError::ComponentNotFound { .. } => {
                StatusCode::OK
            }
            SiteError::Unauthenticated => StatusCode::SEE_OTHER,
            // Unreadable documents render as a degraded page.
            SiteError::Io { .. } | SiteError::Json { .. } => StatusCode::OK,
        }
    }
}

pub type SiteResult<T> = Result<T, SiteError>;
