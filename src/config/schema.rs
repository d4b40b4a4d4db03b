//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site engine.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the site engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address, connection limits).
    pub listener: ListenerConfig,

    /// Public base URL and content locations.
    pub site: SiteSettings,

    /// Multilingual settings.
    pub languages: LanguageConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Site content settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Absolute base URL used for generated links. Must end with `/`.
    pub base_url: String,

    /// Project directory holding `templates/`, `translate/`, `data/` and `config/`.
    pub project_path: PathBuf,

    /// Serve `/__component/{name}` previews for the visual editor.
    pub component_preview: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            project_path: PathBuf::from("project"),
            component_preview: true,
        }
    }
}

/// Multilingual configuration.
///
/// Mirrors the `{enabled, supported, default}` option set consumed by the
/// language resolver.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Enable language prefixes in URLs.
    pub enabled: bool,

    /// Supported language codes, in preference order.
    pub supported: Vec<String>,

    /// Default language used when the URL carries none.
    pub default: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            supported: vec!["en".to_string()],
            default: "en".to_string(),
        }
    }
}

impl LanguageConfig {
    /// Returns true if `code` is one of the supported languages.
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|s| s == code)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin panel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the `/admin` surface.
    pub enabled: bool,

    /// Accepted admin tokens. Issuing tokens is handled elsewhere.
    pub tokens: Vec<String>,

    /// Cookie carrying the short-lived session id.
    pub session_cookie: String,

    /// Cookie carrying the long-lived "remember me" token.
    pub remember_cookie: String,

    /// Lifetime of the remember-me cookie in days.
    pub remember_days: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tokens: Vec::new(),
            session_cookie: "site_admin_session".to_string(),
            remember_cookie: "admin_token".to_string(),
            remember_days: 30,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024, // admin login form only
        }
    }
}
