//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default language is a supported one)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::SiteConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::new("listener.max_connections", "must be > 0"));
    }

    match url::Url::parse(&config.site.base_url) {
        Ok(parsed) if parsed.cannot_be_a_base() => {
            errors.push(ValidationError::new("site.base_url", "must be a base URL"));
        }
        Ok(_) if !config.site.base_url.ends_with('/') => {
            errors.push(ValidationError::new("site.base_url", "must end with '/'"));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::new("site.base_url", e.to_string()));
        }
    }

    let languages = &config.languages;
    if languages.supported.is_empty() {
        errors.push(ValidationError::new("languages.supported", "must not be empty"));
    }
    for code in &languages.supported {
        if !is_language_code(code) {
            errors.push(ValidationError::new(
                "languages.supported",
                format!("'{code}' is not a valid language code"),
            ));
        }
    }
    if !languages.is_supported(&languages.default) {
        errors.push(ValidationError::new(
            "languages.default",
            format!("'{}' is not listed in languages.supported", languages.default),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if config.admin.enabled {
        if config.admin.session_cookie.is_empty() || config.admin.remember_cookie.is_empty() {
            errors.push(ValidationError::new("admin", "cookie names must not be empty"));
        }
        if config.admin.session_cookie == config.admin.remember_cookie {
            errors.push(ValidationError::new(
                "admin.remember_cookie",
                "must differ from admin.session_cookie",
            ));
        }
        if config.admin.tokens.iter().any(|t| t.trim().is_empty()) {
            errors.push(ValidationError::new("admin.tokens", "tokens must not be blank"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Language codes are short ASCII tags such as `en` or `pt-br`.
fn is_language_code(code: &str) -> bool {
    (2..=8).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !code.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SiteConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.languages.supported = vec!["en".into(), "../x".into()];
        config.languages.default = "fr".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "languages.supported",
                "languages.default",
                "timeouts.request_secs",
            ]
        );
    }

    #[test]
    fn test_base_url_needs_trailing_slash() {
        let mut config = SiteConfig::default();
        config.site.base_url = "https://example.com/site".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "site.base_url");
    }

    #[test]
    fn test_cookie_names_must_differ() {
        let mut config = SiteConfig::default();
        config.admin.remember_cookie = config.admin.session_cookie.clone();
        assert!(validate_config(&config).is_err());
    }
}
