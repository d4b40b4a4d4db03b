//! Language prefix detection.
//!
//! # Responsibilities
//! - Consume an optional leading language segment
//! - Fall back to the configured default otherwise
//!
//! # Design Decisions
//! - Total function: no input produces an error
//! - Independent of alias and route resolution

use crate::config::LanguageConfig;

/// Language selected for one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageContext {
    pub code: String,
    pub is_default: bool,
}

impl LanguageContext {
    pub fn default_for(config: &LanguageConfig) -> Self {
        Self {
            code: config.default.clone(),
            is_default: true,
        }
    }
}

/// Strip a leading supported-language segment from `segments`.
///
/// Returns the selected language and the remaining segments.
pub fn resolve(segments: &[String], config: &LanguageConfig) -> (LanguageContext, Vec<String>) {
    if !config.enabled {
        return (LanguageContext::default_for(config), segments.to_vec());
    }

    match segments.split_first() {
        Some((first, rest)) if config.is_supported(first) => (
            LanguageContext {
                code: first.clone(),
                is_default: *first == config.default,
            },
            rest.to_vec(),
        ),
        _ => (LanguageContext::default_for(config), segments.to_vec()),
    }
}
