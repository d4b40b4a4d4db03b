//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;

    // Relative project paths are anchored next to the config file.
    if config.site.project_path.is_relative() {
        if let Some(dir) = path.parent() {
            config.site.project_path = dir.join(&config.site.project_path);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.languages.default, "en");
        assert!(!config.languages.enabled);
    }

    #[test]
    fn test_parse_languages() {
        let config = parse_config(
            r#"
            [languages]
            enabled = true
            supported = ["en", "fr"]
            default = "fr"
            "#,
        )
        .unwrap();
        assert!(config.languages.is_supported("en"));
        assert_eq!(config.languages.default, "fr");
    }

    #[test]
    fn test_validation_error_surfaces() {
        let err = parse_config(
            r#"
            [languages]
            supported = ["en"]
            default = "de"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("languages.default"));
    }

    #[test]
    fn test_load_anchors_project_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[site]\nproject_path = \"content\"").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.site.project_path, dir.path().join("content"));
    }
}
