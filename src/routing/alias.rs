//! URL alias lookup.
//!
//! # Responsibilities
//! - Load the path → alias table
//! - Decide between redirect, rewrite and no alias for a normalized path
//!
//! # Design Decisions
//! - Exact-match lookup only (no wildcards, no prefixes)
//! - Single hop: a target is never looked up again, which bounds
//!   resolution to one extra lookup and rules out alias loops
//! - Invalid targets degrade to `NoAlias` with a warning

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::SiteError;
use crate::routing::path::trim_slashes;

/// How an alias is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasKind {
    /// Visible 301 redirect.
    #[default]
    Redirect,
    /// Transparent internal rewrite.
    #[serde(alias = "internal")]
    Rewrite,
}

/// One configured alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub source_path: String,
    pub target_path: String,
    pub kind: AliasKind,
}

#[derive(Debug, Deserialize)]
struct RawAlias {
    target: String,
    #[serde(default, rename = "type")]
    kind: AliasKind,
}

/// Alias table keyed by normalized source path.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON alias document (`{"/old": {"target": "/new", "type": "redirect"}}`).
    ///
    /// Keys are normalized on load; when two keys normalize to the same path the
    /// later one wins.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, RawAlias> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (source, alias) in raw {
            table.insert(&source, &alias.target, alias.kind);
        }
        Ok(table)
    }

    pub fn insert(&mut self, source: &str, target: &str, kind: AliasKind) {
        let key = trim_slashes(source).to_string();
        self.entries.insert(
            key.clone(),
            AliasEntry {
                source_path: key,
                target_path: target.to_string(),
                kind,
            },
        );
    }

    pub fn get(&self, normalized_path: &str) -> Option<&AliasEntry> {
        self.entries.get(normalized_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of an alias lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasDecision {
    NoAlias,
    /// Permanent redirect to `target`, prefixed with `language_prefix` when multilingual.
    Redirect {
        target: String,
        language_prefix: Option<String>,
    },
    /// Resolve `target` as if it were the requested path.
    Rewrite { target: String },
}

impl AliasDecision {
    /// `Location` header value for a redirect decision.
    pub fn location(&self) -> Option<String> {
        match self {
            AliasDecision::Redirect {
                target,
                language_prefix: Some(lang),
            } => Some(format!("/{lang}/{target}")),
            AliasDecision::Redirect {
                target,
                language_prefix: None,
            } => Some(format!("/{target}")),
            AliasDecision::NoAlias | AliasDecision::Rewrite { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AliasDecision::NoAlias => "none",
            AliasDecision::Redirect { .. } => "redirect",
            AliasDecision::Rewrite { .. } => "rewrite",
        }
    }
}

/// Look up `normalized_path` (language already stripped, slashes trimmed).
///
/// `language` is the request's resolved language when multilingual support is
/// enabled, `None` otherwise; it becomes the redirect prefix.
pub fn resolve(normalized_path: &str, table: &AliasTable, language: Option<&str>) -> AliasDecision {
    let Some(entry) = table.get(trim_slashes(normalized_path)) else {
        return AliasDecision::NoAlias;
    };

    let target = match validate_target(entry) {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring alias");
            return AliasDecision::NoAlias;
        }
    };

    match entry.kind {
        AliasKind::Redirect => AliasDecision::Redirect {
            target,
            language_prefix: language.map(str::to_string),
        },
        AliasKind::Rewrite => AliasDecision::Rewrite { target },
    }
}

fn validate_target(entry: &AliasEntry) -> Result<String, SiteError> {
    let target = trim_slashes(entry.target_path.trim());
    let malformed = target.is_empty()
        || target.contains("//")
        || target.split('/').any(|s| s == "." || s == "..")
        || target.contains(['?', '#', ':', '\\'])
        || target.chars().any(char::is_control);

    if malformed {
        return Err(SiteError::AliasTargetInvalid {
            source_path: entry.source_path.clone(),
            target: entry.target_path.clone(),
        });
    }
    Ok(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        AliasTable::from_json(
            r#"{
                "/old-page": {"target": "new-page", "type": "redirect"},
                "/old": {"target": "/mid", "type": "rewrite"},
                "/mid": {"target": "/new", "type": "rewrite"},
                "/legacy/": {"target": "/docs/"},
                "/promo": {"target": "landing", "type": "internal"},
                "/broken": {"target": "  / ", "type": "redirect"},
                "/escape": {"target": "../secret", "type": "rewrite"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_redirect_with_language() {
        let decision = resolve("old-page", &table(), Some("fr"));
        assert_eq!(
            decision,
            AliasDecision::Redirect {
                target: "new-page".into(),
                language_prefix: Some("fr".into())
            }
        );
        assert_eq!(decision.location().as_deref(), Some("/fr/new-page"));
    }

    #[test]
    fn test_redirect_without_language() {
        let decision = resolve("old-page", &table(), None);
        assert_eq!(decision.location().as_deref(), Some("/new-page"));
    }

    #[test]
    fn test_type_defaults_to_redirect() {
        let decision = resolve("legacy", &table(), None);
        assert_eq!(decision.location().as_deref(), Some("/docs"));
    }

    #[test]
    fn test_internal_is_rewrite() {
        assert_eq!(
            resolve("promo", &table(), None),
            AliasDecision::Rewrite { target: "landing".into() }
        );
    }

    #[test]
    fn test_single_hop_only() {
        // /old → /mid is applied; /mid → /new is not chased.
        assert_eq!(
            resolve("old", &table(), None),
            AliasDecision::Rewrite { target: "mid".into() }
        );
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(resolve("old-page/extra", &table(), None), AliasDecision::NoAlias);
        assert_eq!(resolve("old-pag", &table(), None), AliasDecision::NoAlias);
    }

    #[test]
    fn test_invalid_target_is_no_alias() {
        assert_eq!(resolve("broken", &table(), None), AliasDecision::NoAlias);
        assert_eq!(resolve("escape", &table(), None), AliasDecision::NoAlias);
    }

    #[test]
    fn test_idempotent() {
        let table = table();
        assert_eq!(resolve("old", &table, Some("en")), resolve("old", &table, Some("en")));
    }
}
