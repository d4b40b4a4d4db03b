//! Translation lookup.
//!
//! # Responsibilities
//! - Load per-language JSON dictionaries (`translate/<code>.json`)
//! - Resolve dot-notation keys (`footer.language`)
//! - Interpolate `{{name}}` parameters
//!
//! # Design Decisions
//! - Never fails: a missing key resolves to the key itself so editors can
//!   spot untranslated text without breaking the render
//! - Dictionaries are plain `serde_json::Value` trees; no schema

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::LanguageConfig;
use crate::routing::LanguageContext;

static INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid interpolation pattern"));

/// Dictionary name used when multilingual support is disabled.
pub const DEFAULT_DICTIONARY: &str = "default";

/// Resolves translation keys for a language.
pub trait Translator: Send + Sync {
    /// Translated text for `key`, or `key` itself when missing.
    fn translate(&self, key: &str, language: &LanguageContext) -> String;

    /// Translate and substitute `{{name}}` parameters.
    ///
    /// Unknown parameters are left in place.
    fn translate_with(
        &self,
        key: &str,
        language: &LanguageContext,
        params: &HashMap<String, String>,
    ) -> String {
        let text = self.translate(key, language);
        if params.is_empty() {
            return text;
        }
        INTERPOLATION
            .replace_all(&text, |caps: &Captures<'_>| {
                params
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Translator backed by JSON dictionaries.
#[derive(Debug, Clone, Default)]
pub struct JsonTranslator {
    dictionaries: HashMap<String, Value>,
}

impl JsonTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dictionary from JSON text.
    pub fn with_language(mut self, code: &str, json: &str) -> Result<Self, serde_json::Error> {
        self.dictionaries
            .insert(code.to_string(), serde_json::from_str(json)?);
        Ok(self)
    }

    /// Load dictionaries from `dir` for every configured language.
    ///
    /// A language without its own file uses `default.json`. Unreadable or
    /// malformed files are logged and treated as empty dictionaries.
    pub fn load(dir: &Path, config: &LanguageConfig) -> Self {
        let fallback = read_dictionary(&dir.join(format!("{DEFAULT_DICTIONARY}.json")));
        let mut dictionaries = HashMap::new();

        if config.enabled {
            for code in &config.supported {
                let dict = read_dictionary(&dir.join(format!("{code}.json")))
                    .or_else(|| fallback.clone())
                    .unwrap_or_else(empty_dictionary);
                dictionaries.insert(code.clone(), dict);
            }
        } else {
            let dict = fallback
                .or_else(|| read_dictionary(&dir.join(format!("{}.json", config.default))))
                .unwrap_or_else(empty_dictionary);
            dictionaries.insert(config.default.clone(), dict);
        }

        Self { dictionaries }
    }

    fn lookup<'a>(&'a self, key: &str, code: &str) -> Option<&'a Value> {
        let mut current = self.dictionaries.get(code)?;
        for part in key.split('.') {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

impl Translator for JsonTranslator {
    fn translate(&self, key: &str, language: &LanguageContext) -> String {
        match self.lookup(key, &language.code) {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => {
                tracing::debug!(key, language = %language.code, "Missing translation");
                key.to_string()
            }
        }
    }
}

fn empty_dictionary() -> Value {
    Value::Object(serde_json::Map::new())
}

fn read_dictionary(path: &Path) -> Option<Value> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read translation file");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to decode translation file");
            None
        }
    }
}
