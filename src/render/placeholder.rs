//! Placeholder expansion.
//!
//! Two syntaxes share the `{{...}}` delimiters:
//!
//! - system placeholders, `{{__lang}}` or `{{__current_page;lang=fr}}`,
//!   resolved from the render context;
//! - component variables, `{{title}}`, resolved from a component's `data`.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use crate::render::context::RenderContext;

static SYSTEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(__[A-Za-z0-9_]+)(?:;([^}]+))?\}\}").expect("valid system placeholder pattern")
});

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z][A-Za-z0-9_]*)\}\}").expect("valid variable placeholder pattern")
});

fn option<'a>(options: Option<&'a str>, name: &str) -> Option<&'a str> {
    options?
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim())
}

fn system_value(name: &str, options: Option<&str>, ctx: &RenderContext) -> Option<String> {
    let value = match name {
        "__current_page" => match option(options, "lang") {
            Some(lang) => {
                let mut url = format!("{}{}/", ctx.base_url, lang);
                url.push_str(&ctx.current_path);
                url
            }
            None => ctx.current_path.clone(),
        },
        "__lang" => ctx.language.code.clone(),
        "__base_url" => ctx.base_url.clone(),
        "__current_route" => ctx.route.join("/"),
        "__space" => String::new(),
        _ => return None,
    };
    Some(value)
}

/// Expand system placeholders. Unknown names are left in place.
pub fn expand_system(text: &str, ctx: &RenderContext) -> String {
    if !text.contains("{{__") {
        return text.to_string();
    }
    SYSTEM
        .replace_all(text, |caps: &Captures<'_>| {
            let options = caps.get(2).map(|m| m.as_str());
            system_value(&caps[1], options, ctx).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Expand system placeholders in every string of a JSON value.
pub fn expand_system_in_value(value: &Value, ctx: &RenderContext) -> Value {
    match value {
        Value::String(s) => Value::String(expand_system(s, ctx)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| expand_system_in_value(v, ctx))
                .collect(),
        ),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), expand_system_in_value(v, ctx)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// JSON-escape a string without its surrounding quotes.
fn json_escape(s: &str) -> String {
    let quoted = Value::String(s.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Substitute `{{var}}` placeholders in component template text.
///
/// Replacements are JSON-escaped, so the template stays valid JSON whatever
/// the data contains. Placeholders without a scalar value are kept verbatim.
pub fn substitute_variables(template: &str, data: &serde_json::Map<String, Value>) -> String {
    if data.is_empty() {
        return template.to_string();
    }
    VARIABLE
        .replace_all(template, |caps: &Captures<'_>| {
            data.get(&caps[1])
                .and_then(scalar_text)
                .map(|text| json_escape(&text))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
