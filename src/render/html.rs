//! HTML output helpers: escaping, name validation and URL post-processing.

use regex::Regex;
use std::sync::LazyLock;

use crate::render::context::RenderContext;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Attributes whose key-like values are translated.
pub const TRANSLATABLE_ATTRIBUTES: &[&str] = &[
    "placeholder",
    "title",
    "alt",
    "aria-label",
    "aria-placeholder",
    "aria-description",
];

/// Attributes holding URLs.
pub const URL_ATTRIBUTES: &[&str] = &[
    "href", "src", "data", "poster", "action", "formaction", "cite", "srcset",
];

static TRANSLATION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_]+(\.[a-z0-9_]+)+$").expect("valid translation key pattern")
});

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Text for use inside an HTML comment.
pub fn comment(text: &str) -> String {
    format!("<!-- {} -->", text.replace("--", "- -"))
}

/// Dotted identifiers such as `menu.home` are treated as translation keys.
pub fn looks_like_translation_key(value: &str) -> bool {
    TRANSLATION_KEY.is_match(value)
}

pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-'))
}

/// `onclick`, `onLoad`, ... are never emitted.
pub fn is_event_handler(name: &str) -> bool {
    name.len() > 2
        && name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on"))
        && name[2..].chars().all(|c| c.is_ascii_alphabetic())
}

/// `http://`, `https://` and protocol-relative `//` URLs.
pub fn is_absolute_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// Turn a relative link into an absolute, language-prefixed one.
///
/// Absolute URLs, anchors, `mailto:` and `tel:` are returned unchanged;
/// script-capable schemes are replaced with `#`.
pub fn process_url(url: &str, ctx: &RenderContext) -> String {
    if is_absolute_url(url) {
        return url.to_string();
    }

    let lower = url.trim_start().to_ascii_lowercase();
    if ["javascript:", "data:", "vbscript:"]
        .iter()
        .any(|p| lower.starts_with(p))
    {
        tracing::warn!(url, "Dangerous URL protocol blocked");
        return "#".to_string();
    }
    if url.starts_with('#') || lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return url.to_string();
    }

    let mut full = ctx.base_url.clone();
    let path = url.trim_start_matches('/');

    if ctx.multilingual && !ctx.language.code.is_empty() {
        let is_asset = lower.starts_with("/assets/") || lower.starts_with("/style/");
        let first = path.split('/').next().unwrap_or_default();
        let has_language = ctx.supported_languages.iter().any(|l| l == first);
        if !is_asset && !has_language {
            full.push_str(&ctx.language.code);
            full.push('/');
        }
    }

    if path.is_empty() {
        return full;
    }
    full.push_str(path);
    if ctx.supported_languages.iter().any(|l| l == path) {
        full.push('/');
    }
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::LanguageContext;

    fn ctx(multilingual: bool) -> RenderContext {
        RenderContext::new(
            LanguageContext {
                code: "fr".into(),
                is_default: false,
            },
            "https://example.com/",
        )
        .with_languages(multilingual, &["en".to_string(), "fr".to_string()])
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_translation_key_shape() {
        assert!(looks_like_translation_key("menu.home"));
        assert!(looks_like_translation_key("Page.Titles.guides_1"));
        assert!(!looks_like_translation_key("menu"));
        assert!(!looks_like_translation_key("Read the docs."));
        assert!(!looks_like_translation_key("a.b c"));
    }

    #[test]
    fn test_name_rules() {
        assert!(is_valid_tag("my-widget"));
        assert!(!is_valid_tag("script>"));
        assert!(is_valid_attribute_name("data-id"));
        assert!(is_valid_attribute_name("xlink:href"));
        assert!(!is_valid_attribute_name("a b"));
        assert!(is_event_handler("onclick"));
        assert!(is_event_handler("OnLoad"));
        assert!(!is_event_handler("one-time"));
        assert!(!is_event_handler("on"));
        assert!(!is_event_handler("oé"));
        assert!(!is_event_handler("é"));
        assert!(is_void_element("IMG"));
    }

    #[test]
    fn test_process_url_relative_multilingual() {
        assert_eq!(process_url("/about", &ctx(true)), "https://example.com/fr/about");
        assert_eq!(process_url("/", &ctx(true)), "https://example.com/fr/");
        assert_eq!(process_url("/en/about", &ctx(true)), "https://example.com/en/about");
        assert_eq!(process_url("/en", &ctx(true)), "https://example.com/en/");
        assert_eq!(
            process_url("/assets/logo.png", &ctx(true)),
            "https://example.com/assets/logo.png"
        );
    }

    #[test]
    fn test_process_url_monolingual() {
        assert_eq!(process_url("about", &ctx(false)), "https://example.com/about");
    }

    #[test]
    fn test_process_url_passthrough_and_blocking() {
        assert_eq!(process_url("https://x.org/a", &ctx(true)), "https://x.org/a");
        assert_eq!(process_url("//cdn.x.org/a.js", &ctx(true)), "//cdn.x.org/a.js");
        assert_eq!(process_url("#top", &ctx(true)), "#top");
        assert_eq!(process_url("mailto:a@b.c", &ctx(true)), "mailto:a@b.c");
        assert_eq!(process_url("JavaScript:alert(1)", &ctx(true)), "#");
        assert_eq!(process_url("data:text/html,x", &ctx(true)), "#");
    }
}
