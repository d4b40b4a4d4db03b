//! Per-request resolution and rendering.
//!
//! # Data Flow
//! ```text
//! request path
//!     → language prefix stripped
//!     → alias lookup (redirect ends the request, rewrite replaces the path)
//!     → template identity (nested → flat → first segment)
//!     → page render inside menu/footer chrome, or 404
//! ```
//!
//! # Design Decisions
//! - Borrowed inputs only; the host owns config, store and translator
//! - The alias table and layouts are read from the store per request

use axum::http::StatusCode;
use std::time::Instant;

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::error::SiteError;
use crate::i18n::Translator;
use crate::observability::metrics;
use crate::render::{html, sanitize_component_name, RenderContext, Renderer};
use crate::routing::alias::{self, AliasDecision, AliasTable};
use crate::routing::resolver::{self, RouteResult, NOT_FOUND};
use crate::routing::{language, path, LanguageContext};
use crate::site::document::{self, PageDocument, FALLBACK_NOT_FOUND};
use crate::site::layout::RouteLayouts;

/// What the host should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteResponse {
    Html { status: StatusCode, body: String },
    /// Permanent redirect.
    Redirect { location: String },
}

impl SiteResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteResponse::Html { status, .. } => *status,
            SiteResponse::Redirect { .. } => StatusCode::MOVED_PERMANENTLY,
        }
    }
}

/// Outcome of the resolution stages, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect {
        location: String,
    },
    Route {
        language: LanguageContext,
        route: RouteResult,
        /// Path used for same-page links, after any rewrite.
        current_path: String,
    },
}

/// How a page request was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderOutcome {
    Rendered,
    /// The page resolved but its document could not be used.
    Degraded,
    NotFound,
}

impl RenderOutcome {
    fn as_str(self) -> &'static str {
        match self {
            RenderOutcome::Rendered => "rendered",
            RenderOutcome::Degraded => "degraded",
            RenderOutcome::NotFound => "not_found",
        }
    }
}

pub struct SitePipeline<'a> {
    config: &'a SiteConfig,
    store: &'a dyn ContentStore,
    translator: &'a dyn Translator,
}

impl<'a> SitePipeline<'a> {
    pub fn new(
        config: &'a SiteConfig,
        store: &'a dyn ContentStore,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            config,
            store,
            translator,
        }
    }

    fn alias_table(&self) -> AliasTable {
        match self.store.load_aliases() {
            Ok(Some(json)) => AliasTable::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Malformed alias table, ignoring aliases");
                AliasTable::new()
            }),
            Ok(None) => AliasTable::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read alias table");
                AliasTable::new()
            }
        }
    }

    fn layouts(&self) -> RouteLayouts {
        match self.store.load_route_layouts() {
            Ok(Some(json)) => RouteLayouts::from_json(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Malformed route layout file, using defaults");
                RouteLayouts::default()
            }),
            Ok(None) => RouteLayouts::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read route layout file");
                RouteLayouts::default()
            }
        }
    }

    /// Run the language, alias and route stages for `request_path`.
    pub fn resolve(&self, request_path: &str) -> Resolution {
        let segments = path::segments(request_path);
        let languages = &self.config.languages;
        let (language, mut rest) = language::resolve(&segments, languages);

        let prefix = languages.enabled.then_some(language.code.as_str());
        let decision = alias::resolve(&rest.join("/"), &self.alias_table(), prefix);
        metrics::record_alias_decision(decision.label());

        match decision {
            AliasDecision::Redirect { .. } => {
                let location = decision.location().unwrap_or_else(|| "/".to_string());
                tracing::debug!(path = request_path, %location, "Alias redirect");
                return Resolution::Redirect { location };
            }
            AliasDecision::Rewrite { target } => {
                tracing::debug!(path = request_path, %target, "Alias rewrite");
                rest = path::segments(&target);
            }
            AliasDecision::NoAlias => {}
        }

        let route = resolver::resolve(&rest, |identity| self.store.page_exists(identity));
        Resolution::Route {
            language,
            route,
            current_path: rest.join("/"),
        }
    }

    fn context(
        &self,
        language: LanguageContext,
        route: Vec<String>,
        current_path: String,
        editor_mode: bool,
    ) -> RenderContext {
        RenderContext::new(language, self.config.site.base_url.clone())
            .with_languages(self.config.languages.enabled, &self.config.languages.supported)
            .with_route(route, current_path)
            .with_editor_mode(editor_mode)
    }

    /// Serve `request_path`.
    pub fn handle(&self, request_path: &str, editor_mode: bool) -> SiteResponse {
        let start = Instant::now();
        let (response, outcome) = self.serve(request_path, editor_mode);
        if let Some(outcome) = outcome {
            metrics::record_render(outcome.as_str(), start);
        }
        response
    }

    /// Response plus how the page render went; redirects render nothing.
    fn serve(
        &self,
        request_path: &str,
        editor_mode: bool,
    ) -> (SiteResponse, Option<RenderOutcome>) {
        let (language, route, current_path) = match self.resolve(request_path) {
            Resolution::Redirect { location } => {
                return (SiteResponse::Redirect { location }, None)
            }
            Resolution::Route {
                language,
                route,
                current_path,
            } => (language, route, current_path),
        };

        if !route.found {
            tracing::debug!(path = request_path, "No template for route");
            let ctx = self.context(language, Vec::new(), current_path, editor_mode);
            return (self.not_found(&ctx), Some(RenderOutcome::NotFound));
        }

        let ctx = self.context(language, route.segments.clone(), current_path, editor_mode);
        let renderer = Renderer::new(self.store, self.translator, &ctx);

        match renderer.render_page(&route.identity) {
            Ok(content) => {
                let response = SiteResponse::Html {
                    status: StatusCode::OK,
                    body: self.page(&renderer, &ctx, &route, content),
                };
                (response, Some(RenderOutcome::Rendered))
            }
            Err(SiteError::TemplateMissing { identity }) => {
                tracing::warn!(%identity, "Template vanished after resolution");
                (self.not_found(&ctx), Some(RenderOutcome::NotFound))
            }
            Err(e) => {
                tracing::warn!(identity = %route.identity, error = %e, "Page render failed");
                let response = SiteResponse::Html {
                    status: e.status(),
                    body: self.page(&renderer, &ctx, &route, degraded_content(&e)),
                };
                (response, Some(RenderOutcome::Degraded))
            }
        }
    }

    /// Page `content` inside the route's document chrome.
    fn page(
        &self,
        renderer: &Renderer<'_>,
        ctx: &RenderContext,
        route: &RouteResult,
        content: String,
    ) -> String {
        let title_key = format!(
            "page.titles.{}",
            route.segments.last().map(String::as_str).unwrap_or_default()
        );
        self.document(renderer, ctx, &route.route_path(), content, &title_key)
    }

    fn document(
        &self,
        renderer: &Renderer<'_>,
        ctx: &RenderContext,
        route_path: &str,
        content: String,
        title_key: &str,
    ) -> String {
        let layout = self.layouts().effective(route_path);
        PageDocument {
            title: self.translator.translate(title_key, &ctx.language),
            menu: if layout.menu {
                renderer.render_menu()
            } else {
                String::new()
            },
            content,
            footer: if layout.footer {
                renderer.render_footer()
            } else {
                String::new()
            },
        }
        .render(ctx)
    }

    fn not_found(&self, ctx: &RenderContext) -> SiteResponse {
        let renderer = Renderer::new(self.store, self.translator, ctx);
        let body = if self.store.page_exists(NOT_FOUND) {
            match renderer.render_page(NOT_FOUND) {
                Ok(content) => {
                    let title_key = format!("page.titles.{NOT_FOUND}");
                    self.document(&renderer, ctx, NOT_FOUND, content, &title_key)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to render 404 template");
                    FALLBACK_NOT_FOUND.to_string()
                }
            }
        } else {
            FALLBACK_NOT_FOUND.to_string()
        };
        SiteResponse::Html {
            status: StatusCode::NOT_FOUND,
            body,
        }
    }

    /// Standalone preview document for one component.
    ///
    /// `language` selects the translation language when it is supported.
    pub fn component_preview(&self, name: &str, language: Option<&str>) -> String {
        let languages = &self.config.languages;
        let language = match language {
            Some(code) if languages.enabled && languages.is_supported(code) => LanguageContext {
                code: code.to_string(),
                is_default: code == languages.default,
            },
            _ => LanguageContext::default_for(languages),
        };
        let ctx = self.context(language, Vec::new(), String::new(), true);
        let fragment = Renderer::new(self.store, self.translator, &ctx).render_component(name);
        document::component_preview(&sanitize_component_name(name), &fragment, &ctx)
    }
}

/// Stand-in content for a page whose document cannot be read or parsed.
fn degraded_content(error: &SiteError) -> String {
    match error {
        SiteError::Json { .. } => html::comment("invalid JSON"),
        _ => html::comment("page unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanguageConfig;
    use crate::content::{MemoryContentStore, Structure};
    use crate::i18n::JsonTranslator;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.base_url = "https://example.com/".into();
        config.languages = LanguageConfig {
            enabled: true,
            supported: vec!["en".into(), "fr".into()],
            default: "en".into(),
        };
        config
    }

    fn store() -> MemoryContentStore {
        MemoryContentStore::new()
            .with_page("home", r#"{"tag": "h1", "children": [{"textKey": "home.title"}]}"#)
            .with_page(
                "guides/installation/installation",
                r#"{"tag": "h1", "children": [{"textKey": "__RAW__Install"}]}"#,
            )
            .with_page("guides/installation", r#"{"textKey": "__RAW__stale"}"#)
            .with_page("docs", r#"{"textKey": "__RAW__docs"}"#)
            .with_page("mid", r#"{"textKey": "__RAW__mid"}"#)
            .with_structure(Structure::Menu, r#"{"tag": "nav"}"#)
            .with_structure(Structure::Footer, r#"{"tag": "footer"}"#)
            .with_aliases(
                r#"{
                    "/old-page": {"target": "/new-page", "type": "redirect"},
                    "/old": {"target": "/mid", "type": "rewrite"},
                    "/mid": {"target": "/new", "type": "rewrite"}
                }"#,
            )
            .with_route_layouts(r#"{"routes": {"guides": {"menu": false}}}"#)
    }

    fn translator() -> JsonTranslator {
        JsonTranslator::new()
            .with_language("en", r#"{"home": {"title": "Welcome"}}"#)
            .unwrap()
            .with_language(
                "fr",
                r#"{"home": {"title": "Bienvenue"}, "page": {"titles": {"installation": "Installer"}}}"#,
            )
            .unwrap()
    }

    fn handle(path: &str) -> SiteResponse {
        let (config, store, translator) = (config(), store(), translator());
        SitePipeline::new(&config, &store, &translator).handle(path, false)
    }

    fn body(response: SiteResponse) -> String {
        match response {
            SiteResponse::Html { body, .. } => body,
            SiteResponse::Redirect { location } => panic!("unexpected redirect to {location}"),
        }
    }

    #[test]
    fn test_nested_template_with_language() {
        let response = handle("/fr/guides/installation");
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response);
        assert!(html.contains(r#"<html lang="fr">"#));
        assert!(html.contains("<title>Installer</title>"));
        assert!(html.contains("<h1>Install</h1>"));
        assert!(!html.contains("stale"));
        // Menu hidden below "guides", footer inherited default.
        assert!(!html.contains("<nav>"));
        assert!(html.contains("<footer></footer>"));
    }

    #[test]
    fn test_home_page() {
        let html = body(handle("/fr/"));
        assert!(html.contains("<h1>Bienvenue</h1>"));
        assert!(html.contains("<nav></nav>"));
    }

    #[test]
    fn test_alias_redirect_uses_default_language() {
        assert_eq!(
            handle("/old-page"),
            SiteResponse::Redirect {
                location: "/en/new-page".into()
            }
        );
        assert_eq!(handle("/old-page").status(), StatusCode::MOVED_PERMANENTLY);
    }

    #[test]
    fn test_rewrite_is_single_hop() {
        let html = body(handle("/old"));
        assert!(html.contains("mid"));
    }

    #[test]
    fn test_first_segment_tier_keeps_params() {
        let (config, store, translator) = (config(), store(), translator());
        let pipeline = SitePipeline::new(&config, &store, &translator);
        match pipeline.resolve("/docs/a/b") {
            Resolution::Route { route, .. } => {
                assert_eq!(route.identity, "docs");
                assert_eq!(route.params, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_not_found_fallback() {
        let response = handle("/nowhere/at/all");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(response), FALLBACK_NOT_FOUND);
    }

    #[test]
    fn test_not_found_template() {
        let config = config();
        let store = store().with_page("404", r#"{"tag": "p", "children": [{"textKey": "__RAW__lost"}]}"#);
        let translator = translator();
        let response = SitePipeline::new(&config, &store, &translator).handle("/nowhere", false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).contains("<p>lost</p>"));
    }

    #[test]
    fn test_component_preview_document() {
        let config = config();
        let store = store().with_component("card", r#"{"tag": "div"}"#);
        let translator = translator();
        let pipeline = SitePipeline::new(&config, &store, &translator);
        let html = pipeline.component_preview("card", Some("fr"));
        assert!(html.contains(r#"data-preview-component="card""#));
        assert!(html.contains(r#"data-edit-component="card""#));

        let missing = pipeline.component_preview("../../etc/passwd", None);
        assert!(missing.contains("component not found: etcpasswd"));
    }

    #[test]
    fn test_malformed_page_renders_degraded_document() {
        let config = config();
        let store = store().with_page("about", "{not json");
        let translator = translator();
        let response = SitePipeline::new(&config, &store, &translator).handle("/about", false);
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response);
        assert!(html.contains("<!-- invalid JSON -->"));
        assert!(html.contains("<nav></nav>"));
        assert!(html.contains("<footer></footer>"));
        assert!(!html.contains("Internal Server Error"));
    }

    #[test]
    fn test_render_outcomes() {
        let config = config();
        let store = store()
            .with_page("about", "{not json")
            .with_page("404", r#"{"textKey": "__RAW__lost"}"#);
        let translator = translator();
        let pipeline = SitePipeline::new(&config, &store, &translator);
        let outcome = |path: &str| pipeline.serve(path, false).1;

        assert_eq!(outcome("/fr/guides/installation"), Some(RenderOutcome::Rendered));
        assert_eq!(outcome("/about"), Some(RenderOutcome::Degraded));
        assert_eq!(outcome("/nowhere"), Some(RenderOutcome::NotFound));
        assert_eq!(outcome("/old-page"), None);
    }
}
