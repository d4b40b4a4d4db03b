//! Full HTML documents around rendered fragments.

use crate::render::html::escape_html;
use crate::render::RenderContext;

/// Parts of a page document.
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    pub title: String,
    pub menu: String,
    pub content: String,
    pub footer: String,
}

fn head(lang: &str, title: &str, base_url: &str) -> String {
    let base = escape_html(base_url);
    format!(
        concat!(
            "<!DOCTYPE html><html lang=\"{lang}\"><head><meta charset=\"utf-8\">",
            "<title>{title}</title>",
            "<link rel=\"icon\" type=\"image/png\" href=\"{base}assets/images/favicon.png\">",
            "<link rel=\"stylesheet\" href=\"{base}style/style.css\">",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">",
            "</head>"
        ),
        lang = escape_html(lang),
        title = escape_html(title),
        base = base,
    )
}

impl PageDocument {
    pub fn render(&self, ctx: &RenderContext) -> String {
        let mut html = head(&ctx.language.code, &self.title, &ctx.base_url);
        html.push_str("<body>");
        html.push_str(&self.menu);
        html.push_str(&self.content);
        html.push_str(&self.footer);
        html.push_str("</body></html>");
        html
    }
}

/// Standalone document for the visual editor's component preview.
pub fn component_preview(name: &str, fragment: &str, ctx: &RenderContext) -> String {
    let mut html = head(&ctx.language.code, name, &ctx.base_url);
    html.push_str(&format!(
        r#"<body class="component-preview" data-preview-component="{}">"#,
        escape_html(name)
    ));
    html.push_str(fragment);
    html.push_str("</body></html>");
    html
}

/// Body used when neither the page nor a `404` template exists.
pub const FALLBACK_NOT_FOUND: &str =
    "<!DOCTYPE html><html><head><title>404 Not Found</title></head><body><h1>404 Not Found</h1></body></html>";
