//! JSON document → HTML.
//!
//! # Responsibilities
//! - Render full pages, shared structures and isolated components
//! - Resolve translation keys in text and translatable attributes
//! - Enforce tag, attribute and URL safety rules
//! - Annotate nodes for the visual editor when editor mode is on
//!
//! # Design Decisions
//! - Depth-first pre-order walk; children are emitted in source order
//! - A missing translation renders the key itself
//! - Component failures degrade to placeholders, never to errors
//! - Component nesting is bounded so a self-including component terminates

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::content::{ContentStore, Structure};
use crate::error::{SiteError, SiteResult};
use crate::i18n::Translator;
use crate::render::context::RenderContext;
use crate::render::html::{
    comment, escape_html, is_event_handler, is_valid_attribute_name, is_valid_tag,
    is_void_element, looks_like_translation_key, process_url, TRANSLATABLE_ATTRIBUTES,
    URL_ATTRIBUTES,
};
use crate::render::node::{parse_document, ComponentNode, NodeKind, RAW_PREFIX};
use crate::render::placeholder::{expand_system, expand_system_in_value, substitute_variables};

/// Maximum depth of components embedded in components.
pub const MAX_COMPONENT_DEPTH: usize = 16;

/// Strip every character outside `[A-Za-z0-9_-]`.
pub fn sanitize_component_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

/// Fragment returned when an isolated component cannot be rendered.
pub fn missing_component_placeholder(name: &str) -> String {
    let name = escape_html(name);
    format!(
        r#"<div class="component-missing" data-edit-component="{name}"><!-- component not found: {name} --></div>"#
    )
}

/// Where in the editor model the current nodes live.
struct Frame<'f> {
    structure: &'f str,
    component: Option<&'f str>,
    depth: usize,
}

/// Marks the top-level nodes of an embedded component.
struct ComponentRoot<'r> {
    name: &'r str,
    /// Position of the component node in its parent document.
    node: Option<String>,
}

/// Renders documents from a store with one translator and context.
pub struct Renderer<'a> {
    store: &'a dyn ContentStore,
    translator: &'a dyn Translator,
    ctx: &'a RenderContext,
}

impl<'a> Renderer<'a> {
    pub fn new(
        store: &'a dyn ContentStore,
        translator: &'a dyn Translator,
        ctx: &'a RenderContext,
    ) -> Self {
        Self {
            store,
            translator,
            ctx,
        }
    }

    /// Render the page stored under `identity`.
    pub fn render_page(&self, identity: &str) -> SiteResult<String> {
        let json = self.store.load_page(identity)?;
        let nodes = parse_document(&json).map_err(|source| SiteError::Json {
            path: identity.to_string(),
            source,
        })?;
        let structure = format!("page-{}", identity.replace('/', "-"));
        let frame = Frame {
            structure: &structure,
            component: None,
            depth: 0,
        };
        Ok(self.render_nodes(&nodes, &frame, None))
    }

    pub fn render_menu(&self) -> String {
        self.render_structure(Structure::Menu)
    }

    pub fn render_footer(&self) -> String {
        self.render_structure(Structure::Footer)
    }

    fn render_structure(&self, structure: Structure) -> String {
        let json = match self.store.load_structure(structure) {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!(structure = structure.name(), "No structure document");
                return String::new();
            }
            Err(e) => {
                tracing::warn!(structure = structure.name(), error = %e, "Failed to load structure");
                return String::new();
            }
        };
        match parse_document(&json) {
            Ok(nodes) => {
                let frame = Frame {
                    structure: structure.name(),
                    component: None,
                    depth: 0,
                };
                self.render_nodes(&nodes, &frame, None)
            }
            Err(e) => {
                tracing::warn!(structure = structure.name(), error = %e, "Malformed structure document");
                String::new()
            }
        }
    }

    /// Render one component on its own, always in editor mode.
    ///
    /// Never fails: anything that prevents rendering yields
    /// [`missing_component_placeholder`].
    pub fn render_component(&self, name: &str) -> String {
        let sanitized = sanitize_component_name(name);
        match self.try_render_component(&sanitized) {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!(component = %sanitized, error = %e, "Component preview unavailable");
                missing_component_placeholder(&sanitized)
            }
        }
    }

    fn try_render_component(&self, name: &str) -> SiteResult<String> {
        let not_found = || SiteError::ComponentNotFound {
            name: name.to_string(),
        };
        if name.is_empty() {
            return Err(not_found());
        }
        let json = match self.store.load_component(name) {
            Ok(json) => json,
            Err(SiteError::Io { path, source }) => {
                tracing::warn!(%path, error = %source, "Failed to read component");
                return Err(not_found());
            }
            Err(e) => return Err(e),
        };
        let nodes = parse_document(&json).map_err(|e| {
            tracing::warn!(component = name, error = %e, "Malformed component document");
            not_found()
        })?;

        let ctx = self.ctx.clone().with_editor_mode(true);
        let renderer = Renderer::new(self.store, self.translator, &ctx);
        let structure = format!("component-{name}");
        let frame = Frame {
            structure: &structure,
            component: Some(name),
            depth: 1,
        };
        let root = ComponentRoot { name, node: None };
        Ok(renderer.render_nodes(&nodes, &frame, Some(&root)))
    }

    fn render_nodes(
        &self,
        nodes: &[ComponentNode],
        frame: &Frame<'_>,
        root: Option<&ComponentRoot<'_>>,
    ) -> String {
        let mut out = String::new();
        let mut path = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            path.push(i);
            self.walk(node, frame, &mut path, root, &mut out);
            path.pop();
        }
        out
    }

    fn walk(
        &self,
        node: &ComponentNode,
        frame: &Frame<'_>,
        path: &mut Vec<usize>,
        root: Option<&ComponentRoot<'_>>,
        out: &mut String,
    ) {
        match &node.kind {
            NodeKind::Element { tag } => self.render_element(tag, node, frame, path, root, out),
            NodeKind::Text { key } => out.push_str(&self.render_text(key, &node.props)),
            NodeKind::Component { name } => {
                self.render_embedded_component(name, &node.props, frame, path, out)
            }
            NodeKind::Unknown if node.children.is_empty() => out.push_str(&comment("unknown node")),
            NodeKind::Unknown => self.render_children(&node.children, frame, path, out),
        }
    }

    fn render_children(
        &self,
        children: &[ComponentNode],
        frame: &Frame<'_>,
        path: &mut Vec<usize>,
        out: &mut String,
    ) {
        for (i, child) in children.iter().enumerate() {
            path.push(i);
            self.walk(child, frame, path, None, out);
            path.pop();
        }
    }

    fn render_element(
        &self,
        tag: &str,
        node: &ComponentNode,
        frame: &Frame<'_>,
        path: &mut Vec<usize>,
        root: Option<&ComponentRoot<'_>>,
        out: &mut String,
    ) {
        if !is_valid_tag(tag) {
            tracing::debug!(tag, "Invalid tag name");
            out.push_str(&comment(&format!("invalid tag: {tag}")));
            return;
        }

        out.push('<');
        out.push_str(tag);
        out.push_str(&self.render_attributes(&node.props));
        if self.ctx.editor_mode {
            out.push_str(&editor_attributes(frame, path, root));
        }
        out.push('>');

        if is_void_element(tag) {
            return;
        }

        self.render_children(&node.children, frame, path, out);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    fn render_text(&self, key: &str, params: &Map<String, Value>) -> String {
        if key.is_empty() {
            return String::new();
        }
        let text = match key.strip_prefix(RAW_PREFIX) {
            Some(raw) => raw.to_string(),
            None => self
                .translator
                .translate_with(key, &self.ctx.language, &self.text_params(params)),
        };
        escape_html(&expand_system(&text, self.ctx))
    }

    /// Scalar `params` as interpolation values; objects and arrays are skipped.
    fn text_params(&self, params: &Map<String, Value>) -> HashMap<String, String> {
        params
            .iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    Value::String(s) => expand_system(s, self.ctx),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((name.clone(), value))
            })
            .collect()
    }

    fn render_embedded_component(
        &self,
        name: &str,
        data: &Map<String, Value>,
        frame: &Frame<'_>,
        path: &[usize],
        out: &mut String,
    ) {
        let sanitized = sanitize_component_name(name);
        if sanitized.is_empty() {
            out.push_str(&comment("component without name"));
            return;
        }
        if frame.depth >= MAX_COMPONENT_DEPTH {
            tracing::warn!(component = %sanitized, "Component nesting too deep");
            out.push_str(&comment(&format!("component nesting too deep: {sanitized}")));
            return;
        }

        let template = match self.store.load_component(&sanitized) {
            Ok(template) => template,
            Err(e) => {
                tracing::debug!(component = %sanitized, error = %e, "Embedded component unavailable");
                out.push_str(&comment(&format!("component not found: {sanitized}")));
                return;
            }
        };

        let data = match expand_system_in_value(&Value::Object(data.clone()), self.ctx) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let nodes = match parse_document(&substitute_variables(&template, &data)) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(component = %sanitized, error = %e, "Malformed component document");
                out.push_str(&comment(&format!("component not found: {sanitized}")));
                return;
            }
        };

        let structure = format!("component-{sanitized}");
        let inner = Frame {
            structure: &structure,
            component: Some(sanitized.as_str()),
            depth: frame.depth + 1,
        };
        let root = ComponentRoot {
            name: &sanitized,
            node: Some(join_path(path)),
        };
        out.push_str(&self.render_nodes(&nodes, &inner, Some(&root)));
    }

    fn render_attributes(&self, props: &Map<String, Value>) -> String {
        let mut out = String::new();
        for (name, value) in props {
            if !is_valid_attribute_name(name) || is_event_handler(name) {
                tracing::debug!(attribute = %name, "Dropping attribute");
                continue;
            }

            let value = match value {
                Value::Object(obj) if obj.contains_key("condition") => {
                    let flag = obj.get("condition").and_then(Value::as_str).unwrap_or_default();
                    if !self.ctx.flag(flag) {
                        continue;
                    }
                    obj.get("value").unwrap_or(&Value::Null)
                }
                other => other,
            };

            let text = match value {
                Value::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                    continue;
                }
                Value::Bool(false) | Value::Null => continue,
                Value::String(s) if s.is_empty() => continue,
                Value::String(s) => self.attribute_value(name, s),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => value.to_string(),
            };

            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(&text));
            out.push('"');
        }
        out
    }

    fn attribute_value(&self, name: &str, value: &str) -> String {
        let lower = name.to_ascii_lowercase();

        let text = if TRANSLATABLE_ATTRIBUTES.contains(&lower.as_str()) {
            match value.strip_prefix(RAW_PREFIX) {
                Some(raw) => raw.to_string(),
                None if looks_like_translation_key(value) => {
                    self.translator.translate(value, &self.ctx.language)
                }
                None => value.to_string(),
            }
        } else {
            value.to_string()
        };

        let text = expand_system(&text, self.ctx);
        if !URL_ATTRIBUTES.contains(&lower.as_str()) {
            return text;
        }
        if lower == "srcset" {
            return text
                .split(',')
                .map(|candidate| {
                    let candidate = candidate.trim();
                    match candidate.split_once(char::is_whitespace) {
                        Some((url, descriptor)) => {
                            format!("{} {}", process_url(url, self.ctx), descriptor.trim())
                        }
                        None => process_url(candidate, self.ctx),
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
        }
        process_url(&text, self.ctx)
    }
}

fn join_path(path: &[usize]) -> String {
    path.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn editor_attributes(
    frame: &Frame<'_>,
    path: &[usize],
    root: Option<&ComponentRoot<'_>>,
) -> String {
    let mut out = format!(
        r#" data-edit-struct="{}" data-edit-node="{}""#,
        escape_html(frame.structure),
        join_path(path)
    );
    if let Some(component) = frame.component {
        out.push_str(&format!(
            r#" data-edit-in-component="{}""#,
            escape_html(component)
        ));
    }
    if let Some(root) = root {
        out.push_str(&format!(
            r#" data-edit-component="{}""#,
            escape_html(root.name)
        ));
        if let Some(node) = &root.node {
            out.push_str(&format!(r#" data-edit-component-node="{node}""#));
        }
    }
    out
}
