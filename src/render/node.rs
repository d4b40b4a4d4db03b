//! Typed component tree.
//!
//! A JSON document is either a single node object or an array of nodes.
//! Node objects take one of three shapes, checked in this order:
//!
//! ```text
//! {"component": "card", "data": {...}}          → Component
//! {"textKey": "menu.home", "params": {...}}     → Text
//! {"tag": "a", "params": {...}, "children": []} → Element
//! ```
//!
//! Anything else becomes [`NodeKind::Unknown`], which renders its children
//! (if any) and nothing of its own.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::render::html::{looks_like_translation_key, TRANSLATABLE_ATTRIBUTES};

/// Prefix marking literal text that must not be translated.
pub const RAW_PREFIX: &str = "__RAW__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text { key: String },
    Component { name: String },
    Unknown,
}

/// One node of a parsed document.
///
/// Each node owns its children; identical source fragments become independent
/// copies.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub kind: NodeKind,
    /// Element attributes, text interpolation parameters or component
    /// data, in source order.
    pub props: Map<String, Value>,
    pub children: Vec<ComponentNode>,
    /// Translation keys this node references directly.
    pub translation_keys: BTreeSet<String>,
}

impl ComponentNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            props: Map::new(),
            children: Vec::new(),
            translation_keys: BTreeSet::new(),
        }
    }

    /// Build a node from a JSON value.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::new(NodeKind::Unknown);
        };

        if let Some(name) = obj.get("component") {
            let mut node = Self::new(NodeKind::Component {
                name: name.as_str().unwrap_or_default().to_string(),
            });
            if let Some(Value::Object(data)) = obj.get("data") {
                node.props = data.clone();
            }
            return node;
        }

        if let Some(key) = obj.get("textKey") {
            let key = key.as_str().unwrap_or_default().to_string();
            let mut node = Self::new(NodeKind::Text { key: key.clone() });
            if let Some(Value::Object(params)) = obj.get("params") {
                node.props = params.clone();
            }
            if !key.is_empty() && !key.starts_with(RAW_PREFIX) {
                node.translation_keys.insert(key);
            }
            return node;
        }

        let children = parse_children(obj);

        if let Some(tag) = obj.get("tag") {
            let mut node = Self::new(NodeKind::Element {
                tag: tag.as_str().unwrap_or_default().to_string(),
            });
            if let Some(Value::Object(params)) = obj.get("params") {
                node.props = params.clone();
            }
            for attr in TRANSLATABLE_ATTRIBUTES {
                if let Some(Value::String(v)) = node.props.get(*attr) {
                    if looks_like_translation_key(v) {
                        node.translation_keys.insert(v.clone());
                    }
                }
            }
            node.children = children;
            return node;
        }

        let mut node = Self::new(NodeKind::Unknown);
        node.children = children;
        node
    }

    /// Every translation key referenced by this node and its descendants.
    pub fn all_translation_keys(&self) -> BTreeSet<String> {
        let mut keys = self.translation_keys.clone();
        for child in &self.children {
            keys.extend(child.all_translation_keys());
        }
        keys
    }
}

fn parse_children(obj: &Map<String, Value>) -> Vec<ComponentNode> {
    match obj.get("children") {
        Some(Value::Array(items)) => items.iter().map(ComponentNode::from_value).collect(),
        _ => Vec::new(),
    }
}

fn is_node_object(obj: &Map<String, Value>) -> bool {
    obj.contains_key("tag") || obj.contains_key("component") || obj.contains_key("textKey")
}

/// Parse a document value into its top-level nodes.
pub fn parse_value(value: &Value) -> Result<Vec<ComponentNode>, serde_json::Error> {
    match value {
        Value::Array(items) => Ok(items.iter().map(ComponentNode::from_value).collect()),
        Value::Object(obj) if is_node_object(obj) => Ok(vec![ComponentNode::from_value(value)]),
        Value::Object(obj) => Ok(obj.values().map(ComponentNode::from_value).collect()),
        _ => Err(<serde_json::Error as serde::de::Error>::custom(
            "document root must be a node or an array of nodes",
        )),
    }
}

/// Parse document text into its top-level nodes.
pub fn parse_document(json: &str) -> Result<Vec<ComponentNode>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    parse_value(&value)
}
