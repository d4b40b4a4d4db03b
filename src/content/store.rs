//! Template and structure storage.
//!
//! # Responsibilities
//! - Answer the template existence predicate for route resolution
//! - Load raw JSON for pages, components and shared structures
//! - Load the alias table and route layout overrides
//!
//! # Design Decisions
//! - Returns raw text; parsing belongs to the renderer
//! - No caching: every call reads the backing store
//! - Keys never leave the project directory

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{SiteError, SiteResult};

/// Shared page structures rendered around page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    Menu,
    Footer,
}

impl Structure {
    pub fn name(self) -> &'static str {
        match self {
            Structure::Menu => "menu",
            Structure::Footer => "footer",
        }
    }
}

/// Source of page, component and structure documents.
pub trait ContentStore: Send + Sync {
    /// True if a page document is stored under `identity`.
    fn page_exists(&self, identity: &str) -> bool;

    /// Raw JSON for a page. Missing → [`SiteError::TemplateMissing`].
    fn load_page(&self, identity: &str) -> SiteResult<String>;

    /// Raw JSON for a component. `name` must already be sanitized.
    /// Missing → [`SiteError::ComponentNotFound`].
    fn load_component(&self, name: &str) -> SiteResult<String>;

    /// Raw JSON for a shared structure, if one is stored.
    fn load_structure(&self, structure: Structure) -> SiteResult<Option<String>>;

    /// Raw alias table JSON, if one is stored.
    fn load_aliases(&self) -> SiteResult<Option<String>>;

    /// Raw route layout JSON, if one is stored.
    fn load_route_layouts(&self) -> SiteResult<Option<String>>;
}

/// Reject keys that could address files outside the store.
fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && key
            .split('/')
            .all(|s| !s.is_empty() && s != "." && s != ".." && !s.contains(['\\', '\0']))
}

/// Filesystem-backed store rooted at a project directory.
///
/// ```text
/// <root>/templates/pages/<identity>.json
/// <root>/templates/components/<name>.json
/// <root>/templates/menu.json, footer.json
/// <root>/data/aliases.json
/// <root>/config/route-layout.json
/// ```
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn page_path(&self, identity: &str) -> PathBuf {
        self.root
            .join("templates")
            .join("pages")
            .join(format!("{identity}.json"))
    }

    fn read_optional(&self, path: &Path) -> SiteResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SiteError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

impl ContentStore for FsContentStore {
    fn page_exists(&self, identity: &str) -> bool {
        is_safe_key(identity) && self.page_path(identity).is_file()
    }

    fn load_page(&self, identity: &str) -> SiteResult<String> {
        let missing = || SiteError::TemplateMissing {
            identity: identity.to_string(),
        };
        if !is_safe_key(identity) {
            return Err(missing());
        }
        self.read_optional(&self.page_path(identity))?
            .ok_or_else(missing)
    }

    fn load_component(&self, name: &str) -> SiteResult<String> {
        let missing = || SiteError::ComponentNotFound {
            name: name.to_string(),
        };
        if !is_safe_key(name) || name.contains('/') {
            return Err(missing());
        }
        let path = self
            .root
            .join("templates")
            .join("components")
            .join(format!("{name}.json"));
        self.read_optional(&path)?.ok_or_else(missing)
    }

    fn load_structure(&self, structure: Structure) -> SiteResult<Option<String>> {
        let path = self
            .root
            .join("templates")
            .join(format!("{}.json", structure.name()));
        self.read_optional(&path)
    }

    fn load_aliases(&self) -> SiteResult<Option<String>> {
        self.read_optional(&self.root.join("data").join("aliases.json"))
    }

    fn load_route_layouts(&self) -> SiteResult<Option<String>> {
        self.read_optional(&self.root.join("config").join("route-layout.json"))
    }
}

/// In-memory store, used by tests and the offline CLI.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    pages: HashMap<String, String>,
    components: HashMap<String, String>,
    structures: HashMap<Structure, String>,
    aliases: Option<String>,
    route_layouts: Option<String>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, identity: &str, json: &str) -> Self {
        self.pages.insert(identity.to_string(), json.to_string());
        self
    }

    pub fn with_component(mut self, name: &str, json: &str) -> Self {
        self.components.insert(name.to_string(), json.to_string());
        self
    }

    pub fn with_structure(mut self, structure: Structure, json: &str) -> Self {
        self.structures.insert(structure, json.to_string());
        self
    }

    pub fn with_aliases(mut self, json: &str) -> Self {
        self.aliases = Some(json.to_string());
        self
    }

    pub fn with_route_layouts(mut self, json: &str) -> Self {
        self.route_layouts = Some(json.to_string());
        self
    }
}

impl ContentStore for MemoryContentStore {
    fn page_exists(&self, identity: &str) -> bool {
        self.pages.contains_key(identity)
    }

    fn load_page(&self, identity: &str) -> SiteResult<String> {
        self.pages
            .get(identity)
            .cloned()
            .ok_or_else(|| SiteError::TemplateMissing {
                identity: identity.to_string(),
            })
    }

    fn load_component(&self, name: &str) -> SiteResult<String> {
        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| SiteError::ComponentNotFound {
                name: name.to_string(),
            })
    }

    fn load_structure(&self, structure: Structure) -> SiteResult<Option<String>> {
        Ok(self.structures.get(&structure).cloned())
    }

    fn load_aliases(&self) -> SiteResult<Option<String>> {
        Ok(self.aliases.clone())
    }

    fn load_route_layouts(&self) -> SiteResult<Option<String>> {
        Ok(self.route_layouts.clone())
    }
}
