use crate::routing::LanguageContext;

/// Read-only inputs shared by one render.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub language: LanguageContext,
    /// Absolute site URL ending in `/`.
    pub base_url: String,
    pub editor_mode: bool,
    pub multilingual: bool,
    pub supported_languages: Vec<String>,
    /// Resolved route segments.
    pub route: Vec<String>,
    /// Request path without the language prefix or surrounding slashes.
    pub current_path: String,
}

impl RenderContext {
    pub fn new(language: LanguageContext, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            language,
            base_url,
            editor_mode: false,
            multilingual: false,
            supported_languages: Vec::new(),
            route: Vec::new(),
            current_path: String::new(),
        }
    }

    pub fn with_editor_mode(mut self, editor_mode: bool) -> Self {
        self.editor_mode = editor_mode;
        self
    }

    pub fn with_languages(mut self, multilingual: bool, supported: &[String]) -> Self {
        self.multilingual = multilingual;
        self.supported_languages = supported.to_vec();
        self
    }

    pub fn with_route(mut self, route: Vec<String>, current_path: impl Into<String>) -> Self {
        self.route = route;
        self.current_path = current_path.into();
        self
    }

    /// Truthiness of a named flag used by conditional attributes.
    ///
    /// Unknown names are false.
    pub fn flag(&self, name: &str) -> bool {
        match name {
            "editorMode" => self.editor_mode,
            "multilingual" => self.multilingual,
            "lang" => self.multilingual && !self.language.code.is_empty(),
            "route" => !self.route.is_empty(),
            _ => false,
        }
    }
}
