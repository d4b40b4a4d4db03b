//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Response;
use site_engine::config::LanguageConfig;
use site_engine::SiteConfig;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "secret-token";

/// A project directory on disk.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create project dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, contents: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dirs");
        }
        fs::write(path, contents).expect("write fixture");
        self
    }

    pub fn page(&self, identity: &str, json: &str) -> &Self {
        self.write(&format!("templates/pages/{identity}.json"), json)
    }

    pub fn component(&self, name: &str, json: &str) -> &Self {
        self.write(&format!("templates/components/{name}.json"), json)
    }

    pub fn structure(&self, name: &str, json: &str) -> &Self {
        self.write(&format!("templates/{name}.json"), json)
    }

    pub fn aliases(&self, json: &str) -> &Self {
        self.write("data/aliases.json", json)
    }

    pub fn layouts(&self, json: &str) -> &Self {
        self.write("config/route-layout.json", json)
    }

    pub fn translation(&self, code: &str, json: &str) -> &Self {
        self.write(&format!("translate/{code}.json"), json)
    }

    /// Multilingual (en, fr) config serving this project.
    pub fn config(&self) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.base_url = "http://localhost/".into();
        config.site.project_path = self.root().to_path_buf();
        config.languages = LanguageConfig {
            enabled: true,
            supported: vec!["en".into(), "fr".into()],
            default: "en".into(),
        };
        config.admin.tokens = vec![ADMIN_TOKEN.into()];
        config
    }
}

/// A small site exercising every resolution tier.
pub fn sample_site() -> Project {
    let project = Project::new();
    project
        .page("home", r#"{"tag": "h1", "children": [{"textKey": "home.title"}]}"#)
        .page(
            "guides/installation/installation",
            r#"{"tag": "article", "children": [{"textKey": "guides.install"}]}"#,
        )
        .page("guides/installation", r#"{"textKey": "__RAW__stale flat template"}"#)
        .page("new-page", r#"{"tag": "p", "children": [{"textKey": "__RAW__new page"}]}"#)
        .page("mid", r#"{"tag": "p", "children": [{"textKey": "__RAW__middle"}]}"#)
        .page("docs", r#"{"tag": "p", "children": [{"textKey": "__RAW__docs index"}]}"#)
        .page("404", r#"{"tag": "p", "children": [{"textKey": "errors.not_found"}]}"#)
        .component(
            "card",
            r#"{"tag": "div", "params": {"class": "card"}, "children": [{"textKey": "__RAW__{{title}}"}]}"#,
        )
        .structure(
            "menu",
            r#"{"tag": "nav", "children": [{"tag": "a", "params": {"href": "/"}, "children": [{"textKey": "menu.home"}]}]}"#,
        )
        .structure("footer", r#"{"tag": "footer"}"#)
        .aliases(
            r#"{
                "/old-page": {"target": "/new-page", "type": "redirect"},
                "/old": {"target": "/mid", "type": "rewrite"},
                "/mid": {"target": "/new", "type": "rewrite"}
            }"#,
        )
        .layouts(r#"{"routes": {"guides": {"menu": false}}}"#)
        .translation(
            "en",
            r#"{"home": {"title": "Welcome"}, "menu": {"home": "Home"}, "errors": {"not_found": "Nothing here"}}"#,
        )
        .translation(
            "fr",
            r#"{"home": {"title": "Bienvenue"}, "menu": {"home": "Accueil"}, "guides": {"install": "Installer le moteur"}}"#,
        );
    project
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
