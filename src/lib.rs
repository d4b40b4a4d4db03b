//! Multilingual site engine library.

pub mod admin;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod routing;
pub mod site;

pub use config::schema::SiteConfig;
pub use error::{SiteError, SiteResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
