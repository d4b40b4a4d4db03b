//! Multilingual site engine.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                     SITE ENGINE                      │
//!                   │                                                      │
//!  GET /fr/guides   │  ┌──────┐   ┌──────────┐   ┌───────┐   ┌──────────┐  │
//!  ─────────────────┼─▶│ http │──▶│ language │──▶│ alias │──▶│  route   │  │
//!                   │  │server│   │ resolver │   │resolv.│   │ resolver │  │
//!                   │  └──────┘   └──────────┘   └───┬───┘   └────┬─────┘  │
//!                   │                         301 ◀──┘            │        │
//!                   │                                             ▼        │
//!  HTML document    │  ┌──────────┐   ┌────────────┐   ┌──────────────┐    │
//!  ◀────────────────┼──│ document │◀──│  renderer  │◀──│ content store│    │
//!                   │  │  chrome  │   │ + i18n     │   │  (templates) │    │
//!                   │  └──────────┘   └────────────┘   └──────────────┘    │
//!                   │                                                      │
//!  GET /admin/*     │  ┌──────────────────────────────────────────┐        │
//!  ─────────────────┼─▶│ admin dispatcher (sessions, auth gate)   │        │
//!                   │  └──────────────────────────────────────────┘        │
//!                   │                                                      │
//!                   │  config (hot reload) · observability · lifecycle     │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use site_engine::config::{load_config, watcher::ConfigWatcher, SiteConfig};
use site_engine::http::HttpServer;
use site_engine::lifecycle::{signals, Shutdown};
use site_engine::observability::{logging, metrics};

/// Config path from the first argument, then `SITE_CONFIG`, then `site.toml`.
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("SITE_CONFIG").map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from("site.toml");
            default.exists().then_some(default)
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_path();
    let config = match &path {
        Some(path) => load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SiteConfig::default(),
    };

    logging::init_tracing(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "site-engine starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        project_path = %config.site.project_path.display(),
        multilingual = config.languages.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .context("parsing metrics address")?;
        metrics::init_metrics(addr);
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run().context("starting config watcher")?), updates)
        }
        None => {
            let (_tx, updates) = tokio::sync::mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("binding {}", config.listener.bind_address))?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown.clone());

    HttpServer::new(config)
        .run(listener, config_updates, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
