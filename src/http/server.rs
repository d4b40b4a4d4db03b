//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with site, preview and admin handlers
//! - Wire up middleware (request ID, tracing, concurrency limit, timeout,
//!   body limit, headers)
//! - Serve on a listener until shutdown
//! - Swap in reloaded configuration
//!
//! # Design Decisions
//! - Handlers read one configuration snapshot per request
//! - Store and translator are built per request from that snapshot; nothing
//!   rendered is cached
//! - Blocking file access runs on the blocking pool

use arc_swap::ArcSwap;
use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::{limit::GlobalConcurrencyLimitLayer, ServiceBuilder};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::{self, MemorySessionStore};
use crate::config::SiteConfig;
use crate::content::FsContentStore;
use crate::http::request::{make_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::response::{html, with_security_headers};
use crate::i18n::JsonTranslator;
use crate::observability::metrics;
use crate::site::{SitePipeline, SiteResponse};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<SiteConfig>>,
    pub sessions: Arc<MemorySessionStore>,
}

impl AppState {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            sessions: Arc::new(MemorySessionStore::new()),
        }
    }
}

/// Per-request content store and translator for a config snapshot.
pub fn site_backends(config: &SiteConfig) -> (FsContentStore, JsonTranslator) {
    let root = &config.site.project_path;
    (
        FsContentStore::new(root.clone()),
        JsonTranslator::load(&root.join("translate"), &config.languages),
    )
}

/// HTTP server for the site engine.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: SiteConfig) -> Self {
        let state = AppState::new(config);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Concurrency limit, timeout, body limit and header settings come from
    /// the config at build time; everything else is read per request.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let config = state.config.load_full();

        let mut router = Router::new()
            .route("/", get(page_handler))
            .route("/{*path}", get(page_handler))
            .route("/__component/{name}", get(component_handler));
        if config.admin.enabled {
            router = router.merge(admin::setup_admin_router());
        }

        let router = router
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size));
        let router = if config.security.enable_headers {
            with_security_headers(router)
        } else {
            router
        };

        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(propagate_request_id_layer())
                .layer(GlobalConcurrencyLimitLayer::new(
                    config.listener.max_connections,
                ))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
    }

    /// Router for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the live snapshot.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let live = self.state.config.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                let old = live.load();
                if old.listener.bind_address != new_config.listener.bind_address {
                    tracing::warn!(
                        bind_address = %new_config.listener.bind_address,
                        "Bind address changes require a restart"
                    );
                }
                live.store(Arc::new(new_config));
                tracing::info!("Configuration reloaded");
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "_editor")]
    editor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    lang: Option<String>,
}

fn internal_error(error: impl std::fmt::Display) -> Response {
    tracing::error!(error = %error, "Request task failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Site pages.
async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    uri: Uri,
) -> Response {
    let config = state.config.load_full();
    let path = uri.path().to_string();
    let editor_mode = query.editor.as_deref() == Some("1");

    let result = tokio::task::spawn_blocking(move || {
        let (store, translator) = site_backends(&config);
        SitePipeline::new(&config, &store, &translator).handle(&path, editor_mode)
    })
    .await;

    match result {
        Ok(response) => {
            if let SiteResponse::Redirect { location } = &response {
                tracing::info!(path = %uri.path(), %location, "Redirecting alias");
            }
            metrics::record_request("GET", response.status().as_u16(), "page");
            response.into_response()
        }
        Err(e) => {
            metrics::record_request("GET", 500, "page");
            internal_error(e)
        }
    }
}

/// Isolated component preview for the visual editor.
async fn component_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let config = state.config.load_full();
    if !config.site.component_preview {
        metrics::record_request("GET", 404, "component");
        return html(StatusCode::NOT_FOUND, crate::site::document::FALLBACK_NOT_FOUND.to_string());
    }

    let result = tokio::task::spawn_blocking(move || {
        let (store, translator) = site_backends(&config);
        SitePipeline::new(&config, &store, &translator)
            .component_preview(&name, query.lang.as_deref())
    })
    .await;

    match result {
        Ok(body) => {
            metrics::record_request("GET", 200, "component");
            html(StatusCode::OK, body)
        }
        Err(e) => {
            metrics::record_request("GET", 500, "component");
            internal_error(e)
        }
    }
}
