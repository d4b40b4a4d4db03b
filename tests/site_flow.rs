//! End-to-end site requests against the in-process router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use site_engine::http::HttpServer;
use tower::ServiceExt;

mod common;

async fn get(server: &HttpServer, uri: &str) -> axum::http::Response<Body> {
    server
        .router()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_nested_page_in_french() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/fr/guides/installation").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;

    assert!(html.contains(r#"<html lang="fr">"#));
    assert!(html.contains("<article>Installer le moteur</article>"));
    assert!(!html.contains("stale flat template"));
    // Layout override hides the menu under /guides.
    assert!(!html.contains("<nav>"));
    assert!(html.contains("<footer></footer>"));
}

#[tokio::test]
async fn test_home_page_with_menu_links() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let html = common::body_string(get(&server, "/").await).await;
    assert!(html.contains("<h1>Welcome</h1>"));
    assert!(html.contains(r#"<a href="http://localhost/en/">Home</a>"#));
}

#[tokio::test]
async fn test_alias_redirect() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/old-page").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/en/new-page");

    let response = get(&server, "/fr/old-page").await;
    assert_eq!(response.headers()[header::LOCATION], "/fr/new-page");
}

#[tokio::test]
async fn test_alias_rewrite_is_single_hop() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/old").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_string(response).await.contains("<p>middle</p>"));
}

#[tokio::test]
async fn test_unknown_route_uses_404_template() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(common::body_string(response).await.contains("<p>Nothing here</p>"));
}

#[tokio::test]
async fn test_traversal_segments_are_not_found() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/%2E%2E/%2E%2E/etc/passwd").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_editor_mode_annotations() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let html = common::body_string(get(&server, "/?_editor=1").await).await;
    assert!(html.contains(r#"<h1 data-edit-struct="page-home" data-edit-node="0">"#));
    assert!(html.contains(r#"data-edit-struct="menu""#));

    let plain = common::body_string(get(&server, "/").await).await;
    assert!(!plain.contains("data-edit-"));
}

#[tokio::test]
async fn test_component_preview() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/__component/card").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains(r#"data-preview-component="card""#));
    assert!(html.contains(r#"data-edit-component="card""#));
    // Unfilled variables stay visible.
    assert!(html.contains("{{title}}"));
}

#[tokio::test]
async fn test_component_preview_sanitizes_name() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/__component/..%2F..%2Fetc%2Fpasswd").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains(r#"<div class="component-missing" data-edit-component="etcpasswd">"#));
}

#[tokio::test]
async fn test_component_preview_can_be_disabled() {
    let project = common::sample_site();
    let mut config = project.config();
    config.site.component_preview = false;
    let server = HttpServer::new(config);

    assert_eq!(get(&server, "/__component/card").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_and_security_headers() {
    let project = common::sample_site();
    let server = HttpServer::new(project.config());

    let response = get(&server, "/").await;
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let response = server
        .router()
        .oneshot(
            Request::get("/")
                .header("x-request-id", "client-chosen")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "client-chosen");
}

#[tokio::test]
async fn test_malformed_page_is_served_degraded() {
    let project = common::sample_site();
    project.page("broken", "{not json");
    let server = HttpServer::new(project.config());

    let response = get(&server, "/fr/broken").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_string(response).await;
    assert!(html.contains(r#"<html lang="fr">"#));
    assert!(html.contains("<!-- invalid JSON -->"));
}

#[tokio::test]
async fn test_single_request_slot_serves_concurrent_requests() {
    let project = common::sample_site();
    let mut config = project.config();
    config.listener.max_connections = 1;
    let router = HttpServer::new(config).router();

    let mut requests = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let router = router.clone();
        requests.spawn(async move {
            router
                .oneshot(Request::get("/en/").body(Body::empty()).unwrap())
                .await
                .unwrap()
                .status()
        });
    }
    while let Some(status) = requests.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }
}
