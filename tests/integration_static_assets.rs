//! End-to-end tests for case-insensitive static asset serving.

use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::util::ServiceExt;

use weatherdeck::proxy::fetch::MockTransport;
use weatherdeck::{create_router, AppState, AssetIndex, CacheStore, Fetcher, SharedState};

fn state_over(dir: &std::path::Path) -> SharedState {
    let fetcher = Fetcher::with_transport(Arc::new(MockTransport::new(vec![])));
    Arc::new(AppState {
        cache: Arc::new(CacheStore::new(fetcher)),
        assets: AssetIndex::build(dir).unwrap(),
    })
}

async fn get(state: SharedState, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = create_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_serves_file_with_differing_request_case() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("foo.js"), "var x = 1;").unwrap();
    let state = state_over(dir.path());

    let (status, content_type, body) = get(state, "/Foo.JS").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"var x = 1;");
    assert!(content_type.unwrap().contains("javascript"));
}

#[tokio::test]
async fn test_root_serves_index_html() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
    let state = state_over(dir.path());

    let (status, content_type, body) = get(state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html></html>");
    assert!(content_type.unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn test_nested_mixed_case_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("Images")).unwrap();
    fs::write(dir.path().join("Images/Logo.PNG"), [137, 80, 78, 71]).unwrap();
    let state = state_over(dir.path());

    let (status, content_type, body) = get(state, "/images/logo.png").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, vec![137, 80, 78, 71]);
    assert_eq!(content_type.unwrap(), "image/png");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<html>").unwrap();
    let state = state_over(dir.path());

    let (status, _content_type, body) = get(state, "/nope.css").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"404 page not found");
}
