//! Integration tests for the route facade over a real TCP listener.
//!
//! Covers:
//! - per-verb routing and nested subrouters
//! - CORS preflight with the permissive policy
//! - value injection
//! - listen / close round trip

mod common;

use std::time::Duration;

use axum::Extension;
use reqwest::{Method, StatusCode, header};
use routedoc_axum::{ContextValues, CorsConfig, HttpError, Server};

#[tokio::test]
async fn test_verbs_reach_their_handlers() {
    let mut server = Server::new();
    server
        .get("/pets", || async { "list" })
        .post("/pets", || async { (StatusCode::CREATED, "created") })
        .put("/pets/{id}", || async { "replaced" })
        .patch("/pets/{id}", || async { "patched" })
        .delete("/pets/{id}", || async { StatusCode::NO_CONTENT });
    let (base_url, handle) = common::start(server).await;

    let client = reqwest::Client::new();
    for (method, path, status, body) in [
        (Method::GET, "/pets", StatusCode::OK, "list"),
        (Method::POST, "/pets", StatusCode::CREATED, "created"),
        (Method::PUT, "/pets/1", StatusCode::OK, "replaced"),
        (Method::PATCH, "/pets/1", StatusCode::OK, "patched"),
        (Method::DELETE, "/pets/1", StatusCode::NO_CONTENT, ""),
    ] {
        let response = client
            .request(method.clone(), format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), status, "{method} {path}");
        assert_eq!(response.text().await.unwrap(), body);
    }

    handle.close().await.expect("Failed to close server");
}

#[tokio::test]
async fn test_subrouter_mounted_under_prefix() {
    let mut server = Server::new();
    server.get("/health", || async { "OK" });
    server.route("/api", |api| {
        api.get("/version", || async { "1.0" });
        api.route("/admin", |admin| {
            admin.get("/stats", || async { "stats" });
        });
    });
    let (base_url, handle) = common::start(server).await;

    let client = reqwest::Client::new();
    let get = |path: &str| client.get(format!("{base_url}{path}")).send();

    assert_eq!(get("/health").await.unwrap().text().await.unwrap(), "OK");
    assert_eq!(get("/api/version").await.unwrap().text().await.unwrap(), "1.0");
    assert_eq!(
        get("/api/admin/stats").await.unwrap().text().await.unwrap(),
        "stats"
    );
    assert_eq!(get("/version").await.unwrap().status(), StatusCode::NOT_FOUND);

    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let mut server = Server::new();
    server.get("/pets", || async { "list" });
    server.allow_cors();
    let (base_url, handle) = common::start(server).await;

    let client = reqwest::Client::new();
    let response = client
        .request(Method::OPTIONS, format!("{base_url}/pets"))
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-csrf-token")
        .send()
        .await
        .expect("Failed to send preflight");

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(methods.contains("DELETE"), "{methods}");
    let allowed = headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(allowed.contains("x-csrf-token"), "{allowed}");

    // Simple requests carry the header too
    let response = client
        .get(format!("{base_url}/pets"))
        .header(header::ORIGIN, "http://example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_cors_with_listed_origins() {
    let mut server = Server::new();
    server.get("/pets", || async { "list" });
    server.allow_cors_with(&CorsConfig::AllowOrigins(vec![
        "http://localhost:5173".to_string(),
    ]));
    let (base_url, handle) = common::start(server).await;

    let client = reqwest::Client::new();
    let allow_origin = |origin: &'static str| {
        let request = client
            .get(format!("{base_url}/pets"))
            .header(header::ORIGIN, origin)
            .send();
        async move {
            request
                .await
                .unwrap()
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap().to_string())
        }
    };

    assert_eq!(
        allow_origin("http://localhost:5173").await.as_deref(),
        Some("http://localhost:5173")
    );
    assert_eq!(allow_origin("http://evil.example").await, None);

    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_values_visible_to_handlers() {
    let mut server = Server::new();
    server.with_value("greeting", "hello".to_string());
    server.get(
        "/greet",
        |Extension(values): Extension<ContextValues>| async move {
            values
                .get::<String>("greeting")
                .cloned()
                .unwrap_or_else(|| "missing".to_string())
        },
    );
    let (base_url, handle) = common::start(server).await;

    let body = reqwest::get(format!("{base_url}/greet"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "hello");

    handle.close().await.unwrap();
}

#[tokio::test]
async fn test_close_stops_accepting_connections() {
    let mut server = Server::new();
    server.get("/health", || async { "OK" });
    let (base_url, handle) = common::start(server).await;

    let response = reqwest::get(format!("{base_url}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    handle
        .close_with_timeout(Duration::from_secs(5))
        .await
        .expect("Shutdown should complete");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    assert!(client.get(format!("{base_url}/health")).send().await.is_err());
}

#[tokio::test]
async fn test_listen_reports_bind_failure() {
    let blocker = tokio::net::TcpListener::bind("0.0.0.0:0").await.unwrap();
    let port = blocker.local_addr().unwrap().port();

    let err = Server::new()
        .listen(port)
        .await
        .expect_err("Port is already taken");
    assert!(matches!(err, HttpError::Bind { .. }), "{err}");
}
