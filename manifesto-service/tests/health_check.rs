//! Integration tests against a running manifesto-service.
//!
//! The server is bound to an ephemeral loopback port and backed by the mock
//! provider, so these run without network access or credentials.

mod common;

use common::test_config;
use manifesto_service::services::providers::mock::MockTextProvider;
use manifesto_service::startup::Application;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Spawn the application on a random port and return the port number.
async fn spawn_app(provider: Arc<MockTextProvider>) -> u16 {
    let app = Application::build_with_provider(test_config(&[]), provider)
        .await
        .expect("Failed to build application");

    let port = app.port();

    // Spawn the server in the background
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app(Arc::new(MockTextProvider::replying("draft"))).await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "manifesto-service");
}

#[tokio::test]
async fn readiness_check_returns_ok() {
    let port = spawn_app(Arc::new(MockTextProvider::replying("draft"))).await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn generate_then_scrape_metrics() {
    let mock = Arc::new(MockTextProvider::replying("A bold new manifesto."));
    let port = spawn_app(mock.clone()).await;
    let client = Client::new();

    let response = client
        .post(format!("http://127.0.0.1:{}/generate_manifesto", port))
        .json(&serde_json::json!({
            "party_name": "Green Future",
            "issues": "climate",
            "policies": "carbon tax",
            "vision": "sustainable growth"
        }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["filename"], "manifesto_Green_Future.txt");
    assert_eq!(mock.call_count(), 1);

    let metrics = client
        .get(format!("http://127.0.0.1:{}/metrics", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read metrics");

    assert!(metrics.contains("manifesto_generations_total"));
    assert!(metrics.contains("http_requests_total"));
}

#[tokio::test]
async fn unknown_route_returns_not_found() {
    let port = spawn_app(Arc::new(MockTextProvider::replying("draft"))).await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/does-not-exist", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().unwrap().contains("/does-not-exist"));
}
