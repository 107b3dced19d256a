#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use manifesto_service::config::ManifestoConfig;
use manifesto_service::services::providers::mock::MockTextProvider;
use manifesto_service::services::providers::TextProvider;
use manifesto_service::startup::{build_router, AppState};
use service_core::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Config for tests: loopback, ephemeral port, no process env involved.
pub fn test_config(overrides: &[(&str, &str)]) -> ManifestoConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("ENVIRONMENT".to_string(), "test".to_string()),
        ("GOOGLE_API_KEY".to_string(), "test-api-key".to_string()),
        ("GENAI_TEXT_MODEL".to_string(), "gemini-2.5-flash".to_string()),
    ]);
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    let common = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    ManifestoConfig::from_lookup(common, |key| vars.get(key).cloned())
        .expect("Failed to build test config")
}

/// Router wired to `provider`, ready for `oneshot` calls.
pub fn test_router(provider: Arc<MockTextProvider>, overrides: &[(&str, &str)]) -> Router {
    test_router_with(provider, overrides)
}

/// Router wired to any text provider.
pub fn test_router_with(provider: Arc<dyn TextProvider>, overrides: &[(&str, &str)]) -> Router {
    let config = test_config(overrides);
    build_router(AppState::new(&config, provider))
}

pub async fn get(app: Router, path: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, path: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).expect("Response body is not JSON");
    (status, json)
}
