//! Wire-level tests for the Gemini provider against a mock HTTP server.

use manifesto_service::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use manifesto_service::services::providers::{
    FinishReason, GenerationParams, ProviderError, TextProvider,
};
use secrecy::Secret;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn provider_for(server: &MockServer) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("test-api-key".to_string()),
        model: "gemini-2.5-flash".to_string(),
        api_base: format!("{}/v1beta", server.uri()),
        request_timeout: Duration::from_secs(5),
    })
    .expect("Failed to build provider")
}

#[tokio::test]
async fn sends_prompt_and_returns_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Draft it" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Introduction\n" }, { "text": "Conclusion" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 34, "totalTokenCount": 46 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .generate("Draft it", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(response.text, "Introduction\nConclusion");
    assert_eq!(response.input_tokens, 12);
    assert_eq!(response.output_tokens, 34);
    assert_eq!(response.finish_reason, FinishReason::Complete);
}

#[tokio::test]
async fn forwards_generation_config_when_set() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": { "maxOutputTokens": 1024, "topP": 0.5 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "short" }] },
                "finishReason": "MAX_TOKENS"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = GenerationParams {
        max_tokens: Some(1024),
        top_p: Some(0.5),
        ..Default::default()
    };
    let response = provider_for(&server).generate("p", &params).await.unwrap();

    assert_eq!(response.text, "short");
    assert_eq!(response.finish_reason, FinishReason::Length);
}

#[tokio::test]
async fn skips_thought_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "planning the sections", "thought": true },
                    { "text": "Manifesto text" }
                ] },
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(response.text, "Manifesto text");
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn auth_failure_maps_to_api_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(403).set_body_string(r#"{"error":{"message":"API key not valid"}}"#),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(message) => {
            assert!(message.starts_with("Gemini API error 403"));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn no_candidates_is_an_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn safety_stop_is_content_filtered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ContentFiltered));
}

#[tokio::test]
async fn blocked_prompt_is_content_filtered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ContentFiltered));
}

#[tokio::test]
async fn malformed_body_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ApiError(m) if m.starts_with("Failed to parse response")));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Nothing listens on port 1 on loopback.
    let provider = GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("test-api-key".to_string()),
        model: "gemini-2.5-flash".to_string(),
        api_base: "http://127.0.0.1:1/v1beta".to_string(),
        request_timeout: Duration::from_secs(5),
    })
    .expect("Failed to build provider");

    let err = provider
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)));
}
