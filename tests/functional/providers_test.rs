//! Functional tests for the provider HTTP clients against a mock server

use serde_json::json;
use std::time::Duration;
use wall_color_gateway::backend::{
    AnthropicBackend, JobProvider, JobRequest, JobStatus, ReplicateBackend, TextProvider,
};
use wall_color_gateway::config::{AnthropicConfig, ReplicateConfig};
use wall_color_gateway::gateway::{JobOrchestrator, JobOutcome, PollPolicy};
use wall_color_gateway::AppError;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn replicate(server: &MockServer) -> ReplicateBackend {
    let config = ReplicateConfig {
        base_url: server.uri(),
        ..ReplicateConfig::default()
    };
    ReplicateBackend::new(&config, "r8_test").unwrap()
}

fn anthropic(server: &MockServer) -> AnthropicBackend {
    let config = AnthropicConfig {
        base_url: server.uri(),
        ..AnthropicConfig::default()
    };
    AnthropicBackend::new(&config, "sk-ant-test").unwrap()
}

fn sam_request() -> JobRequest {
    JobRequest {
        version: "sam-version".to_string(),
        input: json!({ "image": "data:image/png;base64,AAAA" }),
    }
}

#[tokio::test]
async fn test_replicate_submit_and_poll() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .and(header("Authorization", "Token r8_test"))
        .and(body_partial_json(json!({ "version": "sam-version" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pred-1",
            "status": "starting",
            "output": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/predictions/pred-1"))
        .and(header("Authorization", "Token r8_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pred-1",
            "status": "succeeded",
            "output": ["https://replicate.delivery/mask-0.png"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = replicate(&server);
    let outcome = JobOrchestrator::new(&backend, PollPolicy::new(Duration::ZERO, 3))
        .run(&sam_request())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        JobOutcome::Succeeded(json!(["https://replicate.delivery/mask-0.png"]))
    );
}

#[tokio::test]
async fn test_replicate_rejected_submission() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": "Invalid version or not permitted",
        })))
        .mount(&server)
        .await;

    let err = replicate(&server).submit(&sam_request()).await.unwrap_err();

    match err {
        AppError::Upstream { message, debug } => {
            assert_eq!(message, "Replicate API error: Invalid version or not permitted");
            assert_eq!(debug.unwrap()["detail"], "Invalid version or not permitted");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_replicate_failed_prediction() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/predictions/pred-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pred-2",
            "status": "failed",
            "error": "NSFW content detected",
        })))
        .mount(&server)
        .await;

    let job = replicate(&server).poll("pred-2").await.unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error, Some(json!("NSFW content detected")));
}

#[tokio::test]
async fn test_replicate_fetch_output() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG\r\n".to_vec()))
        .mount(&server)
        .await;

    let bytes = replicate(&server)
        .fetch_output(&format!("{}/files/out.png", server.uri()))
        .await
        .unwrap();

    assert_eq!(bytes, b"\x89PNG\r\n".to_vec());
}

#[tokio::test]
async fn test_anthropic_complete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 1500,
            "messages": [{ "role": "user", "content": "Recommend colors" }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "content": [{ "type": "text", "text": "[{\"name\": \"Alabaster\"}]" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = anthropic(&server).complete("Recommend colors").await.unwrap();

    assert_eq!(reply, "[{\"name\": \"Alabaster\"}]");
}

#[tokio::test]
async fn test_anthropic_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" },
        })))
        .mount(&server)
        .await;

    let err = anthropic(&server).complete("hi").await.unwrap_err();

    assert_eq!(err.to_string(), "Anthropic API error: invalid x-api-key");
}

#[tokio::test]
async fn test_anthropic_non_json_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    match anthropic(&server).complete("hi").await.unwrap_err() {
        AppError::Upstream { message, debug } => {
            assert_eq!(message, "Anthropic API error: Unknown error");
            assert_eq!(debug.unwrap()["raw"], "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_anthropic_reply_without_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let err = anthropic(&server).complete("hi").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid response from Anthropic API");
}
