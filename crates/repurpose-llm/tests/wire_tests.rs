//! Wire-level backend tests against a mock HTTP server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use repurpose_llm::backend::GeminiBackend;
use repurpose_llm::{CompletionRequest, LlmBackend, LlmError};

const GEMINI_PATH: &str = "/models/gemini-flash-latest:generateContent";

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }],
        "usageMetadata": { "promptTokenCount": 21, "candidatesTokenCount": 9 }
    })
}

#[tokio::test]
async fn test_gemini_sends_system_instruction_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "the query" }] }],
            "systemInstruction": { "parts": [{ "text": "the contract" }] }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_reply("{\"drug\": \"Metformin\"}")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend =
        GeminiBackend::new("test-key", "gemini-flash-latest").with_base_url(server.uri());
    let response = backend
        .complete(CompletionRequest::new("the contract", "the query"))
        .await
        .unwrap();

    assert_eq!(response.content, "{\"drug\": \"Metformin\"}");
    assert_eq!(response.model, "gemini-flash-latest");
    assert_eq!(response.prompt_tokens, 21);
    assert_eq!(response.completion_tokens, 9);
}

#[tokio::test]
async fn test_gemini_strips_markdown_fences_from_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply("```json\n{\"score\": 7}\n```")),
        )
        .mount(&server)
        .await;

    let backend =
        GeminiBackend::new("test-key", "gemini-flash-latest").with_base_url(server.uri());
    let response = backend
        .complete(CompletionRequest::new("s", "u"))
        .await
        .unwrap();

    assert_eq!(response.content, "{\"score\": 7}");
}

#[tokio::test]
async fn test_gemini_retries_after_rate_limit_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "quota exhausted" }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let backend =
        GeminiBackend::new("test-key", "gemini-flash-latest").with_base_url(server.uri());
    // Second attempt lands after one 2s backoff.
    let response = backend
        .complete(CompletionRequest::new("s", "u"))
        .await
        .unwrap();

    assert_eq!(response.content, "{}");
}

#[tokio::test]
async fn test_gemini_gives_up_after_three_rate_limited_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "quota exhausted" }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let backend =
        GeminiBackend::new("test-key", "gemini-flash-latest").with_base_url(server.uri());
    let err = backend
        .complete(CompletionRequest::new("s", "u"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::RateLimitExceeded(3)));
}

#[tokio::test]
async fn test_gemini_surfaces_api_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "API key not valid" }
        })))
        .mount(&server)
        .await;

    let backend =
        GeminiBackend::new("bad-key", "gemini-flash-latest").with_base_url(server.uri());
    let err = backend
        .complete(CompletionRequest::new("s", "u"))
        .await
        .unwrap_err();

    match err {
        LlmError::ApiError { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ollama_chat_completion_round_trip() {
    use repurpose_llm::backend::OllamaBackend;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "llama3:8b",
            "messages": [
                { "role": "system", "content": "the contract" },
                { "role": "user",   "content": "the query" },
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3:8b",
            "choices": [{ "message": { "content": "{\"ok\": true}" } }],
            "usage": { "prompt_tokens": 5, "completion_tokens": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OllamaBackend::new(server.uri(), "llama3:8b");
    let response = backend
        .complete(CompletionRequest::new("the contract", "the query"))
        .await
        .unwrap();

    assert_eq!(response.content, "{\"ok\": true}");
    assert_eq!(response.prompt_tokens, 5);
}
