//! LLM backend trait and concrete implementations.
//!
//! Backends:
//!   GeminiBackend — Google Gemini generateContent API (default provider)
//!   OllamaBackend — local Ollama (OpenAI-compatible chat endpoint)

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Rate limit exceeded after {0} attempts")]
    RateLimitExceeded(u32),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("Empty completion from model")]
    EmptyCompletion,
    #[error("No JSON object found in model output")]
    NoJsonObject,
    #[error("Invalid extracted JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ── Request / Response ────────────────────────────────────────────────────────

/// One completion call. Every agent sends exactly a system prompt plus a
/// user prompt, so the request carries those directly rather than a
/// message list.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.3,
            max_output_tokens: 2048,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LlmError>;
    fn name(&self) -> &'static str;
    fn model_id(&self) -> &str;
    fn is_local(&self) -> bool;
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_openai_response(json: &serde_json::Value, fallback_model: &str) -> CompletionResponse {
    CompletionResponse {
        content: json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string(),
        model: json["model"].as_str().unwrap_or(fallback_model).to_string(),
        prompt_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    }
}

async fn check_response_status(resp: reqwest::Response) -> Result<serde_json::Value, LlmError> {
    let status = resp.status().as_u16();
    let body: serde_json::Value = resp.json().await?;
    if status >= 400 {
        let msg = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(LlmError::ApiError { status, message: msg });
    }
    Ok(body)
}

/// Removes markdown code fence markers the model wraps JSON in.
fn strip_code_fences(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"```(?:json)?\s*\n?").expect("valid fence regex"));
    fence.replace_all(text, "").trim().to_string()
}

// ── 1. Google Gemini ──────────────────────────────────────────────────────────

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

pub struct GeminiBackend {
    pub base_url: String,
    pub model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Exponential backoff for rate-limited attempts: 2s, 4s, 8s, ...
fn backoff_delay(attempt: u32) -> Duration {
    INITIAL_BACKOFF * 2u32.saturating_pow(attempt.saturating_sub(1))
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": req.user }]
            }],
            "generationConfig": {
                "temperature": req.temperature,
                "maxOutputTokens": req.max_output_tokens,
            }
        });
        if !req.system.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": req.system }]
            });
        }

        let url = self.url();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let resp = self
                .client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .timeout(REQUEST_TIMEOUT)
                .json(&body)
                .send()
                .await?;

            if resp.status().as_u16() == 429 {
                if attempt >= MAX_RETRIES {
                    return Err(LlmError::RateLimitExceeded(attempt));
                }
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    attempt,
                    max_retries = MAX_RETRIES,
                    delay_secs = delay.as_secs(),
                    "Gemini rate limited (429), backing off"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let json = check_response_status(resp).await?;

            let text = json["candidates"][0]["content"]["parts"][0]["text"]
                .as_str()
                // Some error-shaped 200 responses carry the text at top level
                .or_else(|| json["text"].as_str())
                .or_else(|| json["content"].as_str())
                .unwrap_or("");
            if text.is_empty() {
                return Err(LlmError::EmptyCompletion);
            }

            let prompt_tokens = json["usageMetadata"]["promptTokenCount"].as_u64().unwrap_or(0) as u32;
            let completion_tokens =
                json["usageMetadata"]["candidatesTokenCount"].as_u64().unwrap_or(0) as u32;

            return Ok(CompletionResponse {
                content: strip_code_fences(text),
                model: self.model.clone(),
                prompt_tokens,
                completion_tokens,
            });
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_local(&self) -> bool {
        false
    }
}

// ── 2. Ollama (local) ─────────────────────────────────────────────────────────

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3:8b";

pub struct OllamaBackend {
    pub base_url: String,
    pub model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model":       self.model,
            "messages":    [
                { "role": "system", "content": req.system },
                { "role": "user",   "content": req.user },
            ],
            "max_tokens":  req.max_output_tokens,
            "temperature": req.temperature,
        });
        let resp = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;
        let json = check_response_status(resp).await?;
        let parsed = parse_openai_response(&json, &self.model);
        if parsed.content.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn is_local(&self) -> bool {
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
