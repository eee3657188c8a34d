/// LLM Client — the single point of entry for chat-completion calls.
///
/// No other module talks to the completion endpoint directly. The study
/// pipeline depends on the `CompletionBackend` trait so it can be driven
/// by a stub in tests.
///
/// One blocking request per user question; no retries. A failed call is
/// reported and the user decides whether to ask again.
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// OpenAI-compatible chat completions endpoint (OpenRouter).
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1200;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Name resolution or connection failure. Eligible for the offline fallback.
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response ({reason})")]
    Schema { reason: String, raw: String },
}

impl LlmError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, LlmError::Unreachable(_))
    }
}

/// Anything that can turn a (system, user) turn pair into completion text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions client with bearer-token auth.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String, model: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            api_url,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Unreachable(e.to_string())
                } else {
                    LlmError::Transport(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Completion API returned {}", status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = extract_content(&body)?;
        debug!(
            "Completion succeeded: model={}, chars={}",
            self.model,
            text.chars().count()
        );
        Ok(text)
    }
}

/// Pulls the first choice's message text out of a chat-completions body.
///
/// Accepts `message.content` as a string, as a mapping with a `text` or
/// `content` field, or as an array of text parts; also the legacy
/// `choices[0].text` shape. Anything else is a schema error carrying the raw body.
pub fn extract_content(raw: &str) -> Result<String, LlmError> {
    let schema_err = |reason: &str| LlmError::Schema {
        reason: reason.to_string(),
        raw: raw.to_string(),
    };

    let value: Value = serde_json::from_str(raw).map_err(|_| schema_err("body is not JSON"))?;

    let choice = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| schema_err("missing choices[0]"))?;

    let text = match choice.get("message").and_then(|m| m.get("content")) {
        Some(content) => content_text(content),
        None => choice
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
    .ok_or_else(|| schema_err("missing message content"))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(schema_err("empty message content"));
    }
    Ok(text.to_string())
}

fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("text")
            .or_else(|| map.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Array(parts) => {
            let joined: Vec<&str> = parts
                .iter()
                .filter_map(|p| match p {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(_) => p.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .collect();
            if joined.is_empty() {
                None
            } else {
                Some(joined.join(""))
            }
        }
        _ => None,
    }
}
