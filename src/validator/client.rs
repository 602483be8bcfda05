//! Completion-endpoint client.
//!
//! The only code in the crate that touches the network. One request shape:
//! a low-temperature chat completion against an OpenAI-compatible endpoint,
//! authenticated with the session credential.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt::VALIDATION_SYSTEM_PROMPT;
use super::ValidationError;
use crate::credential::ApiCredential;

/// Default endpoint; any OpenAI-compatible server can stand in.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
/// Default model asked for the second opinion.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Request timeout in seconds. A stalled provider must not hang the form.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Low sampling temperature keeps the second opinion stable across runs.
const SAMPLING_TEMPERATURE: f32 = 0.1;
/// The reply is one integer; sixteen tokens cover it.
const MAX_COMPLETION_TOKENS: u32 = 16;

/// One prompt in, one text completion out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        credential: &ApiCredential,
    ) -> Result<String, ValidationError>;
}

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Wire format
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
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

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

// ═══════════════════════════════════════════════════════════════════════
// HTTP client
// ═══════════════════════════════════════════════════════════════════════

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiCompatibleClient {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(config: CompletionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config: CompletionConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(
        &self,
        prompt: &str,
        credential: &ApiCredential,
    ) -> Result<String, ValidationError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: VALIDATION_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: SAMPLING_TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            "sending completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ValidationError::Connection(self.config.base_url.clone())
                } else if e.is_timeout() {
                    ValidationError::Timeout(self.config.timeout.as_secs())
                } else {
                    ValidationError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ValidationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ValidationError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ValidationError::ResponseParsing("response had no choices".to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Mock client for tests
// ═══════════════════════════════════════════════════════════════════════

enum MockScript {
    Reply(String),
    Fail(String),
}

/// Scripted client for tests. Counts calls so tests can assert the
/// network path was, or was not, taken.
pub struct MockCompletionClient {
    script: MockScript,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    /// A client that answers every call with the given text.
    pub fn replying(response: &str) -> Self {
        Self {
            script: MockScript::Reply(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client that fails every call.
    pub fn failing(message: &str) -> Self {
        Self {
            script: MockScript::Fail(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `complete` calls seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        _prompt: &str,
        _credential: &ApiCredential,
    ) -> Result<String, ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            MockScript::Reply(text) => Ok(text.clone()),
            MockScript::Fail(message) => Err(ValidationError::Http(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_openai() {
        let config = CompletionConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OpenAiCompatibleClient::new(CompletionConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..CompletionConfig::default()
        });
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn request_serializes_expected_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "instructions",
                },
                ChatMessage {
                    role: "user",
                    content: "profile",
                },
            ],
            temperature: SAMPLING_TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "profile");
        assert_eq!(value["max_tokens"], 16);
        assert!((value["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn response_parses_first_choice_content() {
        let body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "72" },
                    "finish_reason": "stop"
                }
            ],
            "usage": { "prompt_tokens": 80, "completion_tokens": 2 }
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "72");
    }

    #[tokio::test]
    async fn mock_replies_and_counts_calls() {
        let mock = MockCompletionClient::replying("85");
        let credential = ApiCredential::new("sk-test").unwrap();

        assert_eq!(mock.calls(), 0);
        let reply = mock.complete("prompt", &credential).await.unwrap();
        assert_eq!(reply, "85");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn mock_failure_surfaces_as_error() {
        let mock = MockCompletionClient::failing("boom");
        let credential = ApiCredential::new("sk-test").unwrap();

        let err = mock.complete("prompt", &credential).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(mock.calls(), 1);
    }
}
