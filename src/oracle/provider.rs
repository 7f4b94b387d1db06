//! Oracle Providers
//!
//! Defines the oracle trait and the OpenAI-compatible chat completions
//! implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::OracleError;
use crate::config::OracleConfig;

/// Base delay for the first retry
const BACKOFF_BASE_MS: u64 = 500;

/// Text-selection oracle trait
#[async_trait]
pub trait SelectionOracle: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Send `prompt` and return the raw reply text
    async fn select(&self, prompt: &str) -> Result<String, OracleError>;
}

/// Exponential backoff: `base_ms * 2^attempt`, capped at 60 seconds
pub fn backoff_delay(attempt: u32, base_ms: u64) -> Duration {
    let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay_ms.min(60_000))
}

/// OpenAI-compatible chat completions provider (OpenAI, Groq, Together.ai, ...)
pub struct OpenAiOracle {
    config: OracleConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    /// One request, no retries
    async fn call_once(&self, api_key: &str, prompt: &str) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status, body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Reply(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OracleError::Reply("reply has no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl SelectionOracle for OpenAiOracle {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn select(&self, prompt: &str) -> Result<String, OracleError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(OracleError::MissingCredential)?;

        let mut attempt = 0;
        loop {
            match self.call_once(api_key, prompt).await {
                Ok(content) => {
                    debug!(model = %self.config.model, attempt, bytes = content.len(), "Oracle replied");
                    return Ok(content);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let wait = backoff_delay(attempt, BACKOFF_BASE_MS);
                    warn!(
                        "Oracle call failed (attempt {}): {}, retrying in {:?}",
                        attempt + 1,
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Scripted oracle for testing
///
/// Replies are handed out in order; the last one repeats once the script
/// runs out. Every prompt received is recorded.
#[cfg(test)]
pub struct MockOracle {
    replies: std::sync::Mutex<std::collections::VecDeque<Result<String, OracleError>>>,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockOracle {
    pub fn replying(reply: &str) -> Self {
        Self::scripted(vec![Ok(reply.to_string())])
    }

    pub fn failing(error: OracleError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    pub fn scripted(replies: Vec<Result<String, OracleError>>) -> Self {
        Self {
            replies: std::sync::Mutex::new(replies.into()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[cfg(test)]
#[async_trait]
impl SelectionOracle for MockOracle {
    fn name(&self) -> &str {
        "mock"
    }

    async fn select(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().map(|r| match r {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(OracleError::Reply(e.to_string())),
            })
        };
        reply.unwrap_or_else(|| Err(OracleError::Reply("mock has no replies".to_string())))
    }
}
