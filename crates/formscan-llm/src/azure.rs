//! Azure OpenAI chat-completions client.
//!
//! Each [`CompletionRequest`] becomes one chat call with a single user
//! message. The first choice's content is returned trimmed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::service::{CompletionRequest, CompletionService};

/// Configuration for the Azure OpenAI client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOpenAiConfig {
    /// Base URL of the Azure OpenAI resource.
    #[serde(default)]
    pub endpoint: String,

    /// Resource key, sent as the `api-key` header.
    #[serde(default)]
    pub api_key: String,

    /// Model deployment name.
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// REST API version.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_deployment() -> String {
    "gpt-4o".to_string()
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: default_deployment(),
            api_version: default_api_version(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AzureOpenAiConfig {
    /// Chat-completions URL for the configured deployment.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

impl<'a> From<&'a CompletionRequest> for ChatRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> LlmResult<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Azure OpenAI client implementing [`CompletionService`].
#[derive(Debug)]
pub struct AzureOpenAiClient {
    client: Client,
    config: AzureOpenAiConfig,
}

impl AzureOpenAiClient {
    /// Create a new client.
    pub fn new(config: AzureOpenAiConfig) -> LlmResult<Self> {
        if config.endpoint.is_empty() {
            return Err(LlmError::config("endpoint is not set"));
        }
        if config.api_key.is_empty() {
            return Err(LlmError::config("api_key is not set"));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &AzureOpenAiConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionService for AzureOpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        debug!(
            deployment = %self.config.deployment,
            prompt_len = request.prompt.len(),
            max_tokens = request.max_output_tokens,
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .header("api-key", &self.config.api_key)
            .json(&ChatRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat.into_content()?;

        debug!(output_len = content.len(), "Chat completion received");
        Ok(content)
    }
}
