//! Completion service seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmResult;

/// One completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Full prompt text, sent as a single user message.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a new request.
    pub fn new(prompt: impl Into<String>, max_output_tokens: u32, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            max_output_tokens,
            temperature,
        }
    }
}

/// A black-box completion endpoint returning a single string choice.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Issue one completion request.
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String>;
}
