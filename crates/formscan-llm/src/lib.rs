//! Language-model access for the formscan extraction pipeline.
//!
//! # Components
//!
//! - **Service Module**: [`CompletionService`] seam and [`CompletionRequest`]
//! - **Azure Module**: [`AzureOpenAiClient`], a chat-completions client
//! - **Prompt Module**: deterministic prompts for language detection and extraction
//! - **Recover Module**: pulls a JSON object out of free-form model output
//!
//! # Recovery
//!
//! Model answers are not trusted to be bare JSON. [`recover_json`] accepts
//! fenced blocks, JSON embedded in prose, or garbage, and never fails: the
//! last case becomes the [`InvalidResponse`] sentinel.
//!
//! # Usage
//!
//! ```rust,ignore
//! use formscan_llm::{recover_json, AzureOpenAiClient, CompletionRequest, CompletionService};
//!
//! let client = AzureOpenAiClient::new(config)?;
//! let raw = client.complete(&CompletionRequest::new(prompt, 1500, 0.0)).await?;
//! let recovered = recover_json(&raw);
//! ```

pub mod azure;
pub mod error;
pub mod prompt;
pub mod recover;
pub mod service;

pub use azure::{AzureOpenAiClient, AzureOpenAiConfig};
pub use error::{LlmError, LlmResult};
pub use prompt::{FormPromptBuilder, DEFAULT_DETECTION_SAMPLE_CHARS};
pub use recover::{recover_json, InvalidResponse, RecoveredResponse, INVALID_JSON};
pub use service::{CompletionRequest, CompletionService};
