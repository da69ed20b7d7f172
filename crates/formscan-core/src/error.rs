//! Error types for the extraction pipeline.
//!
//! Only two kinds of failure end a run abnormally: the input could not be
//! read, or an upstream service (OCR, language model) failed or timed out.
//! Unparseable model output is not an error; it becomes the sentinel record.

use formscan_llm::LlmError;
use formscan_ocr::OcrError;
use thiserror::Error;

use crate::pipeline::PipelineStage;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Document missing, unreadable or empty. No run was attempted.
    InputNotFound,
    /// OCR or language-model service failed or timed out.
    UpstreamService,
    /// Invalid configuration.
    Configuration,
    /// The job queue is no longer accepting or delivering work.
    QueueClosed,
}

/// Errors that terminate a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source document missing or unreadable.
    #[error("Input not found: {message}")]
    InputNotFound { message: String },

    /// OCR service failure.
    #[error("OCR service failed during {stage}: {source}")]
    Ocr {
        stage: PipelineStage,
        #[source]
        source: OcrError,
    },

    /// Language-model service failure.
    #[error("Language model failed during {stage}: {source}")]
    Llm {
        stage: PipelineStage,
        #[source]
        source: LlmError,
    },

    /// An external call exceeded its deadline.
    #[error("{stage} timed out after {timeout_ms} ms")]
    Timeout {
        stage: PipelineStage,
        timeout_ms: u64,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Job queue shut down before the job finished.
    #[error("Job queue closed")]
    QueueClosed,
}

impl PipelineError {
    /// Create a configuration error from any error type.
    pub fn config<E: std::fmt::Display>(e: E) -> Self {
        Self::Config {
            message: e.to_string(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InputNotFound { .. } => ErrorKind::InputNotFound,
            PipelineError::Ocr { .. } | PipelineError::Llm { .. } | PipelineError::Timeout { .. } => {
                ErrorKind::UpstreamService
            }
            PipelineError::Config { .. } => ErrorKind::Configuration,
            PipelineError::QueueClosed => ErrorKind::QueueClosed,
        }
    }

    /// Stage at which an upstream failure happened.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::Ocr { stage, .. }
            | PipelineError::Llm { stage, .. }
            | PipelineError::Timeout { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err)
    }
}
