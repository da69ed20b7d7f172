//! In-process service doubles for tests.
//!
//! Available in unit tests and with the `test-utils` feature. None of these
//! touch the network.

use std::collections::VecDeque;

use async_trait::async_trait;
use formscan_llm::{CompletionRequest, CompletionService, LlmError, LlmResult};
use formscan_ocr::{OcrError, OcrPage, OcrResult, OcrService};
use parking_lot::Mutex;

/// OCR service returning a fixed page list.
#[derive(Debug, Clone, Default)]
pub struct StaticOcrService {
    pages: Vec<OcrPage>,
}

impl StaticOcrService {
    pub fn new(pages: Vec<OcrPage>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl OcrService for StaticOcrService {
    async fn analyze(&self, _document: &[u8]) -> OcrResult<Vec<OcrPage>> {
        Ok(self.pages.clone())
    }
}

/// OCR service that always reports an unavailable backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingOcrService;

#[async_trait]
impl OcrService for FailingOcrService {
    async fn analyze(&self, _document: &[u8]) -> OcrResult<Vec<OcrPage>> {
        Err(OcrError::ServiceStatus {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

/// Completion service answering from a script, in order.
///
/// Records every request. Returns [`LlmError::EmptyResponse`] once the
/// script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedCompletionService {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletionService {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        self.requests.lock().push(request.clone());
        self.responses.lock().pop_front().ok_or(LlmError::EmptyResponse)
    }
}

/// Completion service that never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HangingCompletionService;

#[async_trait]
impl CompletionService for HangingCompletionService {
    async fn complete(&self, _request: &CompletionRequest) -> LlmResult<String> {
        std::future::pending().await
    }
}
