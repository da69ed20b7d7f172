//! Azure Document Intelligence Client - async REST client for OCR
//!
//! Submits document bytes to a prebuilt analysis model and follows the
//! long-running operation until it settles:
//!
//! 1. `POST {endpoint}/formrecognizer/documentModels/{model}:analyze` → `202` + `Operation-Location`
//! 2. `GET {Operation-Location}` until `status` is `succeeded` or `failed`
//! 3. `analyzeResult.pages[].words[]` → [`OcrPage`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::types::{OcrPage, OcrService, OcrWord};
use crate::{OcrError, OcrResult};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// Configuration for AzureDocumentClient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureDocumentConfig {
    /// Base URL of the Azure AI services resource
    #[serde(default)]
    pub endpoint: String,
    /// Subscription key
    #[serde(default)]
    pub api_key: String,
    /// Prebuilt analysis model
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// REST API version
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Overall deadline for submit + polling in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Delay between operation polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_model_id() -> String {
    "prebuilt-document".to_string()
}

fn default_api_version() -> String {
    "2023-07-31".to_string()
}

fn default_timeout_ms() -> u64 {
    120_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

impl Default for AzureDocumentConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model_id: default_model_id(),
            api_version: default_api_version(),
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl AzureDocumentConfig {
    /// Full URL of the analyze operation for this configuration.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.model_id,
            self.api_version
        )
    }
}

/// Long-running operation status document
#[derive(Debug, Deserialize)]
struct AnalyzeOperation {
    status: String,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    pages: Vec<PageRaw>,
}

#[derive(Debug, Deserialize)]
struct PageRaw {
    #[serde(rename = "pageNumber")]
    page_number: u32,
    #[serde(default)]
    words: Vec<WordRaw>,
}

#[derive(Debug, Deserialize)]
struct WordRaw {
    content: String,
    #[serde(default)]
    confidence: f64,
}

/// AzureDocumentClient - async HTTP client for Azure Document Intelligence
#[derive(Debug)]
pub struct AzureDocumentClient {
    client: Client,
    config: AzureDocumentConfig,
}

impl AzureDocumentClient {
    /// Create a new AzureDocumentClient
    pub fn new(config: AzureDocumentConfig) -> Result<Self, OcrError> {
        if config.endpoint.is_empty() {
            return Err(OcrError::Config("endpoint is not set".to_string()));
        }
        if config.api_key.is_empty() {
            return Err(OcrError::Config("api_key is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &AzureDocumentConfig {
        &self.config
    }

    /// Submit the document and return the operation URL to poll.
    async fn submit(&self, document: &[u8]) -> OcrResult<String> {
        let response = self
            .client
            .post(self.config.analyze_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(document.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| OcrError::MalformedResponse("Operation-Location header".to_string()))
    }

    /// Poll the operation until it settles or the deadline passes.
    async fn poll(&self, operation_url: &str, deadline: Instant) -> OcrResult<AnalyzeResult> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            tokio::time::sleep(interval).await;

            let response = self
                .client
                .get(operation_url)
                .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(OcrError::ServiceStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            let operation: AnalyzeOperation = response.json().await?;
            debug!(status = %operation.status, "Polled analyze operation");

            match operation.status.as_str() {
                "succeeded" => {
                    return operation
                        .analyze_result
                        .ok_or_else(|| OcrError::MalformedResponse("analyzeResult".to_string()));
                }
                "failed" => {
                    let detail = operation
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no error detail".to_string());
                    warn!(detail = %detail, "Analyze operation failed");
                    return Err(OcrError::AnalysisFailed(detail));
                }
                _ => {
                    if Instant::now() >= deadline {
                        return Err(OcrError::Timeout(self.config.timeout_ms));
                    }
                }
            }
        }
    }
}

/// Map the service's page list into the pipeline's data model.
fn pages_from_result(result: AnalyzeResult) -> Vec<OcrPage> {
    result
        .pages
        .into_iter()
        .map(|page| OcrPage {
            page_number: page.page_number,
            words: page
                .words
                .into_iter()
                .map(|w| OcrWord::new(w.content, w.confidence))
                .collect(),
        })
        .collect()
}

#[async_trait]
impl OcrService for AzureDocumentClient {
    async fn analyze(&self, document: &[u8]) -> OcrResult<Vec<OcrPage>> {
        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);

        info!(
            model = %self.config.model_id,
            bytes = document.len(),
            "Submitting document for analysis"
        );

        let operation_url = self.submit(document).await?;
        let result = self.poll(&operation_url, deadline).await?;
        let pages = pages_from_result(result);

        info!(
            page_count = pages.len(),
            word_count = pages.iter().map(|p| p.words.len()).sum::<usize>(),
            "Document analysis completed"
        );

        Ok(pages)
    }
}
