//! Pipeline orchestrator.
//!
//! Runs one document through the stages strictly in order:
//!
//! ```text
//! Aggregating -> DetectingLanguage -> SelectingSchema -> Extracting -> RecoveringAndValidating -> Done
//! ```
//!
//! OCR and model calls each carry a deadline. Any upstream failure ends the
//! run with an error; nothing is retried here.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use formscan_llm::{recover_json, AzureOpenAiClient, CompletionService, FormPromptBuilder};
use formscan_ocr::{aggregate, AzureDocumentClient, OcrService};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::{FormscanConfig, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::extraction::ExtractionRequester;
use crate::language::LanguageDetector;
use crate::record::{AnnotatedRecord, StructuredRecord};
use crate::schema::FieldSchema;
use crate::validation::validate;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Aggregating,
    DetectingLanguage,
    SelectingSchema,
    Extracting,
    RecoveringAndValidating,
    Done,
}

impl PipelineStage {
    /// Stage that follows this one. `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            PipelineStage::Aggregating => PipelineStage::DetectingLanguage,
            PipelineStage::DetectingLanguage => PipelineStage::SelectingSchema,
            PipelineStage::SelectingSchema => PipelineStage::Extracting,
            PipelineStage::Extracting => PipelineStage::RecoveringAndValidating,
            PipelineStage::RecoveringAndValidating | PipelineStage::Done => PipelineStage::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Aggregating => "aggregating",
            PipelineStage::DetectingLanguage => "detecting language",
            PipelineStage::SelectingSchema => "selecting schema",
            PipelineStage::Extracting => "extracting",
            PipelineStage::RecoveringAndValidating => "recovering and validating",
            PipelineStage::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Await `fut` within `timeout_ms`, mapping expiry to a stage timeout.
async fn with_deadline<T, F>(stage: PipelineStage, timeout_ms: u64, fut: F) -> PipelineResult<T>
where
    F: Future<Output = PipelineResult<T>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
        Ok(result) => result,
        Err(_) => Err(PipelineError::Timeout { stage, timeout_ms }),
    }
}

/// The extraction-and-validation pipeline.
///
/// Holds no per-run state; one instance can serve concurrent runs.
pub struct FormPipeline {
    ocr: Arc<dyn OcrService>,
    detector: LanguageDetector,
    requester: ExtractionRequester,
    config: PipelineConfig,
}

impl FormPipeline {
    /// Create a pipeline over injected services.
    pub fn new(
        ocr: Arc<dyn OcrService>,
        llm: Arc<dyn CompletionService>,
        config: PipelineConfig,
    ) -> Self {
        let prompt_builder =
            FormPromptBuilder::new().with_detection_sample_chars(config.detection_sample_chars);

        let detector = LanguageDetector::new(
            llm.clone(),
            prompt_builder.clone(),
            config.detection_max_tokens,
            config.temperature,
        );
        let requester = ExtractionRequester::new(
            llm,
            prompt_builder,
            config.extraction_max_tokens,
            config.temperature,
        );

        Self {
            ocr,
            detector,
            requester,
            config,
        }
    }

    /// Create a pipeline backed by the Azure clients described in `config`.
    pub fn from_config(config: &FormscanConfig) -> PipelineResult<Self> {
        let ocr = AzureDocumentClient::new(config.ocr.clone()).map_err(PipelineError::config)?;
        let llm = AzureOpenAiClient::new(config.llm.clone()).map_err(PipelineError::config)?;

        Ok(Self::new(
            Arc::new(ocr),
            Arc::new(llm),
            config.pipeline.clone(),
        ))
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read a document from disk and run it through the pipeline.
    pub async fn extract_file(&self, path: &Path) -> PipelineResult<AnnotatedRecord> {
        let document = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::InputNotFound {
                message: format!("{}: {}", path.display(), e),
            })?;

        self.extract_and_validate(&document).await
    }

    /// Run one document through every stage.
    pub async fn extract_and_validate(&self, document: &[u8]) -> PipelineResult<AnnotatedRecord> {
        if document.is_empty() {
            return Err(PipelineError::InputNotFound {
                message: "document is empty".to_string(),
            });
        }

        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id);
        self.run(document).instrument(span).await
    }

    async fn run(&self, document: &[u8]) -> PipelineResult<AnnotatedRecord> {
        let started = Instant::now();

        let mut stage = PipelineStage::Aggregating;
        debug!(stage = %stage, bytes = document.len(), "Entering stage");
        let pages = with_deadline(stage, self.config.ocr_timeout_ms, async {
            self.ocr
                .analyze(document)
                .await
                .map_err(|source| PipelineError::Ocr { stage, source })
        })
        .await?;
        let aggregated = aggregate(&pages);
        info!(
            page_count = pages.len(),
            word_count = aggregated.word_count(),
            "Extracted OCR text"
        );

        stage = stage.next();
        debug!(stage = %stage, "Entering stage");
        let language = with_deadline(stage, self.config.llm_timeout_ms, async {
            self.detector
                .detect(&aggregated.full_text)
                .await
                .map_err(|source| PipelineError::Llm { stage, source })
        })
        .await?;
        info!(language = %language, "Detected document language");

        stage = stage.next();
        debug!(stage = %stage, "Entering stage");
        let schema = FieldSchema::for_language(language);

        stage = stage.next();
        debug!(stage = %stage, "Entering stage");
        let raw_response = with_deadline(stage, self.config.llm_timeout_ms, async {
            self.requester
                .request(&schema, &aggregated.full_text)
                .await
                .map_err(|source| PipelineError::Llm { stage, source })
        })
        .await?;

        stage = stage.next();
        debug!(stage = %stage, response_len = raw_response.len(), "Entering stage");
        let record = StructuredRecord::from_recovered(&schema, recover_json(&raw_response));
        let validation = validate(&record, &aggregated.confidences, None);

        stage = stage.next();
        info!(
            stage = %stage,
            parsed = !record.is_unparsed(),
            is_complete = validation.is_complete,
            missing = validation.missing_fields.len(),
            accuracy_score = validation.accuracy_score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline run finished"
        );

        Ok(AnnotatedRecord {
            record,
            validation,
            language,
        })
    }
}
