//! Formscan Core - Extraction and Validation Pipeline
//!
//! Turns a scanned National Insurance work-injury form into a structured,
//! schema-shaped record annotated with completeness and OCR confidence.
//!
//! # Architecture
//!
//! ```text
//! +-----------+    +-----------+    +-----------+    +-----------+    +-----------+
//! | Document  | -> |    OCR    | -> | Language  | -> |  Schema   | -> | Extraction|
//! |   bytes   |    | aggregate |    | detection |    | selection |    |  request  |
//! +-----------+    +-----------+    +-----------+    +-----------+    +-----------+
//!                        |                                                 |
//!                        | confidences                                     v
//!                        |                                          +-------------+
//!                        +----------------------------------------> |  Recover +  |
//!                                                                   |  validate   |
//!                                                                   +-------------+
//!                                                                          |
//!                                                                          v
//!                                                                  AnnotatedRecord
//! ```
//!
//! # Modules
//!
//! - [`pipeline`]: the orchestrator and its stages
//! - [`language`]: language detection via a short completion
//! - [`schema`]: typed English and Hebrew records and the shared field tree
//! - [`extraction`]: the structured-extraction request
//! - [`record`]: structured records and the annotated output
//! - [`validation`]: completeness and accuracy scoring
//! - [`queue`]: background job queue over a worker pool
//! - [`config`]: layered configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use formscan_core::{FormPipeline, FormscanConfig};
//!
//! let config = FormscanConfig::load()?;
//! let pipeline = FormPipeline::from_config(&config)?;
//! let annotated = pipeline.extract_file(Path::new("283_ex1.pdf")).await?;
//! println!("{}", serde_json::to_string_pretty(&annotated)?);
//! ```

pub mod config;
pub mod error;
pub mod extraction;
pub mod language;
pub mod pipeline;
pub mod queue;
pub mod record;
pub mod schema;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod stubs;

pub use config::{FormscanConfig, PipelineConfig, QueueConfig, MIN_EXTRACTION_TOKENS};
pub use error::{ErrorKind, PipelineError, PipelineResult};
pub use extraction::ExtractionRequester;
pub use language::{Language, LanguageDetector};
pub use pipeline::{FormPipeline, PipelineStage};
pub use queue::{JobHandle, JobQueue, JobStatus};
pub use record::{AnnotatedRecord, StructuredRecord};
pub use schema::{EnglishRecord, FieldNode, FieldSchema, FieldTree, HebrewRecord, Text};
pub use validation::{accuracy_score, validate, ValidationResult};
