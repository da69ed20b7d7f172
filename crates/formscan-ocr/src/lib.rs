//! Formscan OCR - Recognized Text Input for the Extraction Pipeline
//!
//! This crate owns everything the pipeline knows about OCR:
//! - [`OcrWord`] / [`OcrPage`]: per-page, per-word recognized text with confidence
//! - [`OcrService`]: the async seam the pipeline consumes
//! - [`AzureDocumentClient`]: REST client for Azure Document Intelligence
//! - [`aggregate`]: flattening pages into one token stream plus a confidence series
//!
//! # Architecture
//!
//! ```text
//! +-------------+    +----------------+    +----------------+
//! |  Document   | -> |  OcrService    | -> |   aggregate()  |
//! |   bytes     |    | (Azure / test) |    |                |
//! +-------------+    +----------------+    +----------------+
//!                           |                      |
//!                           v                      v
//!                    +-------------+      +--------------------+
//!                    | Vec<OcrPage>|      | AggregatedDocument |
//!                    +-------------+      +--------------------+
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use formscan_ocr::{aggregate, AzureDocumentClient, AzureDocumentConfig, OcrService};
//!
//! let client = AzureDocumentClient::new(AzureDocumentConfig::default())?;
//! let pages = client.analyze(&bytes).await?;
//! let document = aggregate(&pages);
//! ```

pub mod aggregate;
pub mod azure;
pub mod types;

pub use aggregate::{aggregate, AggregatedDocument};
pub use azure::{AzureDocumentClient, AzureDocumentConfig};
pub use types::{OcrPage, OcrService, OcrWord};

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// OCR service errors.
///
/// Every variant is an upstream failure from the pipeline's point of view.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR service returned status {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("OCR analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("OCR service response missing {0}")]
    MalformedResponse(String),

    #[error("OCR analysis did not finish within {0} ms")]
    Timeout(u64),

    #[error("OCR client configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for OCR operations
pub type OcrResult<T> = Result<T, OcrError>;
