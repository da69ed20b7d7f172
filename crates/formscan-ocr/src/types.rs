//! OCR Types
//!
//! The shape the OCR collaborator hands back: ordered pages, each holding
//! words in reading order with the engine's confidence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::OcrResult;

/// One recognized word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    /// Recognized text
    pub text: String,
    /// Engine certainty in [0, 1]
    pub confidence: f64,
}

impl OcrWord {
    /// Create a new word
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// One page of recognized words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Words in reading order
    pub words: Vec<OcrWord>,
}

impl OcrPage {
    /// Create a new page
    pub fn new(page_number: u32, words: Vec<OcrWord>) -> Self {
        Self { page_number, words }
    }
}

/// An OCR engine that turns document bytes into recognized pages.
///
/// Implementations must surface every failure (unreachable service, error
/// status, timeout) as an error rather than returning an empty result.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Analyze a document and return its pages in document order.
    async fn analyze(&self, document: &[u8]) -> OcrResult<Vec<OcrPage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_serialization_shape() {
        let page = OcrPage::new(1, vec![OcrWord::new("John", 0.9)]);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["page_number"], 1);
        assert_eq!(json["words"][0]["text"], "John");
        assert_eq!(json["words"][0]["confidence"], 0.9);
    }
}
