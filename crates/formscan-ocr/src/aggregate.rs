//! Text aggregation over OCR pages.

use serde::{Deserialize, Serialize};

use crate::types::OcrPage;

/// Flattened OCR output for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedDocument {
    /// Word texts joined by single spaces, page order then word order
    pub full_text: String,
    /// Word confidences in the same order as `full_text`
    pub confidences: Vec<f64>,
}

impl AggregatedDocument {
    /// Number of words aggregated.
    pub fn word_count(&self) -> usize {
        self.confidences.len()
    }

    /// True when OCR produced no words at all.
    pub fn is_empty(&self) -> bool {
        self.confidences.is_empty()
    }
}

/// Concatenate every word across all pages.
///
/// No normalization, case folding or deduplication is applied.
pub fn aggregate(pages: &[OcrPage]) -> AggregatedDocument {
    let word_count = pages.iter().map(|p| p.words.len()).sum();
    let mut texts: Vec<&str> = Vec::with_capacity(word_count);
    let mut confidences = Vec::with_capacity(word_count);

    for word in pages.iter().flat_map(|p| p.words.iter()) {
        texts.push(&word.text);
        confidences.push(word.confidence);
    }

    AggregatedDocument {
        full_text: texts.join(" "),
        confidences,
    }
}
