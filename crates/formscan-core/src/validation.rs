//! Completeness and OCR-confidence scoring.
//!
//! Completeness and accuracy are independent: accuracy is computed from OCR
//! confidences whether or not extraction succeeded.

use serde::{Deserialize, Serialize};

use crate::schema::FieldTree;

/// Verdict attached to every pipeline result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no required field is missing.
    pub is_complete: bool,
    /// Missing field names, in schema order.
    pub missing_fields: Vec<String>,
    /// Mean OCR confidence rounded to 2 decimals; 0 without words.
    pub accuracy_score: f64,
}

/// Mean of the confidences rounded to 2 decimals, or 0 when empty.
///
/// Exact ties round half to even, so a mean of `0.125` scores `0.12`.
pub fn accuracy_score(confidences: &[f64]) -> f64 {
    if confidences.is_empty() {
        return 0.0;
    }
    let mean = confidences.iter().sum::<f64>() / confidences.len() as f64;
    (mean * 100.0).round_ties_even() / 100.0
}

/// Validate a record against its required fields.
///
/// With `required = None` every top-level field of the record is required.
/// A composite field is missing when any of its leaves is empty; a required
/// name absent from the record is missing.
pub fn validate<T>(record: &T, confidences: &[f64], required: Option<&[&str]>) -> ValidationResult
where
    T: FieldTree + ?Sized,
{
    let fields = record.top_level_fields();

    let missing_fields: Vec<String> = match required {
        None => fields
            .iter()
            .filter(|(_, node)| node.has_empty_leaf())
            .map(|(name, _)| name.to_string())
            .collect(),
        Some(names) => names
            .iter()
            .filter(|name| {
                fields
                    .iter()
                    .find(|(field, _)| field == *name)
                    .map_or(true, |(_, node)| node.has_empty_leaf())
            })
            .map(|name| name.to_string())
            .collect(),
    };

    ValidationResult {
        is_complete: missing_fields.is_empty(),
        missing_fields,
        accuracy_score: accuracy_score(confidences),
    }
}
