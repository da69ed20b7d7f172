//! Structured records and the annotated pipeline output.

use formscan_llm::{InvalidResponse, RecoveredResponse};
use serde::Serialize;

use crate::language::Language;
use crate::schema::{EnglishRecord, FieldNode, FieldSchema, FieldTree, HebrewRecord};
use crate::validation::ValidationResult;

/// Extraction result for one document.
///
/// Serializes as the bare record object; the sentinel serializes as
/// `{"error": "Invalid JSON", "raw_response": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StructuredRecord {
    English(EnglishRecord),
    Hebrew(HebrewRecord),
    /// No JSON object could be recovered from the model response.
    Unparsed(InvalidResponse),
}

impl StructuredRecord {
    /// Build the record for `schema` from a recovered response.
    pub fn from_recovered(schema: &FieldSchema, recovered: RecoveredResponse) -> Self {
        match recovered {
            RecoveredResponse::Invalid(invalid) => StructuredRecord::Unparsed(invalid),
            RecoveredResponse::Object(map) => match schema {
                FieldSchema::English(_) => StructuredRecord::English(EnglishRecord::from_object(&map)),
                FieldSchema::Hebrew(_) => StructuredRecord::Hebrew(HebrewRecord::from_object(&map)),
            },
        }
    }

    /// True for the sentinel variant.
    pub fn is_unparsed(&self) -> bool {
        matches!(self, StructuredRecord::Unparsed(_))
    }

    /// Language of a parsed record.
    pub fn language(&self) -> Option<Language> {
        match self {
            StructuredRecord::English(_) => Some(Language::English),
            StructuredRecord::Hebrew(_) => Some(Language::Hebrew),
            StructuredRecord::Unparsed(_) => None,
        }
    }
}

impl FieldTree for StructuredRecord {
    fn top_level_fields(&self) -> Vec<(&str, FieldNode)> {
        match self {
            StructuredRecord::English(record) => record.top_level_fields(),
            StructuredRecord::Hebrew(record) => record.top_level_fields(),
            // The sentinel's own keys are always reported missing.
            StructuredRecord::Unparsed(_) => vec![
                ("error", FieldNode::Leaf { filled: false }),
                ("raw_response", FieldNode::Leaf { filled: false }),
            ],
        }
    }
}

/// Final pipeline output: the record plus its validation under `validation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: StructuredRecord,
    pub validation: ValidationResult,
    /// Language detected for the document.
    #[serde(skip)]
    pub language: Language,
}

impl AnnotatedRecord {
    /// True when extraction produced the sentinel.
    pub fn extraction_failed(&self) -> bool {
        self.record.is_unparsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn test_sentinel_is_always_incomplete() {
        let record = StructuredRecord::Unparsed(InvalidResponse::new("no json here at all"));
        let result = validate(&record, &[0.9], None);

        assert!(!result.is_complete);
        assert_eq!(result.missing_fields, vec!["error", "raw_response"]);
        assert_eq!(result.accuracy_score, 0.9);
    }

    #[test]
    fn test_from_recovered_selects_variant_by_schema() {
        let map = json!({"שם פרטי": "דנה"}).as_object().cloned().unwrap();
        let schema = FieldSchema::for_language(Language::Hebrew);

        let record = StructuredRecord::from_recovered(&schema, RecoveredResponse::Object(map));

        match &record {
            StructuredRecord::Hebrew(hebrew) => assert_eq!(hebrew.first_name.as_str(), "דנה"),
            other => panic!("expected Hebrew record, got {:?}", other),
        }
        assert_eq!(record.language(), Some(Language::Hebrew));
    }

    #[test]
    fn test_falsy_model_values_are_missing() {
        let map = json!({"lastName": "Doe", "firstName": false, "idNumber": 0})
            .as_object()
            .cloned()
            .unwrap();
        let schema = FieldSchema::for_language(Language::English);

        let raw = validate(&map, &[], None);
        assert_eq!(raw.missing_fields, vec!["firstName", "idNumber"]);

        let record = StructuredRecord::from_recovered(&schema, RecoveredResponse::Object(map));
        let result = validate(&record, &[], None);

        let expected: Vec<&str> = EnglishRecord::FIELD_NAMES
            .iter()
            .copied()
            .filter(|name| *name != "lastName")
            .collect();
        assert_eq!(result.missing_fields, expected);
    }

    #[test]
    fn test_annotated_record_flattens_with_reserved_key() {
        let record = StructuredRecord::Unparsed(InvalidResponse::new("oops"));
        let validation = validate(&record, &[], None);
        let annotated = AnnotatedRecord {
            record,
            validation,
            language: Language::English,
        };

        let value = serde_json::to_value(&annotated).unwrap();
        assert_eq!(
            value,
            json!({
                "error": "Invalid JSON",
                "raw_response": "oops",
                "validation": {
                    "is_complete": false,
                    "missing_fields": ["error", "raw_response"],
                    "accuracy_score": 0.0
                }
            })
        );
        assert!(annotated.extraction_failed());
    }

    #[test]
    fn test_annotated_english_record_keeps_schema_keys_first() {
        let record = StructuredRecord::English(EnglishRecord::default());
        let validation = validate(&record, &[], None);
        let annotated = AnnotatedRecord {
            record,
            validation,
            language: Language::English,
        };

        let value = serde_json::to_value(&annotated).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(&keys[..keys.len() - 1], EnglishRecord::FIELD_NAMES);
        assert_eq!(keys.last(), Some(&"validation"));
    }
}
