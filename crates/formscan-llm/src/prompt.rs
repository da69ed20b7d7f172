//! Prompt templates for the extraction pipeline.
//!
//! Both prompts are plain single-message text; the output is identical for
//! identical inputs.

/// Default number of characters of document text sent for language detection.
pub const DEFAULT_DETECTION_SAMPLE_CHARS: usize = 2000;

/// Builder for language-detection and field-extraction prompts.
#[derive(Debug, Clone)]
pub struct FormPromptBuilder {
    /// Maximum document characters included in the detection prompt.
    detection_sample_chars: usize,
}

impl Default for FormPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormPromptBuilder {
    /// Create a new prompt builder with default settings.
    pub fn new() -> Self {
        Self {
            detection_sample_chars: DEFAULT_DETECTION_SAMPLE_CHARS,
        }
    }

    /// Set the maximum document characters used for detection.
    pub fn with_detection_sample_chars(mut self, chars: usize) -> Self {
        self.detection_sample_chars = chars;
        self
    }

    /// Build the language-detection prompt.
    ///
    /// The model is asked to answer with the bare language name only.
    pub fn build_detection_prompt(&self, text: &str) -> String {
        format!(
            "Detect the language of the following text. \
             Respond with only the language name, either Hebrew or English.\n\n\
             Text:\n{}",
            self.truncate_sample(text)
        )
    }

    /// Build the extraction prompt for a rendered empty schema.
    ///
    /// `schema_json` is embedded verbatim as the shape to fill; the full
    /// document text follows it.
    pub fn build_extraction_prompt(&self, schema_json: &str, text: &str) -> String {
        format!(
            r#"You are extracting fields from an OCR scan of a National Insurance Institute work-injury form.
Fill in the JSON template below using only information found in the document text.
Keep every key exactly as written and keep the nesting unchanged.
Use an empty string for any field that does not appear in the document.
Respond with only valid JSON matching this format:

{}

Document text:
{}"#,
            schema_json, text
        )
    }

    /// Cut text to the detection sample size on a char boundary.
    fn truncate_sample<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.detection_sample_chars) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}
