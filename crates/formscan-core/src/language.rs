//! Language detection over aggregated OCR text.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use formscan_llm::{CompletionRequest, CompletionService, FormPromptBuilder, LlmResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Languages a form can be extracted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Hebrew,
    #[default]
    English,
}

impl Language {
    /// Literal name the model is asked to answer with.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Hebrew => "Hebrew",
            Language::English => "English",
        }
    }

    /// Map a raw model answer onto a supported language.
    ///
    /// Only surrounding whitespace is removed. Anything other than the exact,
    /// case-sensitive names `Hebrew` or `English` resolves to English.
    pub fn from_model_answer(answer: &str) -> Self {
        match answer.trim() {
            "Hebrew" => Language::Hebrew,
            _ => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse for user input (CLI, config).
impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hebrew" | "he" => Ok(Language::Hebrew),
            "english" | "en" => Ok(Language::English),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Classifies document text with a single low-budget completion.
pub struct LanguageDetector {
    llm: Arc<dyn CompletionService>,
    prompt_builder: FormPromptBuilder,
    max_output_tokens: u32,
    temperature: f32,
}

impl LanguageDetector {
    /// Create a detector with the given token budget and temperature.
    pub fn new(
        llm: Arc<dyn CompletionService>,
        prompt_builder: FormPromptBuilder,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            llm,
            prompt_builder,
            max_output_tokens,
            temperature,
        }
    }

    /// Detect the document language.
    ///
    /// Issues exactly one completion request. Service failures propagate.
    pub async fn detect(&self, text: &str) -> LlmResult<Language> {
        let prompt = self.prompt_builder.build_detection_prompt(text);
        let request = CompletionRequest::new(prompt, self.max_output_tokens, self.temperature);

        let answer = self.llm.complete(&request).await?;
        let language = Language::from_model_answer(&answer);

        if language.as_str() != answer.trim() {
            warn!(answer = %answer, "Unrecognized language answer, defaulting to English");
        } else {
            debug!(language = %language, "Detected document language");
        }

        Ok(language)
    }
}
