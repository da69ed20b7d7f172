//! Structured-extraction request.

use std::sync::Arc;

use formscan_llm::{CompletionRequest, CompletionService, FormPromptBuilder, LlmResult};
use tracing::debug;

use crate::schema::FieldSchema;

/// Issues the single extraction call for a selected schema.
pub struct ExtractionRequester {
    llm: Arc<dyn CompletionService>,
    prompt_builder: FormPromptBuilder,
    max_output_tokens: u32,
    temperature: f32,
}

impl ExtractionRequester {
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

    /// Build the request for a schema and document text.
    pub fn build_request(&self, schema: &FieldSchema, text: &str) -> CompletionRequest {
        let prompt = self.prompt_builder.build_extraction_prompt(schema.render(), text);
        CompletionRequest::new(prompt, self.max_output_tokens, self.temperature)
    }

    /// Ask the model to fill the schema. Returns the raw, unparsed answer.
    pub async fn request(&self, schema: &FieldSchema, text: &str) -> LlmResult<String> {
        let request = self.build_request(schema, text);

        debug!(
            language = %schema.language(),
            prompt_len = request.prompt.len(),
            max_tokens = request.max_output_tokens,
            "Requesting structured extraction"
        );

        self.llm.complete(&request).await
    }
}
