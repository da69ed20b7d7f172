//! Configuration management for formscan.

use std::path::Path;

use formscan_llm::{AzureOpenAiConfig, DEFAULT_DETECTION_SAMPLE_CHARS};
use formscan_ocr::AzureDocumentConfig;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Smallest extraction budget that fits the largest schema.
pub const MIN_EXTRACTION_TOKENS: u32 = 1500;

/// Legacy variable names for the service credentials.
const OCR_URL_VAR: &str = "AZURE_AI_SERVICES_URL";
const OCR_KEY_VAR: &str = "AZURE_AI_SERVICES_KEY";
const LLM_URL_VAR: &str = "AZURE_OPENAI_SERVICES_URL";
const LLM_KEY_VAR: &str = "AZURE_OPENAI_SERVICES_KEY";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormscanConfig {
    #[serde(default)]
    pub ocr: AzureDocumentConfig,
    #[serde(default)]
    pub llm: AzureOpenAiConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub queue: QueueConfig,
}

/// Model-call budgets and stage deadlines.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Token budget for language detection (default: 5)
    #[serde(default = "default_detection_max_tokens")]
    pub detection_max_tokens: u32,

    /// Token budget for structured extraction (default: 1500)
    #[serde(default = "default_extraction_max_tokens")]
    pub extraction_max_tokens: u32,

    /// Sampling temperature for both calls (default: 0.0)
    #[serde(default)]
    pub temperature: f32,

    /// Document characters sent for language detection (default: 2000)
    #[serde(default = "default_detection_sample_chars")]
    pub detection_sample_chars: usize,

    /// Deadline for the OCR stage in milliseconds (default: 180000)
    #[serde(default = "default_ocr_timeout_ms")]
    pub ocr_timeout_ms: u64,

    /// Deadline for each model call in milliseconds (default: 90000)
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_timeout_ms: u64,
}

fn default_detection_max_tokens() -> u32 {
    5
}

fn default_extraction_max_tokens() -> u32 {
    MIN_EXTRACTION_TOKENS
}

fn default_detection_sample_chars() -> usize {
    DEFAULT_DETECTION_SAMPLE_CHARS
}

fn default_ocr_timeout_ms() -> u64 {
    180_000
}

fn default_llm_timeout_ms() -> u64 {
    90_000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection_max_tokens: default_detection_max_tokens(),
            extraction_max_tokens: default_extraction_max_tokens(),
            temperature: 0.0,
            detection_sample_chars: default_detection_sample_chars(),
            ocr_timeout_ms: default_ocr_timeout_ms(),
            llm_timeout_ms: default_llm_timeout_ms(),
        }
    }
}

/// Job queue sizing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Concurrent pipeline runs (default: 2)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Jobs buffered before `submit` waits (default: 32)
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_workers() -> usize {
    2
}

fn default_capacity() -> usize {
    32
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            capacity: default_capacity(),
        }
    }
}

impl FormscanConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{FORMSCAN_ENV}.toml (environment-specific)
    /// 3. Environment variables with FORMSCAN_ prefix (`FORMSCAN_OCR__ENDPOINT`)
    /// 4. AZURE_AI_SERVICES_* and AZURE_OPENAI_SERVICES_* credentials
    pub fn load() -> PipelineResult<Self> {
        let env = std::env::var("FORMSCAN_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false));

        Self::finish(builder)
    }

    /// Load an explicit configuration file, then apply environment overrides.
    pub fn load_from(path: &Path) -> PipelineResult<Self> {
        let builder = config::Config::builder().add_source(config::File::from(path).required(true));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> PipelineResult<Self> {
        let config: FormscanConfig = builder
            .add_source(
                config::Environment::with_prefix("FORMSCAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("ocr.endpoint", std::env::var(OCR_URL_VAR).ok())?
            .set_override_option("ocr.api_key", std::env::var(OCR_KEY_VAR).ok())?
            .set_override_option("llm.endpoint", std::env::var(LLM_URL_VAR).ok())?
            .set_override_option("llm.api_key", std::env::var(LLM_KEY_VAR).ok())?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file without environment overrides.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: FormscanConfig = toml::from_str(&content)
            .map_err(|e| PipelineError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.ocr.endpoint.is_empty() {
            return Err(PipelineError::config(format!(
                "ocr.endpoint is not set (set {} or FORMSCAN_OCR__ENDPOINT)",
                OCR_URL_VAR
            )));
        }

        if self.llm.endpoint.is_empty() {
            return Err(PipelineError::config(format!(
                "llm.endpoint is not set (set {} or FORMSCAN_LLM__ENDPOINT)",
                LLM_URL_VAR
            )));
        }

        if self.pipeline.detection_max_tokens == 0 {
            return Err(PipelineError::config(
                "pipeline.detection_max_tokens must be greater than 0",
            ));
        }

        if self.pipeline.extraction_max_tokens < MIN_EXTRACTION_TOKENS {
            return Err(PipelineError::config(format!(
                "pipeline.extraction_max_tokens must be at least {}",
                MIN_EXTRACTION_TOKENS
            )));
        }

        if self.pipeline.ocr_timeout_ms == 0 || self.pipeline.llm_timeout_ms == 0 {
            return Err(PipelineError::config(
                "pipeline timeouts must be greater than 0",
            ));
        }

        if self.queue.workers == 0 || self.queue.capacity == 0 {
            return Err(PipelineError::config(
                "queue.workers and queue.capacity must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const MINIMAL: &str = r#"
        [ocr]
        endpoint = "https://ocr.example.test"
        api_key = "ocr-key"

        [llm]
        endpoint = "https://llm.example.test"
        api_key = "llm-key"
    "#;

    #[test]
    fn test_defaults() {
        let config = FormscanConfig::default();
        assert_eq!(config.pipeline.detection_max_tokens, 5);
        assert_eq!(config.pipeline.extraction_max_tokens, 1500);
        assert_eq!(config.pipeline.temperature, 0.0);
        assert_eq!(config.queue.workers, 2);
        assert_eq!(config.queue.capacity, 32);
        assert_eq!(config.llm.deployment, "gpt-4o");
    }

    #[test]
    fn test_defaults_fail_validation_without_endpoints() {
        let err = FormscanConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("ocr.endpoint"));
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let file = write_config(MINIMAL);
        let config = FormscanConfig::from_file(file.path()).unwrap();

        assert_eq!(config.ocr.endpoint, "https://ocr.example.test");
        assert_eq!(config.ocr.model_id, "prebuilt-document");
        assert_eq!(config.llm.api_key, "llm-key");
        assert_eq!(config.pipeline.llm_timeout_ms, 90_000);
    }

    #[test]
    fn test_from_file_rejects_small_extraction_budget() {
        let body = format!("{}\n[pipeline]\nextraction_max_tokens = 500\n", MINIMAL);
        let file = write_config(&body);

        let err = FormscanConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("extraction_max_tokens"));
    }

    #[test]
    fn test_from_file_rejects_zero_workers() {
        let body = format!("{}\n[queue]\nworkers = 0\n", MINIMAL);
        let file = write_config(&body);

        assert!(FormscanConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_from_file_missing_path() {
        let err = FormscanConfig::from_file(Path::new("/nonexistent/formscan.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    // Tests that read or write process environment variables hold this lock.
    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

    const ENV_VARS: &[&str] = &[
        "FORMSCAN_OCR__ENDPOINT",
        "FORMSCAN_PIPELINE__LLM_TIMEOUT_MS",
        OCR_URL_VAR,
        OCR_KEY_VAR,
        LLM_URL_VAR,
        LLM_KEY_VAR,
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_reads_explicit_file() {
        let _guard = ENV_LOCK.lock();
        clear_env();

        let file = write_config(MINIMAL);
        let config = FormscanConfig::load_from(file.path()).unwrap();

        assert_eq!(config.pipeline.detection_sample_chars, 2000);
        assert_eq!(config.ocr.endpoint, "https://ocr.example.test");
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        std::env::set_var("FORMSCAN_OCR__ENDPOINT", "https://from-env.example.test");
        std::env::set_var("FORMSCAN_PIPELINE__LLM_TIMEOUT_MS", "2500");

        let file = write_config(MINIMAL);
        let result = FormscanConfig::load_from(file.path());
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ocr.endpoint, "https://from-env.example.test");
        assert_eq!(config.pipeline.llm_timeout_ms, 2500);
        assert_eq!(config.llm.endpoint, "https://llm.example.test");
    }

    #[test]
    fn test_prefixed_env_fills_missing_endpoint() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        std::env::set_var("FORMSCAN_OCR__ENDPOINT", "https://from-env.example.test");

        let file = write_config("[llm]\nendpoint = \"https://llm.example.test\"\n");
        let result = FormscanConfig::load_from(file.path());
        clear_env();

        assert_eq!(result.unwrap().ocr.endpoint, "https://from-env.example.test");
    }

    #[test]
    fn test_azure_credential_variables_override_everything() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        std::env::set_var("FORMSCAN_OCR__ENDPOINT", "https://from-prefixed.example.test");
        std::env::set_var(OCR_URL_VAR, "https://ocr.azure.example.test");
        std::env::set_var(OCR_KEY_VAR, "azure-ocr-key");
        std::env::set_var(LLM_URL_VAR, "https://llm.azure.example.test");
        std::env::set_var(LLM_KEY_VAR, "azure-llm-key");

        let file = write_config(MINIMAL);
        let result = FormscanConfig::load_from(file.path());
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ocr.endpoint, "https://ocr.azure.example.test");
        assert_eq!(config.ocr.api_key, "azure-ocr-key");
        assert_eq!(config.llm.endpoint, "https://llm.azure.example.test");
        assert_eq!(config.llm.api_key, "azure-llm-key");
    }

    #[test]
    fn test_load_from_without_endpoints_names_variables() {
        let _guard = ENV_LOCK.lock();
        clear_env();

        let file = write_config("[pipeline]\ntemperature = 0.0\n");
        let err = FormscanConfig::load_from(file.path()).unwrap_err();

        assert!(err.to_string().contains("FORMSCAN_OCR__ENDPOINT"));
        assert!(err.to_string().contains(OCR_URL_VAR));
    }
}
