//! Extract command: one document through the pipeline.
//!
//! # Usage
//!
//! ```bash
//! formscan extract 283_ex1.pdf
//! formscan -v --config formscan.toml extract 283_ex1.pdf --compact
//! ```

use std::path::{Path, PathBuf};

use clap::Args;
use formscan_core::{AnnotatedRecord, FormPipeline};
use tracing::{error, info};

use super::load_config;
use crate::error::{exit_code_for_anyhow, exit_code_for_error, CliExitCode};

/// Arguments for the extract command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Scanned form (PDF or image)
    pub file: PathBuf,

    /// Print the record on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Execute the extract command.
pub async fn handle_extract(args: ExtractArgs, config_path: Option<&Path>) -> CliExitCode {
    let pipeline = match load_config(config_path).and_then(|c| FormPipeline::from_config(&c)) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{}", e);
            return exit_code_for_error(&e);
        }
    };

    match run(&pipeline, &args).await {
        Ok(()) => CliExitCode::Success,
        Err(e) => {
            error!("{:#}", e);
            exit_code_for_anyhow(&e)
        }
    }
}

async fn run(pipeline: &FormPipeline, args: &ExtractArgs) -> anyhow::Result<()> {
    info!(file = %args.file.display(), "Extracting form");

    let annotated = pipeline.extract_file(&args.file).await?;

    println!("{}", render(&annotated, args.compact)?);
    eprintln!("{}", summary(&annotated));
    Ok(())
}

/// Serialize the annotated record for stdout.
pub fn render(annotated: &AnnotatedRecord, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(annotated)
    } else {
        serde_json::to_string_pretty(annotated)
    }
}

/// One-line human summary of a run.
pub fn summary(annotated: &AnnotatedRecord) -> String {
    let validation = &annotated.validation;
    let completeness = if annotated.extraction_failed() {
        "model output was not valid JSON".to_string()
    } else if validation.is_complete {
        "complete".to_string()
    } else {
        format!("{} fields missing", validation.missing_fields.len())
    };

    format!(
        "language: {} | {} | OCR accuracy: {:.2}",
        annotated.language, completeness, validation.accuracy_score
    )
}
