//! Batch command: several documents through the job queue.
//!
//! Files are read and submitted up front; results are printed as JSON lines
//! in argument order once each job finishes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use formscan_core::{
    AnnotatedRecord, FormPipeline, JobQueue, PipelineError, PipelineResult,
};
use serde_json::{json, Value};
use tracing::{error, info};

use super::load_config;
use crate::error::{exit_code_for_error, CliExitCode};

/// Arguments for the batch command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Scanned forms (PDF or image)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Concurrent pipeline runs (overrides queue.workers)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,
}

/// Execute the batch command.
///
/// Exits with the code of the first failed file, or 0 when all succeed.
pub async fn handle_batch(args: BatchArgs, config_path: Option<&Path>) -> CliExitCode {
    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return exit_code_for_error(&e);
        }
    };
    if let Some(workers) = args.workers {
        config.queue.workers = usize::from(workers);
    }

    let pipeline = match FormPipeline::from_config(&config) {
        Ok(pipeline) => Arc::new(pipeline),
        Err(e) => {
            error!("{}", e);
            return exit_code_for_error(&e);
        }
    };

    let queue = JobQueue::start(pipeline, &config.queue);
    info!(files = args.files.len(), "Submitting batch");

    let mut submitted = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let handle = match tokio::fs::read(file).await {
            Ok(document) => queue.submit(document).await,
            Err(e) => Err(PipelineError::InputNotFound {
                message: format!("{}: {}", file.display(), e),
            }),
        };
        submitted.push((file, handle));
    }

    let mut exit_code = CliExitCode::Success;
    for (file, handle) in submitted {
        let outcome = match handle {
            Ok(handle) => handle.wait().await,
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            error!(file = %file.display(), "{}", e);
            if exit_code == CliExitCode::Success {
                exit_code = exit_code_for_error(e);
            }
        }
        println!("{}", batch_line(file, &outcome));
    }

    queue.shutdown().await;
    exit_code
}

/// JSON line reported for one file.
pub fn batch_line(file: &Path, outcome: &PipelineResult<AnnotatedRecord>) -> Value {
    match outcome {
        Ok(annotated) => json!({
            "file": file.display().to_string(),
            "result": annotated,
        }),
        Err(e) => json!({
            "file": file.display().to_string(),
            "error": e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formscan_core::{validate, HebrewRecord, Language, StructuredRecord};

    #[test]
    fn test_batch_line_for_success() {
        let record = StructuredRecord::Hebrew(HebrewRecord::default());
        let validation = validate(&record, &[1.0], None);
        let outcome = Ok(AnnotatedRecord {
            record,
            validation,
            language: Language::Hebrew,
        });

        let line = batch_line(Path::new("scans/283_ex2.pdf"), &outcome);

        assert_eq!(line["file"], "scans/283_ex2.pdf");
        assert_eq!(line["result"]["validation"]["accuracy_score"], 1.0);
        assert_eq!(line["result"]["שם משפחה"], "");
        assert!(line.get("error").is_none());
    }

    #[test]
    fn test_batch_line_for_failure() {
        let outcome = Err(PipelineError::InputNotFound {
            message: "scans/missing.pdf: No such file or directory".to_string(),
        });

        let line = batch_line(Path::new("scans/missing.pdf"), &outcome);

        assert_eq!(line["file"], "scans/missing.pdf");
        assert_eq!(
            line["error"],
            "Input not found: scans/missing.pdf: No such file or directory"
        );
        assert!(line.get("result").is_none());
    }
}
