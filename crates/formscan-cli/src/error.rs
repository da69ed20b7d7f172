//! Exit codes for the formscan binary.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | OCR or language-model service failed or timed out |
//! | 2 | Input document missing, unreadable or empty |
//! | 3 | Invalid or incomplete configuration |

use formscan_core::{ErrorKind, PipelineError};

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CliExitCode {
    Success = 0,
    UpstreamFailure = 1,
    InputNotFound = 2,
    Configuration = 3,
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

/// Map a pipeline error to the exit code reported for it.
pub fn exit_code_for_error(err: &PipelineError) -> CliExitCode {
    match err.kind() {
        ErrorKind::InputNotFound => CliExitCode::InputNotFound,
        ErrorKind::Configuration => CliExitCode::Configuration,
        ErrorKind::UpstreamService | ErrorKind::QueueClosed => CliExitCode::UpstreamFailure,
    }
}

/// Exit code for an error raised at the binary edge.
///
/// Errors that did not come from the pipeline (stdout, serialization) count
/// as general failures.
pub fn exit_code_for_anyhow(err: &anyhow::Error) -> CliExitCode {
    err.downcast_ref::<PipelineError>()
        .map(exit_code_for_error)
        .unwrap_or(CliExitCode::UpstreamFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formscan_core::PipelineStage;

    #[test]
    fn test_codes_by_kind() {
        let missing = PipelineError::InputNotFound {
            message: "283_ex1.pdf".to_string(),
        };
        let timeout = PipelineError::Timeout {
            stage: PipelineStage::Aggregating,
            timeout_ms: 100,
        };
        let config = PipelineError::config("llm.endpoint is not set");

        assert_eq!(exit_code_for_error(&missing), CliExitCode::InputNotFound);
        assert_eq!(exit_code_for_error(&timeout), CliExitCode::UpstreamFailure);
        assert_eq!(exit_code_for_error(&config), CliExitCode::Configuration);
        assert_eq!(exit_code_for_error(&PipelineError::QueueClosed), CliExitCode::UpstreamFailure);
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(i32::from(CliExitCode::Success), 0);
        assert_eq!(i32::from(CliExitCode::UpstreamFailure), 1);
        assert_eq!(i32::from(CliExitCode::InputNotFound), 2);
        assert_eq!(i32::from(CliExitCode::Configuration), 3);
    }

    #[test]
    fn test_anyhow_downcasts_pipeline_errors() {
        let wrapped = anyhow::Error::new(PipelineError::InputNotFound {
            message: "gone".to_string(),
        });
        assert_eq!(exit_code_for_anyhow(&wrapped), CliExitCode::InputNotFound);

        let other = anyhow::anyhow!("stdout closed");
        assert_eq!(exit_code_for_anyhow(&other), CliExitCode::UpstreamFailure);
    }
}
