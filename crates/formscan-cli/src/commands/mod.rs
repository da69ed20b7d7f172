//! Command handlers.
//!
//! Each handler returns the process exit code.

pub mod batch;
pub mod extract;
pub mod schema;

use std::path::Path;

use formscan_core::{FormscanConfig, PipelineResult};

/// Load configuration from an explicit file, or from the default locations.
pub fn load_config(path: Option<&Path>) -> PipelineResult<FormscanConfig> {
    match path {
        Some(path) => FormscanConfig::load_from(path),
        None => FormscanConfig::load(),
    }
}
