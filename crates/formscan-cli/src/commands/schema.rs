//! Schema command: print the empty record template.

use clap::Args;
use formscan_core::{FieldSchema, Language};

use crate::error::CliExitCode;

/// Arguments for the schema command.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Template language (english, hebrew)
    pub language: Language,
}

pub fn handle_schema(args: SchemaArgs) -> CliExitCode {
    println!("{}", FieldSchema::for_language(args.language).render());
    CliExitCode::Success
}
