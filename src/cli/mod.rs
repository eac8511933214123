//! CLI support for zq-parse
//!
//! Provides programmatic access to the `zq-parse` command logic for
//! embedding in other tools.

mod check;
mod glob;
mod render;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use glob::{execute_glob, GlobCommand, GlobResult};
pub use render::{error_envelope, read_source, render_ast, ErrorEnvelope};

use std::io;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    /// Nothing on the command line and stdin is a terminal
    #[error("No input provided. Pass a file or pipe a query to stdin.")]
    NoInput,
}
