//! Syntax-check a query without printing its AST

use super::CliError;
use crate::parser::{parse, ParseOptions};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to check
    pub query: String,
    /// Rule to start from; the whole-program rule when `None`
    pub start_rule: Option<String>,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// The query parsed completely
    SyntaxValid,
}

/// Parse the query and report whether it is valid
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let parse_options = ParseOptions {
        start_rule: options.start_rule.clone(),
    };
    parse(&options.query, &parse_options)?;
    Ok(CheckResult::SyntaxValid)
}
