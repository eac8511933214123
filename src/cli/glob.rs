//! Translate a glob the way bare search words are translated

use super::CliError;
use crate::glob::{self, GlobOptions};

/// Options for the glob command
#[derive(Debug, Clone, Default)]
pub struct GlobCommand {
    pub pattern: String,
    pub options: GlobOptions,
    /// Subject to match against the compiled pattern
    pub test: Option<String>,
}

/// Result of a glob translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobResult {
    pub regex: String,
    /// Whether the subject matched, when one was given
    pub matched: Option<bool>,
}

pub fn execute_glob(command: &GlobCommand) -> Result<GlobResult, CliError> {
    let regex = glob::glob_to_regex_source(&command.pattern, &command.options);
    let matched = match &command.test {
        Some(subject) => Some(glob::compile(&command.pattern, &command.options)?.is_match(subject)),
        None => None,
    };
    Ok(GlobResult { regex, matched })
}
