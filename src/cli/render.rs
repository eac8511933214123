//! AST rendering for the `parse` command

use super::CliError;
use crate::error::{Error, Expectation, Location};
use crate::parser::{parse, ParseOptions};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// What `parse` prints when the query does not parse.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'e> {
    pub op: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<&'e [Expectation]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<Option<&'e str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'e Location>,
}

pub fn error_envelope(error: &Error) -> ErrorEnvelope<'_> {
    let syntax = match error {
        Error::Syntax(syntax) => Some(syntax),
        _ => None,
    };
    ErrorEnvelope {
        op: "Error",
        error: error.to_string(),
        expected: syntax.map(|s| s.expected.as_slice()),
        found: syntax.map(|s| s.found.as_deref()),
        location: error.location(),
    }
}

/// Parses `source` and renders the AST as JSON.
///
/// A parse failure is not a CLI failure: it renders as an `Error` object so
/// that the caller always gets one JSON document back.
pub fn render_ast(source: &str, options: &ParseOptions, pretty: bool) -> Result<String, CliError> {
    let rendered = match parse(source, options) {
        Ok(node) if pretty => serde_json::to_string_pretty(&node)?,
        Ok(node) => serde_json::to_string(&node)?,
        Err(e) => {
            log::debug!("rendering parse failure: {}", e);
            let envelope = error_envelope(&e);
            if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            }
        }
    };
    Ok(rendered)
}

/// Reads the query from `file`, or from stdin when it is not a terminal.
pub fn read_source(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}
