//! Parse errors.
//!
//! Backtracking inside the grammar never produces an [`Error`]; a rule that
//! does not match simply returns `None`. An [`Error`] only escapes
//! [`crate::parse`] when the whole input cannot be consumed, when a semantic
//! action rejects what it matched, or when the caller names a start rule the
//! parser does not know.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    /// A flag given twice to an operator that only accepts it once.
    #[error("Duplicate argument -{name}")]
    DuplicateArgument { name: String, location: Location },

    #[error("unknown start rule: {0}")]
    UnknownStartRule(String),
}

impl Error {
    /// Source span the error refers to, if any.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::Syntax(e) => Some(&e.location),
            Error::DuplicateArgument { location, .. } => Some(location),
            Error::UnknownStartRule(_) => None,
        }
    }
}

/// A point in the source: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

/// What the parser would have accepted at the furthest position it reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expectation {
    Literal { text: String, ignore_case: bool },
    /// A character class, rendered as `[...]`.
    Class { description: String },
    Any,
    End,
    /// A named rule such as `whitespace`.
    Other { description: String },
}

impl Expectation {
    pub fn describe(&self) -> String {
        match self {
            Expectation::Literal { text, .. } => format!("\"{}\"", escape_literal(text)),
            Expectation::Class { description } => description.clone(),
            Expectation::Any => "any character".to_string(),
            Expectation::End => "end of input".to_string(),
            Expectation::Other { description } => description.clone(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// The terminal syntax error: the input could not be parsed to the end.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub expected: Vec<Expectation>,
    /// The offending character, or `None` at end of input.
    pub found: Option<String>,
    pub location: Location,
}

impl SyntaxError {
    pub fn new(expected: Vec<Expectation>, found: Option<String>, location: Location) -> Self {
        let message = build_message(&expected, found.as_deref());
        SyntaxError {
            message,
            expected,
            found,
            location,
        }
    }
}

/// Builds `Expected <X> but <Y> found.`
pub fn build_message(expected: &[Expectation], found: Option<&str>) -> String {
    format!(
        "Expected {} but {} found.",
        describe_expected(expected),
        describe_found(found)
    )
}

fn describe_expected(expected: &[Expectation]) -> String {
    let mut descriptions: Vec<String> = expected.iter().map(Expectation::describe).collect();
    descriptions.sort();
    descriptions.dedup();

    match descriptions.as_slice() {
        [] => "nothing".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}

fn describe_found(found: Option<&str>) -> String {
    match found {
        Some(text) => format!("\"{}\"", escape_literal(text)),
        None => "end of input".to_string(),
    }
}

fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> Expectation {
        Expectation::Literal {
            text: text.to_string(),
            ignore_case: false,
        }
    }

    #[test]
    fn test_message_joins_sorted_unique() {
        let expected = vec![
            Expectation::End,
            lit("|"),
            Expectation::Other {
                description: "whitespace".into(),
            },
            lit("|"),
        ];
        assert_eq!(
            build_message(&expected, Some("$")),
            "Expected \"|\", end of input, or whitespace but \"$\" found."
        );
    }

    #[test]
    fn test_message_two_and_eof() {
        let expected = vec![lit("b"), lit("a")];
        assert_eq!(
            build_message(&expected, None),
            "Expected \"a\" or \"b\" but end of input found."
        );
    }

    #[test]
    fn test_escapes_found_newline() {
        assert_eq!(
            build_message(&[Expectation::Any], Some("\n")),
            "Expected any character but \"\\n\" found."
        );
    }
}
