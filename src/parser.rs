//! Query parser.
//!
//! A PEG without memoization: every grammar rule is a method on the parser
//! state returning `Option<T>`, alternatives are tried in order, and the furthest
//! failure position plus what was expected there becomes the error message
//! when nothing consumes the whole input.
//!
//! ```
//! use zq_parse::{parse_query, Proc};
//!
//! let seq = parse_query("count() by id | head 5").unwrap();
//! assert!(matches!(seq.procs[1], Proc::Head { count: 5 }));
//! ```

mod expressions;
mod lexical;
mod literals;
mod memo;
mod operators;
mod program;
mod search;
mod sql;
mod state;
mod types;

pub use literals::unicode_units;

use crate::ast::{Expr, Node, Sequential, Type};
use crate::error::{Error, Result};
use state::ParserState;

/// Start rule used when [`ParseOptions::start_rule`] is `None`.
pub const DEFAULT_START_RULE: &str = "start";

type StartRule = fn(&str) -> Result<Node>;

/// Rules a parse may begin from, by name.
static START_RULES: &[(&str, StartRule)] = &[
    (DEFAULT_START_RULE, |source| program(source).map(Node::Program)),
    ("Expr", |source| expression(source).map(Node::Expr)),
    ("Type", |source| type_only(source).map(Node::Type)),
];

fn program(source: &str) -> Result<Sequential> {
    let mut state = ParserState::new(source);
    let result = state.start();
    state.finish(result)
}

fn expression(source: &str) -> Result<Expr> {
    let mut state = ParserState::new(source);
    let result = state.attempt(|p| {
        p.ws();
        let expr = p.expr()?;
        p.ws();
        Some(expr)
    });
    state.finish(result)
}

fn type_only(source: &str) -> Result<Type> {
    let mut state = ParserState::new(source);
    let result = state.attempt(|p| {
        p.ws();
        let typ = p.type_()?;
        p.ws();
        Some(typ)
    });
    state.finish(result)
}

/// Options for [`parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name of the rule to start from: `start`, `Expr` or `Type`.
    pub start_rule: Option<String>,
}

impl ParseOptions {
    pub fn with_start_rule(name: impl Into<String>) -> Self {
        ParseOptions {
            start_rule: Some(name.into()),
        }
    }
}

/// Parses `source` from the configured start rule.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node> {
    let name = options.start_rule.as_deref().unwrap_or(DEFAULT_START_RULE);
    log::debug!("parsing {} bytes from rule {}", source.len(), name);

    let rule = START_RULES
        .iter()
        .find(|(rule_name, _)| *rule_name == name)
        .map(|(_, rule)| *rule)
        .ok_or_else(|| Error::UnknownStartRule(name.to_string()))?;
    log::trace!("resolved start rule {}", name);
    rule(source)
}

/// Parses a whole query program.
pub fn parse_query(source: &str) -> Result<Sequential> {
    log::debug!("parsing {} bytes from rule {}", source.len(), DEFAULT_START_RULE);
    program(source)
}

/// Parses a standalone expression.
pub fn parse_expr(source: &str) -> Result<Expr> {
    log::debug!("parsing {} bytes from rule Expr", source.len());
    expression(source)
}

/// Parses a standalone type.
pub fn parse_type(source: &str) -> Result<Type> {
    log::debug!("parsing {} bytes from rule Type", source.len());
    type_only(source)
}
