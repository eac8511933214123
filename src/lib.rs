//! Parser front-end for the zq pipeline query language.
//!
//! [`parse`] turns query text into a typed AST ([`ast`]) that serializes to
//! the JSON shape downstream engines consume. Nothing here evaluates a query.

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod glob;
pub mod parser;

pub use ast::{Assignment, Decl, Expr, Node, Primitive, Proc, Sequential, SqlExpr, Type};
pub use error::{Error, Expectation, Location, Position, Result, SyntaxError};
pub use glob::GlobOptions;
pub use parser::{parse, parse_expr, parse_query, parse_type, ParseOptions};
