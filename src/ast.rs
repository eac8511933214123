//! # zq Query Language - Abstract Syntax Tree
//!
//! This module defines the AST produced by the parser. Every node serializes
//! to a JSON object whose first key is `kind`; that JSON is the wire format a
//! downstream execution engine consumes.
//!
//! ## Architecture Overview
//!
//! - **[operators]** - Pipelines, declarations, pipeline operators and data sources
//! - **[expressions]** - Scalar, record and collection expressions, searches, literals
//! - **[types]** - Type syntax
//! - **[sql]** - The embedded `SELECT` form
//!
//! ## Quick Start
//!
//! ```text
//! const limit = 10; status=="active" | count() by host | head 5
//! ```
//!
//! This program declares a constant, keeps records whose `status` is
//! `"active"`, counts them per host and keeps the first five groups.
//!
//! ## Core Concepts
//!
//! ### Pipeline Structure
//!
//! A program is a `Sequential` of operators joined by `|`. Operators such as
//! `split`, `switch` and `from` nest further `Sequential` pipelines.
//!
//! ### Implicit Operators
//!
//! A pipeline stage need not start with a keyword:
//!
//! - `f(x)` alone is a function-call operator (`Call`)
//! - `count() by x` is an aggregation (`Summarize`)
//! - anything else is a boolean search wrapped in a `Filter`
//!
//! ### Field Access
//!
//! Dereference is encoded with `BinaryExpr`:
//!
//! ```text
//! a.b       BinaryExpr(".", ID a, ID b)
//! .b        BinaryExpr(".", Root, ID b)
//! a[0]      BinaryExpr("[", ID a, 0)
//! a[1:2]    BinaryExpr("[", ID a, BinaryExpr(":", 1, 2))
//! ```
pub mod expressions;
pub mod operators;
pub mod sql;
pub mod types;

pub use expressions::{Assignment, Entry, Expr, Field, Primitive};
pub use operators::{Case, Decl, Layout, Order, PoolRange, Proc, Sequential, Source, Trunk};
pub use sql::{SqlExpr, SqlFrom, SqlJoin, SqlOrderBy};
pub use types::{Type, TypeField};

use serde::Serialize;

/// Result of a parse: which variant depends on the start rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Program(Sequential),
    Expr(Expr),
    Type(Type),
}
