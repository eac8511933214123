use crate::ast::{Assignment, Expr, Primitive, SqlExpr, Type};
use serde::Serialize;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// A pipeline: operators joined by `|`.
///
/// Only the top-level pipeline of a program carries `consts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub struct Sequential {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consts: Option<Vec<Decl>>,
    pub procs: Vec<Proc>,
}

impl Sequential {
    pub fn new(procs: Vec<Proc>) -> Self {
        Sequential {
            consts: None,
            procs,
        }
    }
}

/// Program-level declaration, ahead of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Decl {
    /// `const x = <expr>`
    Const { name: String, expr: Expr },

    /// `type x = <type>`
    TypeProc {
        name: String,
        #[serde(rename = "type")]
        typ: Type,
    },
}

/// Pipeline operator.
///
/// Operators are tried in a fixed order; a query that starts with none of
/// the operator keywords falls back to a function call, an aggregation, or an
/// implicit `Filter` around a boolean search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Proc {
    /// Parallel branches
    ///
    /// # Example
    /// ```text
    /// split ( => count() => head )
    /// ```
    Parallel { procs: Vec<Sequential> },

    /// Route records to the first case whose value matches
    ///
    /// `expr` is `None` for the guard-less form whose cases are boolean
    /// searches.
    ///
    /// # Examples
    /// ```text
    /// switch x ( 1 => head ; default => tail )
    /// switch ( a==1 => head ; b => tail )
    /// ```
    Switch {
        expr: Option<Expr>,
        cases: Vec<Case>,
    },

    /// Multi-source input
    ///
    /// # Example
    /// ```text
    /// from ( file a.zng => head ; pool logs )
    /// ```
    From { trunks: Vec<Trunk> },

    /// # Example
    /// ```text
    /// sort -r -nulls first x, y
    /// ```
    Sort {
        /// `None` lets the engine pick a key
        args: Option<Vec<Expr>>,
        order: Order,
        nullsfirst: bool,
    },

    /// # Example
    /// ```text
    /// top 5 -flush bytes
    /// ```
    Top {
        limit: Option<i64>,
        args: Option<Vec<Expr>>,
        flush: bool,
    },

    Cut { args: Vec<Assignment> },

    Pick { args: Vec<Assignment> },

    Drop { args: Vec<Expr> },

    /// `head [N]`, N defaults to 1
    Head { count: i64 },

    /// `tail [N]`, N defaults to 1
    Tail { count: i64 },

    /// Keep records matching `expr`
    Filter { expr: Expr },

    /// `uniq [-c]`
    Uniq { cflag: bool },

    Put { args: Vec<Assignment> },

    Rename { args: Vec<Assignment> },

    Fuse,

    Shape,

    /// # Examples
    /// ```text
    /// left join on a=b c:=d
    /// join on id
    /// ```
    Join {
        style: String,
        left_key: Expr,
        right_key: Expr,
        args: Option<Vec<Assignment>>,
    },

    /// # Example
    /// ```text
    /// explode a, b by int64 as n
    /// ```
    Explode {
        args: Vec<Expr>,
        #[serde(rename = "type")]
        typ: Type,
        #[serde(rename = "as")]
        as_: Option<Expr>,
    },

    Pass,

    /// Group-by and aggregation
    ///
    /// # Examples
    /// ```text
    /// count() by id
    /// every 1h sum(bytes) by host with -limit 10
    /// by host
    /// ```
    Summarize {
        duration: Option<Primitive>,
        limit: i64,
        keys: Option<Vec<Assignment>>,
        aggs: Option<Vec<Assignment>>,
    },

    #[serde(rename = "SQLExpr")]
    Sql(SqlExpr),

    /// A function call used as an operator
    Call { name: String, args: Vec<Expr> },

    /// Nested pipeline, e.g. the expansion of `sample`
    #[serde(untagged)]
    Sequential(Sequential),
}

/// One arm of a `switch`; `expr` is `None` for `default`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub expr: Option<Expr>,
    #[serde(rename = "proc")]
    pub seq: Sequential,
}

/// One input of a `from`, with its optional pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub struct Trunk {
    pub source: Source,
    pub seq: Option<Sequential>,
}

/// Data source of a trunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Source {
    /// `file <path> [format <fmt>] [order <keys>[:asc|:desc]]`
    File {
        path: String,
        format: Option<String>,
        layout: Option<Layout>,
    },

    /// `get <url> [format <fmt>] [order <keys>[:asc|:desc]]`
    #[serde(rename = "HTTP")]
    Http {
        url: String,
        format: Option<String>,
        layout: Option<Layout>,
    },

    /// `<name> [at <id>] [range <lit> to <lit>] [order asc|desc]`
    Pool {
        name: String,
        at: Option<String>,
        range: Option<PoolRange>,
        scan_order: Option<Order>,
    },
}

/// Sort order of a file or URL source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub struct Layout {
    pub keys: Vec<Expr>,
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolRange {
    pub lower: Expr,
    pub upper: Expr,
}

impl Proc {
    /// The `kind` tag this operator serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            Proc::Parallel { .. } => "Parallel",
            Proc::Switch { .. } => "Switch",
            Proc::From { .. } => "From",
            Proc::Sort { .. } => "Sort",
            Proc::Top { .. } => "Top",
            Proc::Cut { .. } => "Cut",
            Proc::Pick { .. } => "Pick",
            Proc::Drop { .. } => "Drop",
            Proc::Head { .. } => "Head",
            Proc::Tail { .. } => "Tail",
            Proc::Filter { .. } => "Filter",
            Proc::Uniq { .. } => "Uniq",
            Proc::Put { .. } => "Put",
            Proc::Rename { .. } => "Rename",
            Proc::Fuse => "Fuse",
            Proc::Shape => "Shape",
            Proc::Join { .. } => "Join",
            Proc::Explode { .. } => "Explode",
            Proc::Pass => "Pass",
            Proc::Summarize { .. } => "Summarize",
            Proc::Sql(_) => "SQLExpr",
            Proc::Call { .. } => "Call",
            Proc::Sequential(_) => "Sequential",
        }
    }
}
