use crate::ast::Type;
use serde::Serialize;

/// Expression node.
///
/// Expressions parameterize operators: filter predicates, assignment
/// right-hand sides, sort keys, aggregation arguments and so on. Field access
/// is not a separate node kind; it is encoded as a `BinaryExpr` with op `.`
/// (field) or `[` (index and slice).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Expr {
    /// Binary operation, including dereference
    ///
    /// `lhs` and `rhs` are only `None` for the bounds of a slice (`op` `:`).
    ///
    /// # Examples
    /// ```text
    /// a + b      // op "+"
    /// a.b        // op ".", rhs ID(b)
    /// a[1:]      // op "[", rhs BinaryExpr(":", 1, null)
    /// ```
    BinaryExpr {
        op: String,
        lhs: Option<Box<Expr>>,
        rhs: Option<Box<Expr>>,
    },

    /// Prefix operation; the grammar only produces `!`
    UnaryExpr { op: String, operand: Box<Expr> },

    /// `cond ? then : else`
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        #[serde(rename = "else")]
        else_: Box<Expr>,
    },

    /// Type-named call
    ///
    /// # Example
    /// ```text
    /// int64(x)
    /// ```
    Cast {
        expr: Box<Expr>,
        #[serde(rename = "type")]
        typ: Type,
    },

    /// Function call
    Call { name: String, args: Vec<Expr> },

    /// Bare identifier, resolved relative to the current record
    #[serde(rename = "ID")]
    Id { name: String },

    /// The current record: `this`, a lone `.`, or the implicit base of `.x`
    Root,

    /// # Example
    /// ```text
    /// {a:1,"b c":x}
    /// ```
    RecordExpr { fields: Vec<Field> },

    ArrayExpr { exprs: Vec<Expr> },

    /// `|[a,b]|`
    SetExpr { exprs: Vec<Expr> },

    /// `|{k:v}|`
    MapExpr { entries: Vec<Entry> },

    /// `select(a,b).m1().m2()`
    SelectExpr {
        selectors: Vec<Expr>,
        methods: Vec<Expr>,
    },

    /// Aggregate function application
    ///
    /// # Examples
    /// ```text
    /// count()
    /// sum(bytes) where proto=="tcp"
    /// ```
    Agg {
        name: String,
        expr: Option<Box<Expr>>,
        #[serde(rename = "where")]
        where_: Option<Box<Expr>>,
    },

    /// Keyword or literal search term; `text` is the source spelling
    Search { text: String, value: Primitive },

    /// Regular expression search; globs arrive here already translated
    RegexpSearch { pattern: String },

    /// `expr matches /re/`
    RegexpMatch { pattern: String, expr: Box<Expr> },

    /// Type used as a value: `<int64>`
    TypeValue { value: Type },

    #[serde(untagged)]
    Primitive(Primitive),
}

/// Scalar literal. `text` holds the literal in canonical source form
/// (strings are unescaped).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub struct Primitive {
    #[serde(rename = "type")]
    pub typ: String,
    pub text: String,
}

impl Primitive {
    pub fn new(typ: impl Into<String>, text: impl Into<String>) -> Self {
        Primitive {
            typ: typ.into(),
            text: text.into(),
        }
    }
}

/// `lhs := rhs`. A bare expression in an assignment position has no `lhs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub struct Assignment {
    pub lhs: Option<Expr>,
    pub rhs: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub key: Expr,
    pub value: Expr,
}

impl Expr {
    pub fn binary(op: impl Into<String>, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinaryExpr {
            op: op.into(),
            lhs: Some(Box::new(lhs)),
            rhs: Some(Box::new(rhs)),
        }
    }

    pub fn id(name: impl Into<String>) -> Self {
        Expr::Id { name: name.into() }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    /// `lhs.name`
    pub fn dot(lhs: Expr, name: impl Into<String>) -> Self {
        Expr::binary(".", lhs, Expr::id(name))
    }

    pub fn primitive(typ: impl Into<String>, text: impl Into<String>) -> Self {
        Expr::Primitive(Primitive::new(typ, text))
    }
}
