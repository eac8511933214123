use crate::ast::{Assignment, Expr, Order};
use serde::Serialize;

/// The `FROM` clause.
///
/// `from *`, and a query with no `FROM` at all, produce a clause whose
/// `table` is `None`: the "no explicit table" marker. The clause itself is
/// always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlFrom {
    pub table: Option<Expr>,
    pub alias: Option<Expr>,
}

impl SqlFrom {
    pub fn any_table() -> Self {
        SqlFrom {
            table: None,
            alias: None,
        }
    }

    pub fn is_any_table(&self) -> bool {
        self.table.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename = "SQLJoin")]
pub struct SqlJoin {
    pub table: Expr,
    pub style: String,
    pub left_key: Expr,
    pub right_key: Expr,
    pub alias: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename = "SQLOrderBy")]
pub struct SqlOrderBy {
    pub keys: Vec<Expr>,
    pub order: Order,
}

/// `select ... from ... [join ...] [where] [group by] [having] [order by] [limit]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlExpr {
    /// `None` for `select *`
    pub select: Option<Vec<Assignment>>,
    pub from: SqlFrom,
    pub joins: Option<Vec<SqlJoin>>,
    #[serde(rename = "where")]
    pub where_: Option<Expr>,
    pub group_by: Option<Vec<Expr>>,
    pub having: Option<Expr>,
    pub order_by: Option<SqlOrderBy>,
    /// 0 when absent
    pub limit: i64,
}
