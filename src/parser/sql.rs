//! The embedded `select ... from ...` form.
//!
//! Clause keywords are case-insensitive and end at an identifier boundary, so
//! a field named `ordering` never reads as `ORDER`.

use super::state::ParserState;
use crate::ast::{Assignment, Expr, Order, SqlExpr, SqlFrom, SqlJoin, SqlOrderBy};

impl<'a> ParserState<'a> {
    pub(super) fn sql_expr(&mut self) -> Option<SqlExpr> {
        self.attempt(|p| {
            let select = p.sql_select()?;
            let from = p.sql_from().unwrap_or_else(SqlFrom::any_table);
            let joins = p.zero_or_more(|p| p.sql_join());
            let where_ = p.sql_clause("where", Self::search_boolean);
            let group_by = p.attempt(|p| {
                p.ws1()?;
                p.keyword("group")?;
                p.ws1()?;
                p.keyword("by")?;
                p.ws1()?;
                p.field_exprs()
            });
            let having = p.sql_clause("having", Self::search_boolean);
            let order_by = p.sql_order_by();
            let limit = p.sql_clause("limit", Self::uint).unwrap_or(0);
            Some(SqlExpr {
                select,
                from,
                joins: (!joins.is_empty()).then_some(joins),
                where_,
                group_by,
                having,
                order_by,
                limit,
            })
        })
    }

    /// `_ KEYWORD _ <rule>`
    fn sql_clause<T>(&mut self, keyword: &str, rule: fn(&mut Self) -> Option<T>) -> Option<T> {
        self.attempt(|p| {
            p.ws1()?;
            p.keyword(keyword)?;
            p.ws1()?;
            rule(p)
        })
    }

    /// `SELECT *` yields `None`; otherwise the selection list.
    fn sql_select(&mut self) -> Option<Option<Vec<Assignment>>> {
        self.keyword("select")?;
        self.ws1()?;
        self.match_literal("*")
            .map(|_| None)
            .or_else(|| self.sql_assignments().map(Some))
    }

    fn sql_assignments(&mut self) -> Option<Vec<Assignment>> {
        self.sep_by1(|p| p.sql_assignment(), |p| p.comma())
    }

    /// `<expr> AS <lval>` or a bare `<expr>`.
    fn sql_assignment(&mut self) -> Option<Assignment> {
        self.attempt(|p| {
            let rhs = p.expr()?;
            p.ws1()?;
            p.keyword("as")?;
            p.ws1()?;
            let lhs = p.lval()?;
            Some(Assignment { lhs: Some(lhs), rhs })
        })
        .or_else(|| self.expr().map(|rhs| Assignment { lhs: None, rhs }))
    }

    fn sql_from(&mut self) -> Option<SqlFrom> {
        self.attempt(|p| {
            p.ws1()?;
            p.keyword("from")?;
            p.ws1()?;
            if p.match_literal("*").is_some() {
                return Some(SqlFrom::any_table());
            }
            let table = p.expr()?;
            let alias = p.sql_alias();
            Some(SqlFrom {
                table: Some(table),
                alias,
            })
        })
    }

    fn sql_alias(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.ws1()?;
            p.keyword("as")?;
            p.ws1()?;
            p.lval()
        })
        .or_else(|| {
            self.attempt(|p| {
                p.ws1()?;
                p.not(|p| p.sql_keyword())?;
                p.lval()
            })
        })
    }

    /// `[INNER|LEFT|RIGHT] JOIN <table> [alias] ON <key> = <key>`
    fn sql_join(&mut self) -> Option<SqlJoin> {
        self.attempt(|p| {
            p.ws1()?;
            let style = p.join_style();
            p.keyword("join")?;
            p.ws1()?;
            let table = p.expr()?;
            let alias = p.sql_alias();
            p.ws1()?;
            p.keyword("on")?;
            p.ws1()?;
            let left_key = p.join_key()?;
            p.ws();
            p.match_literal("=")?;
            p.ws();
            let right_key = p.join_key()?;
            Some(SqlJoin {
                table,
                style,
                left_key,
                right_key,
                alias,
            })
        })
    }

    fn sql_order_by(&mut self) -> Option<SqlOrderBy> {
        self.attempt(|p| {
            p.ws1()?;
            p.keyword("order")?;
            p.ws1()?;
            p.keyword("by")?;
            p.ws1()?;
            let keys = p.exprs()?;
            let order = p
                .attempt(|p| {
                    p.ws1()?;
                    p.keyword("asc")
                        .map(|_| Order::Asc)
                        .or_else(|| p.keyword("desc").map(|_| Order::Desc))
                })
                .unwrap_or_default();
            Some(SqlOrderBy { keys, order })
        })
    }
}
