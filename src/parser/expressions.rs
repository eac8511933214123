//! The expression precedence cascade, lowest binding first:
//! conditional, `or`, `and`, equality, relational, additive, multiplicative,
//! `!`, then calls, casts, dereference and primaries.

use super::memo::MemoRule;
use super::state::ParserState;
use crate::ast::{Assignment, Entry, Expr, Field, Type};

/// Left-folds `first (op operand)*` into nested `BinaryExpr` nodes.
pub fn fold_chain(first: Expr, rest: Vec<(String, Expr)>) -> Expr {
    rest.into_iter()
        .fold(first, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs))
}

/// Chains `.field`, `[index]` and `[from:to]` steps onto a base expression.
fn fold_derefs(base: Expr, derefs: Vec<(&'static str, Expr)>) -> Expr {
    derefs.into_iter().fold(base, |lhs, (op, rhs)| Expr::binary(op, lhs, rhs))
}

type Rule<'a, T> = fn(&mut ParserState<'a>) -> Option<T>;

impl<'a> ParserState<'a> {
    pub(super) fn expr(&mut self) -> Option<Expr> {
        self.memoized(MemoRule::Expr, Self::conditional_expr)
    }

    fn conditional_expr(&mut self) -> Option<Expr> {
        let cond = self.logical_or_expr()?;
        let branches = self.attempt(|p| {
            p.ws();
            p.match_literal("?")?;
            p.ws();
            let then = p.expr()?;
            p.ws();
            p.match_literal(":")?;
            p.ws();
            let else_ = p.expr()?;
            Some((then, else_))
        });
        Some(match branches {
            Some((then, else_)) => Expr::Conditional {
                cond: Box::new(cond),
                then: Box::new(then),
                else_: Box::new(else_),
            },
            None => cond,
        })
    }

    /// `operand (__ op __ operand)*`, left-folded.
    fn binary_chain(
        &mut self,
        operand: Rule<'a, Expr>,
        op: Rule<'a, &'static str>,
    ) -> Option<Expr> {
        let first = operand(self)?;
        let rest = self.zero_or_more(|p| {
            p.ws();
            let symbol = op(p)?;
            p.ws();
            let rhs = operand(p)?;
            Some((symbol.to_string(), rhs))
        });
        Some(fold_chain(first, rest))
    }

    fn logical_or_expr(&mut self) -> Option<Expr> {
        self.binary_chain(Self::logical_and_expr, |p| p.or_token().map(|_| "or"))
    }

    fn logical_and_expr(&mut self) -> Option<Expr> {
        self.binary_chain(Self::equality_expr, |p| p.and_token().map(|_| "and"))
    }

    fn equality_expr(&mut self) -> Option<Expr> {
        self.binary_chain(Self::match_expr, Self::equality_op)
    }

    fn equality_op(&mut self) -> Option<&'static str> {
        self.match_literal("==")
            .map(|_| "==")
            .or_else(|| self.match_literal("!=").map(|_| "!="))
            .or_else(|| self.keyword("in").map(|_| "in"))
    }

    /// `expr matches /re/` or `expr matches glob*`
    fn match_expr(&mut self) -> Option<Expr> {
        let lhs = self.relative_expr()?;
        Some(match self.matches_suffix() {
            Some(pattern) => Expr::RegexpMatch {
                pattern,
                expr: Box::new(lhs),
            },
            None => lhs,
        })
    }

    pub(super) fn matches_suffix(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.ws1()?;
            p.keyword("matches")?;
            p.ws1()?;
            p.regexp_pattern().or_else(|| p.glob_regex())
        })
    }

    fn relative_expr(&mut self) -> Option<Expr> {
        self.binary_chain(Self::additive_expr, Self::relative_op)
    }

    pub(super) fn relative_op(&mut self) -> Option<&'static str> {
        ["<=", "<", ">=", ">"]
            .into_iter()
            .find_map(|op| self.match_literal(op).map(|_| op))
    }

    /// All comparison operators, as used by search predicates.
    pub(super) fn comparator(&mut self) -> Option<&'static str> {
        self.equality_op().or_else(|| self.relative_op())
    }

    pub(super) fn additive_expr(&mut self) -> Option<Expr> {
        self.memoized(MemoRule::Additive, |p| {
            p.binary_chain(Self::multiplicative_expr, Self::additive_op)
        })
    }

    pub(super) fn additive_op(&mut self) -> Option<&'static str> {
        self.match_literal("+").map(|_| "+").or_else(|| {
            self.attempt(|p| {
                p.match_literal("-")?;
                // `-limit` and `-with` are operator flags, not subtraction
                p.not(|p| p.keyword("limit").or_else(|| p.keyword("with")))?;
                Some("-")
            })
        })
    }

    fn multiplicative_expr(&mut self) -> Option<Expr> {
        self.binary_chain(Self::not_expr, Self::multiplicative_op)
    }

    pub(super) fn multiplicative_op(&mut self) -> Option<&'static str> {
        self.match_literal("*")
            .map(|_| "*")
            .or_else(|| self.match_literal("/").map(|_| "/"))
    }

    fn not_expr(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.match_literal("!")?;
            p.ws();
            let operand = p.not_expr()?;
            Some(Expr::UnaryExpr {
                op: "!".to_string(),
                operand: Box::new(operand),
            })
        })
        .or_else(|| self.func_expr())
    }

    fn func_expr(&mut self) -> Option<Expr> {
        self.cast()
            .or_else(|| self.select_expr())
            .or_else(|| {
                self.attempt(|p| {
                    let call = p.function()?;
                    let derefs = p.zero_or_more(|p| p.deref());
                    Some(fold_derefs(call, derefs))
                })
            })
            .or_else(|| self.ip6_literal().map(Expr::Primitive))
            .or_else(|| self.deref_expr())
            .or_else(|| {
                self.attempt(|p| {
                    let base = p.primary()?;
                    let derefs = p.zero_or_more(|p| p.deref());
                    Some(fold_derefs(base, derefs))
                })
            })
    }

    /// `int64(x)`: a call named after a primitive type.
    fn cast(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            let name = p.primitive_type_name()?;
            p.match_literal("(")?;
            p.ws();
            let expr = p.expr()?;
            p.ws();
            p.match_literal(")")?;
            Some(Expr::Cast {
                expr: Box::new(expr),
                typ: Type::primitive(name),
            })
        })
    }

    /// `select(a, b).m1().m2()`
    fn select_expr(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.keyword("select")?;
            p.match_literal("(")?;
            p.ws();
            let selectors = p.exprs()?;
            p.ws();
            p.match_literal(")")?;
            let methods = p.zero_or_more(|p| {
                p.ws();
                p.match_literal(".")?;
                p.ws();
                p.function()
            });
            Some(Expr::SelectExpr { selectors, methods })
        })
    }

    /// Names that look like calls but are handled elsewhere.
    pub(super) fn func_guard(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.keyword("not").or_else(|| p.keyword("select"))?;
            p.ws();
            p.match_literal("(")
        })
    }

    pub(super) fn function(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.not(|p| p.func_guard())?;
            let name = p.identifier_name()?;
            p.match_literal("(")?;
            p.ws();
            let args = p.exprs().unwrap_or_default();
            p.ws();
            p.match_literal(")")?;
            Some(Expr::Call { name, args })
        })
    }

    pub(super) fn exprs(&mut self) -> Option<Vec<Expr>> {
        self.sep_by1(|p| p.expr(), |p| p.comma())
    }

    // ------------------------------------------------------------------
    // Dereference
    // ------------------------------------------------------------------

    pub(super) fn deref_expr(&mut self) -> Option<Expr> {
        self.memoized(MemoRule::Deref, |p| {
            let base = p.deref_base()?;
            let derefs = p.zero_or_more(|p| p.deref());
            Some(fold_derefs(base, derefs))
        })
    }

    fn deref_base(&mut self) -> Option<Expr> {
        self.word("this")
            .map(|_| Expr::Root)
            .or_else(|| {
                self.attempt(|p| {
                    p.match_literal(".")?;
                    let index = p.bracket_index()?;
                    Some(Expr::binary("[", Expr::Root, index))
                })
            })
            .or_else(|| {
                self.attempt(|p| {
                    p.match_literal(".")?;
                    let name = p.identifier_name()?;
                    Some(Expr::dot(Expr::Root, name))
                })
            })
            .or_else(|| self.identifier_name().map(Expr::id))
            .or_else(|| {
                self.attempt(|p| {
                    p.match_literal(".")?;
                    p.not(|p| {
                        p.match_literal(".")
                            .or_else(|| p.match_char("[0-9]", |c| c.is_ascii_digit()).map(drop))
                    })?;
                    Some(Expr::Root)
                })
            })
    }

    fn deref(&mut self) -> Option<(&'static str, Expr)> {
        self.attempt(|p| {
            p.match_literal("[")?;
            p.ws();
            let from = p.additive_expr();
            p.ws();
            p.match_literal(":")?;
            p.ws();
            let to = p.additive_expr();
            p.ws();
            p.match_literal("]")?;
            let slice = Expr::BinaryExpr {
                op: ":".to_string(),
                lhs: from.map(Box::new),
                rhs: to.map(Box::new),
            };
            Some(("[", slice))
        })
        .or_else(|| self.bracket_index().map(|index| ("[", index)))
        .or_else(|| {
            self.attempt(|p| {
                p.match_literal(".")?;
                let name = p.identifier_name()?;
                Some((".", Expr::id(name)))
            })
        })
    }

    fn bracket_index(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.match_literal("[")?;
            p.ws();
            let index = p.expr()?;
            p.ws();
            p.match_literal("]")?;
            Some(index)
        })
    }

    /// Assignable field reference.
    pub(super) fn lval(&mut self) -> Option<Expr> {
        self.deref_expr()
    }

    pub(super) fn field_exprs(&mut self) -> Option<Vec<Expr>> {
        self.sep_by1(|p| p.lval(), |p| p.comma())
    }

    // ------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------

    /// `lval := expr`
    pub(super) fn assignment(&mut self) -> Option<Assignment> {
        self.attempt(|p| {
            let lhs = p.lval()?;
            p.ws();
            p.match_literal(":=")?;
            p.ws();
            let rhs = p.expr()?;
            Some(Assignment { lhs: Some(lhs), rhs })
        })
    }

    pub(super) fn assignments(&mut self) -> Option<Vec<Assignment>> {
        self.sep_by1(|p| p.assignment(), |p| p.comma())
    }

    /// An assignment, or a bare expression standing for one.
    pub(super) fn flex_assignment(&mut self) -> Option<Assignment> {
        self.assignment()
            .or_else(|| self.expr().map(|rhs| Assignment { lhs: None, rhs }))
    }

    pub(super) fn flex_assignments(&mut self) -> Option<Vec<Assignment>> {
        self.sep_by1(|p| p.flex_assignment(), |p| p.comma())
    }

    // ------------------------------------------------------------------
    // Primaries
    // ------------------------------------------------------------------

    fn primary(&mut self) -> Option<Expr> {
        self.record()
            .or_else(|| self.array())
            .or_else(|| self.set())
            .or_else(|| self.map())
            .or_else(|| self.literal())
            .or_else(|| {
                self.attempt(|p| {
                    p.match_literal("(")?;
                    p.ws();
                    let expr = p.expr()?;
                    p.ws();
                    p.match_literal(")")?;
                    Some(expr)
                })
            })
    }

    fn record(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.match_literal("{")?;
            p.ws();
            let fields = p.sep_by1(|p| p.field(), |p| p.comma()).unwrap_or_default();
            p.ws();
            p.match_literal("}")?;
            Some(Expr::RecordExpr { fields })
        })
    }

    fn field(&mut self) -> Option<Field> {
        self.attempt(|p| {
            let name = p.identifier_name().or_else(|| p.quoted_string())?;
            p.ws();
            p.match_literal(":")?;
            p.ws();
            let value = p.expr()?;
            Some(Field { name, value })
        })
    }

    fn array(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.match_literal("[")?;
            p.ws();
            let exprs = p.exprs().unwrap_or_default();
            p.ws();
            p.match_literal("]")?;
            Some(Expr::ArrayExpr { exprs })
        })
    }

    fn set(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.match_literal("|[")?;
            p.ws();
            let exprs = p.exprs().unwrap_or_default();
            p.ws();
            p.match_literal("]|")?;
            Some(Expr::SetExpr { exprs })
        })
    }

    fn map(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.match_literal("|{")?;
            p.ws();
            let entries = p.sep_by1(|p| p.entry(), |p| p.comma()).unwrap_or_default();
            p.ws();
            p.match_literal("}|")?;
            Some(Expr::MapExpr { entries })
        })
    }

    fn entry(&mut self) -> Option<Entry> {
        self.attempt(|p| {
            let key = p.expr()?;
            p.ws();
            p.match_literal(":")?;
            p.ws();
            let value = p.expr()?;
            Some(Entry { key, value })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_chain_is_left_nested() {
        let folded = fold_chain(
            Expr::id("a"),
            vec![("+".into(), Expr::id("b")), ("-".into(), Expr::id("c"))],
        );
        assert_eq!(
            folded,
            Expr::binary("-", Expr::binary("+", Expr::id("a"), Expr::id("b")), Expr::id("c"))
        );
    }

    #[test]
    fn test_fold_chain_without_rest() {
        assert_eq!(fold_chain(Expr::Root, vec![]), Expr::Root);
    }
}
