//! Boolean search syntax: bare words, globs, regexps, quoted values and
//! comparison predicates combined with `and`, `or`, `not` and parentheses.

use super::expressions::fold_chain;
use super::state::ParserState;
use crate::ast::{Expr, Primitive};
use crate::glob::{self, GlobOptions};

fn is_keyword_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '.' | ':' | '/' | '%' | '#' | '@' | '~')
}

fn is_keyword_rest(c: char) -> bool {
    is_keyword_start(c) || c.is_ascii_digit()
}

fn is_glob_char(c: char) -> bool {
    is_keyword_rest(c) || c == '*' || c == '?'
}

impl<'a> ParserState<'a> {
    pub(super) fn search_boolean(&mut self) -> Option<Expr> {
        let first = self.search_and()?;
        let rest = self.zero_or_more(|p| {
            p.ws1()?;
            p.or_token()?;
            p.ws1()?;
            let term = p.search_and()?;
            Some(("or".to_string(), term))
        });
        Some(fold_chain(first, rest))
    }

    fn search_and(&mut self) -> Option<Expr> {
        let first = self.search_factor()?;
        let rest = self.zero_or_more(|p| {
            p.attempt(|p| {
                p.ws1()?;
                p.and_token()
            });
            p.ws1()?;
            p.not(|p| p.or_token().or_else(|| p.sql_keyword()))?;
            let factor = p.search_factor()?;
            Some(("and".to_string(), factor))
        });
        Some(fold_chain(first, rest))
    }

    fn search_factor(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.attempt(|p| {
                p.not_token()?;
                p.ws1()
            })
            .or_else(|| {
                p.attempt(|p| {
                    p.match_literal("!")?;
                    p.ws();
                    Some(())
                })
            })?;
            let operand = p.search_factor()?;
            Some(Expr::UnaryExpr {
                op: "!".to_string(),
                operand: Box::new(operand),
            })
        })
        .or_else(|| {
            self.attempt(|p| {
                p.match_literal("(")?;
                p.ws();
                let expr = p.search_boolean()?;
                p.ws();
                p.match_literal(")")?;
                Some(expr)
            })
        })
        .or_else(|| self.search_expr())
    }

    fn search_expr(&mut self) -> Option<Expr> {
        self.regexp_pattern()
            .map(|pattern| Expr::RegexpSearch { pattern })
            .or_else(|| {
                self.attempt(|p| {
                    let pattern = p.glob_regex()?;
                    p.not(|p| p.expr_guard())?;
                    Some(Expr::RegexpSearch { pattern })
                })
            })
            .or_else(|| {
                self.attempt(|p| {
                    let start = p.pos();
                    let value = p.search_value()?;
                    let text = p.text_from(start).to_string();
                    p.not(|p| p.expr_guard())?;
                    Some(Expr::Search { text, value })
                })
            })
            .or_else(|| {
                self.attempt(|p| {
                    p.match_literal("*")?;
                    p.not(|p| p.expr_guard())?;
                    Some(Expr::primitive("bool", "true"))
                })
            })
            .or_else(|| self.search_predicate())
    }

    /// Comparison, pattern match, or a function call used as a predicate.
    fn search_predicate(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            let lhs = p.additive_expr()?;
            let compared = p.attempt(|p| {
                p.ws();
                let op = p.comparator()?;
                p.ws();
                let rhs = p.additive_expr()?;
                Some((op, rhs))
            });
            if let Some((op, rhs)) = compared {
                return Some(Expr::binary(op, lhs, rhs));
            }
            if let Some(pattern) = p.matches_suffix() {
                return Some(Expr::RegexpMatch {
                    pattern,
                    expr: Box::new(lhs),
                });
            }
            None
        })
        .or_else(|| self.function())
    }

    /// A literal, or a bare word taken as a string.
    fn search_value(&mut self) -> Option<Primitive> {
        self.primitive_literal().or_else(|| {
            self.attempt(|p| {
                p.not(|p| p.regexp_pattern())?;
                let word = p.search_keyword()?;
                Some(Primitive::new("string", word))
            })
        })
    }

    /// What may follow a value only if that value begins an expression.
    fn expr_guard(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.ws();
            p.attempt(|p| {
                p.not(|p| p.match_literal("=>"))?;
                p.comparator()
            })
            .map(drop)
            .or_else(|| p.additive_op().map(drop))
            .or_else(|| p.multiplicative_op().map(drop))
            .or_else(|| p.match_literal(":"))
            .or_else(|| p.match_literal("~"))
            .or_else(|| p.keyword("matches"))
        })
        .or_else(|| self.match_literal("("))
        .or_else(|| self.match_literal("["))
    }

    // ------------------------------------------------------------------
    // Words, globs, regexps
    // ------------------------------------------------------------------

    /// Bare search word with backslash escapes decoded.
    fn search_keyword(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.not(|p| p.search_reserved())?;
            let mut units: Vec<u16> = Vec::new();
            let head = p.keyword_char(is_keyword_start)?;
            units.extend(head);
            for more in p.zero_or_more(|p| p.keyword_char(is_keyword_rest)) {
                units.extend(more);
            }
            Some(String::from_utf16_lossy(&units))
        })
    }

    fn keyword_char(&mut self, class: fn(char) -> bool) -> Option<Vec<u16>> {
        self.match_char("[a-zA-Z_.:/%#@~0-9]", class)
            .map(|c| {
                let mut buf = [0u16; 2];
                c.encode_utf16(&mut buf).to_vec()
            })
            .or_else(|| {
                self.attempt(|p| {
                    p.match_literal("\\")?;
                    p.match_char("[=*\\\\]", |c| matches!(c, '=' | '*' | '\\'))
                        .map(|c| vec![c as u16])
                        .or_else(|| p.escape_sequence())
                })
            })
    }

    /// A bare word containing `*` or `?`, translated to regex source.
    pub(super) fn glob_regex(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.not(|p| p.search_reserved())?;
            let start = p.pos();
            p.one_or_more(|p| p.match_char("[a-zA-Z_.:/%#@~0-9*?]", is_glob_char))?;
            let word = p.text_from(start);
            let literal_chars = word.chars().any(|c| c != '*' && c != '?');
            if !glob::is_globby(word) || !literal_chars {
                return None;
            }
            Some(glob::glob_to_regex_source(word, &GlobOptions::default()))
        })
    }

    /// `/body/` not followed by a word character; yields the raw body.
    pub(super) fn regexp_pattern(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.match_literal("/")?;
            let start = p.pos();
            p.one_or_more(|p| {
                p.match_char("[^/\\\\\\n]", |c| !matches!(c, '/' | '\\' | '\n'))
                    .map(drop)
                    .or_else(|| {
                        p.attempt(|p| {
                            p.match_literal("\\")?;
                            p.any_char().map(drop)
                        })
                    })
            })?;
            let body = p.text_from(start).to_string();
            p.match_literal("/")?;
            p.not(|p| p.match_char("[a-zA-Z_.:/%#@~]", is_keyword_start))?;
            Some(body)
        })
    }
}
