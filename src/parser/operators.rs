//! Named pipeline operators, aggregations and data sources.

use std::collections::HashSet;

use super::state::ParserState;
use crate::ast::{
    Assignment, Expr, Layout, Order, PoolRange, Primitive, Proc, Sequential, Source, Trunk,
};
use crate::error::Error;

enum SortFlag {
    Reverse,
    Nulls(bool),
}

impl SortFlag {
    fn name(&self) -> &'static str {
        match self {
            SortFlag::Reverse => "r",
            SortFlag::Nulls(_) => "nulls",
        }
    }
}

impl<'a> ParserState<'a> {
    /// The keyword operators, tried in order.
    pub(super) fn operator(&mut self) -> Option<Proc> {
        let operators: [fn(&mut Self) -> Option<Proc>; 19] = [
            Self::sort_proc,
            Self::top_proc,
            Self::cut_proc,
            Self::pick_proc,
            Self::drop_proc,
            Self::head_proc,
            Self::tail_proc,
            Self::filter_proc,
            Self::uniq_proc,
            Self::put_proc,
            Self::rename_proc,
            Self::fuse_proc,
            Self::shape_proc,
            Self::join_proc,
            Self::sample_proc,
            Self::sql_proc,
            Self::from_source_proc,
            Self::pass_proc,
            Self::explode_proc,
        ];
        operators.into_iter().find_map(|rule| self.attempt(rule))
    }

    // ------------------------------------------------------------------
    // Sorting and limiting
    // ------------------------------------------------------------------

    fn sort_proc(&mut self) -> Option<Proc> {
        let start = self.pos();
        self.keyword("sort")?;
        let flags = self.zero_or_more(|p| {
            p.ws1()?;
            p.sort_flag()
        });

        let mut seen = HashSet::new();
        let mut order = Order::Asc;
        let mut nullsfirst = false;
        for flag in flags {
            if !seen.insert(flag.name()) {
                let location = self.location(start, self.pos());
                return self.abort(Error::DuplicateArgument {
                    name: flag.name().to_string(),
                    location,
                });
            }
            match flag {
                SortFlag::Reverse => order = Order::Desc,
                SortFlag::Nulls(first) => nullsfirst = first,
            }
        }

        let args = self.attempt(|p| {
            p.ws1()?;
            p.exprs()
        });
        Some(Proc::Sort {
            args,
            order,
            nullsfirst,
        })
    }

    fn sort_flag(&mut self) -> Option<SortFlag> {
        self.attempt(|p| {
            p.match_literal("-r")?;
            p.not(|p| p.identifier_rest())?;
            Some(SortFlag::Reverse)
        })
        .or_else(|| {
            self.attempt(|p| {
                p.match_literal("-nulls")?;
                p.ws1()?;
                p.keyword("first")
                    .map(|_| SortFlag::Nulls(true))
                    .or_else(|| p.keyword("last").map(|_| SortFlag::Nulls(false)))
            })
        })
    }

    fn top_proc(&mut self) -> Option<Proc> {
        self.keyword("top")?;
        let limit = self.attempt(|p| {
            p.ws1()?;
            p.uint()
        });
        let flush = self
            .attempt(|p| {
                p.ws1()?;
                p.match_literal("-flush")?;
                p.not(|p| p.identifier_rest())
            })
            .is_some();
        let args = self.attempt(|p| {
            p.ws1()?;
            p.field_exprs()
        });
        Some(Proc::Top { limit, args, flush })
    }

    fn head_proc(&mut self) -> Option<Proc> {
        self.keyword("head")?;
        let count = self.optional_count();
        Some(Proc::Head { count })
    }

    fn tail_proc(&mut self) -> Option<Proc> {
        self.keyword("tail")?;
        let count = self.optional_count();
        Some(Proc::Tail { count })
    }

    fn optional_count(&mut self) -> i64 {
        self.attempt(|p| {
            p.ws1()?;
            p.uint()
        })
        .unwrap_or(1)
    }

    fn uniq_proc(&mut self) -> Option<Proc> {
        self.keyword("uniq")?;
        let cflag = self
            .attempt(|p| {
                p.ws1()?;
                p.match_literal("-c")?;
                p.not(|p| p.identifier_rest())
            })
            .is_some();
        Some(Proc::Uniq { cflag })
    }

    // ------------------------------------------------------------------
    // Field shaping
    // ------------------------------------------------------------------

    fn cut_proc(&mut self) -> Option<Proc> {
        self.keyword("cut")?;
        self.ws1()?;
        let args = self.flex_assignments()?;
        Some(Proc::Cut { args })
    }

    fn pick_proc(&mut self) -> Option<Proc> {
        self.keyword("pick")?;
        self.ws1()?;
        let args = self.flex_assignments()?;
        Some(Proc::Pick { args })
    }

    fn drop_proc(&mut self) -> Option<Proc> {
        self.keyword("drop")?;
        self.ws1()?;
        let args = self.field_exprs()?;
        Some(Proc::Drop { args })
    }

    fn put_proc(&mut self) -> Option<Proc> {
        self.keyword("put")?;
        self.ws1()?;
        let args = self.flex_assignments()?;
        Some(Proc::Put { args })
    }

    fn rename_proc(&mut self) -> Option<Proc> {
        self.keyword("rename")?;
        self.ws1()?;
        let args = self.assignments()?;
        Some(Proc::Rename { args })
    }

    fn fuse_proc(&mut self) -> Option<Proc> {
        self.keyword("fuse").map(|_| Proc::Fuse)
    }

    fn shape_proc(&mut self) -> Option<Proc> {
        self.keyword("shape").map(|_| Proc::Shape)
    }

    fn filter_proc(&mut self) -> Option<Proc> {
        self.keyword("filter")?;
        self.ws1()?;
        let expr = self.search_boolean()?;
        Some(Proc::Filter { expr })
    }

    fn pass_proc(&mut self) -> Option<Proc> {
        self.keyword("pass")?;
        self.end_of_op()?;
        Some(Proc::Pass)
    }

    /// `explode <exprs> by <type> [as <field>]`
    fn explode_proc(&mut self) -> Option<Proc> {
        self.keyword("explode")?;
        self.ws1()?;
        let args = self.exprs()?;
        self.ws1()?;
        self.keyword("by")?;
        self.ws1()?;
        let typ = self.type_()?;
        let as_ = self.attempt(|p| {
            p.ws1()?;
            p.keyword("as")?;
            p.ws1()?;
            p.lval()
        });
        Some(Proc::Explode { args, typ, as_ })
    }

    // ------------------------------------------------------------------
    // Join and sample
    // ------------------------------------------------------------------

    /// `[inner|left|right] join on <key> [= <key>] [<assignments>]`
    fn join_proc(&mut self) -> Option<Proc> {
        let style = self.join_style();
        self.keyword("join")?;
        self.ws1()?;
        self.keyword("on")?;
        self.ws1()?;
        let left_key = self.join_key()?;
        let right_key = self.attempt(|p| {
            p.ws();
            p.match_literal("=")?;
            p.not(|p| p.match_literal("="))?;
            p.ws();
            p.join_key()
        });
        let args = self.attempt(|p| {
            p.ws1()?;
            p.flex_assignments()
        });
        Some(Proc::Join {
            style,
            right_key: right_key.unwrap_or_else(|| left_key.clone()),
            left_key,
            args,
        })
    }

    /// `inner`, `left` or `right` plus trailing whitespace; `inner` when absent.
    pub(super) fn join_style(&mut self) -> String {
        ["inner", "left", "right"]
            .into_iter()
            .find_map(|style| {
                self.attempt(|p| {
                    p.keyword(style)?;
                    p.ws1()?;
                    Some(style)
                })
            })
            .unwrap_or("inner")
            .to_string()
    }

    pub(super) fn join_key(&mut self) -> Option<Expr> {
        self.lval().or_else(|| {
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

    /// `sample [<lval>]`, expanded to a shape-grouped `any()` plus `cut`.
    fn sample_proc(&mut self) -> Option<Proc> {
        self.keyword("sample")?;
        let expr = self
            .attempt(|p| {
                p.ws1()?;
                p.lval()
            })
            .unwrap_or(Expr::Root);

        let summarize = Proc::Summarize {
            duration: None,
            limit: 0,
            keys: Some(vec![Assignment {
                lhs: Some(Expr::id("shape")),
                rhs: Expr::call("typeof", vec![expr.clone()]),
            }]),
            aggs: Some(vec![Assignment {
                lhs: Some(Expr::id("sample")),
                rhs: Expr::Agg {
                    name: "any".to_string(),
                    expr: Some(Box::new(expr)),
                    where_: None,
                },
            }]),
        };
        let cut = Proc::Cut {
            args: vec![Assignment {
                lhs: None,
                rhs: Expr::id("sample"),
            }],
        };
        Some(Proc::Sequential(Sequential::new(vec![summarize, cut])))
    }

    fn sql_proc(&mut self) -> Option<Proc> {
        self.sql_expr().map(Proc::Sql)
    }

    // ------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------

    /// `[summarize] [every <dur>] by <keys> [-limit N]` or
    /// `[summarize] [every <dur>] <aggs> [by <keys>] [-limit N]`.
    pub(super) fn aggregation(&mut self) -> Option<Proc> {
        self.attempt(|p| {
            let duration = p.summarize_prefix();
            let keys = p.group_by()?;
            let limit = p.limit_arg();
            Some(Proc::Summarize {
                duration,
                limit,
                keys: Some(keys),
                aggs: None,
            })
        })
        .or_else(|| {
            self.attempt(|p| {
                let duration = p.summarize_prefix();
                let aggs = p.agg_assignments()?;
                let keys = p.attempt(|p| {
                    p.ws1()?;
                    p.group_by()
                });
                let limit = p.limit_arg();
                Some(Proc::Summarize {
                    duration,
                    limit,
                    keys,
                    aggs: Some(aggs),
                })
            })
        })
    }

    fn summarize_prefix(&mut self) -> Option<Primitive> {
        self.attempt(|p| {
            p.keyword("summarize")?;
            p.ws1()
        });
        self.attempt(|p| {
            p.keyword("every")?;
            p.ws1()?;
            let duration = p.duration_literal()?;
            p.ws1()?;
            Some(duration)
        })
    }

    fn group_by(&mut self) -> Option<Vec<Assignment>> {
        self.attempt(|p| {
            p.by_token()?;
            p.ws1()?;
            p.flex_assignments()
        })
    }

    fn limit_arg(&mut self) -> i64 {
        self.attempt(|p| {
            p.ws1()?;
            p.attempt(|p| {
                p.keyword("with")?;
                p.ws1()
            });
            p.match_literal("-limit")?;
            p.ws1()?;
            p.uint()
        })
        .unwrap_or(0)
    }

    fn agg_assignments(&mut self) -> Option<Vec<Assignment>> {
        self.sep_by1(|p| p.agg_assignment(), |p| p.comma())
    }

    fn agg_assignment(&mut self) -> Option<Assignment> {
        self.attempt(|p| {
            let lhs = p.lval()?;
            p.ws();
            p.match_literal(":=")?;
            p.ws();
            let rhs = p.agg()?;
            Some(Assignment { lhs: Some(lhs), rhs })
        })
        .or_else(|| self.agg().map(|rhs| Assignment { lhs: None, rhs }))
    }

    /// `name([expr]) [where <search>]`, also spelled `.where`.
    fn agg(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.not(|p| p.func_guard())?;
            let name = p.identifier_name()?;
            p.match_literal("(")?;
            p.ws();
            let expr = p.expr();
            p.ws();
            p.match_literal(")")?;
            p.not(|p| {
                p.ws();
                p.match_literal(".")?;
                p.not(|p| p.keyword("where"))
            })?;
            let where_ = p.where_clause();
            Some(Expr::Agg {
                name,
                expr: expr.map(Box::new),
                where_: where_.map(Box::new),
            })
        })
    }

    fn where_clause(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.attempt(|p| {
                p.ws1()?;
                p.keyword("where")
            })
            .or_else(|| {
                p.attempt(|p| {
                    p.ws();
                    p.match_literal(".")?;
                    p.keyword("where")
                })
            })?;
            p.ws1()?;
            p.search_boolean()
        })
    }

    // ------------------------------------------------------------------
    // Sources
    // ------------------------------------------------------------------

    /// `from <source>`: a single trunk with no pipeline of its own.
    fn from_source_proc(&mut self) -> Option<Proc> {
        self.keyword("from")?;
        self.ws1()?;
        let source = self.source()?;
        Some(Proc::From {
            trunks: vec![Trunk { source, seq: None }],
        })
    }

    pub(super) fn source(&mut self) -> Option<Source> {
        self.attempt(|p| p.file_source())
            .or_else(|| self.attempt(|p| p.http_source()))
            .or_else(|| self.attempt(|p| p.pool_source()))
    }

    fn file_source(&mut self) -> Option<Source> {
        self.keyword("file")?;
        self.ws1()?;
        let path = self.path()?;
        let format = self.format_arg();
        let layout = self.layout_arg();
        Some(Source::File {
            path,
            format,
            layout,
        })
    }

    fn http_source(&mut self) -> Option<Source> {
        self.keyword("get")?;
        self.ws1()?;
        self.lookahead(|p| p.match_literal("http:").or_else(|| p.match_literal("https:")))?;
        let url = self.path()?;
        let format = self.format_arg();
        let layout = self.layout_arg();
        Some(Source::Http {
            url,
            format,
            layout,
        })
    }

    fn pool_source(&mut self) -> Option<Source> {
        let name = self.pool_name()?;
        let at = self.attempt(|p| {
            p.ws1()?;
            p.keyword("at")?;
            p.ws1()?;
            let start = p.pos();
            p.one_or_more(|p| p.match_char("[0-9a-zA-Z]", |c| c.is_ascii_alphanumeric()))?;
            Some(p.text_from(start).to_string())
        });
        let range = self.attempt(|p| {
            p.ws1()?;
            p.keyword("range")?;
            p.ws1()?;
            let lower = p.literal()?;
            p.ws1()?;
            p.keyword("to")?;
            p.ws1()?;
            let upper = p.literal()?;
            Some(PoolRange { lower, upper })
        });
        let scan_order = self.attempt(|p| {
            p.ws1()?;
            p.keyword("order")?;
            p.ws1()?;
            p.keyword("asc")
                .map(|_| Order::Asc)
                .or_else(|| p.keyword("desc").map(|_| Order::Desc))
        });
        Some(Source::Pool {
            name,
            at,
            range,
            scan_order,
        })
    }

    fn pool_name(&mut self) -> Option<String> {
        self.quoted_string().or_else(|| {
            self.attempt(|p| {
                let start = p.pos();
                p.match_char("[A-Za-z0-9_$]", |c| {
                    c.is_ascii_alphanumeric() || matches!(c, '_' | '$')
                })?;
                p.zero_or_more(|p| {
                    p.match_char("[A-Za-z0-9_$.\\-@/]", |c| {
                        c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '-' | '@' | '/')
                    })
                });
                Some(p.text_from(start).to_string())
            })
        })
    }

    fn path(&mut self) -> Option<String> {
        self.quoted_string().or_else(|| {
            self.attempt(|p| {
                let start = p.pos();
                p.one_or_more(|p| {
                    p.match_char("[0-9a-zA-Z!@$%^&*_.,/?:\\[\\]{}~+-]", |c| {
                        c.is_ascii_alphanumeric() || "!@$%^&*_.,/?:[]{}~+-".contains(c)
                    })
                })?;
                Some(p.text_from(start).to_string())
            })
        })
    }

    fn format_arg(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.ws1()?;
            p.keyword("format")?;
            p.ws1()?;
            p.identifier_name()
        })
    }

    /// `order <fields>[:asc|:desc]`
    fn layout_arg(&mut self) -> Option<Layout> {
        self.attempt(|p| {
            p.ws1()?;
            p.keyword("order")?;
            p.ws1()?;
            let keys = p.field_exprs()?;
            let order = p
                .attempt(|p| {
                    p.match_literal(":")?;
                    p.keyword("asc")
                        .map(|_| Order::Asc)
                        .or_else(|| p.keyword("desc").map(|_| Order::Desc))
                })
                .unwrap_or_default();
            Some(Layout { keys, order })
        })
    }
}
