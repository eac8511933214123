//! Program structure: declarations, pipelines and branching operators.

use super::state::ParserState;
use crate::ast::{Case, Decl, Expr, Proc, Sequential, Trunk};

impl<'a> ParserState<'a> {
    /// `__ program __ EOF`
    pub(super) fn start(&mut self) -> Option<Sequential> {
        self.attempt(|p| {
            p.ws();
            let program = p.program()?;
            p.ws();
            p.eof()?;
            Some(program)
        })
    }

    /// Leading `const`/`type` declarations, then the top-level pipeline.
    fn program(&mut self) -> Option<Sequential> {
        self.attempt(|p| {
            let decls = p.one_or_more(|p| {
                p.ws();
                let decl = p.decl()?;
                p.attempt(|p| {
                    p.ws();
                    p.match_literal(";")
                })
                .or_else(|| p.eol())?;
                Some(decl)
            })?;
            p.ws();
            let mut seq = p.sequential()?;
            seq.consts = Some(decls);
            Some(seq)
        })
        .or_else(|| self.sequential())
    }

    fn decl(&mut self) -> Option<Decl> {
        self.attempt(|p| {
            p.keyword("const")?;
            p.ws1()?;
            let name = p.identifier_name()?;
            p.ws();
            p.match_literal("=")?;
            p.ws();
            let expr = p.expr()?;
            Some(Decl::Const { name, expr })
        })
        .or_else(|| {
            self.attempt(|p| {
                p.keyword("type")?;
                p.ws1()?;
                let name = p.identifier_name()?;
                p.ws();
                p.match_literal("=")?;
                p.ws();
                let typ = p.type_()?;
                Some(Decl::TypeProc { name, typ })
            })
        })
    }

    /// `operation (| operation)*`
    pub(super) fn sequential(&mut self) -> Option<Sequential> {
        let procs = self.sep_by1(
            |p| p.operation(),
            |p| {
                p.ws();
                p.pipe()?;
                p.ws();
                Some(())
            },
        )?;
        Some(Sequential::new(procs))
    }

    fn operation(&mut self) -> Option<Proc> {
        self.split()
            .or_else(|| self.switch_on_value())
            .or_else(|| self.switch_on_search())
            .or_else(|| self.from_trunks())
            .or_else(|| self.operator())
            .or_else(|| {
                self.attempt(|p| match p.function()? {
                    Expr::Call { name, args } => {
                        p.end_of_op()?;
                        Some(Proc::Call { name, args })
                    }
                    _ => None,
                })
            })
            .or_else(|| {
                self.attempt(|p| {
                    let summarize = p.aggregation()?;
                    p.end_of_op()?;
                    Some(summarize)
                })
            })
            .or_else(|| {
                self.attempt(|p| {
                    let expr = p.search_boolean()?;
                    p.not(|p| p.agg_guard())?;
                    Some(Proc::Filter { expr })
                })
            })
    }

    /// `split ( => seq => seq ... )`
    fn split(&mut self) -> Option<Proc> {
        self.attempt(|p| {
            p.keyword("split")?;
            p.ws();
            p.match_literal("(")?;
            let procs = p.zero_or_more(|p| {
                p.ws();
                p.match_literal("=>")?;
                p.ws();
                p.sequential()
            });
            p.ws();
            p.match_literal(")")?;
            Some(Proc::Parallel { procs })
        })
    }

    /// `switch <expr> ( <literal|default> => seq ... )`
    fn switch_on_value(&mut self) -> Option<Proc> {
        self.attempt(|p| {
            p.keyword("switch")?;
            p.ws();
            let expr = p.expr()?;
            p.ws();
            p.match_literal("(")?;
            let cases = p.one_or_more(|p| {
                p.ws();
                let key = p.keyword("default").map(|_| None).or_else(|| p.literal().map(Some))?;
                p.case_body(key)
            })?;
            p.ws();
            p.match_literal(")")?;
            Some(Proc::Switch {
                expr: Some(expr),
                cases,
            })
        })
    }

    /// `switch ( <search|default> => seq ... )`
    fn switch_on_search(&mut self) -> Option<Proc> {
        self.attempt(|p| {
            p.keyword("switch")?;
            p.ws();
            p.match_literal("(")?;
            let cases = p.one_or_more(|p| {
                p.ws();
                let key = p
                    .keyword("default")
                    .map(|_| None)
                    .or_else(|| p.search_boolean().map(Some))?;
                p.case_body(key)
            })?;
            p.ws();
            p.match_literal(")")?;
            Some(Proc::Switch { expr: None, cases })
        })
    }

    /// `=> seq [;]` after a case key.
    fn case_body(&mut self, expr: Option<Expr>) -> Option<Case> {
        self.ws();
        self.match_literal("=>")?;
        self.ws();
        let seq = self.sequential()?;
        self.attempt(|p| {
            p.ws();
            p.match_literal(";")
        });
        Some(Case { expr, seq })
    }

    /// `from ( <source> [=> seq] [;] ... )`
    fn from_trunks(&mut self) -> Option<Proc> {
        self.attempt(|p| {
            p.keyword("from")?;
            p.ws();
            p.match_literal("(")?;
            let trunks = p.one_or_more(|p| p.trunk())?;
            p.ws();
            p.match_literal(")")?;
            Some(Proc::From { trunks })
        })
    }

    fn trunk(&mut self) -> Option<Trunk> {
        self.attempt(|p| {
            p.ws();
            let source = p.source()?;
            let seq = p.attempt(|p| {
                p.ws();
                p.match_literal("=>")?;
                p.ws();
                p.sequential()
            });
            p.attempt(|p| {
                p.ws();
                p.match_literal(";")
            });
            Some(Trunk { source, seq })
        })
    }
}
