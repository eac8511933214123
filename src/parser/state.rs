//! Parser state for the PEG engine.
//!
//! ParserState owns everything a single parse call mutates:
//! - the input cursor (a byte offset)
//! - the furthest failure position and the expectations recorded there
//! - the silent depth that mutes recording inside lookahead
//! - a cache of offset to line/column conversions
//! - a fatal error raised by a semantic action
//! - the packrat cache for expression rules
//!
//! Rules are methods returning `Option<T>`: `Some` on a match with the cursor
//! advanced, `None` on a mismatch. A rule built with [`ParserState::attempt`]
//! puts the cursor back where it started when it fails, so ordered choice is
//! just `a().or_else(|| b())`.

use super::memo::{MemoCache, MemoEntry, MemoKey, MemoRule};
use crate::ast::Expr;
use crate::error::{Error, Expectation, Location, Position, Result, SyntaxError};
use std::collections::BTreeMap;

pub struct ParserState<'a> {
    input: &'a str,
    pos: usize,
    /// Lookahead nesting depth; failures are not recorded while > 0
    silent: u32,
    furthest: usize,
    expected: Vec<Expectation>,
    fatal: Option<Error>,
    positions: BTreeMap<usize, Position>,
    memo: MemoCache,
}

impl<'a> ParserState<'a> {
    pub fn new(input: &'a str) -> Self {
        ParserState {
            input,
            pos: 0,
            silent: 0,
            furthest: 0,
            expected: Vec::new(),
            fatal: None,
            positions: BTreeMap::new(),
            memo: MemoCache::default(),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Source text consumed since `start`.
    pub fn text_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    /// Whether the input continues with `s`, without consuming or recording.
    pub fn check(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    // ------------------------------------------------------------------
    // Atoms
    // ------------------------------------------------------------------

    pub fn match_literal(&mut self, s: &str) -> Option<()> {
        if self.fatal.is_none() && self.check(s) {
            self.pos += s.len();
            Some(())
        } else {
            self.fail(|| Expectation::Literal {
                text: s.to_string(),
                ignore_case: false,
            })
        }
    }

    /// Case-insensitive literal; returns the text as written in the source.
    pub fn match_literal_i(&mut self, s: &str) -> Option<&'a str> {
        let rest = self.remaining();
        let mut source = rest.char_indices();
        let mut end = 0;
        let mut matched = true;
        for wanted in s.chars() {
            match source.next() {
                Some((i, ch)) if ch.to_lowercase().eq(wanted.to_lowercase()) => {
                    end = i + ch.len_utf8();
                }
                _ => {
                    matched = false;
                    break;
                }
            }
        }
        if self.fatal.is_none() && matched {
            self.pos += end;
            Some(&rest[..end])
        } else {
            self.fail(|| Expectation::Literal {
                text: s.to_string(),
                ignore_case: true,
            })
        }
    }

    /// One character satisfying `pred`; `desc` renders the class in messages.
    pub fn match_char(&mut self, desc: &str, pred: impl Fn(char) -> bool) -> Option<char> {
        match self.peek_char() {
            Some(c) if self.fatal.is_none() && pred(c) => {
                self.pos += c.len_utf8();
                Some(c)
            }
            _ => self.fail(|| Expectation::Class {
                description: desc.to_string(),
            }),
        }
    }

    pub fn any_char(&mut self) -> Option<char> {
        match self.peek_char() {
            Some(c) if self.fatal.is_none() => {
                self.pos += c.len_utf8();
                Some(c)
            }
            _ => self.fail(|| Expectation::Any),
        }
    }

    pub fn eof(&mut self) -> Option<()> {
        if self.fatal.is_none() && self.is_eof() {
            Some(())
        } else {
            self.fail(|| Expectation::End)
        }
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// Runs `f`; on failure the cursor goes back to where it was.
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let result = f(self);
        if result.is_none() {
            self.pos = start;
        }
        result
    }

    /// Positive lookahead: succeeds iff `f` would, consuming nothing.
    pub fn lookahead<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<()> {
        self.probe(f).then_some(())
    }

    /// Negative lookahead: succeeds iff `f` would fail, consuming nothing.
    pub fn not<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<()> {
        (!self.probe(f)).then_some(())
    }

    fn probe<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> bool {
        let start = self.pos;
        self.silent += 1;
        let matched = f(self).is_some();
        self.silent -= 1;
        self.pos = start;
        matched
    }

    /// Runs `f` once per (rule, offset) and replays the outcome afterwards.
    pub fn memoized(
        &mut self,
        rule: MemoRule,
        f: impl FnOnce(&mut Self) -> Option<Expr>,
    ) -> Option<Expr> {
        if self.fatal.is_some() {
            return None;
        }
        let key = MemoKey {
            rule,
            pos: self.pos,
            silent: self.silent > 0,
        };
        match self.memo.get(&key) {
            Some(MemoEntry::Success { value, end_pos }) => {
                let value = value.clone();
                self.pos = *end_pos;
                return Some(value);
            }
            Some(MemoEntry::Failure) => return None,
            None => {}
        }
        let result = self.attempt(f);
        let entry = match &result {
            Some(value) => MemoEntry::Success {
                value: value.clone(),
                end_pos: self.pos,
            },
            None => MemoEntry::Failure,
        };
        self.memo.insert(key, entry);
        result
    }

    /// A rule reported by name: inner failures are muted and a failure of the
    /// whole rule records `desc` instead.
    pub fn named<T>(&mut self, desc: &str, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        self.silent += 1;
        let result = f(self);
        self.silent -= 1;
        if result.is_none() {
            self.pos = start;
            let _: Option<()> = self.fail(|| Expectation::Other {
                description: desc.to_string(),
            });
        }
        result
    }

    pub fn zero_or_more<T>(&mut self, mut f: impl FnMut(&mut Self) -> Option<T>) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            let before = self.pos;
            match self.attempt(&mut f) {
                Some(item) => {
                    items.push(item);
                    // an empty match would repeat forever
                    if self.pos == before {
                        break;
                    }
                }
                None => break,
            }
        }
        items
    }

    pub fn one_or_more<T>(&mut self, f: impl FnMut(&mut Self) -> Option<T>) -> Option<Vec<T>> {
        let items = self.zero_or_more(f);
        if items.is_empty() { None } else { Some(items) }
    }

    /// `first (sep item)*`, restoring past a dangling separator.
    pub fn sep_by1<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Option<T>,
        mut sep: impl FnMut(&mut Self) -> Option<()>,
    ) -> Option<Vec<T>> {
        let first = self.attempt(&mut item)?;
        let mut items = vec![first];
        items.extend(self.zero_or_more(|p| {
            sep(p)?;
            item(p)
        }));
        Some(items)
    }

    // ------------------------------------------------------------------
    // Failure tracking
    // ------------------------------------------------------------------

    /// Records an expectation at the cursor and fails.
    pub fn fail<T>(&mut self, expectation: impl FnOnce() -> Expectation) -> Option<T> {
        if self.silent > 0 || self.pos < self.furthest {
            return None;
        }
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        self.expected.push(expectation());
        None
    }

    /// Fails the whole parse from inside a semantic action. Every atom stops
    /// matching once this is set, so the call stack unwinds to the top.
    pub fn abort<T>(&mut self, error: Error) -> Option<T> {
        log::debug!("semantic action failed: {}", error);
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
        None
    }

    /// Line and column of `offset`, scanning forward from the closest
    /// cached position before it.
    pub fn position(&mut self, offset: usize) -> Position {
        if let Some(cached) = self.positions.get(&offset) {
            return *cached;
        }
        let mut pos = self
            .positions
            .range(..offset)
            .next_back()
            .map(|(_, p)| *p)
            .unwrap_or(Position {
                offset: 0,
                line: 1,
                column: 1,
            });

        for ch in self.input[pos.offset..offset].chars() {
            if ch == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos.offset = offset;
        self.positions.insert(offset, pos);
        pos
    }

    pub fn location(&mut self, start: usize, end: usize) -> Location {
        Location {
            start: self.position(start),
            end: self.position(end),
        }
    }

    /// Turns the start rule's outcome into the caller's result.
    pub fn finish<T>(mut self, result: Option<T>) -> Result<T> {
        if let Some(error) = self.fatal.take() {
            return Err(error);
        }
        if let Some(value) = result {
            if self.is_eof() {
                return Ok(value);
            }
            let _: Option<()> = self.fail(|| Expectation::End);
        }
        Err(Error::Syntax(self.syntax_error()))
    }

    fn syntax_error(&mut self) -> SyntaxError {
        let offset = self.furthest.min(self.input.len());
        let found = self.input[offset..].chars().next();
        let end = offset + found.map_or(0, char::len_utf8);
        let location = self.location(offset, end);
        let expected = std::mem::take(&mut self.expected);
        let error = SyntaxError::new(expected, found.map(String::from), location);
        log::debug!("syntax error at offset {}: {}", offset, error.message);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracking() {
        let mut state = ParserState::new("ab\ncd\n\nx");
        assert_eq!(
            state.position(4),
            Position {
                offset: 4,
                line: 2,
                column: 2
            }
        );
        assert_eq!(state.position(7).line, 4);
        assert_eq!(state.position(7).column, 1);
        // earlier offsets still resolve after later ones are cached
        assert_eq!(state.position(1).column, 2);
    }

    #[test]
    fn test_attempt_restores_cursor() {
        let mut state = ParserState::new("abc");
        let r = state.attempt(|p| {
            p.match_literal("a")?;
            p.match_literal("x")
        });
        assert!(r.is_none());
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn test_furthest_failure_wins() {
        let mut state = ParserState::new("abc");
        let _ = state.attempt(|p| {
            p.match_literal("ab")?;
            p.match_literal("x")
        });
        let _ = state.match_literal("z");
        let err = state.finish::<()>(None).unwrap_err();
        match err {
            Error::Syntax(e) => {
                assert_eq!(e.message, "Expected \"x\" but \"c\" found.");
                assert_eq!(e.location.start.offset, 2);
                assert_eq!(e.location.end.offset, 3);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_lookahead_is_silent() {
        let mut state = ParserState::new("abc");
        assert!(state.not(|p| p.match_literal("abd")).is_some());
        assert!(state.lookahead(|p| p.match_literal("ab")).is_some());
        assert_eq!(state.pos(), 0);
        let err = state.finish::<()>(None).unwrap_err();
        if let Error::Syntax(e) = err {
            assert!(e.expected.is_empty());
        }
    }

    #[test]
    fn test_literal_ignore_case() {
        let mut state = ParserState::new("SeLeCt *");
        assert_eq!(state.match_literal_i("select"), Some("SeLeCt"));
        assert_eq!(state.pos(), 6);
        assert!(state.match_literal_i("from").is_none());
    }

    #[test]
    fn test_unconsumed_input_expects_end() {
        let mut state = ParserState::new("ab");
        let r = state.match_literal("a");
        let err = state.finish(r).unwrap_err();
        assert_eq!(err.to_string(), "Expected end of input but \"b\" found.");
    }

    #[test]
    fn test_memoized_replays_outcome() {
        let mut state = ParserState::new("ab");
        let mut runs = 0;
        let mut rule = |p: &mut ParserState<'_>| {
            runs += 1;
            p.match_literal("a")?;
            Some(Expr::Root)
        };
        assert_eq!(state.memoized(MemoRule::Expr, &mut rule), Some(Expr::Root));
        assert_eq!(state.pos(), 1);
        state.pos = 0;
        assert_eq!(state.memoized(MemoRule::Expr, &mut rule), Some(Expr::Root));
        assert_eq!(state.pos(), 1);
        assert_eq!(runs, 1);
    }
}
