//! Packrat cache for the expression rules.
//!
//! Index brackets, assignments and search predicates all try one reading
//! of an expression and fall back to another starting at the same offset.
//! Caching each (rule, offset) outcome keeps nested input linear instead of
//! re-parsing every level once per alternative.

use crate::ast::Expr;
use std::collections::HashMap;

/// The rules whose outcomes are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoRule {
    Expr,
    Additive,
    Deref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub rule: MemoRule,
    pub pos: usize,
    /// Outcomes computed inside a lookahead recorded no expectations, so
    /// they are kept apart from those that did.
    pub silent: bool,
}

#[derive(Debug, Clone)]
pub enum MemoEntry {
    Success { value: Expr, end_pos: usize },
    Failure,
}

#[derive(Debug, Default)]
pub struct MemoCache {
    entries: HashMap<MemoKey, MemoEntry>,
}

impl MemoCache {
    pub fn get(&self, key: &MemoKey) -> Option<&MemoEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: MemoKey, entry: MemoEntry) {
        self.entries.insert(key, entry);
    }
}
