//! Whitespace, comments, identifiers and keyword tokens.

use super::state::ParserState;

/// Keywords of the embedded SQL form. A search term in an implicit `and`
/// chain may not be one of these, and neither may a table alias.
pub(super) const SQL_KEYWORDS: &[&str] = &[
    "select", "as", "from", "join", "where", "group", "by", "having", "order", "limit", "on",
    "inner", "left", "right", "asc", "desc",
];

/// Words that end a bare search term rather than being one.
const SEARCH_RESERVED: &[&str] = &["and", "or", "not", "by", "in"];

pub(super) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(super) fn is_identifier_rest(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

impl<'a> ParserState<'a> {
    /// `__`: optional whitespace, newlines and comments.
    pub(super) fn ws(&mut self) {
        self.zero_or_more(|p| p.any_space());
    }

    /// `_`: at least one whitespace, newline or comment.
    pub(super) fn ws1(&mut self) -> Option<()> {
        self.one_or_more(|p| p.any_space()).map(drop)
    }

    fn any_space(&mut self) -> Option<()> {
        self.white_space()
            .or_else(|| self.line_terminator())
            .or_else(|| self.comment())
    }

    pub(super) fn white_space(&mut self) -> Option<()> {
        self.named("whitespace", |p| {
            p.match_char("whitespace", |c| {
                matches!(c, '\t' | '\u{b}' | '\u{c}' | ' ' | '\u{a0}' | '\u{feff}')
            })
        })
        .map(drop)
    }

    pub(super) fn line_terminator(&mut self) -> Option<()> {
        self.named("end of line", |p| {
            p.match_char("[\\n\\r\\u2028\\u2029]", |c| {
                matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
            })
        })
        .map(drop)
    }

    fn comment(&mut self) -> Option<()> {
        self.named("comment", |p| {
            p.match_literal("//")?;
            p.zero_or_more(|p| {
                p.not(|p| p.line_terminator())?;
                p.any_char()
            });
            Some(())
        })
    }

    /// Trailing whitespace up to and including a line break.
    pub(super) fn eol(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.zero_or_more(|p| p.white_space());
            p.line_terminator()
        })
    }

    /// `_` or end of input.
    pub(super) fn end_of_token(&mut self) -> Option<()> {
        self.ws1().or_else(|| self.eof())
    }

    // ------------------------------------------------------------------
    // Identifiers and keywords
    // ------------------------------------------------------------------

    pub(super) fn identifier_rest(&mut self) -> Option<char> {
        self.match_char("[a-zA-Z_$0-9]", is_identifier_rest)
    }

    /// Case-insensitive keyword ending at an identifier boundary.
    pub(super) fn keyword(&mut self, word: &str) -> Option<()> {
        self.attempt(|p| {
            p.match_literal_i(word)?;
            p.not(|p| p.identifier_rest())
        })
    }

    /// Case-sensitive word ending at an identifier boundary.
    pub(super) fn word(&mut self, word: &str) -> Option<()> {
        self.attempt(|p| {
            p.match_literal(word)?;
            p.not(|p| p.identifier_rest())
        })
    }

    pub(super) fn identifier_name(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.not(|p| {
                p.word("true")
                    .or_else(|| p.word("false"))
                    .or_else(|| p.word("null"))
            })?;
            let start = p.pos();
            p.match_char("[a-zA-Z_$]", is_identifier_start)?;
            p.zero_or_more(|p| p.identifier_rest());
            Some(p.text_from(start).to_string())
        })
    }

    pub(super) fn sql_keyword(&mut self) -> Option<()> {
        SQL_KEYWORDS.iter().find_map(|kw| self.keyword(kw))
    }

    pub(super) fn search_reserved(&mut self) -> Option<()> {
        SEARCH_RESERVED.iter().find_map(|kw| self.keyword(kw))
    }

    pub(super) fn and_token(&mut self) -> Option<()> {
        self.keyword("and")
    }

    pub(super) fn or_token(&mut self) -> Option<()> {
        self.keyword("or")
    }

    pub(super) fn not_token(&mut self) -> Option<()> {
        self.keyword("not")
    }

    pub(super) fn by_token(&mut self) -> Option<()> {
        self.keyword("by")
    }

    // ------------------------------------------------------------------
    // Operator boundaries
    // ------------------------------------------------------------------

    /// `|` not opening a `|{...}|` map or `|[...]|` set.
    pub(super) fn pipe(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.match_literal("|")?;
            p.not(|p| p.match_literal("{").or_else(|| p.match_literal("[")))
        })
    }

    /// Lookahead for whatever may follow a complete pipeline operator.
    pub(super) fn end_of_op(&mut self) -> Option<()> {
        self.lookahead(|p| {
            p.ws();
            p.pipe()
                .or_else(|| p.match_literal("=>"))
                .or_else(|| p.match_literal(")"))
                .or_else(|| p.match_literal(";"))
                .or_else(|| p.eof())
        })
    }

    /// Trailing context showing that a search is really an aggregation.
    pub(super) fn agg_guard(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.ws1()?;
            p.by_token().or_else(|| p.match_literal("-with"))?;
            p.end_of_token()
        })
        .or_else(|| {
            self.attempt(|p| {
                p.ws();
                p.match_literal(",")
            })
        })
    }

    /// Unsigned decimal integer that fits an `i64`.
    pub(super) fn uint(&mut self) -> Option<i64> {
        self.attempt(|p| {
            let start = p.pos();
            p.one_or_more(|p| p.match_char("[0-9]", |c| c.is_ascii_digit()))?;
            p.text_from(start).parse().ok()
        })
    }

    pub(super) fn comma(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.ws();
            p.match_literal(",")?;
            p.ws();
            Some(())
        })
    }
}
