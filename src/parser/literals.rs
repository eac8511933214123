//! Scalar literals: strings, addresses and networks, durations, times,
//! numbers, booleans and null.

use super::state::ParserState;
use crate::ast::{Expr, Primitive};

/// UTF-16 code units for a code point from a `\u` escape.
///
/// Code points past the BMP become a surrogate pair; anything above
/// U+10FFFF becomes the replacement character.
pub fn unicode_units(code: u32) -> Vec<u16> {
    if code < 0x10000 {
        return vec![code as u16];
    }
    if code > 0x10FFFF {
        return vec![0xFFFD];
    }
    let n = code - 0x10000;
    let high = 0xD800 + ((n >> 10) & 0x3ff);
    let low = 0xDC00 + (n & 0x3ff);
    vec![high as u16, low as u16]
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

const DURATION_UNITS: &[&str] = &["ns", "us", "ms", "s", "m", "h", "d", "w", "y"];

impl<'a> ParserState<'a> {
    /// Any literal, type values included.
    pub(super) fn literal(&mut self) -> Option<Expr> {
        self.attempt(|p| {
            p.not(|p| p.sql_keyword())?;
            p.type_literal()
        })
        .or_else(|| self.primitive_literal().map(Expr::Primitive))
    }

    pub(super) fn primitive_literal(&mut self) -> Option<Primitive> {
        self.string_literal()
            .or_else(|| self.subnet_literal())
            .or_else(|| self.address_literal())
            .or_else(|| self.duration_literal())
            .or_else(|| self.time_literal())
            .or_else(|| self.float_literal())
            .or_else(|| self.int_literal())
            .or_else(|| self.bool_literal())
            .or_else(|| self.null_literal())
    }

    fn string_literal(&mut self) -> Option<Primitive> {
        self.quoted_string().map(|s| Primitive::new("string", s))
    }

    fn subnet_literal(&mut self) -> Option<Primitive> {
        self.ip6_net()
            .or_else(|| self.ip4_net())
            .map(|text| Primitive::new("net", text))
    }

    fn address_literal(&mut self) -> Option<Primitive> {
        self.ip6_addr()
            .or_else(|| self.ip4())
            .map(|text| Primitive::new("ip", text))
    }

    /// IPv6 address or network; used ahead of identifiers in expressions,
    /// where `fe80::1` would otherwise read as the field `fe80`.
    pub(super) fn ip6_literal(&mut self) -> Option<Primitive> {
        self.ip6_net()
            .map(|text| Primitive::new("net", text))
            .or_else(|| self.ip6_addr().map(|text| Primitive::new("ip", text)))
    }

    fn ip6_net(&mut self) -> Option<String> {
        self.attempt(|p| {
            let start = p.pos();
            p.ip6()?;
            p.match_literal("/")?;
            p.uint()?;
            p.not(|p| p.identifier_rest())?;
            Some(p.text_from(start).to_string())
        })
    }

    fn ip6_addr(&mut self) -> Option<String> {
        self.attempt(|p| {
            let text = p.ip6()?;
            p.not(|p| p.identifier_rest())?;
            Some(text)
        })
    }

    fn ip4_net(&mut self) -> Option<String> {
        self.attempt(|p| {
            let start = p.pos();
            p.ip4()?;
            p.match_literal("/")?;
            p.uint()?;
            Some(p.text_from(start).to_string())
        })
    }

    /// Dotted quad. Octet ranges are not checked here.
    pub(super) fn ip4(&mut self) -> Option<String> {
        self.attempt(|p| {
            let start = p.pos();
            p.uint()?;
            for _ in 0..3 {
                p.match_literal(".")?;
                p.uint()?;
            }
            Some(p.text_from(start).to_string())
        })
    }

    /// Accepts a superset of legal IPv6 text; a bare `hex:hex` is refused so
    /// that things like `a:b` are not read as addresses.
    fn ip6(&mut self) -> Option<String> {
        self.attempt(|p| {
            p.not(|p| {
                p.hex()?;
                p.match_literal(":")?;
                p.hex()?;
                p.not(|p| p.match_char("[0-9a-fA-F:]", |c| is_hex(c) || c == ':'))
            })?;
            let start = p.pos();
            p.ip6_variations()?;
            Some(p.text_from(start).to_string())
        })
    }

    fn ip6_variations(&mut self) -> Option<()> {
        // h:h:...:tail
        self.attempt(|p| {
            p.one_or_more(|p| p.hex_colon())?;
            p.ip6_tail()
        })
        // h:h::h:...:tail
        .or_else(|| {
            self.attempt(|p| {
                p.hex()?;
                p.zero_or_more(|p| p.colon_hex());
                p.match_literal("::")?;
                p.zero_or_more(|p| p.hex_colon());
                p.ip6_tail()
            })
        })
        // ::h:...:tail
        .or_else(|| {
            self.attempt(|p| {
                p.match_literal("::")?;
                p.zero_or_more(|p| p.hex_colon());
                p.ip6_tail()
            })
        })
        // h:h::
        .or_else(|| {
            self.attempt(|p| {
                p.hex()?;
                p.zero_or_more(|p| p.colon_hex());
                p.match_literal("::")
            })
        })
        .or_else(|| self.match_literal("::"))
    }

    fn ip6_tail(&mut self) -> Option<()> {
        self.ip4().map(drop).or_else(|| self.hex())
    }

    fn hex(&mut self) -> Option<()> {
        self.one_or_more(|p| p.match_char("[0-9a-fA-F]", is_hex))
            .map(drop)
    }

    fn hex_colon(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.hex()?;
            p.match_literal(":")
        })
    }

    fn colon_hex(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.match_literal(":")?;
            p.hex()
        })
    }

    // ------------------------------------------------------------------
    // Time and duration
    // ------------------------------------------------------------------

    pub(super) fn duration_literal(&mut self) -> Option<Primitive> {
        self.attempt(|p| {
            let start = p.pos();
            let _ = p.match_literal("-");
            p.one_or_more(|p| {
                p.decimal()?;
                p.time_unit()
            })?;
            Some(Primitive::new("duration", p.text_from(start)))
        })
    }

    fn decimal(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.digits()?;
            p.attempt(|p| {
                p.match_literal(".")?;
                p.digits()
            });
            Some(())
        })
    }

    fn time_unit(&mut self) -> Option<()> {
        DURATION_UNITS
            .iter()
            .find_map(|unit| self.match_literal_i(unit))
            .map(drop)
    }

    fn time_literal(&mut self) -> Option<Primitive> {
        self.attempt(|p| {
            let start = p.pos();
            p.full_date()?;
            p.match_literal("T")?;
            p.partial_time()?;
            p.time_offset()?;
            Some(Primitive::new("time", p.text_from(start)))
        })
    }

    fn full_date(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.fixed_digits(4)?;
            p.match_literal("-")?;
            p.fixed_digits(2)?;
            p.match_literal("-")?;
            p.fixed_digits(2)
        })
    }

    fn partial_time(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.fixed_digits(2)?;
            p.match_literal(":")?;
            p.fixed_digits(2)?;
            p.match_literal(":")?;
            p.fixed_digits(2)?;
            p.fraction();
            Some(())
        })
    }

    fn time_offset(&mut self) -> Option<()> {
        self.match_literal("Z").or_else(|| {
            self.attempt(|p| {
                p.match_literal("+").or_else(|| p.match_literal("-"))?;
                p.fixed_digits(2)?;
                p.match_literal(":")?;
                p.fixed_digits(2)?;
                p.fraction();
                Some(())
            })
        })
    }

    fn fraction(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.match_literal(".")?;
            p.digits()
        })
    }

    fn fixed_digits(&mut self, n: usize) -> Option<()> {
        self.attempt(|p| {
            for _ in 0..n {
                p.match_char("[0-9]", is_digit)?;
            }
            Some(())
        })
    }

    fn digits(&mut self) -> Option<()> {
        self.one_or_more(|p| p.match_char("[0-9]", is_digit))
            .map(drop)
    }

    // ------------------------------------------------------------------
    // Numbers, booleans, null
    // ------------------------------------------------------------------

    fn float_literal(&mut self) -> Option<Primitive> {
        self.attempt(|p| {
            let start = p.pos();
            let _ = p.match_literal("-");
            let with_point = p.attempt(|p| {
                p.digits()?;
                p.match_literal(".")?;
                let _ = p.digits();
                let _ = p.exponent();
                Some(())
            });
            with_point
                .or_else(|| {
                    p.attempt(|p| {
                        p.match_literal(".")?;
                        p.digits()?;
                        let _ = p.exponent();
                        Some(())
                    })
                })
                .or_else(|| {
                    p.attempt(|p| {
                        p.digits()?;
                        p.exponent()
                    })
                })?;
            Some(Primitive::new("float64", p.text_from(start)))
        })
    }

    fn exponent(&mut self) -> Option<()> {
        self.attempt(|p| {
            p.match_char("[eE]", |c| c == 'e' || c == 'E')?;
            let _ = p.match_char("[+-]", |c| c == '+' || c == '-');
            p.digits()
        })
    }

    fn int_literal(&mut self) -> Option<Primitive> {
        self.attempt(|p| {
            let start = p.pos();
            let _ = p.match_literal("-");
            p.digits()?;
            let text = p.text_from(start);
            text.parse::<i64>().ok()?;
            Some(Primitive::new("int64", text))
        })
    }

    fn bool_literal(&mut self) -> Option<Primitive> {
        self.word("true")
            .map(|_| Primitive::new("bool", "true"))
            .or_else(|| self.word("false").map(|_| Primitive::new("bool", "false")))
    }

    fn null_literal(&mut self) -> Option<Primitive> {
        self.word("null").map(|_| Primitive::new("null", ""))
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Double- or single-quoted string, unescaped.
    pub(super) fn quoted_string(&mut self) -> Option<String> {
        self.quoted('"').or_else(|| self.quoted('\''))
    }

    fn quoted(&mut self, quote: char) -> Option<String> {
        self.attempt(|p| {
            p.match_char(if quote == '"' { "[\"]" } else { "[']" }, |c| c == quote)?;
            let mut units: Vec<u16> = Vec::new();
            loop {
                if let Some(escaped) = p.attempt(|p| {
                    p.match_literal("\\")?;
                    p.escape_sequence()
                }) {
                    units.extend(escaped);
                    continue;
                }
                let plain = p.attempt(|p| {
                    p.not(|p| p.match_char("quote", |c| c == quote || c == '\\'))?;
                    p.any_char()
                });
                match plain {
                    Some(c) => {
                        let mut buf = [0u16; 2];
                        units.extend_from_slice(c.encode_utf16(&mut buf));
                    }
                    None => break,
                }
            }
            p.match_char(if quote == '"' { "[\"]" } else { "[']" }, |c| c == quote)?;
            Some(String::from_utf16_lossy(&units))
        })
    }

    /// The part of an escape after the backslash, as UTF-16 units.
    pub(super) fn escape_sequence(&mut self) -> Option<Vec<u16>> {
        self.attempt(|p| {
            p.match_literal("x")?;
            let start = p.pos();
            p.match_char("[0-9a-fA-F]", is_hex)?;
            p.match_char("[0-9a-fA-F]", is_hex)?;
            let code = u32::from_str_radix(p.text_from(start), 16).ok()?;
            Some(vec![code as u16])
        })
        .or_else(|| {
            self.single_char_escape().map(|c| {
                let mut buf = [0u16; 2];
                c.encode_utf16(&mut buf).to_vec()
            })
        })
        .or_else(|| self.unicode_escape())
    }

    fn single_char_escape(&mut self) -> Option<char> {
        let c = self.match_char("[\"'\\\\bfnrtv]", |c| {
            matches!(c, '"' | '\'' | '\\' | 'b' | 'f' | 'n' | 'r' | 't' | 'v')
        })?;
        Some(match c {
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            other => other,
        })
    }

    fn unicode_escape(&mut self) -> Option<Vec<u16>> {
        self.attempt(|p| {
            p.match_literal("u")?;
            let braced = p.attempt(|p| {
                p.match_literal("{")?;
                let start = p.pos();
                p.match_char("[0-9a-fA-F]", is_hex)?;
                for _ in 0..5 {
                    if p.match_char("[0-9a-fA-F]", is_hex).is_none() {
                        break;
                    }
                }
                let digits = p.text_from(start);
                p.match_literal("}")?;
                Some(digits)
            });
            let digits = match braced {
                Some(digits) => digits,
                None => {
                    let start = p.pos();
                    for _ in 0..4 {
                        p.match_char("[0-9a-fA-F]", is_hex)?;
                    }
                    p.text_from(start)
                }
            };
            let code = u32::from_str_radix(digits, 16).ok()?;
            Some(unicode_units(code))
        })
    }
}
