//! Shell-glob to regular-expression translation.
//!
//! Bare search words such as `foo*bar` are matched as regular expressions;
//! this module produces the regex source the grammar embeds in a
//! `RegexpSearch` node.

use regex::Regex;

/// Translation switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobOptions {
    /// Bash-like extras: `?`, `[...]` classes and `{a,b}` groups.
    pub extended: bool,
    /// `**` spans path segments, `*` stays inside one.
    pub globstar: bool,
    /// Regex flags; a `g` leaves the result unanchored.
    pub flags: String,
}

/// Reports whether `s` contains a glob wildcard.
pub fn is_globby(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// Converts a glob pattern into regex source. Total: every input produces
/// some pattern.
pub fn glob_to_regex_source(pattern: &str, options: &GlobOptions) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut in_group = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '/' | '$' | '^' | '+' | '.' | '(' | ')' | '=' | '!' | '|' => {
                out.push('\\');
                out.push(c);
            }
            '?' if options.extended => out.push('.'),
            '[' | ']' if options.extended => out.push(c),
            '{' if options.extended => {
                in_group = true;
                out.push('(');
            }
            '}' if options.extended => {
                in_group = false;
                out.push(')');
            }
            ',' if in_group => out.push('|'),
            '?' | '[' | ']' | '{' | '}' | ',' => {
                out.push('\\');
                out.push(c);
            }
            '*' => {
                let prev = i.checked_sub(1).map(|p| chars[p]);
                let mut stars = 1;
                while chars.get(i + 1) == Some(&'*') {
                    stars += 1;
                    i += 1;
                }
                let next = chars.get(i + 1).copied();

                if !options.globstar {
                    out.push_str(".*");
                } else {
                    let at_boundary = matches!(prev, None | Some('/'))
                        && matches!(next, None | Some('/'));
                    if stars > 1 && at_boundary {
                        out.push_str("((?:[^/]*(?:/|$))*)");
                        // the separator is part of the group
                        i += 1;
                    } else {
                        out.push_str("([^/]*)");
                    }
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    let source = if options.flags.contains('g') {
        out
    } else {
        format!("^{}$", out)
    };
    log::trace!("glob {:?} -> {:?}", pattern, source);
    source
}

/// Translates and compiles a glob in one step.
pub fn compile(pattern: &str, options: &GlobOptions) -> Result<Regex, regex::Error> {
    Regex::new(&glob_to_regex_source(pattern, options))
}
