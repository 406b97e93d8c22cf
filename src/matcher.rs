//! Glob matching capability for labeling rules
//!
//! A pattern string as written in the labeler config is richer than a single
//! glob: it may contain several `|`-separated subpatterns, and a subpattern
//! may be negated with a leading `!` (or `-` when extended globs are enabled,
//! freeing `!` for `!( )` group syntax). Baseline semantics are always on:
//! globstar, dotfile matching, negation, and `|` splitting. Brace expansion,
//! extended-glob groups, and case-insensitivity are opt-in flags.
//!
//! Baseline patterns compile through globset. Patterns using extended-glob
//! groups have no globset equivalent, so they compile through a glob-to-regex
//! translation instead.

use crate::config::MatchOptions;
use crate::error::{Error, Result};
use globset::GlobBuilder;
use regex::RegexBuilder;

/// Compiles pattern strings under a fixed flag set
#[derive(Debug, Clone, Copy)]
pub struct GlobMatcher {
    options: MatchOptions,
}

/// A compiled pattern string: positive and negative subpatterns
#[derive(Debug)]
pub struct PatternSet {
    positives: Vec<Compiled>,
    negatives: Vec<Compiled>,
}

#[derive(Debug)]
enum Compiled {
    Glob(globset::GlobMatcher),
    Regex(regex::Regex),
}

impl Compiled {
    fn is_match(&self, path: &str) -> bool {
        match self {
            Self::Glob(glob) => glob.is_match(path),
            Self::Regex(re) => re.is_match(path),
        }
    }
}

impl PatternSet {
    /// Test a path against this pattern
    ///
    /// Matches iff any positive subpattern matches (or the pattern consists
    /// solely of negations) and no negative subpattern matches.
    pub fn is_match(&self, path: &str) -> bool {
        let positive = self.positives.is_empty() || self.positives.iter().any(|p| p.is_match(path));
        positive && !self.negatives.iter().any(|n| n.is_match(path))
    }
}

impl GlobMatcher {
    /// Create a matcher with the given capability flags
    pub const fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// Compile one pattern string from the config into a reusable matcher
    pub fn compile(&self, pattern: &str) -> Result<PatternSet> {
        let negate_char = if self.options.extended_glob { '-' } else { '!' };
        let mut positives = Vec::new();
        let mut negatives = Vec::new();

        for sub in split_subpatterns(pattern, self.options) {
            if sub.is_empty() {
                return Err(Error::Pattern {
                    pattern: pattern.to_string(),
                    message: "empty subpattern".to_string(),
                });
            }
            if let Some(rest) = sub.strip_prefix(negate_char) {
                negatives.push(self.compile_single(pattern, rest)?);
            } else {
                positives.push(self.compile_single(pattern, &sub)?);
            }
        }

        Ok(PatternSet {
            positives,
            negatives,
        })
    }

    /// Convenience form: compile and test in one call
    pub fn matches(&self, path: &str, pattern: &str) -> Result<bool> {
        Ok(self.compile(pattern)?.is_match(path))
    }

    fn compile_single(&self, full_pattern: &str, sub: &str) -> Result<Compiled> {
        if self.options.extended_glob && contains_extglob(sub) {
            return self.compile_regex(full_pattern, sub);
        }

        let glob_pattern = if self.options.brace_expansion {
            sub.to_string()
        } else {
            escape_braces(sub)
        };

        let glob = GlobBuilder::new(&glob_pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .case_insensitive(self.options.case_insensitive)
            .build()
            .map_err(|e| Error::Pattern {
                pattern: full_pattern.to_string(),
                message: e.kind().to_string(),
            })?;
        Ok(Compiled::Glob(glob.compile_matcher()))
    }

    fn compile_regex(&self, full_pattern: &str, sub: &str) -> Result<Compiled> {
        let body = Translator::new(sub, self.options)
            .translate()
            .map_err(|message| Error::Pattern {
                pattern: full_pattern.to_string(),
                message,
            })?;
        let re = RegexBuilder::new(&format!("^{body}$"))
            .case_insensitive(self.options.case_insensitive)
            .build()
            .map_err(|e| Error::Pattern {
                pattern: full_pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Compiled::Regex(re))
    }
}

/// Split a pattern string on top-level `|` separators
///
/// Separators inside bracket classes are never split points. When the
/// relevant flags are on, separators inside `( )` groups and `{ }` braces
/// are protected as well.
fn split_subpatterns(pattern: &str, options: MatchOptions) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut paren_depth = 0usize;
    let mut brace_depth = 0usize;
    let mut in_class = false;

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                current.push(c);
            }
            ']' if in_class => {
                in_class = false;
                current.push(c);
            }
            '(' if options.extended_glob && !in_class => {
                paren_depth += 1;
                current.push(c);
            }
            ')' if options.extended_glob && !in_class && paren_depth > 0 => {
                paren_depth -= 1;
                current.push(c);
            }
            '{' if options.brace_expansion && !in_class => {
                brace_depth += 1;
                current.push(c);
            }
            '}' if options.brace_expansion && !in_class && brace_depth > 0 => {
                brace_depth -= 1;
                current.push(c);
            }
            '|' if !in_class && paren_depth == 0 && brace_depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Escape braces so globset treats them literally when brace expansion is off
fn escape_braces(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '{' if !in_class => out.push_str("[{]"),
            '}' if !in_class => out.push_str("[}]"),
            _ => out.push(c),
        }
    }
    out
}

/// Does the subpattern use extended-glob group syntax?
fn contains_extglob(pattern: &str) -> bool {
    let mut in_class = false;
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '@' | '?' | '*' | '+' | '!' if !in_class => {
                if chars.get(i + 1) == Some(&'(') {
                    return true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

/// Glob-to-regex translator for the extended-glob path
///
/// Only used when a subpattern contains `X( )` group syntax; plain patterns
/// stay on globset. `!( )` would need lookaround the regex engine does not
/// provide, so it is rejected at compile time.
struct Translator {
    chars: Vec<char>,
    pos: usize,
    options: MatchOptions,
}

impl Translator {
    fn new(pattern: &str, options: MatchOptions) -> Self {
        Self {
            chars: pattern.chars().collect(),
            pos: 0,
            options,
        }
    }

    fn translate(mut self) -> std::result::Result<String, String> {
        let body = self.alternative(&[])?;
        if self.pos < self.chars.len() {
            return Err(format!("unbalanced '{}'", self.chars[self.pos]));
        }
        Ok(body)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Translate until end of input or one of the stop characters
    fn alternative(&mut self, stop: &[char]) -> std::result::Result<String, String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if stop.contains(&c) {
                break;
            }
            self.pos += 1;
            match c {
                '\\' => {
                    if let Some(escaped) = self.peek() {
                        self.pos += 1;
                        out.push_str(&regex::escape(&escaped.to_string()));
                    } else {
                        out.push_str("\\\\");
                    }
                }
                '@' | '+' | '!' if self.peek() == Some('(') => {
                    if c == '!' {
                        return Err("'!( )' groups are not supported".to_string());
                    }
                    let quantifier = if c == '+' { "+" } else { "" };
                    out.push_str(&self.group(quantifier)?);
                }
                '?' => {
                    if self.peek() == Some('(') {
                        out.push_str(&self.group("?")?);
                    } else {
                        out.push_str("[^/]");
                    }
                }
                '*' => {
                    if self.peek() == Some('(') {
                        out.push_str(&self.group("*")?);
                    } else if self.peek() == Some('*') {
                        out.push_str(&self.globstar(stop));
                    } else {
                        out.push_str("[^/]*");
                    }
                }
                '[' => out.push_str(&self.bracket_class()?),
                '{' if self.options.brace_expansion => {
                    let mut alternatives = Vec::new();
                    loop {
                        alternatives.push(self.alternative(&[',', '}'])?);
                        match self.peek() {
                            Some(',') => self.pos += 1,
                            Some('}') => {
                                self.pos += 1;
                                break;
                            }
                            _ => return Err("unterminated brace alternation".to_string()),
                        }
                    }
                    out.push_str(&format!("(?:{})", alternatives.join("|")));
                }
                _ => out.push_str(&regex::escape(&c.to_string())),
            }
        }
        Ok(out)
    }

    /// Translate `**`, which must span a whole path component to recurse
    fn globstar(&mut self, stop: &[char]) -> String {
        // self.pos is on the second '*'; the component boundary check looks
        // one character back from the first '*'.
        let before = self.pos.checked_sub(2).and_then(|i| self.chars.get(i)).copied();
        self.pos += 1;
        let at_start = before.is_none() || before == Some('/');
        let next = self.peek();
        let at_end = next.is_none() || next.is_some_and(|c| stop.contains(&c));

        if at_start && next == Some('/') {
            // "**/" may match zero components
            self.pos += 1;
            "(?:.*/)?".to_string()
        } else if at_start && at_end {
            ".*".to_string()
        } else {
            // misplaced globstar degrades to a plain star
            "[^/]*".to_string()
        }
    }

    fn bracket_class(&mut self) -> std::result::Result<String, String> {
        let mut out = String::from("[");
        match self.peek() {
            Some('!' | '^') => {
                self.pos += 1;
                out.push('^');
            }
            _ => {}
        }
        let mut first = true;
        loop {
            let Some(c) = self.peek() else {
                return Err("unterminated bracket class".to_string());
            };
            self.pos += 1;
            match c {
                ']' if !first => break,
                '\\' => {
                    out.push('\\');
                    if let Some(escaped) = self.peek() {
                        self.pos += 1;
                        out.push_str(&regex::escape(&escaped.to_string()));
                    }
                }
                '-' if !first && self.peek() != Some(']') => out.push('-'),
                ']' | '^' | '[' | '&' | '~' => {
                    out.push('\\');
                    out.push(c);
                }
                _ => out.push(c),
            }
            first = false;
        }
        out.push(']');
        Ok(out)
    }

    fn group(&mut self, quantifier: &str) -> std::result::Result<String, String> {
        // self.pos is on the '('
        self.pos += 1;
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.alternative(&['|', ')'])?);
            match self.peek() {
                Some('|') => self.pos += 1,
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err("unterminated extended-glob group".to_string()),
            }
        }
        Ok(format!("(?:{}){quantifier}", alternatives.join("|")))
    }
}
