//! # Entity and history query syntax
//!
//! `vp-query-syntax` turns the raw strings typed into a search box (or passed
//! on the command line) into [`Rule`]s: ordered maps from field name to the
//! values written for that field. Each raw string becomes at most one rule, and
//! the compilers in `vp-query` treat a rule set as an OR of rules whose fields
//! are AND-ed together.
//!
//! The accepted forms are `field: 'single quoted'`, `field: "double quoted"`
//! and `field: bareword`, each optionally prefixed with `-`. The colon is
//! optional too: `author Joe` is the same as `author:Joe` as long as `Joe`
//! doesn't itself start a clause. Values without a field land in the `text`
//! field. Nothing is ever rejected: text that doesn't look like a field clause
//! is a bareword.
//!
//! ## Example
//! ```
//! use vp_query_syntax::parse_rules;
//!
//! let rules = parse_rules(["author:Joe text search", "", "status: 'draft'"], false);
//! assert_eq!(rules.len(), 2);
//! assert_eq!(rules[0].first("author"), Some("Joe"));
//! assert_eq!(rules[0].first("text"), Some("search"));
//! assert_eq!(rules[1].first("status"), Some("draft"));
//! ```

mod value;

pub use value::{Token, Tokens, tokenize};

use std::fmt::{self, Write};

/// Field that collects values written without a `field:` label.
pub const TEXT_FIELD: &str = "text";

/// Ordered rule set; each entry comes from one non-empty raw query string.
pub type RuleSet = Vec<Rule>;

/// Parses every raw query into a rule. Queries that produce no clauses are
/// dropped rather than yielding an empty rule, so indices shift.
///
/// `allow_empty` keeps clauses whose (quoted) value is empty, e.g. `title:""`.
pub fn parse_rules<I>(queries: I, allow_empty: bool) -> RuleSet
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    queries
        .into_iter()
        .filter_map(|query| parse_rule(query.as_ref(), allow_empty))
        .collect()
}

/// Parses a single raw query. Returns `None` when nothing in it survives.
pub fn parse_rule(query: &str, allow_empty: bool) -> Option<Rule> {
    let mut rule = Rule::new();
    for clause in scan_clauses(query) {
        if clause.value.is_empty() && !allow_empty {
            continue;
        }
        let field = clause.field.unwrap_or_else(|| TEXT_FIELD.to_string());
        rule.push(field, clause.value);
    }
    if rule.is_empty() { None } else { Some(rule) }
}

/// Runs only the scanner, exposing every clause with its quoting and
/// negation marker. Useful for inspecting how a query was split.
pub fn scan_clauses(query: &str) -> Vec<ParsedClause> {
    Scanner::new(query).scan()
}

/// One `[-][field:]value` match found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedClause {
    /// Leading `-` was present. Accepted syntax only: no compiler negates yet.
    pub negated: bool,
    /// Field name as written; `None` for unlabeled text.
    pub field: Option<String>,
    /// Value with the enclosing quote's escapes resolved.
    pub value: String,
    pub quote: QuoteStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum QuoteStyle {
    Bare,
    Single,
    Double,
}

/// Field name to values, in first-seen order. Field names keep their case;
/// repeated fields accumulate values in the same list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    fields: Vec<(String, Vec<String>)>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to `field`'s list, creating the field if needed.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((field, vec![value])),
        }
    }

    /// Values recorded for `field` (exact, case-sensitive name).
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    /// The value compilers act on: the first one written for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Rule
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut rule = Rule::new();
        for (field, value) in iter {
            rule.push(field, value);
        }
        rule
    }
}

/// Renders the rule back into query syntax, every value labeled with its
/// field. Values that would not survive a bare re-parse are double quoted.
///
/// A quoted value can't end in an odd run of backslashes, so such a run gets
/// one more backslash. The value re-parses to the same tokens, though not to
/// the same string.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, values) in &self.fields {
            for value in values {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                write!(f, "{field}:")?;
                if needs_quotes(value) {
                    write_quoted(f, value)?;
                } else {
                    f.write_str(value)?;
                }
            }
        }
        Ok(())
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(['"', '\''])
        || value.chars().any(char::is_whitespace)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    let mut backslashes = 0usize;
    for ch in value.chars() {
        match ch {
            '\\' => {
                backslashes += 1;
                f.write_char(ch)?;
                continue;
            }
            '"' => {
                if backslashes % 2 == 1 {
                    f.write_char('\\')?;
                }
                f.write_str("\\\"")?;
            }
            _ => f.write_char(ch)?,
        }
        backslashes = 0;
    }
    if backslashes % 2 == 1 {
        f.write_char('\\')?;
    }
    f.write_char('"')
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, values) in &self.fields {
            map.serialize_entry(field, values)?;
        }
        map.end()
    }
}

/// Hand-written scanner. Each step skips whitespace and takes the longest
/// clause starting at the cursor; a bareword always matches, so the only
/// characters ever skipped are whitespace.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn scan(mut self) -> Vec<ParsedClause> {
        let mut clauses = Vec::new();
        loop {
            self.skip_ws();
            if self.eof() {
                break;
            }
            clauses.push(self.parse_clause());
        }
        clauses
    }

    fn parse_clause(&mut self) -> ParsedClause {
        let negated = self.consume_negation();

        if let Some((field, value, quote)) = self.parse_field_clause() {
            return ParsedClause {
                negated,
                field: Some(field),
                value,
                quote,
            };
        }

        let (value, quote) = self.parse_value();
        ParsedClause {
            negated,
            field: None,
            value,
            quote,
        }
    }

    // A lone `-` (followed by whitespace or the end) is a bareword, not a
    // marker.
    fn consume_negation(&mut self) -> bool {
        let mut rest = self.remaining().chars();
        if rest.next() != Some('-') {
            return false;
        }
        match rest.next() {
            Some(next) if !next.is_whitespace() => {
                self.advance_char();
                true
            }
            _ => false,
        }
    }

    // `name:` followed by optional whitespace and a value, or `name` followed
    // by whitespace and a value that doesn't start a clause of its own. On
    // failure the cursor is restored and the caller reads a bareword.
    fn parse_field_clause(&mut self) -> Option<(String, String, QuoteStyle)> {
        let start = self.pos;
        let name = self.take_field_name();
        if !name.is_empty() {
            let has_value = if self.peek_char() == Some(':') {
                self.advance_char();
                self.skip_ws();
                !self.eof()
            } else {
                self.skip_required_ws() && !self.eof() && !self.at_clause_start()
            };
            if has_value {
                let (value, quote) = self.parse_value();
                return Some((name.to_string(), value, quote));
            }
        }
        self.pos = start;
        None
    }

    fn take_field_name(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        if matches!(self.peek_char(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            while matches!(self.peek_char(), Some(ch) if is_field_name_char(ch)) {
                self.advance_char();
            }
        }
        &input[start..self.pos]
    }

    // Negated clauses and `name:` labels begin a new clause, so they can't be
    // the value of a colonless field.
    fn at_clause_start(&self) -> bool {
        let mut ahead = Scanner::new(self.input);
        ahead.pos = self.pos;
        if ahead.consume_negation() {
            return true;
        }
        !ahead.take_field_name().is_empty() && ahead.peek_char() == Some(':')
    }

    fn parse_value(&mut self) -> (String, QuoteStyle) {
        let quote = match self.peek_char() {
            Some('"') => Some(('"', QuoteStyle::Double)),
            Some('\'') => Some(('\'', QuoteStyle::Single)),
            _ => None,
        };
        if let Some((delimiter, style)) = quote {
            let start = self.pos;
            if let Some(value) = self.parse_quoted(delimiter) {
                return (value, style);
            }
            self.pos = start;
        }
        (self.parse_bareword(), QuoteStyle::Bare)
    }

    // Backslash pairs are consumed whole so `\"` doesn't terminate the value;
    // only the escaped delimiter itself is unescaped. Returns `None` for an
    // unterminated quote.
    fn parse_quoted(&mut self, delimiter: char) -> Option<String> {
        self.advance_char();
        let mut value = String::new();
        while let Some(ch) = self.peek_char() {
            self.advance_char();
            if ch == delimiter {
                return Some(value);
            }
            if ch == '\\' {
                let escaped = self.peek_char()?;
                self.advance_char();
                if escaped != delimiter {
                    value.push('\\');
                }
                value.push(escaped);
                continue;
            }
            value.push(ch);
        }
        None
    }

    fn parse_bareword(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek_char(), Some(ch) if !ch.is_whitespace()) {
            self.advance_char();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_required_ws(&mut self) -> bool {
        let start = self.pos;
        self.skip_ws();
        self.pos > start
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_char(), Some(ch) if ch.is_whitespace()) {
            self.advance_char();
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

fn is_field_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')
}
