//! Splits a single field value into literal text and `*` wildcards.
//!
//! The grammar is tiny: an unescaped `*` is a wildcard, `\*` is a literal
//! star, `\\` is a literal backslash and everything else (including a
//! backslash that doesn't start one of those two escapes) is literal text.
//! Adjacent literal pieces are merged, so `a\*b` yields a single
//! `Literal("a*b")`.
//!
//! ```
//! use vp_query_syntax::{tokenize, Token};
//!
//! let tokens = tokenize("publish*");
//! assert_eq!(
//!     tokens.as_slice(),
//!     [Token::Literal("publish".into()), Token::Wildcard]
//! );
//! assert_eq!(tokens.to_regex(), "^publish.*$");
//! assert_eq!(tokens.to_filter_string(), "publish%");
//! ```

use std::slice;

/// One unit of a tokenized field value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", content = "text", rename_all = "lowercase")
)]
pub enum Token {
    /// Zero or more characters.
    Wildcard,
    /// Plain text with escapes already resolved.
    Literal(String),
}

/// Ordered tokens of one raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Tokens(Vec<Token>);

/// Tokenizes `value`. Never fails; the empty string yields no tokens.
pub fn tokenize(value: &str) -> Tokens {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '*' => {
                flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Wildcard);
            }
            '\\' => match chars.peek() {
                Some(&escaped @ ('*' | '\\')) => {
                    chars.next();
                    literal.push(escaped);
                }
                _ => literal.push('\\'),
            },
            _ => literal.push(ch),
        }
    }
    flush_literal(&mut tokens, &mut literal);

    Tokens(tokens)
}

fn flush_literal(tokens: &mut Vec<Token>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

impl Tokens {
    pub fn as_slice(&self) -> &[Token] {
        &self.0
    }

    pub fn iter(&self) -> slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.0
    }

    pub fn contains_wildcard(&self) -> bool {
        self.0.iter().any(|token| matches!(token, Token::Wildcard))
    }

    /// Anchored regex equivalent: literals are escaped, wildcards become `.*`.
    ///
    /// Only meaningful when [`Tokens::contains_wildcard`] holds; exact values
    /// are compared as plain strings instead.
    pub fn to_regex(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() * 4 + 2);
        pattern.push('^');
        for token in &self.0 {
            match token {
                Token::Wildcard => pattern.push_str(".*"),
                Token::Literal(text) => pattern.push_str(&regex::escape(text)),
            }
        }
        pattern.push('$');
        pattern
    }

    /// Filter-clause (SQL `LIKE`) pattern: literals verbatim, wildcards as `%`.
    pub fn to_filter_string(&self) -> String {
        let mut pattern = String::new();
        for token in &self.0 {
            match token {
                Token::Wildcard => pattern.push('%'),
                Token::Literal(text) => pattern.push_str(text),
            }
        }
        pattern
    }

    /// Concatenated literal text with wildcards dropped. For a value without
    /// wildcards this is the decoded value used in exact comparisons.
    pub fn literal_text(&self) -> String {
        self.0
            .iter()
            .filter_map(|token| match token {
                Token::Literal(text) => Some(text.as_str()),
                Token::Wildcard => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Tokens {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> Token {
        Token::Literal(text.to_string())
    }

    #[test]
    fn empty_value_has_no_tokens() {
        let tokens = tokenize("");
        assert!(tokens.is_empty());
        assert!(!tokens.contains_wildcard());
        assert_eq!(tokens.to_filter_string(), "");
    }

    #[test]
    fn plain_value_is_single_literal() {
        for value in ["draft", "Hello World", "a.b+c", "user@example.com", "ünïcødé"] {
            assert_eq!(tokenize(value).as_slice(), [lit(value)]);
        }
    }

    #[test]
    fn star_splits_literals() {
        let tokens = tokenize("a*b");
        assert_eq!(tokens.as_slice(), [lit("a"), Token::Wildcard, lit("b")]);
        assert!(tokens.contains_wildcard());
        assert_eq!(tokens.to_regex(), "^a.*b$");
        assert_eq!(tokens.to_filter_string(), "a%b");
    }

    #[test]
    fn escaped_star_is_literal_and_merged() {
        let tokens = tokenize("a\\*b");
        assert_eq!(tokens.as_slice(), [lit("a*b")]);
        assert!(!tokens.contains_wildcard());
    }

    #[test]
    fn double_backslash_is_single_backslash() {
        let tokens = tokenize("a\\\\b");
        assert_eq!(tokens.as_slice(), [lit("a\\b")]);
    }

    #[test]
    fn escaped_backslash_before_star_keeps_wildcard() {
        // `\\*` is an escaped backslash followed by a bare wildcard.
        let tokens = tokenize("a\\\\*");
        assert_eq!(tokens.as_slice(), [lit("a\\"), Token::Wildcard]);
    }

    #[test]
    fn unknown_escape_stays_verbatim() {
        let tokens = tokenize("a\\nb\\");
        assert_eq!(tokens.as_slice(), [lit("a\\nb\\")]);
    }

    #[test]
    fn consecutive_wildcards_are_kept() {
        let tokens = tokenize("**x");
        assert_eq!(
            tokens.as_slice(),
            [Token::Wildcard, Token::Wildcard, lit("x")]
        );
    }

    #[test]
    fn regex_escapes_metacharacters_in_literals() {
        let tokens = tokenize("file.(1)*");
        assert_eq!(tokens.to_regex(), "^file\\.\\(1\\).*$");
    }

    #[test]
    fn literal_text_drops_wildcards() {
        assert_eq!(tokenize("foo*bar\\*").literal_text(), "foobar*");
    }
}
