#![allow(dead_code)]
//! Shared helpers for `vp-query-syntax` integration tests.

use vp_query_syntax::*;

pub fn parse_one(input: &str) -> Rule {
    parse_rule(input, false).unwrap_or_else(|| panic!("expected a rule from {input:?}"))
}

pub fn parse_none(input: &str) {
    if let Some(rule) = parse_rule(input, false) {
        panic!("expected no rule from {input:?}, got: {rule:?}");
    }
}

pub fn values_are(rule: &Rule, field: &str, expected: &[&str]) {
    let values = rule
        .get(field)
        .unwrap_or_else(|| panic!("missing field {field:?} in {rule:?}"));
    assert_eq!(values, expected);
}

pub fn field_names(rule: &Rule) -> Vec<&str> {
    rule.fields().map(|(name, _)| name).collect()
}

pub fn lit(text: &str) -> Token {
    Token::Literal(text.to_string())
}
