mod common;
use common::*;
use vp_query_syntax::*;

#[test]
fn field_and_text_are_split_with_case_preserved() {
    let rule = parse_one("author:Joe text search");
    assert_eq!(field_names(&rule), ["author", "text"]);
    values_are(&rule, "author", &["Joe"]);
    values_are(&rule, "text", &["search"]);
}

#[test]
fn quoted_phrase_and_escaped_quote() {
    let rule = parse_one(r#""quoted phrase" field:"value with \" escaped""#);
    values_are(&rule, "text", &["quoted phrase"]);
    values_are(&rule, "field", &["value with \" escaped"]);
}

#[test]
fn single_and_double_quotes_are_interchangeable() {
    let single = parse_one("title:'Hello World'");
    let double = parse_one("title:\"Hello World\"");
    assert_eq!(single, double);
}

#[test]
fn rule_set_skips_empty_queries_and_keeps_order() {
    let rules = parse_rules(["entity:post", "", "  ", "entity:page"], false);
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].first("entity"), Some("post"));
    assert_eq!(rules[1].first("entity"), Some("page"));
}

#[test]
fn rule_set_accepts_owned_strings() {
    let queries = vec!["a:1".to_string(), "b:2".to_string()];
    let rules = parse_rules(&queries, false);
    assert_eq!(rules.len(), 2);
}

#[test]
fn only_empty_values_yield_no_rule() {
    parse_none("title:'' author:\"\"");
    let rules = parse_rules(["title:'' author:\"\""], true);
    assert_eq!(rules.len(), 1);
    values_are(&rules[0], "title", &[""]);
    values_are(&rules[0], "author", &[""]);
}

#[test]
fn negation_is_accepted_but_not_recorded_in_rule() {
    let rule = parse_one("-status:draft");
    values_are(&rule, "status", &["draft"]);

    let clauses = scan_clauses("-status:draft");
    assert!(clauses[0].negated);
}

#[test]
fn date_comparisons_stay_raw() {
    let rule = parse_one("date:>=2020-01-01 date:2020-01-01..2020-01-31");
    values_are(&rule, "date", &[">=2020-01-01", "2020-01-01..2020-01-31"]);
}

#[test]
fn author_with_email_needs_quotes() {
    let rule = parse_one("author:\"Joe <joe@example.com>\"");
    values_are(&rule, "author", &["Joe <joe@example.com>"]);

    let rule = parse_one("author:Joe <joe@example.com>");
    values_are(&rule, "author", &["Joe"]);
    values_are(&rule, "text", &["<joe@example.com>"]);
}

#[test]
fn wildcard_escapes_survive_parsing() {
    let rule = parse_one(r"name:foo\*bar path:'C:\\dir\*'");
    values_are(&rule, "name", &[r"foo\*bar"]);
    values_are(&rule, "path", &[r"C:\\dir\*"]);
    assert_eq!(tokenize(rule.first("name").unwrap()).as_slice(), [lit("foo*bar")]);
    assert_eq!(tokenize(rule.first("path").unwrap()).as_slice(), [lit(r"C:\dir*")]);
}

#[test]
fn vp_style_field_names() {
    let rule = parse_one("vp-action:post/create x-vp-post-title:Hello vpid:ABC123");
    assert_eq!(field_names(&rule), ["vp-action", "x-vp-post-title", "vpid"]);
}

#[test]
fn unicode_input_is_handled() {
    let rule = parse_one("títle:café «quoted»");
    values_are(&rule, "text", &["títle:café", "«quoted»"]);
}
