//! Compiles a rule into `git log` arguments.
//!
//! The output starts with `-i --all-match -E` (the `-i` is optional, see
//! [`HistoryQueryOptions`]) followed by one fragment per constraint. Every
//! `--grep`/`--author` pattern must match, so fields stay AND-ed like in the
//! other compilers. Unlike them, every value of a field is used here.
//!
//! Commit messages carry trailers like
//!
//! ```text
//! VP-Action: post/edit/8D1C3F0A
//! VP-Post-Title: Hello world
//! ```
//!
//! which the `action`-family fields and unknown fields search for.

use crate::date::{DateContext, DateSpan, resolve_date, shift_days};
use crate::fragment::UnsanitizedFragment;
use crate::options::HistoryQueryOptions;
use itertools::Itertools;
use jiff::civil::Date;
use tracing::debug;
use vp_query_syntax::Rule;

const ACTION_TRAILER: &str = "VP-Action";

#[derive(Debug, Clone, Default)]
pub struct HistoryQueryBuilder {
    options: HistoryQueryOptions,
    dates: DateContext,
}

impl HistoryQueryBuilder {
    /// Relative dates resolve against the current system date.
    pub fn new(options: HistoryQueryOptions) -> Self {
        Self {
            options,
            dates: DateContext::capture(),
        }
    }

    /// Pins "today" so output doesn't depend on the clock.
    pub fn with_date_context(mut self, dates: DateContext) -> Self {
        self.dates = dates;
        self
    }

    pub fn build(&self, rule: &Rule) -> UnsanitizedFragment {
        let mut args = Vec::new();
        if self.options.case_insensitive_flag {
            args.push("-i".to_string());
        }
        args.push("--all-match".to_string());
        args.push("-E".to_string());

        let mut action_done = false;
        for (field, values) in rule.fields() {
            let field = self.options.case.apply(field);
            match field.as_ref() {
                "author" => args.extend(values.iter().map(|value| author_arg(value))),
                "date" => {
                    for value in values {
                        self.push_date_args(&mut args, value);
                    }
                }
                "before" | "after" => args.extend(
                    values
                        .iter()
                        .map(|value| format!("--{field}={}", quote(value))),
                ),
                "action" | "vp-action" | "entity" | "scope" | "vpid" => {
                    if !action_done {
                        action_done = true;
                        args.extend(self.action_args(rule));
                    }
                }
                "text" => args.extend(values.iter().map(|value| grep_arg(value))),
                other => args.push(trailer_arg(other, values)),
            }
        }

        UnsanitizedFragment::new(args.join(" "))
    }

    fn push_date_args(&self, args: &mut Vec<String>, value: &str) {
        if let Some((lower, upper)) = value.split_once("..") {
            // git's bounds are exclusive, widen by a day on each side.
            if let Some(span) = self.bound(lower) {
                push_day(args, "after", shift_days(span.start, -1));
            }
            if let Some(span) = self.bound(upper) {
                push_day(args, "before", shift_days(span.end, 1));
            }
            return;
        }

        let (op, rest) = split_comparison(value);
        let Some(span) = self.bound(rest) else {
            return;
        };
        match op {
            Some(Comparison::Lt) => push_day(args, "before", Some(span.start)),
            Some(Comparison::Lte) => push_day(args, "before", shift_days(span.end, 1)),
            Some(Comparison::Gt) => push_day(args, "after", Some(span.end)),
            Some(Comparison::Gte) => push_day(args, "after", shift_days(span.start, -1)),
            None => {
                args.push(format!("--after={}", quote(&format!("{} 00:00:00", span.start))));
                args.push(format!("--before={}", quote(&format!("{} 23:59:59", span.end))));
            }
        }
    }

    // `*` and empty bounds are open; unresolvable ones are dropped.
    fn bound(&self, raw: &str) -> Option<DateSpan> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return None;
        }
        match resolve_date(raw, &self.dates) {
            Ok(span) => Some(span),
            Err(error) => {
                debug!(%error, "skipping date bound");
                None
            }
        }
    }

    // Qualified `scope/action` pairs and separate scope/action values each get
    // their own grep; `--all-match` requires both.
    fn action_args(&self, rule: &Rule) -> Vec<String> {
        let mut pairs = Vec::new();
        let mut actions = Vec::new();
        let mut scopes = Vec::new();
        let mut ids = Vec::new();
        for (field, values) in rule.fields() {
            match self.options.case.apply(field).as_ref() {
                "vp-action" => pairs.extend(values),
                "action" => {
                    for value in values {
                        if value.contains('/') {
                            pairs.push(value);
                        } else {
                            actions.push(value);
                        }
                    }
                }
                "entity" | "scope" => scopes.extend(values),
                "vpid" => ids.extend(values),
                _ => {}
            }
        }

        let id = if ids.is_empty() {
            "(/.*)?".to_string()
        } else {
            format!("/{}", alternation(&ids))
        };
        let mut heads = Vec::new();
        if !pairs.is_empty() {
            heads.push(alternation(&pairs));
        }
        if pairs.is_empty() || !scopes.is_empty() || !actions.is_empty() {
            heads.push(format!("{}/{}", alternation(&scopes), alternation(&actions)));
        }
        heads
            .into_iter()
            .map(|head| grep_arg(&format!("^{ACTION_TRAILER}: {head}{id}$")))
            .collect()
    }
}

/// [`HistoryQueryBuilder`] with default options and today's date.
pub fn build_history_query(rule: &Rule) -> UnsanitizedFragment {
    HistoryQueryBuilder::default().build(rule)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Lt,
    Lte,
    Gt,
    Gte,
}

fn split_comparison(raw: &str) -> (Option<Comparison>, &str) {
    let operators = [
        ("<=", Comparison::Lte),
        (">=", Comparison::Gte),
        ("<", Comparison::Lt),
        (">", Comparison::Gt),
    ];
    for (prefix, op) in operators {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return (Some(op), rest);
        }
    }
    (None, raw)
}

fn push_day(args: &mut Vec<String>, flag: &str, date: Option<Date>) {
    match date {
        Some(date) => args.push(format!("--{flag}={date}")),
        None => debug!(flag, "date bound out of range"),
    }
}

/// Name, email or `name <email>`, anchored to git's `Name <email>` ident.
fn author_arg(value: &str) -> String {
    let escaped = escape_pattern(value);
    let pattern = if value.contains('<') {
        format!("^{escaped}$")
    } else if value.contains('@') {
        format!("^.* <{escaped}>$")
    } else {
        format!("^{escaped} <.*>$")
    };
    format!("--author={}", quote(&pattern))
}

// `VP-Foo` trailers were once written as `X-VP-Foo`; match both spellings.
fn trailer_arg(field: &str, values: &[String]) -> String {
    let lower = field.to_ascii_lowercase();
    let prefix = if lower.starts_with("x-vp-") {
        ""
    } else if lower.starts_with("vp-") {
        "(X-)?"
    } else {
        "(X-VP-|VP-)"
    };
    let values = values.iter().map(|value| escape_pattern(value)).join("|");
    grep_arg(&format!("^{prefix}{}: ({values})$", escape_pattern(field)))
}

fn grep_arg(pattern: &str) -> String {
    format!("--grep={}", quote(pattern))
}

fn alternation<S: AsRef<str>>(values: &[S]) -> String {
    match values {
        [] => ".*".to_string(),
        [single] => escape_pattern(single.as_ref()),
        many => format!(
            "({})",
            many.iter().map(|value| escape_pattern(value.as_ref())).join("|")
        ),
    }
}

/// Neutralizes `\ $ . [` and turns the query language's `*` into `.*`.
/// Other ERE metacharacters pass through.
pub(crate) fn escape_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '$' | '.' | '[' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '*' => escaped.push_str(".*"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Double quotes an argument for the command line git is invoked with.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}
