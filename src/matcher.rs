use crate::options::{CaseMode, MatchOptions};
use hashbrown::HashMap;
use regex::RegexBuilder;
use tracing::{trace, warn};
use vp_query_syntax::{Rule, tokenize};

/// Tests records against a rule set in process.
///
/// Rules are OR-ed; inside a rule every field must match. Only the first
/// value written for a field is considered, so `status:a status:b` in one
/// query means `status:a` (use two queries to express OR).
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityMatcher {
    options: MatchOptions,
}

impl EntityMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// `record` yields `(field, value)` pairs; non-string values must be
    /// stringified by the caller.
    pub fn matches<I, K, V>(&self, record: I, rules: &[Rule]) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let case = self.options.case;
        let record: HashMap<String, V> = record
            .into_iter()
            .map(|(field, value)| (case.apply(field.as_ref()).into_owned(), value))
            .collect();

        rules.iter().any(|rule| self.rule_matches(&record, rule))
    }

    fn rule_matches<V: AsRef<str>>(&self, record: &HashMap<String, V>, rule: &Rule) -> bool {
        let case = self.options.case;
        rule.fields().all(|(field, values)| {
            let key = case.apply(field);
            let Some(actual) = record.get(&*key) else {
                trace!(field, "record lacks field");
                return false;
            };
            let Some(expected) = values.first() else {
                return false;
            };
            value_matches(expected, actual.as_ref(), case)
        })
    }
}

fn value_matches(expected: &str, actual: &str, case: CaseMode) -> bool {
    let tokens = tokenize(expected);
    if tokens.contains_wildcard() {
        let pattern = tokens.to_regex();
        match RegexBuilder::new(&pattern)
            .case_insensitive(case.is_fold())
            .build()
        {
            Ok(regex) => regex.is_match(actual),
            Err(error) => {
                warn!(?error, pattern, "wildcard value did not compile");
                false
            }
        }
    } else {
        case.apply(&tokens.literal_text()) == case.apply(actual)
    }
}

/// [`EntityMatcher`] with default options.
pub fn entity_matches_some_rule<I, K, V>(record: I, rules: &[Rule]) -> bool
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    EntityMatcher::default().matches(record, rules)
}
