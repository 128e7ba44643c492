use crate::fragment::UnsanitizedFragment;
use crate::options::RestrictionOptions;
use itertools::Itertools;
use vp_query_syntax::{Rule, tokenize};

/// Compiles a rule into a bracketed `WHERE` clause fragment such as
/// ``(`post_type` = "post" AND `post_title` LIKE "Hello%")``.
///
/// Values with a wildcard use `LIKE` with `*` turned into `%`; all others use
/// `=`. Only double quotes (and, for `LIKE`, `_`) are escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictionBuilder {
    options: RestrictionOptions,
}

impl RestrictionBuilder {
    pub fn new(options: RestrictionOptions) -> Self {
        Self { options }
    }

    pub fn build(&self, rule: &Rule) -> UnsanitizedFragment {
        let clause = rule
            .fields()
            .filter_map(|(field, values)| {
                let value = values.first()?;
                Some(self.comparison(field, value))
            })
            .join(" AND ");
        if clause.is_empty() {
            // An empty rule restricts nothing.
            return UnsanitizedFragment::new("(1)".to_string());
        }
        UnsanitizedFragment::new(format!("({clause})"))
    }

    fn comparison(&self, field: &str, value: &str) -> String {
        let tokens = tokenize(value);
        let wildcard = tokens.contains_wildcard();
        let mut pattern = tokens.to_filter_string().replace('"', "\\\"");
        if wildcard {
            pattern = pattern.replace('_', "\\_");
        }
        let operator = if wildcard { "LIKE" } else { "=" };
        let column = self.options.case.apply(field).replace('`', "``");
        format!("`{column}` {operator} \"{pattern}\"")
    }
}

/// [`RestrictionBuilder`] with default options.
pub fn build_restriction(rule: &Rule) -> UnsanitizedFragment {
    RestrictionBuilder::default().build(rule)
}
