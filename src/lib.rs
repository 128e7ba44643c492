//! Compilers for the entity/history query language.
//!
//! Raw queries are parsed by [`vp_query_syntax`] into a [`RuleSet`]; this crate
//! projects rules onto three targets that must agree on what a query means:
//!
//! - [`EntityMatcher`]: decides in process whether a record matches.
//! - [`HistoryQueryBuilder`]: `git log` arguments for searching change history.
//! - [`RestrictionBuilder`]: a SQL `WHERE` clause fragment.
//!
//! ```
//! use vp_query::{build_restriction, entity_matches_some_rule, parse_rules};
//!
//! let rules = parse_rules(["post_status:publish*"], false);
//! assert!(entity_matches_some_rule([("post_status", "published")], &rules));
//!
//! let clause = build_restriction(&rules[0]);
//! assert_eq!(clause.as_unsanitized_str(), "(`post_status` LIKE \"publish%\")");
//! ```
//!
//! Everything here is synchronous and pure. The only input not derived from
//! the arguments is today's date, used for relative `date:` values; pin it
//! with [`HistoryQueryBuilder::with_date_context`].

mod date;
mod fragment;
mod history;
mod matcher;
mod options;
mod restriction;

pub use date::{DateContext, DateError, DateSpan, resolve_date};
pub use fragment::UnsanitizedFragment;
pub use history::{HistoryQueryBuilder, build_history_query};
pub use matcher::{EntityMatcher, entity_matches_some_rule};
pub use options::{CaseMode, CompileOptions, HistoryQueryOptions, MatchOptions, RestrictionOptions};
pub use restriction::{RestrictionBuilder, build_restriction};
pub use vp_query_syntax::{
    ParsedClause, QuoteStyle, Rule, RuleSet, TEXT_FIELD, Token, Tokens, parse_rule, parse_rules,
    scan_clauses, tokenize,
};

/// The three compilers configured from one [`CompileOptions`].
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    pub matcher: EntityMatcher,
    pub history: HistoryQueryBuilder,
    pub restriction: RestrictionBuilder,
}

impl QueryCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            matcher: EntityMatcher::new(options.matcher),
            history: HistoryQueryBuilder::new(options.history),
            restriction: RestrictionBuilder::new(options.restriction),
        }
    }

    pub fn with_date_context(mut self, dates: DateContext) -> Self {
        self.history = self.history.with_date_context(dates);
        self
    }

    /// One history query per rule, in rule-set order.
    pub fn history_queries(&self, rules: &[Rule]) -> Vec<UnsanitizedFragment> {
        rules.iter().map(|rule| self.history.build(rule)).collect()
    }

    /// One restriction per rule, in rule-set order.
    pub fn restrictions(&self, rules: &[Rule]) -> Vec<UnsanitizedFragment> {
        rules.iter().map(|rule| self.restriction.build(rule)).collect()
    }
}
