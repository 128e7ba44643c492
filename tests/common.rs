#![allow(dead_code)]
//! Shared helpers for `vp-query` integration tests.

use jiff::civil::date;
use vp_query::*;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn compiler() -> QueryCompiler {
    init_logging();
    QueryCompiler::new(CompileOptions::default()).with_date_context(DateContext::at(date(2024, 5, 15)))
}

pub fn strings(fragments: Vec<UnsanitizedFragment>) -> Vec<String> {
    fragments
        .into_iter()
        .map(UnsanitizedFragment::into_trusted_string)
        .collect()
}

pub fn post(status: &str, title: &str) -> Vec<(&'static str, String)> {
    vec![
        ("post_type", "post".to_string()),
        ("post_status", status.to_string()),
        ("post_title", title.to_string()),
    ]
}
