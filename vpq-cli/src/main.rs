mod cli;
mod records;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use records::{read_records, stringify};
use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vp_query::{CompileOptions, QueryCompiler, parse_rules};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = match &cli.config {
        Some(path) => load_options(path)?,
        None => CompileOptions::default(),
    };
    debug!(?options, "compiler options");
    let compiler = QueryCompiler::new(options);

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Parse { queries } => {
            let rules = parse_rules(&queries.queries, queries.allow_empty);
            serde_json::to_writer_pretty(&mut stdout, &rules).context("Failed to write rules")?;
            writeln!(stdout)?;
        }
        Command::Match { records, queries } => {
            let rules = parse_rules(&queries.queries, queries.allow_empty);
            let records = read_records(&records)?;
            let mut matched = 0usize;
            for record in &records {
                if compiler.matcher.matches(stringify(record), &rules) {
                    matched += 1;
                    serde_json::to_writer(&mut stdout, record).context("Failed to write record")?;
                    writeln!(stdout)?;
                }
            }
            info!(matched, total = records.len(), "matching completes");
        }
        Command::History { queries } => {
            let rules = parse_rules(&queries.queries, queries.allow_empty);
            for fragment in compiler.history_queries(&rules) {
                writeln!(stdout, "{}", fragment.into_trusted_string())?;
            }
        }
        Command::Restriction { queries } => {
            let rules = parse_rules(&queries.queries, queries.allow_empty);
            for fragment in compiler.restrictions(&rules) {
                writeln!(stdout, "{}", fragment.into_trusted_string())?;
            }
        }
    }

    Ok(())
}

fn load_options(path: &Path) -> Result<CompileOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}
