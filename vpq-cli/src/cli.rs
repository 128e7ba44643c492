use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vpq", about = "Parse and compile entity/history search queries")]
pub struct Cli {
    /// JSON file with compiler options (`matcher`, `history`, `restriction`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the rule set as JSON.
    Parse {
        #[command(flatten)]
        queries: Queries,
    },
    /// Print the records (a JSON array of objects) matching any rule.
    Match {
        /// File to read records from, `-` for stdin.
        #[arg(long, default_value = "-")]
        records: PathBuf,
        #[command(flatten)]
        queries: Queries,
    },
    /// Print `git log` arguments, one line per rule.
    History {
        #[command(flatten)]
        queries: Queries,
    },
    /// Print SQL `WHERE` fragments, one line per rule.
    Restriction {
        #[command(flatten)]
        queries: Queries,
    },
}

#[derive(clap::Args)]
pub struct Queries {
    /// Keep clauses with empty quoted values such as `title:""`.
    #[arg(long)]
    pub allow_empty: bool,
    /// One rule per query; rules are OR-ed.
    #[arg(required = true)]
    pub queries: Vec<String>,
}
