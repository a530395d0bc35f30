use std::path::PathBuf;

use clap::Parser;

use crate::loader::DEFAULT_BATCH_SIZE;

#[derive(Debug, Parser)]
#[command(name = "reelbase")]
#[command(about = "Load a denormalized movie CSV into a normalized SQLite schema")]
pub struct Cli {
    /// Input CSV file (one wide row per movie)
    pub input: PathBuf,

    /// Database URL; falls back to DATABASE_URL, then a local movies.db
    #[arg(long)]
    pub database_url: Option<String>,

    /// Rows per transaction
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Load only the first N rows
    #[arg(long)]
    pub limit: Option<usize>,

    /// Skip the post-load verification queries
    #[arg(long)]
    pub no_verify: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub input: PathBuf,
    pub database_url: String,
    pub batch_size: usize,
    pub limit: Option<usize>,
    pub verify: bool,
}

impl Config {
    pub fn resolve(cli: Cli) -> Self {
        dotenvy::dotenv().ok();

        let database_url = cli
            .database_url
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| "sqlite://movies.db?mode=rwc".to_string());

        Self {
            input: cli.input,
            database_url,
            batch_size: cli.batch_size,
            limit: cli.limit,
            verify: !cli.no_verify,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}

