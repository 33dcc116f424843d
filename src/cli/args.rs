//! CLI argument definitions using clap
//!
//! Commands:
//! - unitsearch serve --config <path>
//! - unitsearch search --config <path> <query>
//! - unitsearch explain <query>
//! - unitsearch materialize --config <path>
//! - unitsearch ingest --config <path> --input <jsonl>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// unitsearch - course catalog search engine
#[derive(Parser, Debug)]
#[command(name = "unitsearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API and run the rebuild schedule
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./unitsearch.json")]
        config: PathBuf,

        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one search and print the results
    Search {
        /// Path to configuration file
        #[arg(long, default_value = "./unitsearch.json")]
        config: PathBuf,

        /// Query text, e.g. "y>=2023 -l:Smith algorithms"
        query: String,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Defaults to the configured default_limit
        #[arg(long)]
        limit: Option<usize>,

        /// Canonical key to order by
        #[arg(long, default_value = "year")]
        order_by: String,

        /// Sort the primary key ascending
        #[arg(long)]
        asc: bool,
    },

    /// Print the parsed and compiled form of a query
    Explain {
        query: String,
    },

    /// Rebuild section paths and write the corpus back
    Materialize {
        /// Path to configuration file
        #[arg(long, default_value = "./unitsearch.json")]
        config: PathBuf,
    },

    /// Load scraped JSON lines into the corpus
    Ingest {
        /// Path to configuration file
        #[arg(long, default_value = "./unitsearch.json")]
        config: PathBuf,

        /// JSON lines file of scraped items
        #[arg(long)]
        input: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["unitsearch", "search", "t:algorithms"]).unwrap();
        match cli.command {
            Command::Search {
                config,
                query,
                offset,
                limit,
                order_by,
                asc,
            } => {
                assert_eq!(config, PathBuf::from("./unitsearch.json"));
                assert_eq!(query, "t:algorithms");
                assert_eq!(offset, 0);
                assert_eq!(limit, None);
                assert_eq!(order_by, "year");
                assert!(!asc);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_ingest_requires_input() {
        assert!(Cli::try_parse_from(["unitsearch", "ingest"]).is_err());
        let cli = Cli::try_parse_from(["unitsearch", "ingest", "--input", "items.jsonl"]).unwrap();
        assert!(matches!(cli.command, Command::Ingest { .. }));
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["unitsearch", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { port: Some(9000), .. }));
    }
}
