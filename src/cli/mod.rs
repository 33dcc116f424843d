//! Command-line interface for unitsearch
//!
//! Commands:
//! - serve: load the corpus, keep section paths fresh, serve the HTTP API
//! - search: one-shot search printed as JSON
//! - explain: show the parsed and compiled form of a query
//! - materialize: rebuild section paths and save the corpus
//! - ingest: merge scraped JSON lines into the corpus

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, ingest, materialize, run, run_command, search, serve};
pub use config::AppConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
