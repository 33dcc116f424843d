//! unitsearch - a search engine over a university course catalog
//!
//! Free-text queries such as `y>=2023 -l:Smith algorithms` are parsed into
//! a boolean expression, compiled to a predicate over learning units and
//! answered as pages of units grouped by course number.

pub mod cli;
pub mod compiler;
pub mod executor;
pub mod http_server;
pub mod ingest;
pub mod materialize;
pub mod model;
pub mod observability;
pub mod query;
pub mod similarity;
pub mod store;
