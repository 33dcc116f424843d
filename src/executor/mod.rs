//! Search executor
//!
//! Evaluates compiled predicates against joined rows, orders them, and
//! assembles pages of results grouped by course number.
//!
//! # Flow
//!
//! 1. Compile the parsed expression
//! 2. Restrict to rows with a course number
//! 3. Count distinct numbers and fetch one page of numbers, concurrently
//! 4. Fetch the page's rows in plan order
//! 5. Group rows by number in page order
//!
//! # Invariants
//!
//! - `total` counts distinct numbers, never rows
//! - Ordering is total: equal primary keys fall back to a fixed tie-break
//! - A store failure fails the whole search; nothing is retried

mod assembler;
mod errors;
mod filters;
mod result;
mod sorter;

pub use assembler::{PageRequest, ResultAssembler, SearchOutcome, MAX_LIMIT};
pub use errors::{SearchError, SearchErrorCode, SearchResult};
pub use filters::PredicateFilter;
pub use result::{GroupedResults, GroupedUnits, SearchResults};
pub use sorter::ResultSorter;
