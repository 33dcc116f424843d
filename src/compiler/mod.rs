//! Filter compiler
//!
//! Turns a parsed query into a [`Predicate`] over learning units. Dispatch
//! on the filter key is a closed match; every key compiles to one predicate
//! kind. Compilation is pure and never fails.

mod compile;
mod predicate;

pub use compile::{compile, CompiledQuery, JoinRequirements};
pub use predicate::{MatchMode, Predicate, TextField};
