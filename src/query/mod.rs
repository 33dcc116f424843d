//! Query language
//!
//! Free-text query strings such as `y>=2023 -l:Smith algorithms` are
//! tokenized, their keys resolved to canonical filter keys, and assembled
//! into a flat AND/OR tree. Parsing is pure and never fails: fragments that
//! cannot be understood are dropped.

mod ast;
mod keys;
mod parser;
mod tokenizer;

pub use ast::{BooleanExpression, Combinator, ComparisonOp, ExprNode, FilterOperator};
pub use keys::{QueryKey, KEY_MATCH_THRESHOLD};
pub use parser::{parse, parse_with_diagnostics, ParsedQuery};
pub use tokenizer::{tokenize, RawTerm, Token};
