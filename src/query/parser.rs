//! Query parser
//!
//! Turns tokens into a flat boolean tree. The query is split on `OR` first;
//! every run between `OR`s is an implicit AND group. Terms whose key does
//! not resolve are dropped and reported, never raised.

use super::ast::{BooleanExpression, ComparisonOp, ExprNode, FilterOperator};
use super::keys::QueryKey;
use super::tokenizer::{tokenize, RawTerm, Token};

/// Result of parsing, with the raw keys that failed to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub expr: BooleanExpression,
    pub unresolved_keys: Vec<String>,
}

/// Parses a query string into an expression tree
pub fn parse(query: &str) -> BooleanExpression {
    parse_with_diagnostics(query).expr
}

/// Parses a query string, also returning the keys that were dropped
pub fn parse_with_diagnostics(query: &str) -> ParsedQuery {
    let mut unresolved_keys = Vec::new();
    let mut runs: Vec<Vec<FilterOperator>> = vec![Vec::new()];

    for token in tokenize(query) {
        match token {
            Token::Or => runs.push(Vec::new()),
            Token::And => {}
            Token::Term(raw) => match to_filter(&raw) {
                Ok(filter) => {
                    if let Some(run) = runs.last_mut() {
                        run.push(filter);
                    }
                }
                Err(key) => unresolved_keys.push(key),
            },
        }
    }

    runs.retain(|run| !run.is_empty());

    let expr = if runs.len() <= 1 {
        let terms = runs.pop().unwrap_or_default();
        BooleanExpression::and(terms.into_iter().map(ExprNode::Filter).collect())
    } else {
        let children = runs
            .into_iter()
            .map(|mut run| {
                if run.len() == 1 {
                    ExprNode::Filter(run.remove(0))
                } else {
                    ExprNode::Group(BooleanExpression::and(
                        run.into_iter().map(ExprNode::Filter).collect(),
                    ))
                }
            })
            .collect();
        BooleanExpression::or(children)
    };

    ParsedQuery {
        expr,
        unresolved_keys,
    }
}

/// Builds a filter from a raw term; Err carries an unresolvable key.
fn to_filter(raw: &RawTerm) -> Result<FilterOperator, String> {
    match &raw.key {
        Some((key, op)) => {
            let resolved = QueryKey::resolve(key).ok_or_else(|| key.clone())?;
            let op = if raw.negated { op.negated() } else { *op };
            Ok(FilterOperator::new(resolved, op, raw.value.clone()))
        }
        None => {
            let op = if raw.negated {
                ComparisonOp::Ne
            } else {
                ComparisonOp::Eq
            };
            Ok(FilterOperator::new(QueryKey::Title, op, raw.value.clone()))
        }
    }
}
