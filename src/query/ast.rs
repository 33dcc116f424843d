//! Parsed query tree
//!
//! Leaves are immutable `key OP value` filters; inner nodes are AND/OR
//! groups holding an ordered list of children. Trees render back to a
//! canonical query string.

use std::fmt;

use serde::Serialize;

use super::keys::QueryKey;

/// Comparison operator of a filter term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl ComparisonOp {
    /// Operator symbols, longest first so prefixes never shadow
    pub const SYMBOLS: [(&'static str, ComparisonOp); 7] = [
        ("!=", ComparisonOp::Ne),
        (">=", ComparisonOp::Ge),
        ("<=", ComparisonOp::Le),
        (":", ComparisonOp::Eq),
        ("=", ComparisonOp::Eq),
        (">", ComparisonOp::Gt),
        ("<", ComparisonOp::Lt),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
        }
    }

    /// Operator applied by a leading `-`
    pub fn negated(&self) -> ComparisonOp {
        match self {
            ComparisonOp::Eq => ComparisonOp::Ne,
            ComparisonOp::Ne => ComparisonOp::Eq,
            ComparisonOp::Gt => ComparisonOp::Le,
            ComparisonOp::Le => ComparisonOp::Gt,
            ComparisonOp::Lt => ComparisonOp::Ge,
            ComparisonOp::Ge => ComparisonOp::Lt,
        }
    }

    /// Applies the operator to an ordered pair
    pub fn compare<T: PartialOrd>(&self, lhs: T, rhs: T) -> bool {
        match self {
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `key OP value` term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOperator {
    pub key: QueryKey,
    pub op: ComparisonOp,
    pub value: String,
}

impl FilterOperator {
    pub fn new(key: QueryKey, op: ComparisonOp, value: impl Into<String>) -> Self {
        Self {
            key,
            op,
            value: value.into(),
        }
    }

    /// Same key and operator with a different rendered value
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            key: self.key,
            op: self.op,
            value: value.into(),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key, self.op)?;
        if self.value.chars().any(char::is_whitespace) {
            if self.value.contains('"') {
                write!(f, "'{}'", self.value)
            } else {
                write!(f, "\"{}\"", self.value)
            }
        } else {
            f.write_str(&self.value)
        }
    }
}

/// How a group combines its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn keyword(&self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

/// Child of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExprNode {
    Filter(FilterOperator),
    Group(BooleanExpression),
}

/// AND/OR group. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooleanExpression {
    combinator: Combinator,
    children: Vec<ExprNode>,
}

impl BooleanExpression {
    pub fn new(combinator: Combinator, children: Vec<ExprNode>) -> Self {
        Self {
            combinator,
            children,
        }
    }

    pub fn and(children: Vec<ExprNode>) -> Self {
        Self::new(Combinator::And, children)
    }

    pub fn or(children: Vec<ExprNode>) -> Self {
        Self::new(Combinator::Or, children)
    }

    /// The empty AND group, which matches everything
    pub fn empty() -> Self {
        Self::and(Vec::new())
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn children(&self) -> &[ExprNode] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Canonical rendering without the enclosing parenthesis pair
    pub fn render(&self) -> String {
        let keyword = format!(" {} ", self.combinator.keyword());
        self.children
            .iter()
            .map(|child| match child {
                ExprNode::Filter(filter) => filter.to_string(),
                ExprNode::Group(group) => format!("({})", group.render()),
            })
            .collect::<Vec<_>>()
            .join(&keyword)
    }
}

impl fmt::Display for BooleanExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: QueryKey, op: ComparisonOp, value: &str) -> ExprNode {
        ExprNode::Filter(FilterOperator::new(key, op, value))
    }

    #[test]
    fn test_negation_table() {
        use ComparisonOp::*;
        for (op, expected) in [(Eq, Ne), (Ne, Eq), (Gt, Le), (Le, Gt), (Lt, Ge), (Ge, Lt)] {
            assert_eq!(op.negated(), expected);
            assert_eq!(op.negated().negated(), op);
        }
    }

    #[test]
    fn test_compare() {
        assert!(ComparisonOp::Ge.compare(2023, 2023));
        assert!(!ComparisonOp::Lt.compare(2025, 2025));
        assert!(ComparisonOp::Ne.compare(4.0, 5.0));
    }

    #[test]
    fn test_filter_rendering() {
        let f = FilterOperator::new(QueryKey::Year, ComparisonOp::Ge, "2023");
        assert_eq!(f.to_string(), "year>=2023");

        let f = FilterOperator::new(QueryKey::Department, ComparisonOp::Eq, "Computer Science");
        assert_eq!(f.to_string(), "department=\"Computer Science\"");

        let f = FilterOperator::new(QueryKey::Title, ComparisonOp::Eq, "say \"hi\" now");
        assert_eq!(f.to_string(), "title='say \"hi\" now'");
    }

    #[test]
    fn test_group_rendering_strips_outer_parens() {
        let expr = BooleanExpression::or(vec![
            leaf(QueryKey::Title, ComparisonOp::Eq, "foo"),
            ExprNode::Group(BooleanExpression::and(vec![
                leaf(QueryKey::Year, ComparisonOp::Gt, "2020"),
                leaf(QueryKey::Credits, ComparisonOp::Eq, "4"),
            ])),
        ]);
        assert_eq!(expr.render(), "title=foo OR (year>2020 AND credits=4)");
    }

    #[test]
    fn test_empty_renders_empty() {
        assert_eq!(BooleanExpression::empty().render(), "");
        assert!(BooleanExpression::empty().is_empty());
    }
}
