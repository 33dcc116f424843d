//! Filter compiler
//!
//! Walks a parsed expression and emits the row predicate, the tree of
//! filters actually used (with display values normalized) and the optional
//! joins the predicate depends on. Terms with unusable values are dropped
//! silently and reported in [`CompiledQuery::dropped`].

use serde::Serialize;

use super::predicate::{MatchMode, Predicate, TextField};
use crate::model::{Department, Half};
use crate::query::{BooleanExpression, Combinator, ComparisonOp, ExprNode, FilterOperator, QueryKey};

/// Optional joins a query needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinRequirements {
    /// Lecturer and examiner links
    pub lecturers: bool,
    /// Section links and materialized paths
    pub sections: bool,
    /// Course reviews by course number
    pub ratings: bool,
}

impl JoinRequirements {
    /// Adds the joins a sort key needs
    pub fn with_order(mut self, order_by: QueryKey) -> Self {
        if order_by == QueryKey::Lecturer {
            self.lecturers = true;
        }
        self
    }
}

/// Output of compilation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    /// Filters that made it into the predicate, for rendering back to users
    pub used: BooleanExpression,
    pub joins: JoinRequirements,
    /// Terms whose values were unusable for their key
    #[serde(skip)]
    pub dropped: Vec<FilterOperator>,
}

impl CompiledQuery {
    /// Canonical rendering of the used filters
    pub fn parsed_query(&self) -> String {
        self.used.render()
    }
}

/// Compiles an expression tree
pub fn compile(expr: &BooleanExpression) -> CompiledQuery {
    FilterCompiler::default().compile(expr)
}

#[derive(Default)]
struct FilterCompiler {
    joins: JoinRequirements,
    dropped: Vec<FilterOperator>,
}

/// Offered-in names collected across one sibling list
#[derive(Default)]
struct OfferedNames {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl OfferedNames {
    fn add(&mut self, filter: &FilterOperator) {
        let name = filter.value.to_lowercase();
        let set = if filter.op == ComparisonOp::Ne {
            &mut self.negative
        } else {
            &mut self.positive
        };
        if !set.contains(&name) {
            set.push(name);
        }
    }

    fn into_predicates(self, mode: MatchMode) -> Vec<Predicate> {
        let mut out = Vec::new();
        if !self.positive.is_empty() {
            out.push(Predicate::OfferedIn {
                names: self.positive,
                mode,
            });
        }
        if !self.negative.is_empty() {
            out.push(Predicate::not(Predicate::OfferedIn {
                names: self.negative,
                mode,
            }));
        }
        out
    }
}

impl FilterCompiler {
    fn compile(mut self, expr: &BooleanExpression) -> CompiledQuery {
        let (predicate, used) = self
            .compile_group(expr)
            .unwrap_or_else(|| (Predicate::Always, BooleanExpression::new(expr.combinator(), Vec::new())));

        CompiledQuery {
            predicate,
            used,
            joins: self.joins,
            dropped: self.dropped,
        }
    }

    /// Compiles one group. None if nothing in it survived.
    fn compile_group(&mut self, group: &BooleanExpression) -> Option<(Predicate, BooleanExpression)> {
        let mut predicates = Vec::new();
        let mut used = Vec::new();
        let mut offered = OfferedNames::default();

        for child in group.children() {
            match child {
                ExprNode::Group(inner) => {
                    if let Some((predicate, inner_used)) = self.compile_group(inner) {
                        predicates.push(predicate);
                        used.push(ExprNode::Group(inner_used));
                    }
                }
                ExprNode::Filter(filter) if filter.key == QueryKey::Offered => {
                    self.joins.sections = true;
                    offered.add(filter);
                    used.push(ExprNode::Filter(filter.clone()));
                }
                ExprNode::Filter(filter) => match self.compile_filter(filter) {
                    Some((predicate, shown)) => {
                        predicates.push(predicate);
                        used.push(ExprNode::Filter(shown));
                    }
                    None => self.dropped.push(filter.clone()),
                },
            }
        }

        let mode = match group.combinator() {
            Combinator::And => MatchMode::All,
            Combinator::Or => MatchMode::Any,
        };
        predicates.extend(offered.into_predicates(mode));

        if predicates.is_empty() {
            return None;
        }

        let predicate = match (group.combinator(), predicates.len()) {
            (_, 1) => predicates.remove(0),
            (Combinator::And, _) => Predicate::And(predicates),
            (Combinator::Or, _) => Predicate::Or(predicates),
        };
        Some((predicate, BooleanExpression::new(group.combinator(), used)))
    }

    /// Compiles a single non-offered filter into its predicate and the
    /// filter as it should be shown. None drops the term.
    fn compile_filter(&mut self, filter: &FilterOperator) -> Option<(Predicate, FilterOperator)> {
        let op = filter.op;
        let value = filter.value.as_str();

        let text = |fields: &'static [TextField]| {
            Predicate::negate_if_ne(
                op,
                Predicate::TextContains {
                    fields,
                    needle: value.to_lowercase(),
                },
            )
        };

        let compiled = match filter.key {
            QueryKey::Title => (text(TextField::TITLES), filter.clone()),
            QueryKey::TitleGerman => (text(TextField::TITLE_GERMAN), filter.clone()),
            QueryKey::TitleEnglish => (text(TextField::TITLE_ENGLISH), filter.clone()),
            QueryKey::Number => (text(TextField::NUMBER), filter.clone()),
            QueryKey::Language => (text(TextField::LANGUAGE), filter.clone()),
            QueryKey::ExamType => (text(TextField::EXAM_TYPE), filter.clone()),
            QueryKey::Descriptions => (text(TextField::DESCRIPTIONS), filter.clone()),
            QueryKey::DescriptionsGerman => (text(TextField::DESCRIPTIONS_GERMAN), filter.clone()),
            QueryKey::DescriptionsEnglish => {
                (text(TextField::DESCRIPTIONS_ENGLISH), filter.clone())
            }
            QueryKey::Level => (
                text(TextField::LEVELS),
                filter.with_value(value.to_uppercase()),
            ),
            QueryKey::Credits => {
                let credits = finite(value)?;
                (
                    Predicate::Credits { op, value: credits },
                    filter.clone(),
                )
            }
            QueryKey::Year => {
                if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                let year: i32 = value.parse().ok()?;
                (Predicate::Year { op, value: year }, filter.clone())
            }
            // Ordering operators have no meaning for a semester half and are
            // coerced to equality, so `s>h` renders as `semester=HS`. Only
            // negation survives.
            QueryKey::Semester => {
                let half = value.chars().next().and_then(Half::from_user_letter)?;
                let op = if op == ComparisonOp::Ne {
                    ComparisonOp::Ne
                } else {
                    ComparisonOp::Eq
                };
                (
                    Predicate::negate_if_ne(op, Predicate::SemesterIs(half)),
                    FilterOperator::new(filter.key, op, half.label()),
                )
            }
            QueryKey::Lecturer => {
                self.joins.lecturers = true;
                (
                    Predicate::negate_if_ne(op, Predicate::LecturerContains(value.to_lowercase())),
                    filter.clone(),
                )
            }
            QueryKey::Department => {
                let dept = Department::closest_match(value)?;
                (
                    Predicate::negate_if_ne(op, Predicate::DepartmentIs(dept)),
                    filter.with_value(dept.full_name()),
                )
            }
            QueryKey::CourseReview => {
                let score = finite(value)?;
                self.joins.ratings = true;
                (Predicate::CourseReview { op, value: score }, filter.clone())
            }
            // collected per sibling list by compile_group
            QueryKey::Offered => return None,
        };
        Some(compiled)
    }
}

/// Numeric filter value; `nan` and `inf` parse as f64 but are dropped
fn finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
