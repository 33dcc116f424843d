//! Predicate evaluation
//!
//! Tests one joined row against a compiled predicate. Missing values never
//! match a positive test. Join-backed tests (lecturer, offered, course
//! review) hold if any joined record satisfies them.

use crate::compiler::{MatchMode, Predicate};
use crate::store::UnitRow;

/// Evaluates predicates against rows
pub struct PredicateFilter;

impl PredicateFilter {
    pub fn matches(row: &UnitRow<'_>, predicate: &Predicate) -> bool {
        let unit = row.unit;
        match predicate {
            Predicate::Always => true,
            Predicate::And(parts) => parts.iter().all(|p| Self::matches(row, p)),
            Predicate::Or(parts) => parts.iter().any(|p| Self::matches(row, p)),
            Predicate::Not(inner) => !Self::matches(row, inner),
            Predicate::TextContains { fields, needle } => fields.iter().any(|field| {
                field
                    .extract(unit)
                    .is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
            }),
            Predicate::Credits { op, value } => unit.credits.is_some_and(|c| op.compare(c, *value)),
            Predicate::Year { op, value } => unit.year().is_some_and(|y| op.compare(y, *value)),
            Predicate::SemesterIs(half) => unit.semester_letter() == Some(half.letter()),
            Predicate::LecturerContains(needle) => {
                row.lecturers.iter().any(|l| l.name_contains_lower(needle))
            }
            Predicate::DepartmentIs(dept) => unit.departments.contains(dept),
            Predicate::OfferedIn { names, mode } => row.section_paths.iter().any(|path| match mode {
                MatchMode::Any => names.iter().any(|n| path.contains_lower(n)),
                MatchMode::All => names.iter().all(|n| path.contains_lower(n)),
            }),
            Predicate::CourseReview { op, value } => {
                row.rating.is_some_and(|r| op.compare(r.mean(), *value))
            }
            Predicate::NumberPresent => unit.number.is_some(),
        }
    }
}
