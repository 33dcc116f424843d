//! Result ordering
//!
//! One primary key chosen by the caller, then a fixed tie-break: English
//! title ascending, German title ascending, year descending, course number
//! ascending, row id ascending. Only the primary key honours `descending`.
//! Missing values sort before present ones.

use std::cmp::Ordering;

use crate::query::QueryKey;
use crate::store::{SortSpec, UnitRow};

/// Sorts joined rows
pub struct ResultSorter;

impl ResultSorter {
    /// Stable, total ordering of `rows` by `spec`
    pub fn sort(rows: &mut [UnitRow<'_>], spec: &SortSpec) {
        rows.sort_by(|a, b| {
            let primary = Self::compare_primary(a, b, spec.order_by);
            let primary = if spec.descending {
                primary.reverse()
            } else {
                primary
            };
            primary.then_with(|| Self::compare_tie_break(a, b))
        });
    }

    fn compare_primary(a: &UnitRow<'_>, b: &UnitRow<'_>, key: QueryKey) -> Ordering {
        let (ua, ub) = (a.unit, b.unit);
        match key {
            QueryKey::Title | QueryKey::TitleEnglish => ua.title_english.cmp(&ub.title_english),
            QueryKey::TitleGerman => ua.title.cmp(&ub.title),
            QueryKey::Number => ua.number.cmp(&ub.number),
            QueryKey::Credits => Self::compare_f64(ua.credits, ub.credits),
            QueryKey::Semester => ua.semester_letter().cmp(&ub.semester_letter()),
            QueryKey::Year => ua.year().cmp(&ub.year()),
            QueryKey::Language => ua.language.cmp(&ub.language),
            QueryKey::Lecturer => Self::first_lecturer(a).cmp(&Self::first_lecturer(b)),
            QueryKey::Department => {
                let ids = |row: &UnitRow<'_>| -> Vec<u8> {
                    row.unit.departments.iter().map(|d| d.id()).collect()
                };
                ids(a).cmp(&ids(b))
            }
            QueryKey::Level => ua.levels.cmp(&ub.levels),
            QueryKey::Descriptions
            | QueryKey::DescriptionsGerman
            | QueryKey::DescriptionsEnglish
            | QueryKey::Offered
            | QueryKey::ExamType
            | QueryKey::CourseReview => Ordering::Equal,
        }
    }

    fn compare_tie_break(a: &UnitRow<'_>, b: &UnitRow<'_>) -> Ordering {
        let (ua, ub) = (a.unit, b.unit);
        ua.title_english
            .cmp(&ub.title_english)
            .then_with(|| ua.title.cmp(&ub.title))
            .then_with(|| ub.year().cmp(&ua.year()))
            .then_with(|| ua.number.cmp(&ub.number))
            .then_with(|| ua.id.cmp(&ub.id))
    }

    /// Alphabetically first (surname, name) among joined lecturers
    fn first_lecturer<'a>(row: &UnitRow<'a>) -> Option<(&'a str, &'a str)> {
        row.lecturers
            .iter()
            .map(|l| (l.surname.as_str(), l.name.as_str()))
            .min()
    }

    fn compare_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        }
    }
}
