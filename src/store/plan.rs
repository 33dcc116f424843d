//! Scan plans and joined row views

use serde::Serialize;

use crate::compiler::{JoinRequirements, Predicate};
use crate::model::{LearningUnit, Lecturer, Rating, SectionPath};
use crate::query::QueryKey;

/// Requested result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    /// Primary sort key
    pub order_by: QueryKey,
    /// Applies to the primary key only
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            order_by: QueryKey::Year,
            descending: true,
        }
    }
}

/// Everything a store needs to answer one search read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanPlan {
    pub predicate: Predicate,
    pub joins: JoinRequirements,
    pub order: SortSpec,
}

/// A unit together with the joined data a plan asked for.
///
/// Join lists are empty when the join was not requested.
#[derive(Debug, Clone)]
pub struct UnitRow<'a> {
    pub unit: &'a LearningUnit,
    /// Lecturers and examiners, deduplicated
    pub lecturers: Vec<&'a Lecturer>,
    /// Materialized paths of linked sections
    pub section_paths: Vec<&'a SectionPath>,
    pub rating: Option<&'a Rating>,
}

#[cfg(test)]
impl<'a> UnitRow<'a> {
    /// A row with no joined data
    pub fn bare(unit: &'a LearningUnit) -> Self {
        Self {
            unit,
            lecturers: Vec::new(),
            section_paths: Vec::new(),
            rating: None,
        }
    }
}
