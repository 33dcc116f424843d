//! Corpus data model
//!
//! Entities scraped from the course catalog:
//! - Learning units, one per (number, semester, language variant)
//! - The section forest units are offered in, plus its materialized paths
//! - Lecturers/examiners and externally supplied course reviews
//!
//! Every mutable entity has an explicit `merge_variant` that enumerates its
//! fields, so a second language variant of the same record completes the
//! stored one instead of replacing it.

mod people;
mod section;
mod semester;
mod unit;

pub use people::{Lecturer, PersonRole, Rating, UnitPersonLink};
pub use section::{Section, SectionPath, UnitSectionLink, PATH_SEPARATOR};
pub use semester::{Half, Semester};
pub use unit::{Department, LearningUnit, Level, DEPARTMENT_MATCH_THRESHOLD};
