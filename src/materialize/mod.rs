//! Section path materialization
//!
//! "Offered in" filters match against precomputed bilingual root-to-leaf
//! path strings, never against the live section forest. This subsystem
//! recomputes the whole path table, on demand or on a cron schedule.
//!
//! # Invariants
//!
//! - A rebuild fully replaces the previous table
//! - Rebuilding twice without intervening mutations yields identical paths
//! - No lock is held while paths are computed; searches running during a
//!   rebuild see either the old or the new table

mod errors;
mod paths;
mod scheduler;

pub use errors::{MaterializeError, MaterializeErrorCode, MaterializeResult};
pub use paths::{RebuildReport, SectionPathMaterializer};
pub use scheduler::{MaterializeSchedule, DEFAULT_SCHEDULE};
