//! Corpus store
//!
//! [`CorpusStore`] is the seam to the relational data store: the engine
//! only needs distinct-number counts, ordered pages of distinct numbers,
//! row fetches restricted to a page, and replace-all writes of the
//! materialized section paths.
//!
//! # Consistency
//!
//! Each call is an independent read. A search issues its count and its page
//! fetch as two reads that may run concurrently, so a concurrent path
//! rebuild can be observed by one and not the other (read committed).
//!
//! [`MemoryCorpus`] implements the trait over in-memory tables loaded from
//! a JSON [`CorpusSnapshot`].

mod errors;
mod memory;
mod plan;
mod snapshot;

use std::future::Future;

pub use errors::{StoreError, StoreResult};
pub use memory::{CorpusTables, MemoryCorpus};
pub use plan::{ScanPlan, SortSpec, UnitRow};
pub use snapshot::CorpusSnapshot;

use crate::model::{LearningUnit, Section, SectionPath};

/// Read/write access to the corpus
pub trait CorpusStore: Send + Sync {
    /// Number of distinct course numbers among matching rows
    fn count_distinct_numbers(
        &self,
        plan: &ScanPlan,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// One page of distinct course numbers, in plan order
    fn page_numbers(
        &self,
        plan: &ScanPlan,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = StoreResult<Vec<String>>> + Send;

    /// Matching rows whose number is in `numbers`, in plan order
    fn fetch_rows(
        &self,
        plan: &ScanPlan,
        numbers: &[String],
    ) -> impl Future<Output = StoreResult<Vec<LearningUnit>>> + Send;

    /// The whole section forest
    fn load_sections(&self) -> impl Future<Output = StoreResult<Vec<Section>>> + Send;

    /// Replaces the materialized path table. Returns rows written.
    fn replace_section_paths(
        &self,
        paths: Vec<SectionPath>,
    ) -> impl Future<Output = StoreResult<usize>> + Send;

    /// True if sections or section links changed since the last rebuild
    fn section_paths_stale(&self) -> impl Future<Output = StoreResult<bool>> + Send;
}
