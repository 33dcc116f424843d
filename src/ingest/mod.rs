//! Corpus ingestion
//!
//! Loads scraped catalog records into corpus tables. Records arrive in
//! crawl order, so links routinely precede the entities they connect.
//!
//! # Flow
//!
//! 1. Entities are upserted; a repeated id merges the new language variant
//!    into the stored record
//! 2. Links and tags whose endpoints exist are applied immediately, the
//!    rest are buffered
//! 3. `finish` retries the buffer and reports links that are still dangling
//!
//! Section and section-link changes mark the materialized paths stale.

mod errors;
mod ingestor;
mod items;

pub use errors::{IngestError, IngestErrorCode, IngestResult};
pub use ingestor::{CorpusIngestor, IngestReport};
pub use items::{PendingLink, ScrapedItem};
