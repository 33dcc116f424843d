//! Two-phase corpus ingestion
//!
//! Phase one upserts entities as they arrive and buffers every link whose
//! unit, section or lecturer has not been seen yet. Phase two
//! ([`CorpusIngestor::finish`]) retries the buffer once; whatever still
//! misses an endpoint is reported, never silently discarded.

use std::io::BufRead;

use serde::Serialize;

use super::errors::{IngestError, IngestResult};
use super::items::{PendingLink, ScrapedItem};
use crate::model::PersonRole;
use crate::observability::{log_event, Event, MetricsRegistry, ObservationScope};
use crate::store::CorpusTables;

/// Summary of one ingest pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub units_new: usize,
    pub units_merged: usize,
    pub sections: usize,
    pub lecturers: usize,
    pub ratings: usize,
    pub links_applied: usize,
    /// Links buffered during phase one
    pub links_deferred: usize,
    /// Input lines that were not valid items
    pub rejected: usize,
    /// Links still missing an endpoint after phase two
    pub unresolved: Vec<PendingLink>,
}

/// Feeds scraped items into corpus tables
pub struct CorpusIngestor<'a> {
    tables: &'a mut CorpusTables,
    metrics: &'a MetricsRegistry,
    pending: Vec<PendingLink>,
    report: IngestReport,
}

impl<'a> CorpusIngestor<'a> {
    pub fn new(tables: &'a mut CorpusTables, metrics: &'a MetricsRegistry) -> Self {
        Self {
            tables,
            metrics,
            pending: Vec::new(),
            report: IngestReport::default(),
        }
    }

    /// Phase one for a single item
    pub fn ingest(&mut self, item: ScrapedItem) {
        match item {
            ScrapedItem::Unit(unit) => {
                if self.tables.upsert_unit(unit) {
                    self.report.units_new += 1;
                } else {
                    self.report.units_merged += 1;
                }
            }
            ScrapedItem::Section(section) => {
                self.tables.upsert_section(section);
                self.report.sections += 1;
            }
            ScrapedItem::Lecturer(lecturer) => {
                self.tables.upsert_lecturer(lecturer);
                self.report.lecturers += 1;
            }
            ScrapedItem::Rating(rating) => {
                self.tables.upsert_rating(rating);
                self.report.ratings += 1;
            }
            ScrapedItem::SectionLink(link) => self.link(PendingLink::Section(link)),
            ScrapedItem::LecturerLink(link) => self.link(PendingLink::Person {
                role: PersonRole::Lecturer,
                link,
            }),
            ScrapedItem::ExaminerLink(link) => self.link(PendingLink::Person {
                role: PersonRole::Examiner,
                link,
            }),
            ScrapedItem::Department {
                unit_id,
                department,
            } => self.link(PendingLink::Department {
                unit_id,
                department,
            }),
            ScrapedItem::Level { unit_id, level } => {
                self.link(PendingLink::Level { unit_id, level })
            }
        }
    }

    /// Phase one over a JSON lines stream.
    ///
    /// Blank lines are skipped. Malformed lines, and units whose semester
    /// code does not parse, are logged and counted in
    /// [`IngestReport::rejected`]; only read failures abort.
    pub fn ingest_jsonl<R: BufRead>(&mut self, reader: R) -> IngestResult<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match ScrapedItem::from_json_line(&line) {
                Ok(ScrapedItem::Unit(unit)) if unit.semester().is_none() => {
                    let reason = format!("unit {} has semester code {:?}", unit.id, unit.semkez);
                    self.reject(IngestError::invalid(index + 1, reason));
                }
                Ok(item) => self.ingest(item),
                Err(err) => self.reject(IngestError::malformed(index + 1, err)),
            }
        }
        Ok(())
    }

    fn reject(&mut self, err: IngestError) {
        log_event(Event::IngestItemRejected, &[("reason", err.message())]);
        self.report.rejected += 1;
    }

    fn link(&mut self, link: PendingLink) {
        if !self.try_apply(&link) {
            self.report.links_deferred += 1;
            self.pending.push(link);
        }
    }

    /// Applies a link if all its endpoints exist
    fn try_apply(&mut self, link: &PendingLink) -> bool {
        let tables = &mut *self.tables;
        let applied = match link {
            PendingLink::Section(link) => {
                let ready = tables.has_unit(link.unit_id) && tables.has_section(link.section_id);
                if ready {
                    tables.link_section(link.clone());
                }
                ready
            }
            PendingLink::Person { role, link } => {
                let ready = tables.has_unit(link.unit_id) && tables.has_lecturer(link.lecturer_id);
                if ready {
                    match role {
                        PersonRole::Lecturer => tables.link_lecturer(link.clone()),
                        PersonRole::Examiner => tables.link_examiner(link.clone()),
                    }
                }
                ready
            }
            PendingLink::Department {
                unit_id,
                department,
            } => tables.assign_department(*unit_id, *department),
            PendingLink::Level { unit_id, level } => tables.add_level(*unit_id, *level),
        };
        if applied {
            self.report.links_applied += 1;
        }
        applied
    }

    /// Phase two: retries deferred links and reports what is left
    pub fn finish(mut self) -> IngestReport {
        let scope = ObservationScope::new("INGEST_LINK_RESOLUTION");

        let pending = std::mem::take(&mut self.pending);
        let mut unresolved = Vec::new();
        for link in pending {
            if !self.try_apply(&link) {
                unresolved.push(link);
            }
        }

        if !unresolved.is_empty() {
            let count = unresolved.len().to_string();
            let first_unit = unresolved[0].unit_id().to_string();
            log_event(
                Event::LinksUnresolved,
                &[("count", count.as_str()), ("first_unit_id", first_unit.as_str())],
            );
        }

        self.report.unresolved = unresolved;
        let report = self.report;

        self.metrics
            .add_units_ingested((report.units_new + report.units_merged) as u64);
        self.metrics.add_links_deferred(report.links_deferred as u64);
        self.metrics
            .add_links_unresolved(report.unresolved.len() as u64);

        let applied = report.links_applied.to_string();
        let unresolved_count = report.unresolved.len().to_string();
        scope.complete_with_fields(&[
            ("applied", applied.as_str()),
            ("unresolved", unresolved_count.as_str()),
        ]);
        report
    }
}
