//! In-memory corpus store
//!
//! Holds every table behind one async read/write lock. Each search read
//! takes the read lock for the duration of a single scan; the materializer
//! takes the write lock only to swap in a finished path table.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use tokio::sync::RwLock;

use super::errors::StoreResult;
use super::plan::{ScanPlan, UnitRow};
use super::snapshot::CorpusSnapshot;
use super::CorpusStore;
use crate::compiler::JoinRequirements;
use crate::executor::{PredicateFilter, ResultSorter};
use crate::model::{
    Department, LearningUnit, Lecturer, Level, Rating, Section, SectionPath, UnitPersonLink,
    UnitSectionLink,
};

/// All corpus tables, indexed by primary key
#[derive(Debug, Clone, Default)]
pub struct CorpusTables {
    units: BTreeMap<u64, LearningUnit>,
    sections: BTreeMap<u64, Section>,
    section_paths: BTreeMap<u64, SectionPath>,
    unit_sections: Vec<UnitSectionLink>,
    lecturers: BTreeMap<u64, Lecturer>,
    unit_lecturers: Vec<UnitPersonLink>,
    unit_examiners: Vec<UnitPersonLink>,
    ratings: BTreeMap<String, Rating>,
    section_paths_stale: bool,
}

impl CorpusTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CorpusSnapshot) -> Self {
        let mut tables = Self::new();
        for unit in snapshot.units {
            tables.units.insert(unit.id, unit);
        }
        for section in snapshot.sections {
            tables.sections.insert(section.id, section);
        }
        for path in snapshot.section_paths {
            tables.section_paths.insert(path.id, path);
        }
        for lecturer in snapshot.lecturers {
            tables.lecturers.insert(lecturer.id, lecturer);
        }
        for rating in snapshot.ratings {
            tables.ratings.insert(rating.course_number.clone(), rating);
        }
        tables.unit_sections = snapshot.unit_sections;
        tables.unit_lecturers = snapshot.unit_lecturers;
        tables.unit_examiners = snapshot.unit_examiners;
        tables.section_paths_stale = snapshot.section_paths_stale;
        tables
    }

    pub fn to_snapshot(&self) -> CorpusSnapshot {
        CorpusSnapshot {
            units: self.units.values().cloned().collect(),
            sections: self.sections.values().cloned().collect(),
            section_paths: self.section_paths.values().cloned().collect(),
            unit_sections: self.unit_sections.clone(),
            lecturers: self.lecturers.values().cloned().collect(),
            unit_lecturers: self.unit_lecturers.clone(),
            unit_examiners: self.unit_examiners.clone(),
            ratings: self.ratings.values().cloned().collect(),
            section_paths_stale: self.section_paths_stale,
        }
    }

    // Writes

    /// Inserts a unit or merges it into the stored variant. Returns true if new.
    pub fn upsert_unit(&mut self, unit: LearningUnit) -> bool {
        match self.units.get_mut(&unit.id) {
            Some(stored) => {
                stored.merge_variant(&unit);
                false
            }
            None => {
                self.units.insert(unit.id, unit);
                true
            }
        }
    }

    pub fn upsert_section(&mut self, section: Section) -> bool {
        self.section_paths_stale = true;
        match self.sections.get_mut(&section.id) {
            Some(stored) => {
                stored.merge_variant(&section);
                false
            }
            None => {
                self.sections.insert(section.id, section);
                true
            }
        }
    }

    pub fn upsert_lecturer(&mut self, lecturer: Lecturer) -> bool {
        match self.lecturers.get_mut(&lecturer.id) {
            Some(stored) => {
                stored.merge_variant(&lecturer);
                false
            }
            None => {
                self.lecturers.insert(lecturer.id, lecturer);
                true
            }
        }
    }

    pub fn upsert_rating(&mut self, rating: Rating) {
        self.ratings.insert(rating.course_number.clone(), rating);
    }

    /// Adds a section membership, replacing the type of an existing one
    pub fn link_section(&mut self, link: UnitSectionLink) {
        self.section_paths_stale = true;
        match self
            .unit_sections
            .iter_mut()
            .find(|l| l.unit_id == link.unit_id && l.section_id == link.section_id)
        {
            Some(existing) => {
                if link.membership.is_some() {
                    existing.membership = link.membership;
                }
            }
            None => self.unit_sections.push(link),
        }
    }

    pub fn link_lecturer(&mut self, link: UnitPersonLink) {
        if !self.unit_lecturers.contains(&link) {
            self.unit_lecturers.push(link);
        }
    }

    pub fn link_examiner(&mut self, link: UnitPersonLink) {
        if !self.unit_examiners.contains(&link) {
            self.unit_examiners.push(link);
        }
    }

    /// Tags a unit with a department. False if the unit is unknown.
    pub fn assign_department(&mut self, unit_id: u64, department: Department) -> bool {
        match self.units.get_mut(&unit_id) {
            Some(unit) => {
                if !unit.departments.contains(&department) {
                    unit.departments.push(department);
                }
                true
            }
            None => false,
        }
    }

    /// Tags a unit with a study level. False if the unit is unknown.
    pub fn add_level(&mut self, unit_id: u64, level: Level) -> bool {
        match self.units.get_mut(&unit_id) {
            Some(unit) => {
                if !unit.levels.contains(&level) {
                    unit.levels.push(level);
                }
                true
            }
            None => false,
        }
    }

    /// Replaces the whole materialized path table. Returns the row count.
    pub fn replace_section_paths(&mut self, paths: Vec<SectionPath>) -> usize {
        self.section_paths = paths.into_iter().map(|p| (p.id, p)).collect();
        self.section_paths_stale = false;
        self.section_paths.len()
    }

    // Reads

    pub fn has_unit(&self, id: u64) -> bool {
        self.units.contains_key(&id)
    }

    pub fn has_section(&self, id: u64) -> bool {
        self.sections.contains_key(&id)
    }

    pub fn has_lecturer(&self, id: u64) -> bool {
        self.lecturers.contains_key(&id)
    }

    pub fn unit(&self, id: u64) -> Option<&LearningUnit> {
        self.units.get(&id)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_paths_stale(&self) -> bool {
        self.section_paths_stale
    }

    /// Builds row views with the requested joins attached
    fn rows(&self, joins: &JoinRequirements) -> Vec<UnitRow<'_>> {
        let mut lecturers_by_unit: HashMap<u64, Vec<&Lecturer>> = HashMap::new();
        if joins.lecturers {
            for link in self.unit_lecturers.iter().chain(&self.unit_examiners) {
                if let Some(lecturer) = self.lecturers.get(&link.lecturer_id) {
                    let entry = lecturers_by_unit.entry(link.unit_id).or_default();
                    if !entry.iter().any(|l| l.id == lecturer.id) {
                        entry.push(lecturer);
                    }
                }
            }
        }

        let mut paths_by_unit: HashMap<u64, Vec<&SectionPath>> = HashMap::new();
        if joins.sections {
            for link in &self.unit_sections {
                if let Some(path) = self.section_paths.get(&link.section_id) {
                    paths_by_unit.entry(link.unit_id).or_default().push(path);
                }
            }
        }

        self.units
            .values()
            .map(|unit| UnitRow {
                unit,
                lecturers: lecturers_by_unit.remove(&unit.id).unwrap_or_default(),
                section_paths: paths_by_unit.remove(&unit.id).unwrap_or_default(),
                rating: if joins.ratings {
                    unit.number.as_ref().and_then(|n| self.ratings.get(n))
                } else {
                    None
                },
            })
            .collect()
    }

    /// Rows matching the plan's predicate, in the plan's order
    pub fn scan(&self, plan: &ScanPlan) -> Vec<UnitRow<'_>> {
        let mut rows: Vec<UnitRow<'_>> = self
            .rows(&plan.joins)
            .into_iter()
            .filter(|row| PredicateFilter::matches(row, &plan.predicate))
            .collect();
        ResultSorter::sort(&mut rows, &plan.order);
        rows
    }
}

/// Distinct course numbers in first-seen order
fn distinct_numbers<'a>(rows: &'a [UnitRow<'a>]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.unit.number.as_deref())
        .filter(|n| seen.insert(*n))
        .collect()
}

/// Corpus store backed by in-memory tables
#[derive(Debug, Default)]
pub struct MemoryCorpus {
    tables: RwLock<CorpusTables>,
}

impl MemoryCorpus {
    pub fn new(tables: CorpusTables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Loads a corpus snapshot file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let snapshot = CorpusSnapshot::load(path)?;
        Ok(Self::new(CorpusTables::from_snapshot(snapshot)))
    }

    /// Writes the current tables to a snapshot file
    pub async fn save(&self, path: &Path) -> StoreResult<()> {
        let snapshot = self.tables.read().await.to_snapshot();
        snapshot.save(path)
    }

    pub async fn unit_count(&self) -> usize {
        self.tables.read().await.unit_count()
    }
}

impl CorpusStore for MemoryCorpus {
    async fn count_distinct_numbers(&self, plan: &ScanPlan) -> StoreResult<u64> {
        let tables = self.tables.read().await;
        let rows = tables.scan(plan);
        let count = distinct_numbers(&rows).len() as u64;
        Ok(count)
    }

    async fn page_numbers(
        &self,
        plan: &ScanPlan,
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<String>> {
        let tables = self.tables.read().await;
        let rows = tables.scan(plan);
        let page = distinct_numbers(&rows)
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(str::to_string)
            .collect();
        Ok(page)
    }

    async fn fetch_rows(&self, plan: &ScanPlan, numbers: &[String]) -> StoreResult<Vec<LearningUnit>> {
        let wanted: HashSet<&str> = numbers.iter().map(String::as_str).collect();
        let tables = self.tables.read().await;
        let units = tables
            .scan(plan)
            .into_iter()
            .filter(|row| {
                row.unit
                    .number
                    .as_deref()
                    .is_some_and(|n| wanted.contains(n))
            })
            .map(|row| row.unit.clone())
            .collect();
        Ok(units)
    }

    async fn load_sections(&self) -> StoreResult<Vec<Section>> {
        Ok(self.tables.read().await.sections().cloned().collect())
    }

    async fn replace_section_paths(&self, paths: Vec<SectionPath>) -> StoreResult<usize> {
        Ok(self.tables.write().await.replace_section_paths(paths))
    }

    async fn section_paths_stale(&self) -> StoreResult<bool> {
        Ok(self.tables.read().await.section_paths_stale())
    }
}
