//! JSON corpus snapshots
//!
//! A snapshot holds every table of the corpus in one JSON document. It is
//! how the in-memory store is loaded at boot and written back after
//! ingestion or materialization.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use crate::model::{
    LearningUnit, Lecturer, Rating, Section, SectionPath, UnitPersonLink, UnitSectionLink,
};

/// Serialized form of all corpus tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    #[serde(default)]
    pub units: Vec<LearningUnit>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub section_paths: Vec<SectionPath>,
    #[serde(default)]
    pub unit_sections: Vec<UnitSectionLink>,
    #[serde(default)]
    pub lecturers: Vec<Lecturer>,
    #[serde(default)]
    pub unit_lecturers: Vec<UnitPersonLink>,
    #[serde(default)]
    pub unit_examiners: Vec<UnitPersonLink>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    /// True when section paths lag behind sections or section links
    #[serde(default)]
    pub section_paths_stale: bool,
}

impl CorpusSnapshot {
    /// Reads a snapshot file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(&display, e))?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    /// Writes the snapshot, replacing the file through a temporary sibling
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let display = path.display().to_string();
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::io(tmp.display().to_string(), e))?;
        fs::rename(&tmp, path).map_err(|e| StoreError::io(&display, e))?;
        Ok(())
    }
}
