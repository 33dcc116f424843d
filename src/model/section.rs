//! The "offered in" section hierarchy
//!
//! Sections form a forest: every node has at most one parent and no node is
//! its own ancestor. Units link to sections with a membership type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator between path segments in a materialized path
pub const PATH_SEPARATOR: &str = " > ";

/// One node of the section forest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub semkez: Option<String>,
    /// German name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_english: Option<String>,
    /// Nesting depth as scraped
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub comment_english: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

impl Section {
    pub fn new(id: u64, parent_id: Option<u64>, name: &str, name_english: &str) -> Self {
        Self {
            id,
            parent_id,
            name: Some(name.to_string()),
            name_english: Some(name_english.to_string()),
            ..Default::default()
        }
    }

    /// Copies every present value of a newly scraped variant onto this node.
    pub fn merge_variant(&mut self, other: &Section) {
        fn take<T: Clone>(slot: &mut Option<T>, incoming: &Option<T>) {
            if incoming.is_some() {
                slot.clone_from(incoming);
            }
        }

        take(&mut self.parent_id, &other.parent_id);
        take(&mut self.semkez, &other.semkez);
        take(&mut self.name, &other.name);
        take(&mut self.name_english, &other.name_english);
        take(&mut self.level, &other.level);
        take(&mut self.comment, &other.comment);
        take(&mut self.comment_english, &other.comment_english);
        take(&mut self.scraped_at, &other.scraped_at);
    }
}

/// Materialized root-to-node path of one section, per language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPath {
    pub id: u64,
    pub path_en: String,
    pub path_de: String,
}

impl SectionPath {
    /// True if either language path contains `needle`, case-insensitively.
    ///
    /// `needle` must already be lowercased.
    pub fn contains_lower(&self, needle: &str) -> bool {
        self.path_en.to_lowercase().contains(needle) || self.path_de.to_lowercase().contains(needle)
    }
}

/// Membership of a unit in a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSectionLink {
    pub unit_id: u64,
    pub section_id: u64,
    /// Membership type, e.g. "O" (mandatory) or "W" (elective)
    #[serde(default, rename = "type")]
    pub membership: Option<String>,
}
