//! Lecturers, examiners and course reviews

use serde::{Deserialize, Serialize};

/// A person teaching or examining a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: u64,
    /// First name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    /// Academic title, e.g. "Prof. Dr."
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl Lecturer {
    pub fn new(id: u64, name: &str, surname: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            surname: surname.to_string(),
            ..Default::default()
        }
    }

    /// "first last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// "last first"
    pub fn reversed_name(&self) -> String {
        format!("{} {}", self.surname, self.name)
    }

    /// True if `needle` (lowercased) appears in either name ordering
    pub fn name_contains_lower(&self, needle: &str) -> bool {
        self.full_name().to_lowercase().contains(needle)
            || self.reversed_name().to_lowercase().contains(needle)
    }

    /// Copies every present value of a newly scraped variant.
    ///
    /// Empty names count as absent.
    pub fn merge_variant(&mut self, other: &Lecturer) {
        if !other.name.is_empty() {
            self.name.clone_from(&other.name);
        }
        if !other.surname.is_empty() {
            self.surname.clone_from(&other.surname);
        }
        if other.title.is_some() {
            self.title.clone_from(&other.title);
        }
        if other.department.is_some() {
            self.department.clone_from(&other.department);
        }
    }
}

/// Role of a person on a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    Lecturer,
    Examiner,
}

/// Association of a person with a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPersonLink {
    pub unit_id: u64,
    pub lecturer_id: u64,
}

/// Externally supplied course review, keyed by course number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub course_number: String,
    pub recommended: f64,
    pub engaging: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub resources: f64,
}

impl Rating {
    /// Mean of the five sub-scores
    pub fn mean(&self) -> f64 {
        (self.recommended + self.engaging + self.difficulty + self.effort + self.resources) / 5.0
    }
}
