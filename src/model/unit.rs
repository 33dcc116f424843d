//! Learning units
//!
//! A learning unit is one scraped snapshot of a course offering in one
//! semester and language variant. Rows sharing a `number` across semesters
//! form the offering history of a course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::semester::Semester;
use crate::similarity;

/// Study level tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "BSC")]
    Bachelor,
    #[serde(rename = "DZ")]
    DidacticsCertificate,
    #[serde(rename = "DS")]
    Diploma,
    #[serde(rename = "DR")]
    Doctorate,
    #[serde(rename = "SHE")]
    TeachingDiploma,
    #[serde(rename = "MSC")]
    Master,
    #[serde(rename = "GS")]
    Mobility,
    #[serde(rename = "WBZ")]
    AdvancedStudies,
    #[serde(rename = "NDS")]
    MasterOfAdvancedStudies,
}

impl Level {
    /// Short code as stored and searched
    pub fn code(&self) -> &'static str {
        match self {
            Level::Bachelor => "BSC",
            Level::DidacticsCertificate => "DZ",
            Level::Diploma => "DS",
            Level::Doctorate => "DR",
            Level::TeachingDiploma => "SHE",
            Level::Master => "MSC",
            Level::Mobility => "GS",
            Level::AdvancedStudies => "WBZ",
            Level::MasterOfAdvancedStudies => "NDS",
        }
    }
}

/// Minimum fuzzy score for a full department name match
pub const DEPARTMENT_MATCH_THRESHOLD: f64 = 80.0;

/// Teaching department. The set is fixed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    Architecture,
    CivilEnvironmentalAndGeomaticEngineering,
    MechanicalAndProcessEngineering,
    ComputerScience,
    ManagementTechnologyAndEconomics,
    Mathematics,
    Physics,
    Biology,
    EarthAndPlanetarySciences,
    HumanitiesSocialAndPoliticalSciences,
    InformationTechnologyAndElectricalEngineering,
    Materials,
    ChemistryAndAppliedBiosciences,
    BiosystemsScienceAndEngineering,
    HealthSciencesAndTechnology,
    EnvironmentalSystemsScience,
}

impl Department {
    /// All departments in catalog order
    pub const ALL: [Department; 16] = [
        Department::Architecture,
        Department::CivilEnvironmentalAndGeomaticEngineering,
        Department::MechanicalAndProcessEngineering,
        Department::ComputerScience,
        Department::ManagementTechnologyAndEconomics,
        Department::Mathematics,
        Department::Physics,
        Department::Biology,
        Department::EarthAndPlanetarySciences,
        Department::HumanitiesSocialAndPoliticalSciences,
        Department::InformationTechnologyAndElectricalEngineering,
        Department::Materials,
        Department::ChemistryAndAppliedBiosciences,
        Department::BiosystemsScienceAndEngineering,
        Department::HealthSciencesAndTechnology,
        Department::EnvironmentalSystemsScience,
    ];

    /// Catalog id
    pub fn id(&self) -> u8 {
        match self {
            Department::Architecture => 1,
            Department::CivilEnvironmentalAndGeomaticEngineering => 2,
            Department::MechanicalAndProcessEngineering => 3,
            Department::ComputerScience => 5,
            Department::ManagementTechnologyAndEconomics => 7,
            Department::Mathematics => 8,
            Department::Physics => 9,
            Department::Biology => 11,
            Department::EarthAndPlanetarySciences => 13,
            Department::HumanitiesSocialAndPoliticalSciences => 17,
            Department::InformationTechnologyAndElectricalEngineering => 18,
            Department::Materials => 19,
            Department::ChemistryAndAppliedBiosciences => 20,
            Department::BiosystemsScienceAndEngineering => 23,
            Department::HealthSciencesAndTechnology => 24,
            Department::EnvironmentalSystemsScience => 25,
        }
    }

    /// Short code without the `D-` prefix, e.g. `INFK`
    pub fn code(&self) -> &'static str {
        match self {
            Department::Architecture => "ARCH",
            Department::CivilEnvironmentalAndGeomaticEngineering => "BAUG",
            Department::MechanicalAndProcessEngineering => "MAVT",
            Department::ComputerScience => "INFK",
            Department::ManagementTechnologyAndEconomics => "MTEC",
            Department::Mathematics => "MATH",
            Department::Physics => "PHYS",
            Department::Biology => "BIOL",
            Department::EarthAndPlanetarySciences => "ERDW",
            Department::HumanitiesSocialAndPoliticalSciences => "GESS",
            Department::InformationTechnologyAndElectricalEngineering => "ITET",
            Department::Materials => "MATL",
            Department::ChemistryAndAppliedBiosciences => "CHAB",
            Department::BiosystemsScienceAndEngineering => "BSSE",
            Department::HealthSciencesAndTechnology => "HEST",
            Department::EnvironmentalSystemsScience => "USYS",
        }
    }

    /// Full name, e.g. `Computer Science`
    pub fn full_name(&self) -> &'static str {
        match self {
            Department::Architecture => "Architecture",
            Department::CivilEnvironmentalAndGeomaticEngineering => {
                "Civil Environmental And Geomatic Engineering"
            }
            Department::MechanicalAndProcessEngineering => "Mechanical And Process Engineering",
            Department::ComputerScience => "Computer Science",
            Department::ManagementTechnologyAndEconomics => "Management Technology And Economics",
            Department::Mathematics => "Mathematics",
            Department::Physics => "Physics",
            Department::Biology => "Biology",
            Department::EarthAndPlanetarySciences => "Earth And Planetary Sciences",
            Department::HumanitiesSocialAndPoliticalSciences => {
                "Humanities Social And Political Sciences"
            }
            Department::InformationTechnologyAndElectricalEngineering => {
                "Information Technology And Electrical Engineering"
            }
            Department::Materials => "Materials",
            Department::ChemistryAndAppliedBiosciences => "Chemistry And Applied Biosciences",
            Department::BiosystemsScienceAndEngineering => "Biosystems Science And Engineering",
            Department::HealthSciencesAndTechnology => "Health Sciences And Technology",
            Department::EnvironmentalSystemsScience => "Environmental Systems Science",
        }
    }

    /// Resolves free text to the closest department.
    ///
    /// A short code contained anywhere in the (uppercased) input wins.
    /// Otherwise the best fuzzy match on the full name is taken if it scores
    /// at least [`DEPARTMENT_MATCH_THRESHOLD`].
    pub fn closest_match(name: &str) -> Option<Department> {
        let upper = name.to_uppercase();
        if let Some(dept) = Self::ALL.iter().find(|d| upper.contains(d.code())) {
            return Some(*dept);
        }

        let mut best: Option<(Department, f64)> = None;
        for dept in Self::ALL {
            let score = similarity::partial_ratio(name, dept.full_name());
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((dept, score));
            }
        }

        best.filter(|(_, score)| *score >= DEPARTMENT_MATCH_THRESHOLD)
            .map(|(dept, _)| dept)
    }
}

/// One scraped course offering in one semester/language variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningUnit {
    pub id: u64,
    /// Semester code, `YYYY` + `S`/`W`
    pub semkez: String,
    /// Stable course number such as `263-0007-00L`, shared across semesters
    #[serde(default)]
    pub number: Option<String>,
    /// German title
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub literature: Option<String>,
    #[serde(default)]
    pub literature_english: Option<String>,
    /// Learning objective
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub objective_english: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_english: Option<String>,
    #[serde(default)]
    pub lecture_notes: Option<String>,
    #[serde(default)]
    pub lecture_notes_english: Option<String>,
    #[serde(default)]
    pub additional: Option<String>,
    #[serde(default)]
    pub additional_english: Option<String>,
    /// Comment also shown on the search page
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub comment_english: Option<String>,
    #[serde(default, rename = "abstract")]
    pub summary: Option<String>,
    #[serde(default, rename = "abstract_english")]
    pub summary_english: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// e.g. "session examination"
    #[serde(default)]
    pub exam_type: Option<String>,
    /// e.g. "written 180 minutes"
    #[serde(default)]
    pub exam_mode: Option<String>,
    #[serde(default)]
    pub exam_language: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
}

impl LearningUnit {
    /// Creates a unit with the identifying fields set
    pub fn new(id: u64, semkez: impl Into<String>, number: Option<&str>) -> Self {
        Self {
            id,
            semkez: semkez.into(),
            number: number.map(str::to_string),
            ..Default::default()
        }
    }

    /// Parsed semester, None if the code is malformed
    pub fn semester(&self) -> Option<Semester> {
        Semester::parse(&self.semkez)
    }

    /// Year from the first four characters of the semester code
    pub fn year(&self) -> Option<i32> {
        let prefix = self.semkez.get(..4)?;
        if !prefix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        prefix.parse().ok()
    }

    /// Semester letter (fifth character of the code)
    pub fn semester_letter(&self) -> Option<char> {
        self.semkez.chars().nth(4)
    }

    pub fn levels_as_str(&self) -> String {
        self.levels
            .iter()
            .map(Level::code)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Merges a newly scraped variant of the same unit into this record.
    ///
    /// Every value present on `other` overwrites the stored one; values
    /// absent on `other` (None or empty lists) leave the stored value
    /// untouched. Identity fields (`id`, `semkez`) are kept.
    pub fn merge_variant(&mut self, other: &LearningUnit) {
        fn take<T: Clone>(slot: &mut Option<T>, incoming: &Option<T>) {
            if incoming.is_some() {
                slot.clone_from(incoming);
            }
        }
        fn take_list<T: Clone>(slot: &mut Vec<T>, incoming: &[T]) {
            if !incoming.is_empty() {
                *slot = incoming.to_vec();
            }
        }

        take(&mut self.number, &other.number);
        take(&mut self.title, &other.title);
        take(&mut self.title_english, &other.title_english);
        take_list(&mut self.levels, &other.levels);
        take_list(&mut self.departments, &other.departments);
        take(&mut self.credits, &other.credits);
        take(&mut self.literature, &other.literature);
        take(&mut self.literature_english, &other.literature_english);
        take(&mut self.objective, &other.objective);
        take(&mut self.objective_english, &other.objective_english);
        take(&mut self.content, &other.content);
        take(&mut self.content_english, &other.content_english);
        take(&mut self.lecture_notes, &other.lecture_notes);
        take(&mut self.lecture_notes_english, &other.lecture_notes_english);
        take(&mut self.additional, &other.additional);
        take(&mut self.additional_english, &other.additional_english);
        take(&mut self.comment, &other.comment);
        take(&mut self.comment_english, &other.comment_english);
        take(&mut self.summary, &other.summary);
        take(&mut self.summary_english, &other.summary_english);
        take(&mut self.language, &other.language);
        take(&mut self.exam_type, &other.exam_type);
        take(&mut self.exam_mode, &other.exam_mode);
        take(&mut self.exam_language, &other.exam_language);
        take(&mut self.scraped_at, &other.scraped_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::semester::Half;

    #[test]
    fn test_semester_accessors() {
        let unit = LearningUnit::new(1, "2024W", Some("263-0007-00L"));
        assert_eq!(unit.year(), Some(2024));
        assert_eq!(unit.semester_letter(), Some('W'));
        assert_eq!(unit.semester(), Some(Semester::new(2024, Half::Autumn)));
    }

    #[test]
    fn test_year_of_malformed_code() {
        let unit = LearningUnit::new(1, "20x4W", None);
        assert_eq!(unit.year(), None);
        assert_eq!(unit.semester(), None);
    }

    #[test]
    fn test_merge_keeps_both_languages() {
        let mut german = LearningUnit::new(7, "2024S", Some("252-0027-00L"));
        german.title = Some("Einführung in die Programmierung".into());
        german.content = Some("Inhalt".into());
        german.levels = vec![Level::Bachelor];

        let mut english = LearningUnit::new(7, "2024S", None);
        english.title_english = Some("Introduction to Programming".into());
        english.content_english = Some("Content".into());

        german.merge_variant(&english);

        assert_eq!(german.number.as_deref(), Some("252-0027-00L"));
        assert_eq!(
            german.title.as_deref(),
            Some("Einführung in die Programmierung")
        );
        assert_eq!(
            german.title_english.as_deref(),
            Some("Introduction to Programming")
        );
        assert_eq!(german.content.as_deref(), Some("Inhalt"));
        assert_eq!(german.content_english.as_deref(), Some("Content"));
        assert_eq!(german.levels, vec![Level::Bachelor]);
    }

    #[test]
    fn test_merge_overwrites_present_values() {
        let mut stored = LearningUnit::new(7, "2024S", Some("1"));
        stored.title = Some("Old".into());
        stored.credits = Some(4.0);

        let mut incoming = LearningUnit::new(7, "2024S", None);
        incoming.title = Some("New".into());
        incoming.departments = vec![Department::Physics];

        stored.merge_variant(&incoming);
        assert_eq!(stored.title.as_deref(), Some("New"));
        assert_eq!(stored.credits, Some(4.0));
        assert_eq!(stored.departments, vec![Department::Physics]);
    }

    #[test]
    fn test_department_short_code_match() {
        assert_eq!(
            Department::closest_match("d-infk"),
            Some(Department::ComputerScience)
        );
        assert_eq!(
            Department::closest_match("MATH"),
            Some(Department::Mathematics)
        );
    }

    #[test]
    fn test_department_fuzzy_full_name() {
        assert_eq!(
            Department::closest_match("computr science"),
            Some(Department::ComputerScience)
        );
        assert_eq!(
            Department::closest_match("Environmental Systems Science"),
            Some(Department::EnvironmentalSystemsScience)
        );
    }

    #[test]
    fn test_department_no_match() {
        assert_eq!(Department::closest_match("zzzz"), None);
    }

    #[test]
    fn test_department_serde_names() {
        let json = serde_json::to_string(&Department::ComputerScience).unwrap();
        assert_eq!(json, "\"COMPUTER_SCIENCE\"");
        let level: Level = serde_json::from_str("\"MSC\"").unwrap();
        assert_eq!(level, Level::Master);
    }

    #[test]
    fn test_unit_deserializes_abstract_field() {
        let unit: LearningUnit = serde_json::from_value(serde_json::json!({
            "id": 3,
            "semkez": "2023W",
            "abstract": "Short summary",
            "levels": ["BSC", "MSC"]
        }))
        .unwrap();
        assert_eq!(unit.summary.as_deref(), Some("Short summary"));
        assert_eq!(unit.levels_as_str(), "BSC, MSC");
        assert_eq!(unit.number, None);
    }
}
