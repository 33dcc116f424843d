//! Scraped item wire format
//!
//! One JSON object per line, tagged by `kind`:
//!
//! ```json
//! {"kind": "unit", "id": 1, "semkez": "2024W", "number": "252-0026-00L"}
//! {"kind": "section_link", "unit_id": 1, "section_id": 4, "type": "O"}
//! {"kind": "department", "unit_id": 1, "department": "COMPUTER_SCIENCE"}
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{
    Department, LearningUnit, Lecturer, Level, PersonRole, Rating, Section, UnitPersonLink,
    UnitSectionLink,
};

/// One scraped record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrapedItem {
    Unit(LearningUnit),
    Section(Section),
    Lecturer(Lecturer),
    Rating(Rating),
    SectionLink(UnitSectionLink),
    LecturerLink(UnitPersonLink),
    ExaminerLink(UnitPersonLink),
    /// Department tag found on a listing page
    Department { unit_id: u64, department: Department },
    /// Study level tag found on a listing page
    Level { unit_id: u64, level: Level },
}

impl ScrapedItem {
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// A link or tag whose target was not yet ingested
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingLink {
    Section(UnitSectionLink),
    Person {
        role: PersonRole,
        #[serde(flatten)]
        link: UnitPersonLink,
    },
    Department { unit_id: u64, department: Department },
    Level { unit_id: u64, level: Level },
}

impl PendingLink {
    pub fn unit_id(&self) -> u64 {
        match self {
            PendingLink::Section(link) => link.unit_id,
            PendingLink::Person { link, .. } => link.unit_id,
            PendingLink::Department { unit_id, .. } | PendingLink::Level { unit_id, .. } => *unit_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_line() {
        let item = ScrapedItem::from_json_line(
            r#"{"kind":"unit","id":1,"semkez":"2024W","number":"252-0026-00L","credits":8.0}"#,
        )
        .unwrap();
        match item {
            ScrapedItem::Unit(unit) => {
                assert_eq!(unit.id, 1);
                assert_eq!(unit.number.as_deref(), Some("252-0026-00L"));
                assert_eq!(unit.credits, Some(8.0));
            }
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn test_parse_links_and_tags() {
        let item = ScrapedItem::from_json_line(
            r#"{"kind":"section_link","unit_id":1,"section_id":4,"type":"O"}"#,
        )
        .unwrap();
        assert_eq!(
            item,
            ScrapedItem::SectionLink(UnitSectionLink {
                unit_id: 1,
                section_id: 4,
                membership: Some("O".into()),
            })
        );

        let item = ScrapedItem::from_json_line(
            r#"{"kind":"department","unit_id":1,"department":"COMPUTER_SCIENCE"}"#,
        )
        .unwrap();
        assert_eq!(
            item,
            ScrapedItem::Department {
                unit_id: 1,
                department: Department::ComputerScience
            }
        );

        let item =
            ScrapedItem::from_json_line(r#"{"kind":"level","unit_id":3,"level":"MSC"}"#).unwrap();
        assert!(matches!(item, ScrapedItem::Level { unit_id: 3, level: Level::Master }));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(ScrapedItem::from_json_line(r#"{"kind":"course","id":1}"#).is_err());
        assert!(ScrapedItem::from_json_line("not json").is_err());
    }

    #[test]
    fn test_pending_link_json() {
        let pending = PendingLink::Person {
            role: PersonRole::Examiner,
            link: UnitPersonLink {
                unit_id: 9,
                lecturer_id: 2,
            },
        };
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["kind"], "person");
        assert_eq!(json["role"], "examiner");
        assert_eq!(json["unit_id"], 9);
        assert_eq!(pending.unit_id(), 9);
    }
}
