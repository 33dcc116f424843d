//! Search result types

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::LearningUnit;

/// All returned rows sharing one course number: its offering history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedUnits {
    pub number: String,
    pub units: Vec<LearningUnit>,
}

impl GroupedUnits {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            units: Vec::new(),
        }
    }

    /// The most recent offering: latest year, autumn after spring
    pub fn latest(&self) -> Option<&LearningUnit> {
        self.units.iter().max_by_key(|unit| unit.semester())
    }

    /// The offering of one semester code, e.g. `2024W`
    pub fn by_semester(&self, semkez: &str) -> Option<&LearningUnit> {
        self.units.iter().find(|unit| unit.semkez == semkez)
    }
}

/// Groups keyed by course number, in page order.
///
/// Serializes as a JSON object mapping each number to its units, keys in
/// page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResults(Vec<GroupedUnits>);

impl GroupedResults {
    /// Groups rows by number, ordering groups by `page`.
    ///
    /// Rows keep their relative order inside a group. Rows without a number
    /// or outside the page are skipped.
    pub fn from_rows(page: &[String], rows: Vec<LearningUnit>) -> Self {
        let mut groups: Vec<GroupedUnits> = page.iter().map(GroupedUnits::new).collect();
        for unit in rows {
            let slot = unit
                .number
                .as_deref()
                .and_then(|n| groups.iter().position(|g| g.number == n));
            if let Some(index) = slot {
                groups[index].units.push(unit);
            }
        }
        // a number can vanish between the page read and the row read
        groups.retain(|g| !g.units.is_empty());
        Self(groups)
    }

    pub fn get(&self, number: &str) -> Option<&GroupedUnits> {
        self.0.iter().find(|g| g.number == number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupedUnits> {
        self.0.iter()
    }

    pub fn numbers(&self) -> Vec<&str> {
        self.0.iter().map(|g| g.number.as_str()).collect()
    }
}

impl Serialize for GroupedResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in &self.0 {
            map.serialize_entry(&group.number, &group.units)?;
        }
        map.end()
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Distinct course numbers matching, across all pages
    pub total: u64,
    pub results: GroupedResults,
    /// Canonical rendering of the filters that were applied
    pub parsed_query: String,
    pub exec_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(semesters: &[&str]) -> GroupedUnits {
        GroupedUnits {
            number: "263-0007-00L".into(),
            units: semesters
                .iter()
                .enumerate()
                .map(|(i, s)| LearningUnit::new(i as u64, *s, Some("263-0007-00L")))
                .collect(),
        }
    }

    #[test]
    fn test_latest_prefers_autumn() {
        let g = group(&["2024S", "2024W", "2023W"]);
        assert_eq!(g.latest().map(|u| u.semkez.as_str()), Some("2024W"));
    }

    #[test]
    fn test_latest_across_years() {
        let g = group(&["2023W", "2025S", "2024W"]);
        assert_eq!(g.latest().map(|u| u.semkez.as_str()), Some("2025S"));
        assert_eq!(group(&[]).latest(), None);
    }

    #[test]
    fn test_by_semester() {
        let g = group(&["2024S", "2024W"]);
        assert_eq!(g.by_semester("2024W").map(|u| u.id), Some(1));
        assert!(g.by_semester("2023W").is_none());
    }

    #[test]
    fn test_grouping_follows_page_order() {
        let page = vec!["B".to_string(), "A".to_string()];
        let rows = vec![
            LearningUnit::new(1, "2024S", Some("A")),
            LearningUnit::new(2, "2024S", Some("B")),
            LearningUnit::new(3, "2024W", Some("A")),
            LearningUnit::new(4, "2024W", Some("C")),
        ];
        let grouped = GroupedResults::from_rows(&page, rows);
        assert_eq!(grouped.numbers(), vec!["B", "A"]);
        let a = grouped.get("A").unwrap();
        assert_eq!(a.units.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let page = vec!["Z".to_string(), "A".to_string()];
        let rows = vec![
            LearningUnit::new(1, "2024S", Some("A")),
            LearningUnit::new(2, "2024S", Some("Z")),
        ];
        let results = SearchResults {
            total: 2,
            results: GroupedResults::from_rows(&page, rows),
            parsed_query: "title=x".into(),
            exec_time_ms: 1.5,
        };
        let json = serde_json::to_string(&results).unwrap();
        assert!(json.find("\"Z\"").unwrap() < json.find("\"A\"").unwrap());
        assert!(json.contains("\"parsedQuery\":\"title=x\""));
        assert!(json.contains("\"execTimeMs\":1.5"));
    }
}
