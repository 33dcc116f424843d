//! Canonical filter keys and the key resolver
//!
//! Users abbreviate and misspell filter keys. Resolution tries, in order:
//! the alias table, an exact canonical name, a canonical name starting with
//! the raw key, and finally the best partial-ratio match scoring at least
//! [`KEY_MATCH_THRESHOLD`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::similarity;

/// Minimum fuzzy score for a key to resolve
pub const KEY_MATCH_THRESHOLD: f64 = 60.0;

/// Canonical filter key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKey {
    Title,
    TitleGerman,
    TitleEnglish,
    Number,
    Credits,
    Year,
    Semester,
    Lecturer,
    Descriptions,
    DescriptionsGerman,
    DescriptionsEnglish,
    Level,
    Department,
    Language,
    Offered,
    #[serde(rename = "examtype")]
    ExamType,
    #[serde(rename = "coursereview")]
    CourseReview,
}

/// Alias table, checked before anything else
const ALIASES: &[(&str, QueryKey)] = &[
    ("t", QueryKey::Title),
    ("n", QueryKey::Number),
    ("c", QueryKey::Credits),
    ("mv", QueryKey::Credits),
    ("ects", QueryKey::Credits),
    ("tg", QueryKey::TitleGerman),
    ("te", QueryKey::TitleEnglish),
    ("y", QueryKey::Year),
    ("s", QueryKey::Semester),
    ("l", QueryKey::Lecturer),
    ("i", QueryKey::Lecturer),
    ("instructor", QueryKey::Lecturer),
    ("d", QueryKey::Descriptions),
    ("dg", QueryKey::DescriptionsGerman),
    ("de", QueryKey::DescriptionsEnglish),
    ("dep", QueryKey::Department),
    ("lvl", QueryKey::Level),
    ("lev", QueryKey::Level),
    ("lang", QueryKey::Language),
    ("offeredin", QueryKey::Offered),
    ("o", QueryKey::Offered),
    ("off", QueryKey::Offered),
    ("e", QueryKey::ExamType),
    ("cr", QueryKey::CourseReview),
];

impl QueryKey {
    /// All keys, in resolution order
    pub const ALL: [QueryKey; 17] = [
        QueryKey::Title,
        QueryKey::TitleGerman,
        QueryKey::TitleEnglish,
        QueryKey::Number,
        QueryKey::Credits,
        QueryKey::Year,
        QueryKey::Semester,
        QueryKey::Lecturer,
        QueryKey::Descriptions,
        QueryKey::DescriptionsGerman,
        QueryKey::DescriptionsEnglish,
        QueryKey::Level,
        QueryKey::Department,
        QueryKey::Language,
        QueryKey::Offered,
        QueryKey::ExamType,
        QueryKey::CourseReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Title => "title",
            QueryKey::TitleGerman => "title_german",
            QueryKey::TitleEnglish => "title_english",
            QueryKey::Number => "number",
            QueryKey::Credits => "credits",
            QueryKey::Year => "year",
            QueryKey::Semester => "semester",
            QueryKey::Lecturer => "lecturer",
            QueryKey::Descriptions => "descriptions",
            QueryKey::DescriptionsGerman => "descriptions_german",
            QueryKey::DescriptionsEnglish => "descriptions_english",
            QueryKey::Level => "level",
            QueryKey::Department => "department",
            QueryKey::Language => "language",
            QueryKey::Offered => "offered",
            QueryKey::ExamType => "examtype",
            QueryKey::CourseReview => "coursereview",
        }
    }

    /// Exact canonical name lookup
    pub fn from_canonical(name: &str) -> Option<QueryKey> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    /// Resolves a raw, user-typed key. None means the term is dropped.
    pub fn resolve(raw: &str) -> Option<QueryKey> {
        let key = raw.to_lowercase();

        if let Some((_, mapped)) = ALIASES.iter().find(|(alias, _)| *alias == key) {
            return Some(*mapped);
        }

        if let Some(exact) = Self::from_canonical(&key) {
            return Some(exact);
        }

        if let Some(prefixed) = Self::ALL.iter().find(|k| k.as_str().starts_with(&key)) {
            return Some(*prefixed);
        }

        let mut best: Option<(QueryKey, f64)> = None;
        for candidate in Self::ALL {
            let score = similarity::partial_ratio(&key, candidate.as_str());
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        best.filter(|(_, score)| *score >= KEY_MATCH_THRESHOLD)
            .map(|(k, _)| k)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_resolves() {
        for (alias, key) in ALIASES {
            assert_eq!(QueryKey::resolve(alias), Some(*key), "alias {}", alias);
            assert_eq!(QueryKey::resolve(key.as_str()), Some(*key));
        }
    }

    #[test]
    fn test_every_canonical_resolves_to_itself() {
        for key in QueryKey::ALL {
            assert_eq!(QueryKey::resolve(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        assert_eq!(QueryKey::resolve("Y"), Some(QueryKey::Year));
        assert_eq!(QueryKey::resolve("TITLE"), Some(QueryKey::Title));
    }

    #[test]
    fn test_prefix_match() {
        assert_eq!(QueryKey::resolve("tit"), Some(QueryKey::Title));
        assert_eq!(QueryKey::resolve("sem"), Some(QueryKey::Semester));
        assert_eq!(QueryKey::resolve("desc"), Some(QueryKey::Descriptions));
        assert_eq!(QueryKey::resolve("exam"), Some(QueryKey::ExamType));
        assert_eq!(QueryKey::resolve("cou"), Some(QueryKey::CourseReview));
    }

    #[test]
    fn test_fuzzy_match() {
        assert_eq!(QueryKey::resolve("lecturr"), Some(QueryKey::Lecturer));
        assert_eq!(QueryKey::resolve("credts"), Some(QueryKey::Credits));
    }

    #[test]
    fn test_unresolvable_key() {
        assert_eq!(QueryKey::resolve("zzz"), None);
        assert_eq!(QueryKey::resolve("qqqqqq"), None);
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let key: QueryKey = serde_json::from_str("\"title_german\"").unwrap();
        assert_eq!(key, QueryKey::TitleGerman);
        let key: QueryKey = serde_json::from_str("\"examtype\"").unwrap();
        assert_eq!(key, QueryKey::ExamType);
        assert_eq!(
            serde_json::to_string(&QueryKey::CourseReview).unwrap(),
            "\"coursereview\""
        );
    }
}
