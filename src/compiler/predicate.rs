//! Compiled predicate type
//!
//! A closed set of row tests. The executor evaluates them against a unit
//! plus whatever joined data the query asked for.

use std::borrow::Cow;

use serde::Serialize;

use crate::model::{Department, Half, LearningUnit};
use crate::query::ComparisonOp;

/// A searchable text column of a learning unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Title,
    TitleEnglish,
    Number,
    Language,
    Levels,
    ExamType,
    Content,
    ContentEnglish,
    Literature,
    LiteratureEnglish,
    Objective,
    ObjectiveEnglish,
    LectureNotes,
    LectureNotesEnglish,
    Additional,
    AdditionalEnglish,
    Comment,
    CommentEnglish,
    Summary,
    SummaryEnglish,
}

impl TextField {
    /// Both titles
    pub const TITLES: &'static [TextField] = &[TextField::Title, TextField::TitleEnglish];
    pub const TITLE_GERMAN: &'static [TextField] = &[TextField::Title];
    pub const TITLE_ENGLISH: &'static [TextField] = &[TextField::TitleEnglish];
    pub const NUMBER: &'static [TextField] = &[TextField::Number];
    pub const LANGUAGE: &'static [TextField] = &[TextField::Language];
    pub const LEVELS: &'static [TextField] = &[TextField::Levels];
    pub const EXAM_TYPE: &'static [TextField] = &[TextField::ExamType];

    /// The seven German long-text fields
    pub const DESCRIPTIONS_GERMAN: &'static [TextField] = &[
        TextField::Content,
        TextField::Literature,
        TextField::Objective,
        TextField::LectureNotes,
        TextField::Additional,
        TextField::Comment,
        TextField::Summary,
    ];

    /// The seven English long-text fields
    pub const DESCRIPTIONS_ENGLISH: &'static [TextField] = &[
        TextField::ContentEnglish,
        TextField::LiteratureEnglish,
        TextField::ObjectiveEnglish,
        TextField::LectureNotesEnglish,
        TextField::AdditionalEnglish,
        TextField::CommentEnglish,
        TextField::SummaryEnglish,
    ];

    /// All fourteen long-text fields
    pub const DESCRIPTIONS: &'static [TextField] = &[
        TextField::Content,
        TextField::ContentEnglish,
        TextField::Literature,
        TextField::LiteratureEnglish,
        TextField::Objective,
        TextField::ObjectiveEnglish,
        TextField::LectureNotes,
        TextField::LectureNotesEnglish,
        TextField::Additional,
        TextField::AdditionalEnglish,
        TextField::Comment,
        TextField::CommentEnglish,
        TextField::Summary,
        TextField::SummaryEnglish,
    ];

    /// Value of this column on `unit`, None if unset
    pub fn extract<'a>(&self, unit: &'a LearningUnit) -> Option<Cow<'a, str>> {
        let borrowed = |v: &'a Option<String>| v.as_deref().map(Cow::Borrowed);
        match self {
            TextField::Title => borrowed(&unit.title),
            TextField::TitleEnglish => borrowed(&unit.title_english),
            TextField::Number => borrowed(&unit.number),
            TextField::Language => borrowed(&unit.language),
            TextField::Levels => {
                if unit.levels.is_empty() {
                    None
                } else {
                    Some(Cow::Owned(unit.levels_as_str()))
                }
            }
            TextField::ExamType => borrowed(&unit.exam_type),
            TextField::Content => borrowed(&unit.content),
            TextField::ContentEnglish => borrowed(&unit.content_english),
            TextField::Literature => borrowed(&unit.literature),
            TextField::LiteratureEnglish => borrowed(&unit.literature_english),
            TextField::Objective => borrowed(&unit.objective),
            TextField::ObjectiveEnglish => borrowed(&unit.objective_english),
            TextField::LectureNotes => borrowed(&unit.lecture_notes),
            TextField::LectureNotesEnglish => borrowed(&unit.lecture_notes_english),
            TextField::Additional => borrowed(&unit.additional),
            TextField::AdditionalEnglish => borrowed(&unit.additional_english),
            TextField::Comment => borrowed(&unit.comment),
            TextField::CommentEnglish => borrowed(&unit.comment_english),
            TextField::Summary => borrowed(&unit.summary),
            TextField::SummaryEnglish => borrowed(&unit.summary_english),
        }
    }
}

/// How a set of offered-in names must be satisfied by one section path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Path contains at least one of the names
    Any,
    /// Path contains every name
    All,
}

/// A compiled row test
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// No constraint
    Always,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Case-insensitive substring in any of the fields; `needle` is lowercase
    TextContains {
        fields: &'static [TextField],
        needle: String,
    },
    Credits {
        op: ComparisonOp,
        value: f64,
    },
    /// Compares the year prefix of the semester code
    Year {
        op: ComparisonOp,
        value: i32,
    },
    SemesterIs(Half),
    /// Some linked lecturer or examiner matches in either name order
    LecturerContains(String),
    DepartmentIs(Department),
    /// Some linked section's materialized path matches the names
    OfferedIn {
        names: Vec<String>,
        mode: MatchMode,
    },
    /// Compares the mean course review score
    CourseReview {
        op: ComparisonOp,
        value: f64,
    },
    /// Unit has a course number
    NumberPresent,
}

impl Predicate {
    pub fn not(inner: Predicate) -> Predicate {
        Predicate::Not(Box::new(inner))
    }

    /// Negates `inner` when `op` is `!=`, otherwise returns it unchanged
    pub fn negate_if_ne(op: ComparisonOp, inner: Predicate) -> Predicate {
        if op == ComparisonOp::Ne {
            Predicate::not(inner)
        } else {
            inner
        }
    }
}
