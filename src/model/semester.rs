//! Semester codes
//!
//! A semester code is `YYYY` followed by `S` (spring) or `W` (autumn/winter),
//! e.g. `2024W`. Autumn sorts after spring within the same year.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Half of an academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Half {
    /// Spring semester (`S`, "FS" for users)
    Spring,
    /// Autumn semester (`W`, "HS" for users)
    Autumn,
}

impl Half {
    /// The letter stored in semester codes
    pub fn letter(&self) -> char {
        match self {
            Half::Spring => 'S',
            Half::Autumn => 'W',
        }
    }

    /// The label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            Half::Spring => "FS",
            Half::Autumn => "HS",
        }
    }

    /// Maps a user-typed letter to a half.
    ///
    /// `F`/`S` mean spring, `H`/`W` mean autumn, case-insensitive.
    pub fn from_user_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'F' | 'S' => Some(Half::Spring),
            'H' | 'W' => Some(Half::Autumn),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Half::Spring => 0,
            Half::Autumn => 1,
        }
    }
}

/// A parsed semester code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Semester {
    /// Calendar year
    pub year: u16,
    /// Spring or autumn
    pub half: Half,
}

impl Semester {
    pub fn new(year: u16, half: Half) -> Self {
        Self { year, half }
    }

    /// Parses a code like `2024W`. Returns None for anything else.
    pub fn parse(code: &str) -> Option<Self> {
        let (digits, letter) = (code.get(..4)?, code.get(4..)?);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let half = match letter {
            "S" => Half::Spring,
            "W" => Half::Autumn,
            _ => return None,
        };
        Some(Self {
            year: digits.parse().ok()?,
            half,
        })
    }
}

impl Ord for Semester {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.half.rank().cmp(&other.half.rank()))
    }
}

impl PartialOrd for Semester {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{}", self.year, self.half.letter())
    }
}
