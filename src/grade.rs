//! Relevance grades and extraction of grades from judge output.

use crate::error::EvalError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Marker the judge is instructed to end its reply with, e.g. `##final score: 2`.
pub const SCORE_MARKER: &str = "##final score:";

static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)##\s*final\s+score\s*:\s*(\d+(?:\.\d+)?)").expect("Invalid score pattern")
});

/// Graded relevance of one document to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Grade {
    /// No evidence the document satisfies the query.
    Irrelevant = 0,
    /// On topic but does not answer the query.
    Related = 1,
    /// Partially answers the query.
    Relevant = 2,
    /// Dedicated to the query and answers it.
    Perfect = 3,
}

impl Grade {
    /// All grades, lowest first. Indexes line up with histogram buckets.
    pub const ALL: [Grade; 4] = [
        Grade::Irrelevant,
        Grade::Related,
        Grade::Relevant,
        Grade::Perfect,
    ];

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Grade::Irrelevant),
            1 => Some(Grade::Related),
            2 => Some(Grade::Relevant),
            3 => Some(Grade::Perfect),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Exponential gain, `2^grade - 1`.
    pub fn gain(self) -> f64 {
        f64::from((1u32 << self.value()) - 1)
    }
}

impl TryFrom<u8> for Grade {
    type Error = EvalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::from_value(value).ok_or(EvalError::InvalidGrade(value))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

/// Pull the relevance grade out of a judge reply.
///
/// Scans case-insensitively for the score marker followed by a number and
/// tolerates any reasoning text around it. Returns `None` when the marker is
/// missing, the value is not an integer, or it falls outside 0..=3.
pub fn extract_score(raw: &str) -> Option<Grade> {
    let captures = SCORE_PATTERN.captures(raw)?;
    let value: u8 = captures.get(1)?.as_str().parse().ok()?;
    Grade::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_score_every_grade() {
        for grade in Grade::ALL {
            let raw = format!("The page covers it.\n##final score: {}\n", grade.value());
            assert_eq!(extract_score(&raw), Some(grade));
        }
    }

    #[test]
    fn test_extract_score_is_case_and_space_tolerant() {
        assert_eq!(extract_score("##FINAL SCORE:3"), Some(Grade::Perfect));
        assert_eq!(extract_score("  ## Final  Score :  1  "), Some(Grade::Related));
        assert_eq!(
            extract_score("Reasoning: mostly off topic.\n\n##final score: 0."),
            Some(Grade::Irrelevant)
        );
    }

    #[test]
    fn test_extract_score_rejects_out_of_range() {
        assert_eq!(extract_score("##final score: 4"), None);
        assert_eq!(extract_score("##final score: 10"), None);
        assert_eq!(extract_score("##final score: 2.5"), None);
    }

    #[test]
    fn test_extract_score_requires_marker() {
        assert_eq!(extract_score("3"), None);
        assert_eq!(extract_score("final score: 3"), None);
        assert_eq!(extract_score("##final score: three"), None);
        assert_eq!(extract_score(""), None);
    }

    #[test]
    fn test_gain() {
        assert_eq!(Grade::Irrelevant.gain(), 0.0);
        assert_eq!(Grade::Related.gain(), 1.0);
        assert_eq!(Grade::Relevant.gain(), 3.0);
        assert_eq!(Grade::Perfect.gain(), 7.0);
    }

    #[test]
    fn test_grade_serde_as_integer() {
        let json = serde_json::to_string(&vec![Grade::Perfect, Grade::Irrelevant]).unwrap();
        assert_eq!(json, "[3,0]");

        let back: Vec<Grade> = serde_json::from_str("[2,1]").unwrap();
        assert_eq!(back, vec![Grade::Relevant, Grade::Related]);

        assert!(serde_json::from_str::<Grade>("7").is_err());
    }
}
