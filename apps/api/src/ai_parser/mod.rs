//! AI Response Parser: turns raw completion text into typed, validated records.
//!
//! Two input styles are supported, matching the two prompt styles in `analysis::prompts`:
//! - line-tagged free text (`SCORE:` / `FEEDBACK:` / `SUGGESTIONS`), see [`free_text`]
//! - a JSON object, possibly wrapped in prose or code fences, see [`json`]
//!
//! Every successful parse returns a [`Parsed`] wrapper listing the degradations
//! that occurred, so callers can tell a clean parse from a fallback. The free-text
//! parser never fails; the JSON parser fails with [`ParseError`] only when the
//! required shape cannot be recovered at all.

use thiserror::Error;

pub mod free_text;
pub mod json;

pub use free_text::parse_resume_analysis;
pub use json::{parse_ats_check, parse_job_match, AtsFriendlyPolicy};

/// Lowest and highest score any parsed result may carry.
pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

/// A recoverable deviation from the expected response format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// No `SCORE:` line; score defaulted to 0.
    MissingScore,
    /// The score text could not be read as an integer; score defaulted to 0.
    InvalidScore { raw: String },
    /// The score was outside 0–100 and was clamped.
    ScoreClamped { field: String, raw: i64 },
    /// No `FEEDBACK:` section; feedback defaulted to empty.
    MissingFeedback,
    /// No `SUGGESTIONS` section; suggestions defaulted to empty.
    MissingSuggestions,
    /// Numbered lines after `SUGGESTIONS` that carried no `.`-delimited text.
    DroppedSuggestionLines { count: usize },
    /// An optional field was absent and defaulted.
    MissingField { field: String },
    /// A number arrived as a float or numeric string and was rounded.
    CoercedNumber { field: String, raw: String },
    /// Non-string entries were skipped from a string list.
    SkippedListItems { field: String, count: usize },
    /// The model's `is_ats_friendly` flag disagreed with (or was missing next to) the score.
    AtsFlagMismatch { reported: Option<bool>, derived: bool },
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degradation::MissingScore => write!(f, "missing SCORE line"),
            Degradation::InvalidScore { raw } => write!(f, "unparsable score '{raw}'"),
            Degradation::ScoreClamped { field, raw } => write!(f, "{field} {raw} clamped to 0-100"),
            Degradation::MissingFeedback => write!(f, "missing FEEDBACK section"),
            Degradation::MissingSuggestions => write!(f, "missing SUGGESTIONS section"),
            Degradation::DroppedSuggestionLines { count } => {
                write!(f, "{count} malformed suggestion line(s) dropped")
            }
            Degradation::MissingField { field } => write!(f, "missing optional field '{field}'"),
            Degradation::CoercedNumber { field, raw } => write!(f, "{field} coerced from '{raw}'"),
            Degradation::SkippedListItems { field, count } => {
                write!(f, "{count} non-string item(s) skipped in '{field}'")
            }
            Degradation::AtsFlagMismatch { reported, derived } => write!(
                f,
                "is_ats_friendly reported {reported:?}, derived {derived}"
            ),
        }
    }
}

/// A parsed value plus every degradation that occurred while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub degradations: Vec<Degradation>,
}

impl<T> Parsed<T> {
    /// True when the response matched the expected format with no fallback.
    pub fn parsed_fully(&self) -> bool {
        self.degradations.is_empty()
    }

    /// Human-readable summary of the degradations, for logs.
    pub fn describe_degradations(&self) -> String {
        self.degradations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// The response could not be turned into the expected shape at all.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("key '{key}' has the wrong type: expected {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("response was empty")]
    Empty,
}

/// Clamps a raw score into 0–100, recording a degradation when it moved.
pub(crate) fn clamp_score(field: &str, raw: i64, degradations: &mut Vec<Degradation>) -> i32 {
    let clamped = raw.clamp(SCORE_MIN as i64, SCORE_MAX as i64);
    if clamped != raw {
        degradations.push(Degradation::ScoreClamped {
            field: field.to_string(),
            raw,
        });
    }
    clamped as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score_within_range_is_untouched() {
        let mut d = Vec::new();
        assert_eq!(clamp_score("overall_score", 42, &mut d), 42);
        assert!(d.is_empty());
    }

    #[test]
    fn test_clamp_score_records_degradation() {
        let mut d = Vec::new();
        assert_eq!(clamp_score("ats_score", 140, &mut d), 100);
        assert_eq!(clamp_score("ats_score", -5, &mut d), 0);
        assert_eq!(d.len(), 2);
        assert_eq!(
            d[0],
            Degradation::ScoreClamped {
                field: "ats_score".to_string(),
                raw: 140
            }
        );
    }

    #[test]
    fn test_parsed_fully_reflects_degradations() {
        let clean = Parsed {
            value: 1,
            degradations: vec![],
        };
        assert!(clean.parsed_fully());

        let degraded = Parsed {
            value: 0,
            degradations: vec![Degradation::MissingScore, Degradation::MissingFeedback],
        };
        assert!(!degraded.parsed_fully());
        assert_eq!(
            degraded.describe_degradations(),
            "missing SCORE line; missing FEEDBACK section"
        );
    }

    #[test]
    fn test_degradation_reasons_name_the_field() {
        let clamped = Degradation::ScoreClamped {
            field: "ats_score".to_string(),
            raw: 140,
        };
        assert_eq!(clamped.to_string(), "ats_score 140 clamped to 0-100");
        assert_eq!(
            Degradation::DroppedSuggestionLines { count: 2 }.to_string(),
            "2 malformed suggestion line(s) dropped"
        );
    }
}
