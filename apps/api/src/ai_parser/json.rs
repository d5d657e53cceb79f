//! Structured JSON parsing, used for job-match analysis and ATS checks.
//!
//! The model is told to return a bare JSON object but routinely wraps it in prose
//! or code fences, so the object is located as the span from the first `{` to the
//! last `}` before decoding. Shape violations that cannot be recovered are returned
//! as [`ParseError`]; recoverable drift is recorded as a [`Degradation`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{clamp_score, Degradation, ParseError, Parsed};

/// Minimum ATS score for a résumé to count as ATS-friendly.
pub const ATS_FRIENDLY_THRESHOLD: i32 = 70;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMatchResult {
    pub match_percentage: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsCheckResult {
    pub ats_score: i32,
    pub issues_found: Vec<String>,
    pub recommendations: Vec<String>,
    pub is_ats_friendly: bool,
}

/// How `is_ats_friendly` is decided when the model reports it alongside `ats_score`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AtsFriendlyPolicy {
    /// Recompute from `ats_score >= 70`; a disagreeing model flag is recorded.
    #[default]
    Derive,
    /// Keep the model's flag; fall back to the derived value when absent.
    Trust,
}

impl FromStr for AtsFriendlyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "derive" => Ok(AtsFriendlyPolicy::Derive),
            "trust" => Ok(AtsFriendlyPolicy::Trust),
            other => Err(format!(
                "unknown ATS friendliness policy '{other}' (expected 'derive' or 'trust')"
            )),
        }
    }
}

/// Returns the span from the first `{` to the last `}`, if there is one.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn decode_object(text: &str) -> Result<Map<String, Value>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let span = extract_json_object(text).ok_or(ParseError::NoJsonObject)?;
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ParseError::NoJsonObject),
        Err(e) => Err(ParseError::InvalidJson(e.to_string())),
    }
}

pub fn parse_job_match(text: &str) -> Result<Parsed<JobMatchResult>, ParseError> {
    let obj = decode_object(text)?;
    let mut degradations = Vec::new();

    let match_percentage = read_score(&obj, "match_percentage", &mut degradations)?;
    let matching_skills = read_string_list(&obj, "matching_skills", true, &mut degradations)?;
    let missing_skills = read_string_list(&obj, "missing_skills", true, &mut degradations)?;
    let suggestions = read_string_list(&obj, "suggestions", false, &mut degradations)?;

    Ok(Parsed {
        value: JobMatchResult {
            match_percentage,
            matching_skills,
            missing_skills,
            suggestions,
        },
        degradations,
    })
}

pub fn parse_ats_check(
    text: &str,
    policy: AtsFriendlyPolicy,
) -> Result<Parsed<AtsCheckResult>, ParseError> {
    let obj = decode_object(text)?;
    let mut degradations = Vec::new();

    let ats_score = read_score(&obj, "ats_score", &mut degradations)?;
    let issues_found = read_string_list(&obj, "issues_found", true, &mut degradations)?;
    let recommendations = read_string_list(&obj, "recommendations", true, &mut degradations)?;

    let reported = obj.get("is_ats_friendly").and_then(Value::as_bool);
    let derived = ats_score >= ATS_FRIENDLY_THRESHOLD;
    let is_ats_friendly = match policy {
        AtsFriendlyPolicy::Derive => {
            if reported != Some(derived) {
                degradations.push(Degradation::AtsFlagMismatch { reported, derived });
            }
            derived
        }
        AtsFriendlyPolicy::Trust => reported.unwrap_or_else(|| {
            degradations.push(Degradation::MissingField {
                field: "is_ats_friendly".to_string(),
            });
            derived
        }),
    };

    Ok(Parsed {
        value: AtsCheckResult {
            ats_score,
            issues_found,
            recommendations,
            is_ats_friendly,
        },
        degradations,
    })
}

/// Reads a 0–100 integer score. Floats and numeric strings ("85", "85%") are accepted
/// and rounded with a degradation. "NaN" and "inf" are not numbers here.
fn read_score(
    obj: &Map<String, Value>,
    key: &'static str,
    degradations: &mut Vec<Degradation>,
) -> Result<i32, ParseError> {
    let value = obj.get(key).ok_or(ParseError::MissingKey(key))?;
    let wrong_type = ParseError::WrongType {
        key,
        expected: "integer",
    };

    let raw = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64().filter(|f| f.is_finite()).ok_or(wrong_type)?;
                degradations.push(Degradation::CoercedNumber {
                    field: key.to_string(),
                    raw: n.to_string(),
                });
                f.round() as i64
            }
        },
        Value::String(s) => {
            let f = s
                .trim()
                .trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or(wrong_type)?;
            degradations.push(Degradation::CoercedNumber {
                field: key.to_string(),
                raw: s.clone(),
            });
            f.round() as i64
        }
        Value::Null => return Err(ParseError::MissingKey(key)),
        _ => return Err(wrong_type),
    };

    Ok(clamp_score(key, raw, degradations))
}

/// Reads a list of strings. Non-string items are skipped with a degradation.
/// A missing or null optional list defaults to empty with a degradation.
fn read_string_list(
    obj: &Map<String, Value>,
    key: &'static str,
    required: bool,
    degradations: &mut Vec<Degradation>,
) -> Result<Vec<String>, ParseError> {
    let items = match obj.get(key) {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) if required => return Err(ParseError::MissingKey(key)),
        None | Some(Value::Null) => {
            degradations.push(Degradation::MissingField {
                field: key.to_string(),
            });
            return Ok(Vec::new());
        }
        Some(_) => {
            return Err(ParseError::WrongType {
                key,
                expected: "array of strings",
            })
        }
    };

    let strings: Vec<String> = items
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();
    let skipped = items.len() - strings.len();
    if skipped > 0 {
        degradations.push(Degradation::SkippedListItems {
            field: key.to_string(),
            count: skipped,
        });
    }
    Ok(strings)
}
