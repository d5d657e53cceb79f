//! Line-tagged free-text parsing, used for résumé analysis.
//!
//! Expected layout (the model is asked for it but nothing guarantees it):
//!
//! ```text
//! SCORE: 85
//! FEEDBACK:
//! Strong formatting.
//! SUGGESTIONS:
//! 1. Add metrics
//! ```
//!
//! Missing or malformed sections degrade to defaults; this parser never fails.

use serde::{Deserialize, Serialize};

use super::{clamp_score, Degradation, Parsed};

const SCORE_MARKER: &str = "SCORE:";
const FEEDBACK_MARKER: &str = "FEEDBACK:";
const SUGGESTIONS_MARKER: &str = "SUGGESTIONS";
/// Older prompt revisions asked for an "Improvements:" header instead of SUGGESTIONS.
const LEGACY_SUGGESTIONS_MARKER: &str = "Improvements:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysisResult {
    pub overall_score: i32,
    pub analysis_text: String,
    pub suggestions: Vec<String>,
}

/// Parses a résumé-analysis completion. Never fails; see module docs.
pub fn parse_resume_analysis(text: &str) -> Parsed<ResumeAnalysisResult> {
    let lines: Vec<&str> = text.trim().lines().collect();
    let mut degradations = Vec::new();

    let overall_score = extract_score(&lines, &mut degradations);
    let analysis_text = extract_feedback(&lines, &mut degradations);
    let suggestions = extract_suggestions(&lines, &mut degradations);

    Parsed {
        value: ResumeAnalysisResult {
            overall_score,
            analysis_text,
            suggestions,
        },
        degradations,
    }
}

fn extract_score(lines: &[&str], degradations: &mut Vec<Degradation>) -> i32 {
    let Some(line) = lines
        .iter()
        .map(|l| l.trim())
        .find(|l| l.starts_with(SCORE_MARKER))
    else {
        degradations.push(Degradation::MissingScore);
        return 0;
    };

    // Only the text between the first and second ':' counts, so "SCORE: 85/100" is invalid.
    let raw = line.split(':').nth(1).unwrap_or_default().trim();
    match raw.parse::<i64>() {
        Ok(score) => clamp_score("overall_score", score, degradations),
        Err(_) => {
            degradations.push(Degradation::InvalidScore {
                raw: raw.to_string(),
            });
            0
        }
    }
}

fn extract_feedback(lines: &[&str], degradations: &mut Vec<Degradation>) -> String {
    let Some(start) = lines
        .iter()
        .position(|l| l.trim_start().starts_with(FEEDBACK_MARKER))
    else {
        degradations.push(Degradation::MissingFeedback);
        return String::new();
    };

    lines[start + 1..]
        .iter()
        .map(|l| l.trim())
        .take_while(|l| {
            !(l.starts_with(SUGGESTIONS_MARKER) || l.starts_with(LEGACY_SUGGESTIONS_MARKER))
        })
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_suggestions(lines: &[&str], degradations: &mut Vec<Degradation>) -> Vec<String> {
    let Some(start) = lines.iter().position(|l| l.contains(SUGGESTIONS_MARKER)) else {
        degradations.push(Degradation::MissingSuggestions);
        return Vec::new();
    };

    let mut suggestions = Vec::new();
    let mut dropped = 0;

    for line in &lines[start + 1..] {
        if line.contains(SUGGESTIONS_MARKER) {
            continue;
        }
        let line = line.trim();
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        match line.split_once('.').map(|(_, rest)| rest.trim()) {
            Some(text) if !text.is_empty() => suggestions.push(text.to_string()),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        degradations.push(Degradation::DroppedSuggestionLines { count: dropped });
    }
    suggestions
}
