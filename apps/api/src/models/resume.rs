use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// An uploaded résumé plus the analysis produced when it was uploaded.
/// `file_path` is the storage key, not necessarily a filesystem path.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeAnalysisRow {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub file_path: String,
    pub overall_score: i32,
    pub analysis_text: String,
    pub suggestions: Vec<String>,
    pub parsed_fully: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResumeAnalysis {
    pub user_id: i64,
    pub filename: String,
    pub file_path: String,
    pub overall_score: i32,
    pub analysis_text: String,
    pub suggestions: Vec<String>,
    pub parsed_fully: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CoverLetterRow {
    pub id: i64,
    pub user_id: i64,
    pub resume_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub cover_letter_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCoverLetter {
    pub user_id: i64,
    pub resume_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub cover_letter_text: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobMatchRow {
    pub id: i64,
    pub user_id: i64,
    pub resume_id: i64,
    pub job_description: String,
    pub match_percentage: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub parsed_fully: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobMatch {
    pub user_id: i64,
    pub resume_id: i64,
    pub job_description: String,
    pub match_percentage: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub parsed_fully: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AtsCheckRow {
    pub id: i64,
    pub user_id: i64,
    pub resume_id: i64,
    pub ats_score: i32,
    pub issues_found: Vec<String>,
    pub recommendations: Vec<String>,
    pub is_ats_friendly: bool,
    pub parsed_fully: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAtsCheck {
    pub user_id: i64,
    pub resume_id: i64,
    pub ats_score: i32,
    pub issues_found: Vec<String>,
    pub recommendations: Vec<String>,
    pub is_ats_friendly: bool,
    pub parsed_fully: bool,
}
