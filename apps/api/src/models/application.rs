use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A tracked job application. `status` is always one of the
/// `applications::ApplicationStatus` names; it is validated before every write.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct JobApplicationRow {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub job_title: String,
    pub job_url: Option<String>,
    pub status: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub application_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: i64,
    pub company_name: String,
    pub job_title: String,
    pub job_url: Option<String>,
    pub status: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub application_date: NaiveDate,
    pub notes: Option<String>,
}
