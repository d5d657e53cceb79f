//! Partial update of a job application.
//!
//! Only fields present in the request body are applied. Nullable columns use
//! `Option<Option<T>>` so an explicit `null` clears the value while an absent
//! key leaves it untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::applications::status::ApplicationStatus;
use crate::errors::AppError;
use crate::models::application::JobApplicationRow;
use crate::validation::{normalize_optional, require_non_blank};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationPatch {
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub job_url: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub salary_range: Option<Option<String>>,
    pub application_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Marks a key as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ApplicationPatch {
    /// A patch that only changes the status.
    pub fn status_only(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.job_title.is_none()
            && self.job_url.is_none()
            && self.status.is_none()
            && self.location.is_none()
            && self.salary_range.is_none()
            && self.application_date.is_none()
            && self.notes.is_none()
    }

    /// Checks every present field and normalizes strings. Call before `apply_to`.
    pub fn validated(self) -> Result<Self, AppError> {
        Ok(Self {
            company_name: self
                .company_name
                .map(|v| require_non_blank("company_name", &v))
                .transpose()?,
            job_title: self
                .job_title
                .map(|v| require_non_blank("job_title", &v))
                .transpose()?,
            status: self
                .status
                .map(|v| v.parse::<ApplicationStatus>().map(|s| s.as_str().to_string()))
                .transpose()?,
            job_url: self.job_url.map(normalize_optional),
            location: self.location.map(normalize_optional),
            salary_range: self.salary_range.map(normalize_optional),
            notes: self.notes.map(normalize_optional),
            application_date: self.application_date,
        })
    }

    /// Writes every present field into `row`, leaving the rest untouched.
    pub fn apply_to(&self, row: &mut JobApplicationRow) {
        if let Some(v) = &self.company_name {
            row.company_name = v.clone();
        }
        if let Some(v) = &self.job_title {
            row.job_title = v.clone();
        }
        if let Some(v) = &self.job_url {
            row.job_url = v.clone();
        }
        if let Some(v) = &self.status {
            row.status = v.clone();
        }
        if let Some(v) = &self.location {
            row.location = v.clone();
        }
        if let Some(v) = &self.salary_range {
            row.salary_range = v.clone();
        }
        if let Some(v) = self.application_date {
            row.application_date = v;
        }
        if let Some(v) = &self.notes {
            row.notes = v.clone();
        }
    }
}
