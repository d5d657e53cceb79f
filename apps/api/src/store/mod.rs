//! Persistence layer.
//!
//! Handlers and services depend on the `Store` trait; `PgStore` is the production
//! backend and `MemoryStore` backs the tests. Every lookup of user-owned data takes
//! the requesting `user_id` and returns `None` for rows owned by someone else, so
//! callers turn cross-user access into `NotFound` without a separate check.

use async_trait::async_trait;

use crate::applications::patch::ApplicationPatch;
use crate::errors::AppError;
use crate::models::application::{JobApplicationRow, NewApplication};
use crate::models::resume::{
    AtsCheckRow, CoverLetterRow, JobMatchRow, NewAtsCheck, NewCoverLetter, NewJobMatch,
    NewResumeAnalysis, ResumeAnalysisRow,
};
use crate::models::user::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `InvalidInput` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `NotFound` when `user_id` does not exist.
    async fn insert_resume(&self, resume: NewResumeAnalysis)
        -> Result<ResumeAnalysisRow, AppError>;
    async fn get_resume(
        &self,
        user_id: i64,
        resume_id: i64,
    ) -> Result<Option<ResumeAnalysisRow>, AppError>;
    /// Newest first.
    async fn list_resumes(&self, user_id: i64) -> Result<Vec<ResumeAnalysisRow>, AppError>;
    /// Returns the deleted row so the caller can remove the stored file.
    /// Derived results referencing the résumé are removed with it.
    async fn delete_resume(
        &self,
        user_id: i64,
        resume_id: i64,
    ) -> Result<Option<ResumeAnalysisRow>, AppError>;

    async fn insert_cover_letter(&self, letter: NewCoverLetter)
        -> Result<CoverLetterRow, AppError>;
    async fn list_cover_letters(&self, user_id: i64) -> Result<Vec<CoverLetterRow>, AppError>;

    async fn insert_job_match(&self, job_match: NewJobMatch) -> Result<JobMatchRow, AppError>;
    async fn list_job_matches(&self, user_id: i64) -> Result<Vec<JobMatchRow>, AppError>;

    async fn insert_ats_check(&self, check: NewAtsCheck) -> Result<AtsCheckRow, AppError>;
    async fn list_ats_checks(&self, user_id: i64) -> Result<Vec<AtsCheckRow>, AppError>;

    /// Fails with `NotFound` when `user_id` does not exist.
    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplicationRow, AppError>;
    /// Newest first.
    async fn list_applications(&self, user_id: i64) -> Result<Vec<JobApplicationRow>, AppError>;
    async fn get_application(
        &self,
        user_id: i64,
        application_id: i64,
    ) -> Result<Option<JobApplicationRow>, AppError>;
    /// Applies an already-validated patch. `None` when the row is absent or foreign.
    async fn update_application(
        &self,
        user_id: i64,
        application_id: i64,
        patch: &ApplicationPatch,
    ) -> Result<Option<JobApplicationRow>, AppError>;
    /// `false` when the row is absent or foreign.
    async fn delete_application(&self, user_id: i64, application_id: i64)
        -> Result<bool, AppError>;
}
