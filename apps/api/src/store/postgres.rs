use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::applications::patch::ApplicationPatch;
use crate::errors::AppError;
use crate::models::application::{JobApplicationRow, NewApplication};
use crate::models::resume::{
    AtsCheckRow, CoverLetterRow, JobMatchRow, NewAtsCheck, NewCoverLetter, NewJobMatch,
    NewResumeAnalysis, ResumeAnalysisRow,
};
use crate::models::user::{NewUser, User};
use crate::store::Store;

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns constraint violations into the client errors they stand for.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() {
            return AppError::NotFound("Referenced user or resume not found".to_string());
        }
        if db.is_unique_violation() {
            return AppError::InvalidInput("Email is already registered".to_string());
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, full_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        info!("Registered user {}", created.id);
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_resume(
        &self,
        resume: NewResumeAnalysis,
    ) -> Result<ResumeAnalysisRow, AppError> {
        sqlx::query_as::<_, ResumeAnalysisRow>(
            r#"
            INSERT INTO resume_analyses
                (user_id, filename, file_path, overall_score, analysis_text, suggestions, parsed_fully)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(resume.user_id)
        .bind(&resume.filename)
        .bind(&resume.file_path)
        .bind(resume.overall_score)
        .bind(&resume.analysis_text)
        .bind(&resume.suggestions)
        .bind(resume.parsed_fully)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn get_resume(
        &self,
        user_id: i64,
        resume_id: i64,
    ) -> Result<Option<ResumeAnalysisRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeAnalysisRow>(
            "SELECT * FROM resume_analyses WHERE id = $1 AND user_id = $2",
        )
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_resumes(&self, user_id: i64) -> Result<Vec<ResumeAnalysisRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeAnalysisRow>(
            "SELECT * FROM resume_analyses WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_resume(
        &self,
        user_id: i64,
        resume_id: i64,
    ) -> Result<Option<ResumeAnalysisRow>, AppError> {
        // job_matches / ats_checks / cover_letters cascade on delete.
        Ok(sqlx::query_as::<_, ResumeAnalysisRow>(
            "DELETE FROM resume_analyses WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(resume_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_cover_letter(
        &self,
        letter: NewCoverLetter,
    ) -> Result<CoverLetterRow, AppError> {
        sqlx::query_as::<_, CoverLetterRow>(
            r#"
            INSERT INTO cover_letters
                (user_id, resume_id, job_title, company_name, cover_letter_text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(letter.user_id)
        .bind(letter.resume_id)
        .bind(&letter.job_title)
        .bind(&letter.company_name)
        .bind(&letter.cover_letter_text)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list_cover_letters(&self, user_id: i64) -> Result<Vec<CoverLetterRow>, AppError> {
        Ok(sqlx::query_as::<_, CoverLetterRow>(
            "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_job_match(&self, job_match: NewJobMatch) -> Result<JobMatchRow, AppError> {
        sqlx::query_as::<_, JobMatchRow>(
            r#"
            INSERT INTO job_matches
                (user_id, resume_id, job_description, match_percentage,
                 matching_skills, missing_skills, suggestions, parsed_fully)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(job_match.user_id)
        .bind(job_match.resume_id)
        .bind(&job_match.job_description)
        .bind(job_match.match_percentage)
        .bind(&job_match.matching_skills)
        .bind(&job_match.missing_skills)
        .bind(&job_match.suggestions)
        .bind(job_match.parsed_fully)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list_job_matches(&self, user_id: i64) -> Result<Vec<JobMatchRow>, AppError> {
        Ok(sqlx::query_as::<_, JobMatchRow>(
            "SELECT * FROM job_matches WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_ats_check(&self, check: NewAtsCheck) -> Result<AtsCheckRow, AppError> {
        sqlx::query_as::<_, AtsCheckRow>(
            r#"
            INSERT INTO ats_checks
                (user_id, resume_id, ats_score, issues_found, recommendations,
                 is_ats_friendly, parsed_fully)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(check.user_id)
        .bind(check.resume_id)
        .bind(check.ats_score)
        .bind(&check.issues_found)
        .bind(&check.recommendations)
        .bind(check.is_ats_friendly)
        .bind(check.parsed_fully)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list_ats_checks(&self, user_id: i64) -> Result<Vec<AtsCheckRow>, AppError> {
        Ok(sqlx::query_as::<_, AtsCheckRow>(
            "SELECT * FROM ats_checks WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplicationRow, AppError> {
        sqlx::query_as::<_, JobApplicationRow>(
            r#"
            INSERT INTO job_applications
                (user_id, company_name, job_title, job_url, status, location,
                 salary_range, application_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(application.user_id)
        .bind(&application.company_name)
        .bind(&application.job_title)
        .bind(&application.job_url)
        .bind(&application.status)
        .bind(&application.location)
        .bind(&application.salary_range)
        .bind(application.application_date)
        .bind(&application.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list_applications(&self, user_id: i64) -> Result<Vec<JobApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, JobApplicationRow>(
            "SELECT * FROM job_applications WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_application(
        &self,
        user_id: i64,
        application_id: i64,
    ) -> Result<Option<JobApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, JobApplicationRow>(
            "SELECT * FROM job_applications WHERE id = $1 AND user_id = $2",
        )
        .bind(application_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_application(
        &self,
        user_id: i64,
        application_id: i64,
        patch: &ApplicationPatch,
    ) -> Result<Option<JobApplicationRow>, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, JobApplicationRow>(
            "SELECT * FROM job_applications WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(application_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut row) = existing else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(row));
        }
        patch.apply_to(&mut row);

        let updated = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            UPDATE job_applications
            SET company_name = $1, job_title = $2, job_url = $3, status = $4,
                location = $5, salary_range = $6, application_date = $7, notes = $8,
                updated_at = NOW()
            WHERE id = $9 AND user_id = $10
            RETURNING *
            "#,
        )
        .bind(&row.company_name)
        .bind(&row.job_title)
        .bind(&row.job_url)
        .bind(&row.status)
        .bind(&row.location)
        .bind(&row.salary_range)
        .bind(row.application_date)
        .bind(&row.notes)
        .bind(application_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_application(
        &self,
        user_id: i64,
        application_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1 AND user_id = $2")
            .bind(application_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
