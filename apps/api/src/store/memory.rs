//! In-process `Store` used by handler and service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::applications::patch::ApplicationPatch;
use crate::errors::AppError;
use crate::models::application::{JobApplicationRow, NewApplication};
use crate::models::resume::{
    AtsCheckRow, CoverLetterRow, JobMatchRow, NewAtsCheck, NewCoverLetter, NewJobMatch,
    NewResumeAnalysis, ResumeAnalysisRow,
};
use crate::models::user::{NewUser, User};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    resumes: Vec<ResumeAnalysisRow>,
    cover_letters: Vec<CoverLetterRow>,
    job_matches: Vec<JobMatchRow>,
    ats_checks: Vec<AtsCheckRow>,
    applications: Vec<JobApplicationRow>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self, user_id: i64) -> Result<(), AppError> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(AppError::NotFound("Referenced user or resume not found".to_string()))
        }
    }

    fn require_resume(&self, user_id: i64, resume_id: i64) -> Result<(), AppError> {
        self.require_user(user_id)?;
        if self.resumes.iter().any(|r| r.id == resume_id) {
            Ok(())
        } else {
            Err(AppError::NotFound("Referenced user or resume not found".to_string()))
        }
    }
}

/// Ids are drawn from one counter shared by every table, so insertion order
/// doubles as creation order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with a placeholder hash and returns its id.
    pub async fn seed_user(&self, email: &str) -> i64 {
        self.create_user(NewUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .unwrap()
        .id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = T>, id: impl Fn(&T) -> i64) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|r| std::cmp::Reverse(id(r)));
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::InvalidInput("Email is already registered".to_string()));
        }
        let row = User {
            id: t.next_id(),
            email: user.email,
            full_name: user.full_name,
            password_hash: user.password_hash,
            is_active: true,
            is_verified: false,
            created_at: Utc::now(),
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_resume(
        &self,
        resume: NewResumeAnalysis,
    ) -> Result<ResumeAnalysisRow, AppError> {
        let mut t = self.lock();
        t.require_user(resume.user_id)?;
        let row = ResumeAnalysisRow {
            id: t.next_id(),
            user_id: resume.user_id,
            filename: resume.filename,
            file_path: resume.file_path,
            overall_score: resume.overall_score,
            analysis_text: resume.analysis_text,
            suggestions: resume.suggestions,
            parsed_fully: resume.parsed_fully,
            created_at: Utc::now(),
        };
        t.resumes.push(row.clone());
        Ok(row)
    }

    async fn get_resume(
        &self,
        user_id: i64,
        resume_id: i64,
    ) -> Result<Option<ResumeAnalysisRow>, AppError> {
        Ok(self
            .lock()
            .resumes
            .iter()
            .find(|r| r.id == resume_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_resumes(&self, user_id: i64) -> Result<Vec<ResumeAnalysisRow>, AppError> {
        let t = self.lock();
        Ok(newest_first(
            t.resumes.iter().filter(|r| r.user_id == user_id).cloned(),
            |r| r.id,
        ))
    }

    async fn delete_resume(
        &self,
        user_id: i64,
        resume_id: i64,
    ) -> Result<Option<ResumeAnalysisRow>, AppError> {
        let mut t = self.lock();
        let Some(pos) = t
            .resumes
            .iter()
            .position(|r| r.id == resume_id && r.user_id == user_id)
        else {
            return Ok(None);
        };
        let removed = t.resumes.remove(pos);
        t.cover_letters.retain(|c| c.resume_id != resume_id);
        t.job_matches.retain(|m| m.resume_id != resume_id);
        t.ats_checks.retain(|a| a.resume_id != resume_id);
        Ok(Some(removed))
    }

    async fn insert_cover_letter(
        &self,
        letter: NewCoverLetter,
    ) -> Result<CoverLetterRow, AppError> {
        let mut t = self.lock();
        t.require_resume(letter.user_id, letter.resume_id)?;
        let row = CoverLetterRow {
            id: t.next_id(),
            user_id: letter.user_id,
            resume_id: letter.resume_id,
            job_title: letter.job_title,
            company_name: letter.company_name,
            cover_letter_text: letter.cover_letter_text,
            created_at: Utc::now(),
        };
        t.cover_letters.push(row.clone());
        Ok(row)
    }

    async fn list_cover_letters(&self, user_id: i64) -> Result<Vec<CoverLetterRow>, AppError> {
        let t = self.lock();
        Ok(newest_first(
            t.cover_letters.iter().filter(|r| r.user_id == user_id).cloned(),
            |r| r.id,
        ))
    }

    async fn insert_job_match(&self, job_match: NewJobMatch) -> Result<JobMatchRow, AppError> {
        let mut t = self.lock();
        t.require_resume(job_match.user_id, job_match.resume_id)?;
        let row = JobMatchRow {
            id: t.next_id(),
            user_id: job_match.user_id,
            resume_id: job_match.resume_id,
            job_description: job_match.job_description,
            match_percentage: job_match.match_percentage,
            matching_skills: job_match.matching_skills,
            missing_skills: job_match.missing_skills,
            suggestions: job_match.suggestions,
            parsed_fully: job_match.parsed_fully,
            created_at: Utc::now(),
        };
        t.job_matches.push(row.clone());
        Ok(row)
    }

    async fn list_job_matches(&self, user_id: i64) -> Result<Vec<JobMatchRow>, AppError> {
        let t = self.lock();
        Ok(newest_first(
            t.job_matches.iter().filter(|r| r.user_id == user_id).cloned(),
            |r| r.id,
        ))
    }

    async fn insert_ats_check(&self, check: NewAtsCheck) -> Result<AtsCheckRow, AppError> {
        let mut t = self.lock();
        t.require_resume(check.user_id, check.resume_id)?;
        let row = AtsCheckRow {
            id: t.next_id(),
            user_id: check.user_id,
            resume_id: check.resume_id,
            ats_score: check.ats_score,
            issues_found: check.issues_found,
            recommendations: check.recommendations,
            is_ats_friendly: check.is_ats_friendly,
            parsed_fully: check.parsed_fully,
            created_at: Utc::now(),
        };
        t.ats_checks.push(row.clone());
        Ok(row)
    }

    async fn list_ats_checks(&self, user_id: i64) -> Result<Vec<AtsCheckRow>, AppError> {
        let t = self.lock();
        Ok(newest_first(
            t.ats_checks.iter().filter(|r| r.user_id == user_id).cloned(),
            |r| r.id,
        ))
    }

    async fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplicationRow, AppError> {
        let mut t = self.lock();
        t.require_user(application.user_id)?;
        let now = Utc::now();
        let row = JobApplicationRow {
            id: t.next_id(),
            user_id: application.user_id,
            company_name: application.company_name,
            job_title: application.job_title,
            job_url: application.job_url,
            status: application.status,
            location: application.location,
            salary_range: application.salary_range,
            application_date: application.application_date,
            notes: application.notes,
            created_at: now,
            updated_at: now,
        };
        t.applications.push(row.clone());
        Ok(row)
    }

    async fn list_applications(&self, user_id: i64) -> Result<Vec<JobApplicationRow>, AppError> {
        let t = self.lock();
        Ok(newest_first(
            t.applications.iter().filter(|r| r.user_id == user_id).cloned(),
            |r| r.id,
        ))
    }

    async fn get_application(
        &self,
        user_id: i64,
        application_id: i64,
    ) -> Result<Option<JobApplicationRow>, AppError> {
        Ok(self
            .lock()
            .applications
            .iter()
            .find(|a| a.id == application_id && a.user_id == user_id)
            .cloned())
    }

    async fn update_application(
        &self,
        user_id: i64,
        application_id: i64,
        patch: &ApplicationPatch,
    ) -> Result<Option<JobApplicationRow>, AppError> {
        let mut t = self.lock();
        let Some(row) = t
            .applications
            .iter_mut()
            .find(|a| a.id == application_id && a.user_id == user_id)
        else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply_to(row);
            row.updated_at = Utc::now();
        }
        Ok(Some(row.clone()))
    }

    async fn delete_application(
        &self,
        user_id: i64,
        application_id: i64,
    ) -> Result<bool, AppError> {
        let mut t = self.lock();
        let before = t.applications.len();
        t.applications
            .retain(|a| !(a.id == application_id && a.user_id == user_id));
        Ok(t.applications.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::status::ApplicationStatus;
    use chrono::NaiveDate;

    fn new_application(user_id: i64) -> NewApplication {
        NewApplication {
            user_id,
            company_name: "Acme".into(),
            job_title: "Backend Engineer".into(),
            job_url: None,
            status: "Applied".into(),
            location: None,
            salary_range: None,
            application_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_invalid_input() {
        let store = MemoryStore::new();
        store.seed_user("jane@example.com").await;
        let err = store
            .create_user(NewUser {
                email: "jane@example.com".into(),
                full_name: "Jane Again".into(),
                password_hash: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == "Email is already registered"));
    }

    #[tokio::test]
    async fn test_insert_for_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let err = store.insert_application(new_application(42)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_application_is_invisible() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com").await;
        let other = store.seed_user("other@example.com").await;
        let app = store.insert_application(new_application(owner)).await.unwrap();

        assert!(store.get_application(other, app.id).await.unwrap().is_none());
        let patch = ApplicationPatch::status_only(ApplicationStatus::Offer);
        assert!(store
            .update_application(other, app.id, &patch)
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_application(other, app.id).await.unwrap());

        let still = store.get_application(owner, app.id).await.unwrap().unwrap();
        assert_eq!(still.status, "Applied");
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let store = MemoryStore::new();
        let user = store.seed_user("jane@example.com").await;
        let first = store.insert_application(new_application(user)).await.unwrap();
        let second = store.insert_application(new_application(user)).await.unwrap();

        let ids: Vec<i64> = store
            .list_applications(user)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_deleting_resume_removes_derived_rows() {
        let store = MemoryStore::new();
        let user = store.seed_user("jane@example.com").await;
        let resume = store
            .insert_resume(NewResumeAnalysis {
                user_id: user,
                filename: "cv.pdf".into(),
                file_path: "user_1/abc_cv.pdf".into(),
                overall_score: 70,
                analysis_text: String::new(),
                suggestions: vec![],
                parsed_fully: true,
            })
            .await
            .unwrap();
        store
            .insert_ats_check(NewAtsCheck {
                user_id: user,
                resume_id: resume.id,
                ats_score: 80,
                issues_found: vec![],
                recommendations: vec![],
                is_ats_friendly: true,
                parsed_fully: true,
            })
            .await
            .unwrap();

        let removed = store.delete_resume(user, resume.id).await.unwrap();
        assert_eq!(removed.map(|r| r.file_path).as_deref(), Some("user_1/abc_cv.pdf"));
        assert!(store.list_ats_checks(user).await.unwrap().is_empty());
    }
}
