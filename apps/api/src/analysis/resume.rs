//! Résumé upload, analysis and deletion.

use bytes::Bytes;
use tracing::{info, warn};

use crate::ai_parser::parse_resume_analysis;
use crate::analysis::extract_in_background;
use crate::analysis::prompts::resume_analysis_prompt;
use crate::errors::AppError;
use crate::extract::DocumentKind;
use crate::llm_client::prompts::CAREER_COACH_SYSTEM;
use crate::models::resume::{NewResumeAnalysis, ResumeAnalysisRow};
use crate::state::AppState;
use crate::storage::upload_key;
use crate::validation::require_non_blank;

/// Stores an uploaded résumé, analyzes it and persists the analysis.
///
/// The extension is checked before anything is written. Once the file is stored,
/// the remaining steps run in their own task, so the file is deleted again on any
/// later failure even if the caller stops waiting.
pub async fn upload_resume(
    state: &AppState,
    user_id: i64,
    filename: &str,
    bytes: Bytes,
) -> Result<ResumeAnalysisRow, AppError> {
    let filename = require_non_blank("filename", filename)?;
    let kind = DocumentKind::from_filename(&filename)?;
    if bytes.is_empty() {
        return Err(AppError::InvalidInput(format!("'{filename}' is empty")));
    }

    let key = upload_key(user_id, &filename);
    state
        .files
        .put(&key, bytes.clone(), kind.content_type())
        .await?;

    let state = state.clone();
    let analysis = tokio::spawn(async move {
        let result = analyze_stored(&state, user_id, &filename, &key, kind, bytes).await;
        if let Err(e) = &result {
            if let Err(cleanup) = state.files.delete(&key).await {
                warn!("Could not remove orphaned upload {key}: {cleanup}");
            } else {
                warn!("Removed upload {key} after failed analysis: {e}");
            }
        }
        result
    });

    analysis
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("résumé analysis task failed: {e}")))?
}

async fn analyze_stored(
    state: &AppState,
    user_id: i64,
    filename: &str,
    key: &str,
    kind: DocumentKind,
    bytes: Bytes,
) -> Result<ResumeAnalysisRow, AppError> {
    let text = extract_in_background(kind, bytes, filename.to_string()).await?;

    let completion = state
        .llm
        .complete(&resume_analysis_prompt(&text), CAREER_COACH_SYSTEM)
        .await?;
    let parsed = parse_resume_analysis(&completion);
    if !parsed.parsed_fully() {
        warn!(
            "Résumé analysis for '{filename}' degraded: {}",
            parsed.describe_degradations()
        );
    }
    let parsed_fully = parsed.parsed_fully();
    let analysis = parsed.value;

    let row = state
        .store
        .insert_resume(NewResumeAnalysis {
            user_id,
            filename: filename.to_string(),
            file_path: key.to_string(),
            overall_score: analysis.overall_score,
            analysis_text: analysis.analysis_text,
            suggestions: analysis.suggestions,
            parsed_fully,
        })
        .await?;

    info!(
        "Stored résumé analysis {} for user {user_id} (score {})",
        row.id, row.overall_score
    );
    Ok(row)
}

pub async fn get_resume(
    state: &AppState,
    user_id: i64,
    resume_id: i64,
) -> Result<ResumeAnalysisRow, AppError> {
    state
        .store
        .get_resume(user_id, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}

/// Deletes the row (and results derived from it), then the stored file.
pub async fn delete_resume(state: &AppState, user_id: i64, resume_id: i64) -> Result<(), AppError> {
    let removed = state
        .store
        .delete_resume(user_id, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    // The row is gone either way; a leftover file is only worth a warning.
    if let Err(e) = state.files.delete(&removed.file_path).await {
        warn!("Résumé {resume_id} deleted but file {} remains: {e}", removed.file_path);
    }
    info!("Deleted résumé {resume_id} for user {user_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::analysis::test_support::{docx_bytes, harness, ANALYSIS_REPLY};
    use crate::llm_client::{Completion, LlmError};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    fn count_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| {
                        let path = e.path();
                        if path.is_dir() {
                            count_files(&path)
                        } else {
                            1
                        }
                    })
                    .sum()
            })
            .unwrap_or(0)
    }

    fn resume_docx() -> Bytes {
        Bytes::from(docx_bytes("Jane Doe\nSenior Rust Engineer\nBuilt payment systems"))
    }

    #[tokio::test]
    async fn test_upload_analyzes_and_persists() {
        let h = harness(vec![Ok(ANALYSIS_REPLY.to_string())]);
        let user = h.store.seed_user("jane@example.com").await;

        let row = upload_resume(&h.state, user, "cv.docx", resume_docx())
            .await
            .unwrap();

        assert_eq!(row.user_id, user);
        assert_eq!(row.filename, "cv.docx");
        assert_eq!(row.overall_score, 85);
        assert_eq!(row.analysis_text, "Strong formatting. Clear structure.");
        assert_eq!(row.suggestions, vec!["Add metrics", "Shorten bullet points"]);
        assert!(row.parsed_fully);
        assert!(row.file_path.starts_with(&format!("user_{user}/")));
        assert_eq!(count_files(h.upload_dir.path()), 1);

        let prompt = h.llm.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Senior Rust Engineer"));
    }

    #[tokio::test]
    async fn test_unsupported_extension_stores_nothing() {
        let h = harness(vec![]);
        let user = h.store.seed_user("jane@example.com").await;

        let err = upload_resume(&h.state, user, "cv.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UnsupportedFileType(_)));
        assert_eq!(h.llm.prompt_count(), 0);
        assert_eq!(count_files(h.upload_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_removes_stored_file() {
        let h = harness(vec![Err(LlmError::Timeout { secs: 60 })]);
        let user = h.store.seed_user("jane@example.com").await;

        let err = upload_resume(&h.state, user, "cv.docx", resume_docx())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamTimeout(60)));
        assert_eq!(count_files(h.upload_dir.path()), 0);
        assert!(h.store.list_resumes(user).await.unwrap().is_empty());
    }

    /// Answers only after `delay`, then fails like a timed-out upstream.
    struct SlowCompletion {
        delay: Duration,
    }

    #[async_trait]
    impl Completion for SlowCompletion {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            tokio::time::sleep(self.delay).await;
            Err(LlmError::Timeout { secs: 60 })
        }
    }

    #[tokio::test]
    async fn test_abandoned_upload_still_removes_stored_file() {
        let mut h = harness(vec![]);
        h.state.llm = Arc::new(SlowCompletion {
            delay: Duration::from_millis(200),
        });
        let user = h.store.seed_user("jane@example.com").await;

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            upload_resume(&h.state, user, "cv.docx", resume_docx()),
        )
        .await;
        assert!(abandoned.is_err());

        let mut remaining = count_files(h.upload_dir.path());
        for _ in 0..50 {
            if remaining == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            remaining = count_files(h.upload_dir.path());
        }
        assert_eq!(remaining, 0);
        assert!(h.store.list_resumes(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_removes_stored_file() {
        let h = harness(vec![Ok(ANALYSIS_REPLY.to_string())]);

        let err = upload_resume(&h.state, 99, "cv.docx", resume_docx())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(count_files(h.upload_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_invalid_input() {
        let h = harness(vec![]);
        let user = h.store.seed_user("jane@example.com").await;

        let err = upload_resume(&h.state, user, "cv.docx", Bytes::from_static(b"not a zip"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(h.llm.prompt_count(), 0);
        assert_eq!(count_files(h.upload_dir.path()), 0);
    }

    #[tokio::test]
    async fn test_degraded_analysis_is_flagged() {
        let h = harness(vec![Ok("Looks fine overall.".to_string())]);
        let user = h.store.seed_user("jane@example.com").await;

        let row = upload_resume(&h.state, user, "cv.docx", resume_docx())
            .await
            .unwrap();

        assert_eq!(row.overall_score, 0);
        assert!(row.suggestions.is_empty());
        assert!(!row.parsed_fully);
    }

    #[tokio::test]
    async fn test_same_filename_twice_keeps_both_files() {
        let h = harness(vec![
            Ok(ANALYSIS_REPLY.to_string()),
            Ok(ANALYSIS_REPLY.to_string()),
        ]);
        let user = h.store.seed_user("jane@example.com").await;

        let first = upload_resume(&h.state, user, "cv.docx", resume_docx()).await.unwrap();
        let second = upload_resume(&h.state, user, "cv.docx", resume_docx()).await.unwrap();

        assert_ne!(first.file_path, second.file_path);
        assert_eq!(count_files(h.upload_dir.path()), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_file() {
        let h = harness(vec![Ok(ANALYSIS_REPLY.to_string())]);
        let user = h.store.seed_user("jane@example.com").await;
        let other = h.store.seed_user("other@example.com").await;
        let row = upload_resume(&h.state, user, "cv.docx", resume_docx()).await.unwrap();

        let err = delete_resume(&h.state, other, row.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(count_files(h.upload_dir.path()), 1);

        delete_resume(&h.state, user, row.id).await.unwrap();
        assert_eq!(count_files(h.upload_dir.path()), 0);
        assert!(matches!(
            get_resume(&h.state, user, row.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
