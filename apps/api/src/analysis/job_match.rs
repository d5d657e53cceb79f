//! Résumé-to-job-description match analysis.

use serde::Deserialize;
use tracing::{info, warn};

use crate::ai_parser::parse_job_match;
use crate::analysis::load_resume_text;
use crate::analysis::prompts::job_match_prompt;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::resume::{JobMatchRow, NewJobMatch};
use crate::state::AppState;
use crate::validation::require_non_blank;

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub resume_id: i64,
    pub job_description: String,
}

pub async fn analyze_job_match(
    state: &AppState,
    user_id: i64,
    request: JobMatchRequest,
) -> Result<JobMatchRow, AppError> {
    let job_description = require_non_blank("job_description", &request.job_description)?;
    let (resume, resume_text) = load_resume_text(state, user_id, request.resume_id).await?;

    let completion = state
        .llm
        .complete(&job_match_prompt(&job_description, &resume_text), JSON_ONLY_SYSTEM)
        .await?;
    let parsed = parse_job_match(&completion)?;
    if !parsed.parsed_fully() {
        warn!(
            "Job match for résumé {} degraded: {}",
            resume.id,
            parsed.describe_degradations()
        );
    }
    let parsed_fully = parsed.parsed_fully();
    let result = parsed.value;

    let row = state
        .store
        .insert_job_match(NewJobMatch {
            user_id,
            resume_id: resume.id,
            job_description,
            match_percentage: result.match_percentage,
            matching_skills: result.matching_skills,
            missing_skills: result.missing_skills,
            suggestions: result.suggestions,
            parsed_fully,
        })
        .await?;

    info!(
        "Stored job match {} for user {user_id} ({}%)",
        row.id, row.match_percentage
    );
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::analysis::resume::upload_resume;
    use crate::analysis::test_support::{docx_bytes, harness, ANALYSIS_REPLY};
    use bytes::Bytes;

    async fn seeded(replies: Vec<&str>) -> (crate::analysis::test_support::Harness, i64, i64) {
        let mut all = vec![Ok(ANALYSIS_REPLY.to_string())];
        all.extend(replies.into_iter().map(|r| Ok(r.to_string())));
        let h = harness(all);
        let user = h.store.seed_user("jane@example.com").await;
        let resume = upload_resume(
            &h.state,
            user,
            "cv.docx",
            Bytes::from(docx_bytes("Jane Doe\nPython, SQL")),
        )
        .await
        .unwrap();
        (h, user, resume.id)
    }

    #[tokio::test]
    async fn test_clean_json_is_persisted_exactly() {
        let (h, user, resume_id) = seeded(vec![
            r#"{"match_percentage": 72, "matching_skills": ["Python", "SQL"], "missing_skills": ["Kubernetes"], "suggestions": ["Mention Airflow"]}"#,
        ])
        .await;

        let row = analyze_job_match(
            &h.state,
            user,
            JobMatchRequest {
                resume_id,
                job_description: "Python data engineer".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(row.match_percentage, 72);
        assert_eq!(row.matching_skills, vec!["Python", "SQL"]);
        assert_eq!(row.missing_skills, vec!["Kubernetes"]);
        assert_eq!(row.suggestions, vec!["Mention Airflow"]);
        assert!(row.parsed_fully);
    }

    #[tokio::test]
    async fn test_fenced_json_without_suggestions_is_degraded() {
        let (h, user, resume_id) = seeded(vec![
            "Here you go:\n```json\n{\"match_percentage\": 40, \"matching_skills\": [], \"missing_skills\": [\"Go\"]}\n```",
        ])
        .await;

        let row = analyze_job_match(
            &h.state,
            user,
            JobMatchRequest {
                resume_id,
                job_description: "Go engineer".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(row.match_percentage, 40);
        assert!(row.suggestions.is_empty());
        assert!(!row.parsed_fully);
    }

    #[tokio::test]
    async fn test_truncated_json_is_malformed_and_not_persisted() {
        let (h, user, resume_id) =
            seeded(vec![r#"Sure! {"match_percentage": 72, "matching_skills": ["Py"#]).await;

        let err = analyze_job_match(
            &h.state,
            user,
            JobMatchRequest {
                resume_id,
                job_description: "Python".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::MalformedAiResponse(_)));
        assert!(h.store.list_job_matches(user).await.unwrap().is_empty());
    }
}
