// Résumé analysis and the AI-backed operations built on an uploaded résumé.
// Every operation runs: resolve résumé -> load file -> extract text -> prompt
// -> single completion -> parse -> persist.
// All completion calls go through `llm_client::Completion`.

pub mod ats_check;
pub mod cover_letter;
pub mod handlers;
pub mod job_match;
pub mod prompts;
pub mod resume;

use bytes::Bytes;

use crate::errors::AppError;
use crate::extract::{extract_text, DocumentKind};
use crate::models::resume::ResumeAnalysisRow;
use crate::state::AppState;

/// Extracts text off the async runtime. A panic inside the PDF decoder is
/// reported as an unreadable document.
pub(crate) async fn extract_in_background(
    kind: DocumentKind,
    bytes: Bytes,
    filename: String,
) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_text(kind, &bytes, &filename))
        .await
        .map_err(|e| AppError::InvalidInput(format!("Could not read document: {e}")))??;
    Ok(text)
}

/// Resolves a résumé owned by `user_id` and returns it with its extracted text.
pub(crate) async fn load_resume_text(
    state: &AppState,
    user_id: i64,
    resume_id: i64,
) -> Result<(ResumeAnalysisRow, String), AppError> {
    let resume = state
        .store
        .get_resume(user_id, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    let kind = DocumentKind::from_filename(&resume.filename)?;
    let bytes = state.files.get(&resume.file_path).await?;
    let text = extract_in_background(kind, bytes, resume.filename.clone()).await?;
    Ok((resume, text))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fakes shared by service and handler tests.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::llm_client::{Completion, LlmError};
    use crate::state::AppState;
    use crate::storage::LocalFileStore;
    use crate::store::memory::MemoryStore;

    /// Replays canned completions in order and records every prompt it was sent.
    #[derive(Default)]
    pub struct ScriptedCompletion {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCompletion {
        pub fn replying(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::default(),
            }
        }

        pub fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Completion for ScriptedCompletion {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    pub struct Harness {
        pub state: AppState,
        pub store: Arc<MemoryStore>,
        pub llm: Arc<ScriptedCompletion>,
        pub upload_dir: tempfile::TempDir,
    }

    pub fn harness(replies: Vec<Result<String, LlmError>>) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let llm = Arc::new(ScriptedCompletion::replying(replies));
        let upload_dir = tempfile::tempdir().unwrap();
        let state = AppState {
            store: store.clone(),
            llm: llm.clone(),
            files: Arc::new(LocalFileStore::new(upload_dir.path())),
            config: Config::for_tests(),
        };
        Harness {
            state,
            store,
            llm,
            upload_dir,
        }
    }

    /// A DOCX whose body is one paragraph per line of `text`.
    pub fn docx_bytes(text: &str) -> Vec<u8> {
        crate::extract::docx_fixture(&text.lines().collect::<Vec<_>>())
    }

    pub const ANALYSIS_REPLY: &str = "SCORE: 85\nFEEDBACK:\nStrong formatting.\nClear structure.\nSUGGESTIONS:\n1. Add metrics\n2. Shorten bullet points";
}
