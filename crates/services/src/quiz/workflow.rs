use std::sync::Arc;

use backend::{BackendError, QuizRepository};
use exam_core::model::DocumentId;
use tracing::{info, warn};

use super::session::QuizSession;
use crate::error::QuizError;

/// Requests generated quizzes and opens sessions over them.
#[derive(Clone)]
pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// Generate a quiz for `document_id` and start a session at question 0.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::MissingQuiz` if the response carried no quiz,
    /// `QuizError::Empty` if it carried no questions, and
    /// `QuizError::Backend` for transport or status failures.
    pub async fn start_quiz(&self, document_id: &DocumentId) -> Result<QuizSession, QuizError> {
        let quiz = self
            .quizzes
            .generate_quiz(document_id)
            .await
            .map_err(|err| match err {
                BackendError::MissingField("quiz") => QuizError::MissingQuiz,
                other => QuizError::Backend(other),
            })
            .inspect_err(|err| warn!(%document_id, error = %err, "quiz generation failed"))?;

        let session = QuizSession::new(quiz)?;
        info!(
            %document_id,
            subject = session.subject(),
            questions = session.questions().len(),
            "quiz started"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use serde_json::json;

    fn service(repo: &InMemoryBackend) -> QuizService {
        QuizService::new(Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn starts_session_from_generated_quiz() {
        let repo = InMemoryBackend::new();
        let id = DocumentId::new("doc-1");
        repo.set_quiz_response(
            id.clone(),
            json!({
                "subject": "Digital Logic",
                "quiz": [
                    { "question": "NAND is?", "options": ["universal", "basic"], "answerIndex": 0, "topic": "Gates" }
                ]
            }),
        );

        let session = service(&repo).start_quiz(&id).await.unwrap();
        assert_eq!(session.subject(), "Digital Logic");
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.progress().total, 1);
    }

    #[tokio::test]
    async fn response_without_quiz_is_missing_quiz() {
        let repo = InMemoryBackend::new();
        let id = DocumentId::new("doc-1");
        repo.set_quiz_response(id.clone(), json!({ "subject": "Digital Logic" }));

        let err = service(&repo).start_quiz(&id).await.unwrap_err();
        assert_eq!(err, QuizError::MissingQuiz);
    }

    #[tokio::test]
    async fn empty_quiz_is_rejected() {
        let repo = InMemoryBackend::new();
        let id = DocumentId::new("doc-1");
        repo.set_quiz_response(id.clone(), json!({ "subject": "x", "quiz": [] }));

        let err = service(&repo).start_quiz(&id).await.unwrap_err();
        assert_eq!(err, QuizError::Empty);
    }

    #[tokio::test]
    async fn transport_failures_are_wrapped() {
        let repo = InMemoryBackend::new();
        repo.fail_with(BackendError::Connection("refused".into()));

        let err = service(&repo)
            .start_quiz(&DocumentId::new("doc-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Backend(BackendError::Connection(_))));
    }
}
