use async_trait::async_trait;
use exam_core::model::{DocumentId, Quiz};
use tracing::debug;

use super::mapping::{json_body, transport_error};
use super::{GENERATE_QUIZ, HttpBackend};
use crate::repository::{quiz_from_response, BackendError, QuizRepository};

#[async_trait]
impl QuizRepository for HttpBackend {
    async fn generate_quiz(&self, id: &DocumentId) -> Result<Quiz, BackendError> {
        let url = self.endpoint(GENERATE_QUIZ, Some(id))?;
        debug!(%url, "requesting quiz");
        let response = self.post(url).send().await.map_err(transport_error)?;
        quiz_from_response(json_body(response).await?)
    }
}
