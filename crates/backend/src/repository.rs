use async_trait::async_trait;
use exam_core::model::{Document, DocumentId, Playlist, Question, Quiz, UploadFile};
use exam_core::wire::{DocumentRecord, PlaylistRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackendError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("quota exceeded")]
    QuotaExceeded,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Network failures as opposed to the service answering with a refusal.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Files and name submitted for a new analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisUpload {
    pub name: String,
    pub papers: Vec<UploadFile>,
    pub syllabus: Vec<UploadFile>,
}

/// Listing and persistence of analysed documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetch the raw document listing in server order.
    ///
    /// Entries are returned unvalidated; shape checks happen in the caller.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the listing cannot be fetched or lacks `documents`.
    async fn list_documents(&self) -> Result<Vec<Value>, BackendError>;

    /// Upsert a full document body by identity.
    ///
    /// `body` is sent as is; see `exam_core::wire::save_body`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the service rejects or cannot receive the document.
    async fn save_document(&self, id: &DocumentId, body: &Value) -> Result<(), BackendError>;
}

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Ask the service to curate playlists for a document.
    ///
    /// Returns the updated raw document, or `None` when nothing was found.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::QuotaExceeded` when the daily video quota is spent,
    /// or other backend errors.
    async fn fetch_playlists(&self, id: &DocumentId) -> Result<Option<Value>, BackendError>;
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Generate a quiz for a document.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::MissingField("quiz")` if the response carries no quiz.
    async fn generate_quiz(&self, id: &DocumentId) -> Result<Quiz, BackendError>;
}

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Submit papers for analysis and return the raw topic payload.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on any transport or service failure.
    async fn submit_analysis(&self, upload: &AnalysisUpload) -> Result<Value, BackendError>;
}

/// Extract `documents` from a listing response.
///
/// # Errors
///
/// Returns `BackendError::MissingField` if `documents` is absent or not an array.
pub fn documents_from_response(body: Value) -> Result<Vec<Value>, BackendError> {
    match body {
        Value::Object(mut map) => match map.remove("documents") {
            Some(Value::Array(docs)) => Ok(docs),
            _ => Err(BackendError::MissingField("documents")),
        },
        _ => Err(BackendError::MissingField("documents")),
    }
}

/// Decode a quiz-generation response (`{ quiz, subject }`).
///
/// # Errors
///
/// Returns `BackendError::MissingField` without a `quiz` array and
/// `BackendError::Malformed` if a question cannot be decoded.
pub fn quiz_from_response(body: Value) -> Result<Quiz, BackendError> {
    let Value::Object(mut map) = body else {
        return Err(BackendError::MissingField("quiz"));
    };
    let questions = match map.remove("quiz") {
        Some(raw @ Value::Array(_)) => serde_json::from_value::<Vec<Question>>(raw)
            .map_err(|e| BackendError::Malformed(e.to_string()))?,
        _ => return Err(BackendError::MissingField("quiz")),
    };
    let subject = map
        .get("subject")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(Quiz::new(subject, questions))
}

/// Simple in-memory backend for tests and offline runs.
///
/// Holds raw JSON so callers can seed malformed entries exactly as a real
/// server might return them.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    documents: Arc<Mutex<Vec<Value>>>,
    playlists: Arc<Mutex<HashMap<DocumentId, Vec<Playlist>>>>,
    quizzes: Arc<Mutex<HashMap<DocumentId, Value>>>,
    analysis: Arc<Mutex<Option<Value>>>,
    failure: Arc<Mutex<Option<BackendError>>>,
    quota_exhausted: Arc<Mutex<bool>>,
    playlist_requests: Arc<Mutex<usize>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> BackendError {
    BackendError::Connection(e.to_string())
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw listing entry, in server (creation-ascending) order.
    pub fn seed_raw(&self, raw: Value) {
        if let Ok(mut guard) = self.documents.lock() {
            guard.push(raw);
        }
    }

    pub fn seed_document(&self, document: &Document) {
        if let Ok(raw) = serde_json::to_value(DocumentRecord::from_document(document)) {
            self.seed_raw(raw);
        }
    }

    /// Playlists the service will attach on the next fetch for `id`.
    pub fn set_playlists(&self, id: DocumentId, playlists: Vec<Playlist>) {
        if let Ok(mut guard) = self.playlists.lock() {
            guard.insert(id, playlists);
        }
    }

    /// Raw quiz response returned for `id`.
    pub fn set_quiz_response(&self, id: DocumentId, response: Value) {
        if let Ok(mut guard) = self.quizzes.lock() {
            guard.insert(id, response);
        }
    }

    pub fn set_analysis_response(&self, response: Value) {
        if let Ok(mut guard) = self.analysis.lock() {
            *guard = Some(response);
        }
    }

    /// Make every subsequent call fail with `error` until cleared.
    pub fn fail_with(&self, error: BackendError) {
        if let Ok(mut guard) = self.failure.lock() {
            *guard = Some(error);
        }
    }

    pub fn clear_failure(&self) {
        if let Ok(mut guard) = self.failure.lock() {
            *guard = None;
        }
    }

    pub fn exhaust_playlist_quota(&self) {
        if let Ok(mut guard) = self.quota_exhausted.lock() {
            *guard = true;
        }
    }

    /// Number of playlist requests that reached the backend.
    #[must_use]
    pub fn playlist_requests(&self) -> usize {
        self.playlist_requests.lock().map_or(0, |g| *g)
    }

    /// Current stored form of a document, if present.
    #[must_use]
    pub fn stored(&self, id: &DocumentId) -> Option<Value> {
        let guard = self.documents.lock().ok()?;
        guard.iter().find(|raw| raw_id_matches(raw, id)).cloned()
    }

    fn check_failure(&self) -> Result<(), BackendError> {
        let guard = self.failure.lock().map_err(poisoned)?;
        match guard.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn raw_id_matches(raw: &Value, id: &DocumentId) -> bool {
    raw.get("_id").and_then(Value::as_str) == Some(id.as_str())
}

#[async_trait]
impl DocumentRepository for InMemoryBackend {
    async fn list_documents(&self) -> Result<Vec<Value>, BackendError> {
        self.check_failure()?;
        let guard = self.documents.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn save_document(&self, id: &DocumentId, body: &Value) -> Result<(), BackendError> {
        self.check_failure()?;
        let mut guard = self.documents.lock().map_err(poisoned)?;
        match guard.iter_mut().find(|r| raw_id_matches(r, id)) {
            Some(slot) => *slot = body.clone(),
            None => guard.push(body.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryBackend {
    async fn fetch_playlists(&self, id: &DocumentId) -> Result<Option<Value>, BackendError> {
        self.check_failure()?;
        {
            let mut count = self.playlist_requests.lock().map_err(poisoned)?;
            *count += 1;
        }
        if *self.quota_exhausted.lock().map_err(poisoned)? {
            return Err(BackendError::QuotaExceeded);
        }

        let playlists = {
            let guard = self.playlists.lock().map_err(poisoned)?;
            guard.get(id).cloned()
        };
        let Some(playlists) = playlists.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };

        let records: Vec<PlaylistRecord> =
            playlists.iter().map(PlaylistRecord::from_playlist).collect();
        let records =
            serde_json::to_value(records).map_err(|e| BackendError::Malformed(e.to_string()))?;

        let mut guard = self.documents.lock().map_err(poisoned)?;
        let slot = guard
            .iter_mut()
            .find(|r| raw_id_matches(r, id))
            .ok_or(BackendError::NotFound)?;
        if let Some(file) = slot.get_mut("jsonFile").and_then(Value::as_object_mut) {
            file.insert("subjectPlaylists".to_string(), records);
        } else if let Some(obj) = slot.as_object_mut() {
            obj.insert("playlists".to_string(), records);
        }
        Ok(Some(slot.clone()))
    }
}

#[async_trait]
impl QuizRepository for InMemoryBackend {
    async fn generate_quiz(&self, id: &DocumentId) -> Result<Quiz, BackendError> {
        self.check_failure()?;
        let response = {
            let guard = self.quizzes.lock().map_err(poisoned)?;
            guard.get(id).cloned().ok_or(BackendError::NotFound)?
        };
        quiz_from_response(response)
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryBackend {
    async fn submit_analysis(&self, _upload: &AnalysisUpload) -> Result<Value, BackendError> {
        self.check_failure()?;
        let guard = self.analysis.lock().map_err(poisoned)?;
        guard.clone().ok_or(BackendError::Status(500))
    }
}

/// Aggregates the remote ports behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Backend {
    pub documents: Arc<dyn DocumentRepository>,
    pub playlists: Arc<dyn PlaylistRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub analysis: Arc<dyn AnalysisRepository>,
}

impl Backend {
    #[must_use]
    pub fn in_memory(repo: &InMemoryBackend) -> Self {
        Self {
            documents: Arc::new(repo.clone()),
            playlists: Arc::new(repo.clone()),
            quizzes: Arc::new(repo.clone()),
            analysis: Arc::new(repo.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Difficulty, Priority, Topic};
    use exam_core::normalize::normalize_document;
    use serde_json::json;

    fn build_document(id: &str) -> Document {
        Document::new(
            DocumentId::new(id),
            format!("Doc {id}"),
            "Logic",
            vec![Topic::new("NAND", "Universal", Priority::High, Difficulty::Easy)],
        )
    }

    #[test]
    fn listing_requires_documents_array() {
        let docs = documents_from_response(json!({ "documents": [1, 2] })).unwrap();
        assert_eq!(docs.len(), 2);

        let err = documents_from_response(json!({ "items": [] })).unwrap_err();
        assert_eq!(err, BackendError::MissingField("documents"));
    }

    #[test]
    fn quiz_response_without_quiz_is_reported() {
        let err = quiz_from_response(json!({ "subject": "Logic" })).unwrap_err();
        assert_eq!(err, BackendError::MissingField("quiz"));
    }

    #[test]
    fn quiz_response_decodes_questions() {
        let quiz = quiz_from_response(json!({
            "subject": "Logic",
            "quiz": [{ "question": "Q", "options": ["a", "b"], "answerIndex": 1, "topic": "NAND", "difficulty": "Easy" }]
        }))
        .unwrap();
        assert_eq!(quiz.subject, "Logic");
        assert_eq!(quiz.questions[0].answer_index, 1);
    }

    #[test]
    fn malformed_question_is_reported() {
        let err = quiz_from_response(json!({ "quiz": [{ "question": "Q" }] })).unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn save_upserts_by_identity() {
        let repo = InMemoryBackend::new();
        let mut doc = build_document("a");
        repo.seed_document(&doc);
        repo.seed_document(&build_document("b"));

        doc.toggle_topic(0).unwrap();
        let body = exam_core::wire::save_body(&doc, None).unwrap();
        repo.save_document(doc.id(), &body).await.unwrap();

        let listing = repo.list_documents().await.unwrap();
        assert_eq!(listing.len(), 2);
        let stored = normalize_document(&listing[0]).unwrap();
        assert!(stored.topics()[0].is_completed());
    }

    #[tokio::test]
    async fn playlists_attach_to_stored_document() {
        let repo = InMemoryBackend::new();
        let doc = build_document("a");
        repo.seed_document(&doc);

        assert!(repo.fetch_playlists(doc.id()).await.unwrap().is_none());

        repo.set_playlists(
            doc.id().clone(),
            vec![Playlist::new("https://y/1", "t", "Logic")],
        );
        let raw = repo.fetch_playlists(doc.id()).await.unwrap().unwrap();
        let updated = normalize_document(&raw).unwrap();
        assert_eq!(updated.playlists().len(), 1);
        assert_eq!(repo.playlist_requests(), 2);
    }

    #[tokio::test]
    async fn exhausted_quota_is_distinct() {
        let repo = InMemoryBackend::new();
        repo.exhaust_playlist_quota();
        let err = repo.fetch_playlists(&DocumentId::new("a")).await.unwrap_err();
        assert_eq!(err, BackendError::QuotaExceeded);
    }

    #[tokio::test]
    async fn injected_failure_applies_until_cleared() {
        let repo = InMemoryBackend::new();
        repo.fail_with(BackendError::Connection("offline".into()));
        let err = repo.list_documents().await.unwrap_err();
        assert!(err.is_connectivity());

        repo.clear_failure();
        assert!(repo.list_documents().await.unwrap().is_empty());
    }
}
