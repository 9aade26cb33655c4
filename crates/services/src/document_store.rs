use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use backend::{BackendError, DocumentRepository, PlaylistRepository};
use exam_core::DocumentProgress;
use exam_core::model::{Document, DocumentId};
use exam_core::normalize::normalize_document;
use exam_core::wire::save_body;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::DocumentStoreError;

/// Client-side list of the user's analysed documents for the current session.
///
/// Newest document first. Local edits stay in memory until `save` is called
/// for the document; `load` always swaps in a complete new list. The payload
/// each document was read from is kept so a save writes back every field the
/// client does not model.
pub struct DocumentStore {
    repository: Arc<dyn DocumentRepository>,
    playlists: Arc<dyn PlaylistRepository>,
    documents: Vec<Document>,
    sources: HashMap<DocumentId, Value>,
    unsaved: HashSet<DocumentId>,
    quota_exhausted: bool,
}

impl DocumentStore {
    #[must_use]
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        playlists: Arc<dyn PlaylistRepository>,
    ) -> Self {
        Self {
            repository,
            playlists,
            documents: Vec::new(),
            sources: HashMap::new(),
            unsaved: HashSet::new(),
            quota_exhausted: false,
        }
    }

    /// Replace the list with the server's current documents.
    ///
    /// Entries without a topic array are dropped silently, and so are entries
    /// without an `_id`/`documentId`/`id`: those could never be saved or get
    /// playlists. The server lists oldest first, so the order is reversed.
    ///
    /// # Errors
    ///
    /// Returns `DocumentStoreError::Load` on failure, leaving the store empty.
    pub async fn load(&mut self) -> Result<usize, DocumentStoreError> {
        let raw = match self.repository.list_documents().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "document listing failed");
                self.documents.clear();
                self.sources.clear();
                self.unsaved.clear();
                return Err(DocumentStoreError::Load(err));
            }
        };

        let listed = raw.len();
        let mut documents = Vec::with_capacity(listed);
        let mut sources = HashMap::with_capacity(listed);
        for entry in raw {
            if let Some(document) = normalize_document(&entry) {
                sources.insert(document.id().clone(), entry);
                documents.push(document);
            }
        }
        documents.reverse();
        if documents.len() < listed {
            debug!(
                skipped = listed - documents.len(),
                "skipped listing entries without topics or identity"
            );
        }

        self.documents = documents;
        self.sources = sources;
        self.unsaved.clear();
        info!(count = self.documents.len(), "documents loaded");
        Ok(self.documents.len())
    }

    /// Replace the document with the same identity.
    ///
    /// A document not yet in the list is inserted at the front, as the most
    /// recent one. Returns `true` when an existing entry was replaced. The
    /// payload a replaced document was read from is kept for saving.
    pub fn upsert(&mut self, document: Document) -> bool {
        match self.documents.iter_mut().find(|d| d.id() == document.id()) {
            Some(slot) => {
                *slot = document;
                true
            }
            None => {
                self.documents.insert(0, document);
                false
            }
        }
    }

    /// Flip one topic's completion flag in memory. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDocument` or `Document(TopicOutOfRange)`; nothing changes on error.
    pub fn toggle_topic_completion(
        &mut self,
        id: &DocumentId,
        topic_index: usize,
    ) -> Result<bool, DocumentStoreError> {
        let document = self
            .documents
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or_else(|| DocumentStoreError::UnknownDocument(id.clone()))?;
        let completed = document.toggle_topic(topic_index)?;
        self.unsaved.insert(id.clone());
        debug!(%id, topic_index, completed, "topic toggled");
        Ok(completed)
    }

    /// Persist the in-memory copy of a document.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDocument` or `Save`; the local copy is kept either way.
    pub async fn save(&mut self, id: &DocumentId) -> Result<(), DocumentStoreError> {
        let document = self.get(id).ok_or_else(|| DocumentStoreError::UnknownDocument(id.clone()))?;
        let body = save_body(document, self.sources.get(id))
            .map_err(|e| DocumentStoreError::Save(BackendError::Malformed(e.to_string())))?;
        if let Err(err) = self.repository.save_document(id, &body).await {
            warn!(%id, error = %err, "saving document failed");
            return Err(DocumentStoreError::Save(err));
        }
        self.unsaved.remove(id);
        info!(%id, "document saved");
        Ok(())
    }

    /// Ask the service for curated playlists and store the updated document.
    ///
    /// Documents that already have playlists are returned untouched. Unsaved
    /// completion edits are carried over onto the updated document and stay
    /// unsaved. Once the service reports an exhausted quota, later calls fail
    /// immediately for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDocument`, `QuotaExceeded`, `NoPlaylists` or `Playlists`.
    pub async fn fetch_playlists(&mut self, id: &DocumentId) -> Result<&Document, DocumentStoreError> {
        let has_playlists = self
            .get(id)
            .ok_or_else(|| DocumentStoreError::UnknownDocument(id.clone()))?
            .has_playlists();
        if !has_playlists {
            self.attach_playlists(id).await?;
        }
        self.get(id)
            .ok_or_else(|| DocumentStoreError::UnknownDocument(id.clone()))
    }

    async fn attach_playlists(&mut self, id: &DocumentId) -> Result<(), DocumentStoreError> {
        if self.quota_exhausted {
            return Err(DocumentStoreError::QuotaExceeded);
        }

        let raw = match self.playlists.fetch_playlists(id).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(DocumentStoreError::NoPlaylists),
            Err(BackendError::QuotaExceeded) => {
                warn!(%id, "playlist quota exhausted for this session");
                self.quota_exhausted = true;
                return Err(DocumentStoreError::QuotaExceeded);
            }
            Err(err) => return Err(DocumentStoreError::Playlists(err)),
        };

        let mut fetched = normalize_document(&raw).ok_or_else(|| {
            DocumentStoreError::Playlists(BackendError::Malformed(
                "updated document has no topic list".into(),
            ))
        })?;
        if !fetched.has_playlists() {
            return Err(DocumentStoreError::NoPlaylists);
        }

        if self.unsaved.contains(id) {
            if let Some(local) = self.get(id) {
                fetched.copy_completion_from(local);
            }
        }

        info!(%id, playlists = fetched.playlists().len(), "playlists attached");
        self.sources.insert(id.clone(), raw);
        self.upsert(fetched);
        Ok(())
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    /// Readiness of a document, computed from its current topics.
    #[must_use]
    pub fn progress(&self, id: &DocumentId) -> Option<DocumentProgress> {
        self.get(id).map(DocumentProgress::of)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn has_unsaved_changes(&self, id: &DocumentId) -> bool {
        self.unsaved.contains(id)
    }

    #[must_use]
    pub fn quota_exhausted(&self) -> bool {
        self.quota_exhausted
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("documents_len", &self.documents.len())
            .field("unsaved", &self.unsaved.len())
            .field("quota_exhausted", &self.quota_exhausted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use exam_core::model::{Difficulty, Playlist, Priority, Topic};
    use serde_json::json;

    fn build_document(id: &str, topics: usize) -> Document {
        Document::new(
            DocumentId::new(id),
            format!("Doc {id}"),
            "Logic",
            (0..topics)
                .map(|i| Topic::new(format!("T{i}"), "", Priority::High, Difficulty::Easy))
                .collect(),
        )
    }

    fn store_for(repo: &InMemoryBackend) -> DocumentStore {
        DocumentStore::new(Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn load_filters_and_reverses() {
        let repo = InMemoryBackend::new();
        repo.seed_raw(json!({ "_id": "first", "documentName": "A", "jsonFile": { "topics": [] } }));
        repo.seed_raw(json!({ "_id": "nulled", "documentName": "B", "jsonFile": { "topics": null } }));
        repo.seed_raw(json!({ "_id": "missing", "documentName": "C", "jsonFile": {} }));
        repo.seed_raw(json!(null));
        repo.seed_raw(json!({ "documentName": "D", "jsonFile": { "topics": [] } }));
        repo.seed_document(&build_document("second", 2));

        let mut store = store_for(&repo);
        assert_eq!(store.load().await.unwrap(), 2);

        let ids: Vec<_> = store.documents().iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn failed_load_leaves_store_empty() {
        let repo = InMemoryBackend::new();
        repo.seed_document(&build_document("a", 1));
        let mut store = store_for(&repo);
        store.load().await.unwrap();
        assert!(!store.is_empty());

        repo.fail_with(BackendError::Connection("offline".into()));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::Load(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn toggle_is_local_until_saved() {
        let repo = InMemoryBackend::new();
        let doc = build_document("a", 3);
        repo.seed_document(&doc);
        let mut store = store_for(&repo);
        store.load().await.unwrap();

        assert!(store.toggle_topic_completion(doc.id(), 1).unwrap());
        assert_eq!(store.progress(doc.id()).unwrap().percentage, 33);
        assert!(store.has_unsaved_changes(doc.id()));

        let stored = normalize_document(&repo.stored(doc.id()).unwrap()).unwrap();
        assert!(!stored.topics()[1].is_completed());

        store.save(doc.id()).await.unwrap();
        assert!(!store.has_unsaved_changes(doc.id()));
        let stored = normalize_document(&repo.stored(doc.id()).unwrap()).unwrap();
        assert!(stored.topics()[1].is_completed());
        assert!(!stored.topics()[0].is_completed());
    }

    #[tokio::test]
    async fn toggle_rejects_unknown_targets() {
        let repo = InMemoryBackend::new();
        repo.seed_document(&build_document("a", 1));
        let mut store = store_for(&repo);
        store.load().await.unwrap();

        let err = store
            .toggle_topic_completion(&DocumentId::new("zzz"), 0)
            .unwrap_err();
        assert!(matches!(err, DocumentStoreError::UnknownDocument(_)));

        let err = store
            .toggle_topic_completion(&DocumentId::new("a"), 9)
            .unwrap_err();
        assert!(matches!(err, DocumentStoreError::Document(_)));
        assert!(!store.has_unsaved_changes(&DocumentId::new("a")));
    }

    #[tokio::test]
    async fn failed_save_keeps_local_edit() {
        let repo = InMemoryBackend::new();
        let doc = build_document("a", 2);
        repo.seed_document(&doc);
        let mut store = store_for(&repo);
        store.load().await.unwrap();
        store.toggle_topic_completion(doc.id(), 0).unwrap();

        repo.fail_with(BackendError::Status(500));
        let err = store.save(doc.id()).await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::Save(BackendError::Status(500))));
        assert!(store.get(doc.id()).unwrap().topics()[0].is_completed());
        assert!(store.has_unsaved_changes(doc.id()));
    }

    #[tokio::test]
    async fn save_keeps_fields_the_client_does_not_model() {
        let source = json!({
            "_id": "raw-1",
            "userId": "u-42",
            "documentName": "Physics Finals",
            "createdAt": "12/01/2025",
            "jsonFile": {
                "subject": "Physics",
                "overallScore": 78,
                "keyInsights": ["Mechanics dominates"],
                "topics": [
                    { "id": "t-1", "main_topic": "Kinematics", "priority": "high", "completed": false },
                    { "id": "t-2", "main_topic": "Optics", "priority": "low", "completed": false }
                ]
            }
        });
        let repo = InMemoryBackend::new();
        repo.seed_raw(source.clone());
        let id = DocumentId::new("raw-1");
        let mut store = store_for(&repo);
        store.load().await.unwrap();

        store.toggle_topic_completion(&id, 1).unwrap();
        store.save(&id).await.unwrap();

        let mut expected = source;
        if let Some(flag) = expected.pointer_mut("/jsonFile/topics/1/completed") {
            *flag = json!(true);
        }
        assert_eq!(repo.stored(&id).unwrap(), expected);
    }

    #[tokio::test]
    async fn playlist_fetch_keeps_unsaved_toggles() {
        let repo = InMemoryBackend::new();
        let doc = build_document("a", 2);
        repo.seed_document(&doc);
        repo.set_playlists(doc.id().clone(), vec![Playlist::new("https://y/1", "t", "Logic")]);
        let mut store = store_for(&repo);
        store.load().await.unwrap();

        store.toggle_topic_completion(doc.id(), 1).unwrap();
        let updated = store.fetch_playlists(doc.id()).await.unwrap();
        assert_eq!(updated.playlists().len(), 1);
        assert!(updated.topics()[1].is_completed());
        assert!(store.has_unsaved_changes(doc.id()));

        store.save(doc.id()).await.unwrap();
        let stored = normalize_document(&repo.stored(doc.id()).unwrap()).unwrap();
        assert!(stored.topics()[1].is_completed());
        assert_eq!(stored.playlists().len(), 1);
    }

    #[test]
    fn upsert_replaces_by_identity() {
        let repo = InMemoryBackend::new();
        let mut store = store_for(&repo);
        assert!(!store.upsert(build_document("a", 1)));
        assert!(!store.upsert(build_document("b", 1)));
        assert!(store.upsert(build_document("a", 4)));

        assert_eq!(store.documents().len(), 2);
        assert_eq!(store.documents()[0].id().as_str(), "b");
        assert_eq!(store.get(&DocumentId::new("a")).unwrap().topics().len(), 4);
    }

    #[tokio::test]
    async fn playlists_are_fetched_once() {
        let repo = InMemoryBackend::new();
        let doc = build_document("a", 1);
        repo.seed_document(&doc);
        repo.set_playlists(doc.id().clone(), vec![Playlist::new("https://y/1", "t", "Logic")]);
        let mut store = store_for(&repo);
        store.load().await.unwrap();

        let updated = store.fetch_playlists(doc.id()).await.unwrap();
        assert_eq!(updated.playlists().len(), 1);
        store.fetch_playlists(doc.id()).await.unwrap();
        assert_eq!(repo.playlist_requests(), 1);
    }

    #[tokio::test]
    async fn empty_playlist_answer_is_reported() {
        let repo = InMemoryBackend::new();
        let doc = build_document("a", 1);
        repo.seed_document(&doc);
        let mut store = store_for(&repo);
        store.load().await.unwrap();

        let err = store.fetch_playlists(doc.id()).await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::NoPlaylists));
    }

    #[tokio::test]
    async fn quota_exhaustion_sticks_for_the_session() {
        let repo = InMemoryBackend::new();
        let doc = build_document("a", 1);
        repo.seed_document(&doc);
        repo.exhaust_playlist_quota();
        let mut store = store_for(&repo);
        store.load().await.unwrap();

        let err = store.fetch_playlists(doc.id()).await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::QuotaExceeded));
        assert!(store.quota_exhausted());

        let err = store.fetch_playlists(doc.id()).await.unwrap_err();
        assert!(matches!(err, DocumentStoreError::QuotaExceeded));
        assert_eq!(repo.playlist_requests(), 1);
    }
}
