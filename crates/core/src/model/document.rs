use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::DocumentId;
use crate::model::topic::Topic;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("topic index {index} is out of range (document has {len} topics)")]
    TopicOutOfRange { index: usize, len: usize },
}

//
// ─── PLAYLIST ──────────────────────────────────────────────────────────────────
//

/// A curated video playlist attached to a document by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub link: String,
    pub thumbnail: String,
    pub playlist_name: String,
}

impl Playlist {
    #[must_use]
    pub fn new(
        link: impl Into<String>,
        thumbnail: impl Into<String>,
        playlist_name: impl Into<String>,
    ) -> Self {
        Self {
            link: link.into(),
            thumbnail: thumbnail.into(),
            playlist_name: playlist_name.into(),
        }
    }
}

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// One analysed upload: a subject and its topic breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    document_name: String,
    created_at: Option<DateTime<Utc>>,
    subject: String,
    topics: Vec<Topic>,
    playlists: Vec<Playlist>,
}

impl Document {
    #[must_use]
    pub fn new(
        id: DocumentId,
        document_name: impl Into<String>,
        subject: impl Into<String>,
        topics: Vec<Topic>,
    ) -> Self {
        Self {
            id,
            document_name: document_name.into(),
            created_at: None,
            subject: subject.into(),
            topics,
            playlists: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Attach the final playlist set. Playlists are never merged incrementally.
    #[must_use]
    pub fn with_playlists(mut self, playlists: Vec<Playlist>) -> Self {
        self.playlists = playlists;
        self
    }

    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    #[must_use]
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    #[must_use]
    pub fn has_playlists(&self) -> bool {
        !self.playlists.is_empty()
    }

    /// Flip the completion flag of exactly one topic.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::TopicOutOfRange` if `index` does not address a topic.
    pub fn toggle_topic(&mut self, index: usize) -> Result<bool, DocumentError> {
        let len = self.topics.len();
        let topic = self
            .topics
            .get_mut(index)
            .ok_or(DocumentError::TopicOutOfRange { index, len })?;
        Ok(topic.toggle_completed())
    }

    /// Copy completion flags from `other`, matching topics by index.
    ///
    /// Topics past the end of either list are left as they are.
    pub fn copy_completion_from(&mut self, other: &Document) {
        for (topic, source) in self.topics.iter_mut().zip(&other.topics) {
            topic.set_completed(source.is_completed());
        }
    }
}
