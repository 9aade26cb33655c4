//! Shared error types for the services crate.

use thiserror::Error;

use backend::{BackendError, HttpInitError};
use exam_core::model::{DocumentError, DocumentId, UploadError};

use crate::config::ConfigError;

/// Errors emitted by `DocumentStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentStoreError {
    #[error("document {0} is not loaded")]
    UnknownDocument(DocumentId),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("failed to load documents: {0}")]
    Load(#[source] BackendError),
    #[error("failed to save document: {0}")]
    Save(#[source] BackendError),
    #[error("daily playlist quota exceeded")]
    QuotaExceeded,
    #[error("no matching playlists were found")]
    NoPlaylists,
    #[error("failed to fetch playlists: {0}")]
    Playlists(#[source] BackendError),
}

/// Errors emitted by the quiz session and quiz workflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,
    #[error("quiz response did not contain any questions")]
    MissingQuiz,
    #[error("quiz already finished")]
    Finished,
    #[error("current question has not been answered")]
    Unanswered,
    #[error("already at the last question")]
    AtLastQuestion,
    #[error("finish is only available on the last question")]
    NotAtLastQuestion,
    #[error("option {option} is out of range ({options} options)")]
    InvalidOption { option: usize, options: usize },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted by `AnalysisService` before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("analysis name is required")]
    MissingName,
    #[error("at least one question paper is required")]
    MissingPapers,
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] HttpInitError),
}
