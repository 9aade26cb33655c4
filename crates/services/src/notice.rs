//! User-facing notifications.
//!
//! Every failure a service reports ends up here instead of escaping to the
//! caller as an unhandled fault.

use std::fmt;

use backend::BackendError;
use exam_core::model::{UploadError, UploadKind};
use serde::Serialize;

use crate::error::{AnalysisError, DocumentStoreError, QuizError};

const UNEXPECTED: &str = "There was an unexpected error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, message)
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    #[must_use]
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
            NoticeLevel::Info => "info",
        };
        write!(f, "[{tag}] {}: {}", self.title, self.message)
    }
}

fn network_or(err: &BackendError, title: &str, message: &str) -> Notice {
    match err {
        BackendError::Connection(_) => {
            Notice::error("Network Error", format!("Check your connection. {UNEXPECTED}"))
        }
        BackendError::Unauthorized => {
            Notice::error("Session Expired", "Please sign in again.")
        }
        _ => Notice::error(title, format!("{message} {UNEXPECTED}")),
    }
}

impl From<&DocumentStoreError> for Notice {
    fn from(err: &DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::UnknownDocument(id) => {
                Notice::error("Error", format!("Document {id} is not loaded."))
            }
            DocumentStoreError::Document(inner) => Notice::error("Error", inner.to_string()),
            DocumentStoreError::Load(inner) => {
                network_or(inner, "Error", "Failed to load documents.")
            }
            DocumentStoreError::Save(inner) => {
                network_or(inner, "Error", "Failed to save progress.")
            }
            DocumentStoreError::QuotaExceeded => {
                Notice::error("Quota Exceeded", "Daily YouTube usage limit reached.")
            }
            DocumentStoreError::NoPlaylists => Notice::error(
                "No Resources",
                format!("Could not find matching study playlists. {UNEXPECTED}"),
            ),
            DocumentStoreError::Playlists(inner) => {
                network_or(inner, "Error", "Failed to fetch study playlists.")
            }
        }
    }
}

impl From<&QuizError> for Notice {
    fn from(err: &QuizError) -> Self {
        match err {
            QuizError::Empty | QuizError::MissingQuiz => {
                Notice::error("Error", format!("Could not generate questions. {UNEXPECTED}"))
            }
            QuizError::Backend(inner) => network_or(inner, "Error", "Quiz generation failed."),
            QuizError::Unanswered => Notice::info("Pick an Answer", "Select an option to continue."),
            other => Notice::error("Quiz", other.to_string()),
        }
    }
}

impl From<&AnalysisError> for Notice {
    fn from(err: &AnalysisError) -> Self {
        match err {
            AnalysisError::MissingName => {
                Notice::error("Missing Name", "Please give your analysis a name.")
            }
            AnalysisError::MissingPapers => {
                Notice::error("Missing Papers", "Please upload at least one question paper.")
            }
            AnalysisError::Upload(inner) => Notice::from(inner),
        }
    }
}

impl From<&UploadError> for Notice {
    fn from(err: &UploadError) -> Self {
        match err {
            UploadError::UnsupportedType { .. } => Notice::error(
                "Invalid File Type",
                "Please upload JPG, PNG, PDF (Unscanned), or DOCX only.",
            ),
            UploadError::LimitExceeded { .. } => {
                Notice::error("Limit Exceeded", "You can only upload a maximum of 10 files.")
            }
            other => Notice::error("Error", other.to_string()),
        }
    }
}

/// Confirmation after files were added to a slot.
#[must_use]
pub fn files_added(kind: UploadKind, count: usize) -> Notice {
    match kind {
        UploadKind::Papers => {
            Notice::success("Files Added", format!("{count} Question Paper(s) added."))
        }
        UploadKind::Syllabus => {
            Notice::success("Syllabus Added", format!("{count} Syllabus document(s) added."))
        }
    }
}

#[must_use]
pub fn progress_saved() -> Notice {
    Notice::success("Progress Saved", "Your learning milestone has been recorded.")
}

#[must_use]
pub fn resources_loaded() -> Notice {
    Notice::success("Resources Loaded", "Curated playlists are now available below.")
}
