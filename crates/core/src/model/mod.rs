mod analysis;
mod auth;
mod document;
mod ids;
mod quiz;
mod topic;
pub mod upload;

pub use ids::{DocumentId, ParseIdError};

pub use analysis::AnalysisResult;
pub use auth::{AuthToken, SessionContext, UserProfile};
pub use document::{Document, DocumentError, Playlist};
pub use quiz::{Question, Quiz};
pub use topic::{Difficulty, Priority, Topic};
pub use upload::{UploadError, UploadFile, UploadKind};
