#![forbid(unsafe_code)]

pub mod analysis;
pub mod app_services;
pub mod config;
pub mod document_store;
pub mod error;
pub mod notice;
pub mod quiz;
pub mod upload;

pub use exam_core::Clock;

pub use analysis::{Analysis, AnalysisOrigin, AnalysisRequest, AnalysisService};
pub use app_services::AppServices;
pub use config::{ClientConfig, ConfigError};
pub use document_store::DocumentStore;
pub use error::{AnalysisError, AppServicesError, DocumentStoreError, QuizError};
pub use notice::{Notice, NoticeLevel};
pub use quiz::{QuizOutcome, QuizProgress, QuizService, QuizSession, QuizState};
pub use upload::{AddFilesOutcome, UploadSelection};
