#![forbid(unsafe_code)]

pub mod http;
pub mod repository;

pub use http::{HttpBackend, HttpConfig, HttpInitError};
pub use repository::{
    AnalysisRepository, AnalysisUpload, Backend, BackendError, DocumentRepository,
    InMemoryBackend, PlaylistRepository, QuizRepository,
};
