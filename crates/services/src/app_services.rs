use std::sync::Arc;

use backend::{Backend, InMemoryBackend};
use exam_core::model::SessionContext;

use crate::Clock;
use crate::analysis::AnalysisService;
use crate::config::ClientConfig;
use crate::document_store::DocumentStore;
use crate::error::AppServicesError;
use crate::quiz::QuizService;

/// Assembles app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    backend: Backend,
    session: SessionContext,
    quiz_service: Arc<QuizService>,
    analysis_service: Arc<AnalysisService>,
}

impl AppServices {
    /// Build services talking to the remote API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let session = config.session();
        let backend = Backend::http(&config.http(), session.clone())?;
        Ok(Self::assemble(backend, session, clock))
    }

    /// Build services over the in-memory backend, for tests and offline runs.
    #[must_use]
    pub fn in_memory(repo: &InMemoryBackend, clock: Clock) -> Self {
        Self::assemble(Backend::in_memory(repo), SessionContext::anonymous(), clock)
    }

    fn assemble(backend: Backend, session: SessionContext, clock: Clock) -> Self {
        let quiz_service = Arc::new(QuizService::new(Arc::clone(&backend.quizzes)));
        let analysis_service = Arc::new(AnalysisService::new(
            Arc::clone(&backend.analysis),
            clock,
        ));
        Self {
            backend,
            session,
            quiz_service,
            analysis_service,
        }
    }

    /// Fresh, empty document store; call `load` to populate it.
    #[must_use]
    pub fn document_store(&self) -> DocumentStore {
        DocumentStore::new(
            Arc::clone(&self.backend.documents),
            Arc::clone(&self.backend.playlists),
        )
    }

    #[must_use]
    pub fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz_service)
    }

    #[must_use]
    pub fn analysis_service(&self) -> Arc<AnalysisService> {
        Arc::clone(&self.analysis_service)
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}
