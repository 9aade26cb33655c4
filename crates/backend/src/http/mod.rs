use std::sync::Arc;
use std::time::Duration;

use exam_core::model::{DocumentId, SessionContext};
use reqwest::{Client, RequestBuilder};
use thiserror::Error;
use url::Url;

use crate::repository::{
    AnalysisRepository, Backend, BackendError, DocumentRepository, PlaylistRepository,
    QuizRepository,
};

mod analysis_repo;
mod document_repo;
mod mapping;
mod playlist_repo;
mod quiz_repo;

pub(crate) const LIST_DOCUMENTS: &str = "files/getdocuments";
pub(crate) const SAVE_DOCUMENT: &str = "files/savedocument";
pub(crate) const FETCH_PLAYLISTS: &str = "files/getyoutube";
pub(crate) const GENERATE_QUIZ: &str = "files/getquiz";
pub(crate) const SUBMIT_ANALYSIS: &str = "files/getgroq";

/// Connection settings for the analysis service.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Backend adapter talking to the analysis service over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    session: SessionContext,
}

impl HttpBackend {
    /// Build an adapter for the given service and session.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the base URL is not an absolute http(s) URL
    /// or the HTTP client cannot be constructed.
    pub fn new(config: &HttpConfig, session: SessionContext) -> Result<Self, HttpInitError> {
        let trimmed = config.base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(&format!("{trimmed}/"))
            .map_err(|_| HttpInitError::InvalidBaseUrl(config.base_url.clone()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpInitError::InvalidBaseUrl(config.base_url.clone()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) fn endpoint(
        &self,
        path: &str,
        document_id: Option<&DocumentId>,
    ) -> Result<Url, BackendError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        if let Some(id) = document_id {
            url.query_pairs_mut().append_pair("documentId", id.as_str());
        }
        Ok(url)
    }

    /// A POST request carrying the bearer token when the session has one.
    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        let request = self.client.post(url);
        match self.session.token() {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }
}

impl Backend {
    /// Build a `Backend` talking to the remote service.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the adapter cannot be constructed.
    pub fn http(config: &HttpConfig, session: SessionContext) -> Result<Self, HttpInitError> {
        let http = HttpBackend::new(config, session)?;
        let documents: Arc<dyn DocumentRepository> = Arc::new(http.clone());
        let playlists: Arc<dyn PlaylistRepository> = Arc::new(http.clone());
        let quizzes: Arc<dyn QuizRepository> = Arc::new(http.clone());
        let analysis: Arc<dyn AnalysisRepository> = Arc::new(http);
        Ok(Self {
            documents,
            playlists,
            quizzes,
            analysis,
        })
    }
}
