use std::sync::Arc;

use backend::{AnalysisRepository, AnalysisUpload};
use chrono::{DateTime, Utc};
use exam_core::Clock;
use exam_core::model::AnalysisResult;
use exam_core::normalize::normalize_analysis;
use tracing::{info, warn};

use super::demo::demo_analysis;
use super::request::AnalysisRequest;
use crate::error::AnalysisError;
use crate::notice::Notice;

/// Where an analysis result came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOrigin {
    Remote,
    /// The remote analysis failed; the result is the fixed demo dataset.
    Demo { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub origin: AnalysisOrigin,
    pub analyzed_at: DateTime<Utc>,
}

impl Analysis {
    #[must_use]
    pub fn is_demo(&self) -> bool {
        matches!(self.origin, AnalysisOrigin::Demo { .. })
    }

    /// Notification to show alongside the result.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match &self.origin {
            AnalysisOrigin::Remote => Notice::success("Analysis Complete", "Your study roadmap is ready!"),
            AnalysisOrigin::Demo { .. } => Notice::error(
                "Analysis Failed",
                "There was an unexpected error. Using demo data as fallback.",
            ),
        }
    }
}

/// Submits papers for analysis, falling back to demo data when the remote side fails.
#[derive(Clone)]
pub struct AnalysisService {
    repository: Arc<dyn AnalysisRepository>,
    clock: Clock,
}

impl AnalysisService {
    #[must_use]
    pub fn new(repository: Arc<dyn AnalysisRepository>, clock: Clock) -> Self {
        Self { repository, clock }
    }

    /// Validate and submit `request`.
    ///
    /// Any remote failure yields `Ok` with `AnalysisOrigin::Demo`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` only for local validation failures; nothing is
    /// sent in that case.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<Analysis, AnalysisError> {
        request.validate()?;
        let name = request.name.trim().to_string();
        let upload = AnalysisUpload {
            name: name.clone(),
            papers: request.papers,
            syllabus: request.syllabus,
        };

        info!(
            name = %name,
            papers = upload.papers.len(),
            syllabus = upload.syllabus.len(),
            "submitting analysis"
        );
        let (result, origin) = match self.repository.submit_analysis(&upload).await {
            Ok(raw) => (normalize_analysis(&raw, &name), AnalysisOrigin::Remote),
            Err(err) => {
                warn!(name = %name, error = %err, "analysis failed; using demo data");
                (
                    demo_analysis(&name),
                    AnalysisOrigin::Demo {
                        reason: err.to_string(),
                    },
                )
            }
        };

        Ok(Analysis {
            result,
            origin,
            analyzed_at: self.clock.now(),
        })
    }
}
