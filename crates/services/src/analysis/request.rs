use exam_core::model::upload::MAX_FILES_PER_KIND;
use exam_core::model::{UploadError, UploadFile, UploadKind};

use crate::error::AnalysisError;

/// Name and files for one analysis submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub name: String,
    pub papers: Vec<UploadFile>,
    pub syllabus: Vec<UploadFile>,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(name: impl Into<String>, papers: Vec<UploadFile>) -> Self {
        Self {
            name: name.into(),
            papers,
            syllabus: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_syllabus(mut self, syllabus: Vec<UploadFile>) -> Self {
        self.syllabus = syllabus;
        self
    }

    /// Check the request locally before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `MissingName` for a blank name, `MissingPapers` without
    /// question papers, and `Upload` for a file count over the limit or an
    /// unsupported file type.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.name.trim().is_empty() {
            return Err(AnalysisError::MissingName);
        }
        if self.papers.is_empty() {
            return Err(AnalysisError::MissingPapers);
        }
        for (kind, files) in [
            (UploadKind::Papers, &self.papers),
            (UploadKind::Syllabus, &self.syllabus),
        ] {
            if files.len() > MAX_FILES_PER_KIND {
                return Err(UploadError::LimitExceeded {
                    kind,
                    current: 0,
                    adding: files.len(),
                }
                .into());
            }
            for file in files {
                file.validate_type()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> UploadFile {
        UploadFile::guessing_mime(name, vec![0x25, 0x50, 0x44, 0x46])
    }

    #[test]
    fn blank_name_is_checked_first() {
        let err = AnalysisRequest::new("  ", Vec::new()).validate().unwrap_err();
        assert_eq!(err, AnalysisError::MissingName);
    }

    #[test]
    fn papers_are_required() {
        let request = AnalysisRequest::new("Physics", Vec::new()).with_syllabus(vec![pdf("s.pdf")]);
        assert_eq!(request.validate().unwrap_err(), AnalysisError::MissingPapers);
    }

    #[test]
    fn unsupported_files_are_rejected() {
        let request = AnalysisRequest::new("Physics", vec![pdf("p.pdf")])
            .with_syllabus(vec![UploadFile::guessing_mime("notes.txt", Vec::new())]);
        assert!(matches!(
            request.validate().unwrap_err(),
            AnalysisError::Upload(UploadError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn more_than_ten_papers_is_rejected() {
        let papers = (0..11).map(|i| pdf(&format!("p{i}.pdf"))).collect();
        let err = AnalysisRequest::new("Physics", papers).validate().unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Upload(UploadError::LimitExceeded { adding: 11, .. })
        ));
    }

    #[test]
    fn valid_request_passes() {
        let request = AnalysisRequest::new("Physics", vec![pdf("p.pdf")])
            .with_syllabus(vec![UploadFile::guessing_mime("s.docx", Vec::new())]);
        assert!(request.validate().is_ok());
    }
}
