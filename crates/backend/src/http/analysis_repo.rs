use async_trait::async_trait;
use exam_core::model::{UploadFile, UploadKind};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use super::mapping::{json_body, transport_error};
use super::{HttpBackend, SUBMIT_ANALYSIS};
use crate::repository::{AnalysisRepository, AnalysisUpload, BackendError};

fn file_part(file: &UploadFile) -> Result<Part, BackendError> {
    Part::bytes(file.bytes().to_vec())
        .file_name(file.file_name().to_string())
        .mime_str(file.mime())
        .map_err(|e| BackendError::Malformed(e.to_string()))
}

fn build_form(upload: &AnalysisUpload) -> Result<Form, BackendError> {
    let mut form = Form::new().text("documentName", upload.name.clone());
    for file in &upload.papers {
        form = form.part(UploadKind::Papers.field_name(), file_part(file)?);
    }
    for file in &upload.syllabus {
        form = form.part(UploadKind::Syllabus.field_name(), file_part(file)?);
    }
    Ok(form)
}

#[async_trait]
impl AnalysisRepository for HttpBackend {
    async fn submit_analysis(&self, upload: &AnalysisUpload) -> Result<Value, BackendError> {
        let url = self.endpoint(SUBMIT_ANALYSIS, None)?;
        debug!(
            %url,
            papers = upload.papers.len(),
            syllabus = upload.syllabus.len(),
            "submitting analysis"
        );
        let form = build_form(upload)?;
        let response = self
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        json_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mime_is_reported_before_sending() {
        let file = UploadFile::new("x.pdf", "not a mime", vec![1]);
        assert!(matches!(file_part(&file), Err(BackendError::Malformed(_))));
    }

    #[test]
    fn form_accepts_papers_and_syllabus() {
        let upload = AnalysisUpload {
            name: "Finals".into(),
            papers: vec![UploadFile::guessing_mime("p1.pdf", vec![1, 2])],
            syllabus: vec![UploadFile::guessing_mime("s.png", vec![3])],
        };
        assert!(build_form(&upload).is_ok());
    }
}
