use async_trait::async_trait;
use exam_core::model::DocumentId;
use serde_json::Value;
use tracing::debug;

use super::mapping::{ensure_success, json_body, transport_error};
use super::{HttpBackend, LIST_DOCUMENTS, SAVE_DOCUMENT};
use crate::repository::{documents_from_response, BackendError, DocumentRepository};

#[async_trait]
impl DocumentRepository for HttpBackend {
    async fn list_documents(&self) -> Result<Vec<Value>, BackendError> {
        let url = self.endpoint(LIST_DOCUMENTS, None)?;
        debug!(%url, "listing documents");
        let response = self.post(url).send().await.map_err(transport_error)?;
        documents_from_response(json_body(response).await?)
    }

    async fn save_document(&self, id: &DocumentId, body: &Value) -> Result<(), BackendError> {
        let url = self.endpoint(SAVE_DOCUMENT, None)?;
        debug!(%url, %id, "saving document");
        let response = self
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response)?;
        Ok(())
    }
}
