use async_trait::async_trait;
use exam_core::model::DocumentId;
use serde_json::Value;
use tracing::debug;

use super::mapping::{json_body, transport_error};
use super::{FETCH_PLAYLISTS, HttpBackend};
use crate::repository::{BackendError, PlaylistRepository};

#[async_trait]
impl PlaylistRepository for HttpBackend {
    async fn fetch_playlists(&self, id: &DocumentId) -> Result<Option<Value>, BackendError> {
        let url = self.endpoint(FETCH_PLAYLISTS, Some(id))?;
        debug!(%url, "fetching playlists");
        let response = self.post(url).send().await.map_err(transport_error)?;
        let body = json_body(response).await?;
        Ok(match body {
            Value::Object(mut map) => map.remove("document").filter(|d| !d.is_null()),
            _ => None,
        })
    }
}
