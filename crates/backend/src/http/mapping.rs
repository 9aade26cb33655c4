use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::repository::BackendError;

pub(crate) fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_decode() {
        BackendError::Malformed(err.to_string())
    } else {
        BackendError::Connection(err.to_string())
    }
}

pub(crate) fn status_error(status: StatusCode) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
        StatusCode::NOT_FOUND => BackendError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => BackendError::QuotaExceeded,
        other => BackendError::Status(other.as_u16()),
    }
}

/// Fail on non-success status, otherwise hand the response back.
pub(crate) fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(status_error(status))
    }
}

/// Decode a successful response body as loosely typed JSON.
pub(crate) async fn json_body(response: Response) -> Result<Value, BackendError> {
    let response = ensure_success(response)?;
    response.json::<Value>().await.map_err(transport_error)
}
