//! Route handlers.

pub mod graph;
pub mod query;
pub mod status;

use axum::http::StatusCode;
use lore_core::LoreError;
use serde::Serialize;

/// The uniform `{"data": ...}` response body.
#[derive(Serialize)]
pub struct DataResponse<T: Serialize = String> {
    pub data: T,
}

impl DataResponse {
    pub fn ack(message: &str) -> Self {
        Self {
            data: message.to_string(),
        }
    }
}

/// Map pipeline/store failures onto HTTP statuses.
pub(crate) fn error_response(err: LoreError) -> (StatusCode, String) {
    let status = match &err {
        LoreError::Fetch(_) | LoreError::Llm(_) | LoreError::InvalidScript(_) => {
            StatusCode::BAD_GATEWAY
        }
        LoreError::StageTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(%err, status = %status, "Request failed");
    (status, err.to_string())
}
