//! Liveness and graph statistics handlers.

use axum::{extract::State, http::StatusCode, Json};
use lore_graph::GraphCounts;
use serde::Serialize;

use crate::routes::{error_response, DataResponse};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /graph_stats
pub async fn graph_stats(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<GraphCounts>>, (StatusCode, String)> {
    let counts = state.store.counts().await.map_err(error_response)?;
    Ok(Json(DataResponse { data: counts }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{get, test_app, TestApp};

    #[tokio::test]
    async fn test_health() {
        let TestApp { router, .. } = test_app("unused", vec![]);
        let (status, body) = get(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_graph_stats() {
        let TestApp { router, .. } = test_app("unused", vec![]);
        let (status, body) = get(router, "/graph_stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["nodes"], 5);
        assert_eq!(body["data"]["relationships"], 4);
    }
}
