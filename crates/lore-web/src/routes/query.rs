//! Natural-language query handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::routes::{error_response, DataResponse};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// POST /query_graph
///
/// Forward the question to the query engine and return its answer
/// text unmodified.
pub async fn query_graph(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<DataResponse>, (StatusCode, String)> {
    let answer = state
        .responder
        .answer(&req.query)
        .await
        .map_err(error_response)?;

    Ok(Json(DataResponse { data: answer }))
}
