//! Graph creation and update handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use crate::routes::{error_response, DataResponse};
use crate::state::{AppState, DEFAULT_GRAPH_ID};

/// Body for link- and concept-based graph construction.
#[derive(Deserialize)]
pub struct ConceptRequest {
    pub concept: String,
    #[serde(default)]
    pub graph_id: Option<String>,
}

impl ConceptRequest {
    fn graph_id(&self) -> &str {
        self.graph_id.as_deref().unwrap_or(DEFAULT_GRAPH_ID)
    }
}

/// Body for incremental graph updates.
#[derive(Deserialize)]
pub struct UpdateRequest {
    pub update: String,
    #[serde(default)]
    pub graph_id: Option<String>,
}

/// POST /create_graph_from_link
///
/// Summarize the linked document into a graph script, replace the
/// store with it, and remember it as the graph's current script.
pub async fn create_from_link(
    State(state): State<AppState>,
    Json(req): Json<ConceptRequest>,
) -> Result<Json<DataResponse>, (StatusCode, String)> {
    let script = state
        .pipeline
        .script_from_link(&req.concept)
        .await
        .map_err(error_response)?;

    state.store.replace(&script).await.map_err(error_response)?;
    state.scripts.set_current(req.graph_id(), script).await;

    info!(graph_id = req.graph_id(), "Created graph from link");
    Ok(Json(DataResponse::ack("Graph created from link.")))
}

/// POST /update_graph_from_link
///
/// Merge the linked document's graph with the stored script and replace
/// the store with the merged graph. The merge output is a complete
/// graph, so this is a replace, not an incremental apply. With no
/// stored script the request behaves like create.
pub async fn update_from_link(
    State(state): State<AppState>,
    Json(req): Json<ConceptRequest>,
) -> Result<Json<DataResponse>, (StatusCode, String)> {
    let graph_id = req.graph_id();

    let merged = match state.scripts.current(graph_id).await {
        Some(existing) => state
            .pipeline
            .merged_script_from_link(&req.concept, &existing)
            .await
            .map_err(error_response)?,
        None => state
            .pipeline
            .script_from_link(&req.concept)
            .await
            .map_err(error_response)?,
    };

    state.store.replace(&merged).await.map_err(error_response)?;
    state.scripts.set_current(graph_id, merged.clone()).await;
    state.scripts.set_last_update(graph_id, merged).await;

    info!(graph_id, "Updated graph from link");
    Ok(Json(DataResponse::ack("Graph updated from link.")))
}

/// POST /create_graph
///
/// Build a graph script directly from a text concept.
pub async fn create_from_concept(
    State(state): State<AppState>,
    Json(req): Json<ConceptRequest>,
) -> Result<Json<DataResponse>, (StatusCode, String)> {
    let script = state
        .pipeline
        .script_from_concept(&req.concept)
        .await
        .map_err(error_response)?;

    state.store.replace(&script).await.map_err(error_response)?;
    state.scripts.set_current(req.graph_id(), script).await;

    info!(graph_id = req.graph_id(), "Created graph from concept");
    Ok(Json(DataResponse::ack("Graph created.")))
}

/// POST /update_graph
///
/// Generate a targeted update script from an update sentence and apply
/// it incrementally, without clearing the store.
pub async fn apply_update(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<DataResponse>, (StatusCode, String)> {
    let graph_id = req.graph_id.as_deref().unwrap_or(DEFAULT_GRAPH_ID);

    let existing = state.scripts.current(graph_id).await.ok_or((
        StatusCode::NOT_FOUND,
        format!("no graph to update for id '{graph_id}'"),
    ))?;

    let update = state
        .pipeline
        .update_script(&existing, &req.update)
        .await
        .map_err(error_response)?;

    state.store.apply(&update).await.map_err(error_response)?;
    state.scripts.set_last_update(graph_id, update).await;

    info!(graph_id, "Applied graph update");
    Ok(Json(DataResponse::ack("Graph updated.")))
}
