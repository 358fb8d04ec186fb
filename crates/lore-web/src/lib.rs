//! Lore Web Server
//!
//! Axum HTTP facade over the graph pipelines, the graph store, and the
//! query engine.

pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/create_graph_from_link", post(routes::graph::create_from_link))
        .route("/update_graph_from_link", post(routes::graph::update_from_link))
        .route("/create_graph", post(routes::graph::create_from_concept))
        .route("/update_graph", post(routes::graph::apply_update))
        .route("/query_graph", post(routes::query::query_graph))
        .route("/graph_stats", get(routes::status::graph_stats))
        .route("/health", get(routes::status::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!("Web server listening on http://{host}:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
