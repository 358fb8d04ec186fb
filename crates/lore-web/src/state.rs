//! Application state.
//!
//! Graph scripts live in a keyed in-memory store behind an RwLock, so
//! concurrent create/update requests on the same graph cannot tear each
//! other's writes. Scripts are not persisted; a restart forgets them.

use std::collections::HashMap;
use std::sync::Arc;

use lore_core::GraphScript;
use lore_graph::{GraphStore, QueryResponder};
use lore_llm::GraphPipeline;
use tokio::sync::RwLock;

/// Graph id used when a request names none.
pub const DEFAULT_GRAPH_ID: &str = "default";

/// Scripts tracked for one graph id.
#[derive(Debug, Clone, Default)]
pub struct ScriptSlot {
    /// The script that produced the graph currently in the store.
    pub current: Option<GraphScript>,
    /// The most recent update or merge script.
    pub last_update: Option<GraphScript>,
}

/// Keyed in-memory script store.
#[derive(Clone, Default)]
pub struct ScriptStore {
    slots: Arc<RwLock<HashMap<String, ScriptSlot>>>,
}

impl ScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current script for a graph, if one was stored.
    pub async fn current(&self, graph_id: &str) -> Option<GraphScript> {
        self.slots
            .read()
            .await
            .get(graph_id)
            .and_then(|slot| slot.current.clone())
    }

    /// The last update script for a graph, if any.
    pub async fn last_update(&self, graph_id: &str) -> Option<GraphScript> {
        self.slots
            .read()
            .await
            .get(graph_id)
            .and_then(|slot| slot.last_update.clone())
    }

    /// Record the script now materialized in the store.
    pub async fn set_current(&self, graph_id: &str, script: GraphScript) {
        self.slots
            .write()
            .await
            .entry(graph_id.to_string())
            .or_default()
            .current = Some(script);
    }

    /// Record the most recent update script.
    pub async fn set_last_update(&self, graph_id: &str, script: GraphScript) {
        self.slots
            .write()
            .await
            .entry(graph_id.to_string())
            .or_default()
            .last_update = Some(script);
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<GraphPipeline>,
    pub store: Arc<dyn GraphStore>,
    pub responder: Arc<dyn QueryResponder>,
    pub scripts: ScriptStore,
}

impl AppState {
    pub fn new(
        pipeline: Arc<GraphPipeline>,
        store: Arc<dyn GraphStore>,
        responder: Arc<dyn QueryResponder>,
    ) -> Self {
        Self {
            pipeline,
            store,
            responder,
            scripts: ScriptStore::new(),
        }
    }
}
