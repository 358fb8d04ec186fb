//! Shared fixtures for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use lore_core::{GraphScript, LoreResult};
use lore_graph::{GraphCounts, GraphStore, QueryResponder};
use lore_llm::testing::{MockChat, MockEmbedder, MockSource};
use lore_llm::{GraphPipeline, PipelineConfig};
use tower::ServiceExt;

use crate::state::{AppState, ScriptStore};

/// Fixed answer the mock query engine returns.
pub const MOCK_ANSWER: &str = "Entropy relates to annealing through simulated cooling.";

/// Graph store recording every call.
#[derive(Default)]
pub struct MockStore {
    replaces: Mutex<Vec<GraphScript>>,
    applies: Mutex<Vec<GraphScript>>,
}

impl MockStore {
    pub fn replaces(&self) -> Vec<GraphScript> {
        self.replaces.lock().unwrap().clone()
    }

    pub fn applies(&self) -> Vec<GraphScript> {
        self.applies.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphStore for MockStore {
    async fn replace(&self, script: &GraphScript) -> LoreResult<()> {
        self.replaces.lock().unwrap().push(script.clone());
        Ok(())
    }

    async fn apply(&self, script: &GraphScript) -> LoreResult<()> {
        self.applies.lock().unwrap().push(script.clone());
        Ok(())
    }

    async fn counts(&self) -> LoreResult<GraphCounts> {
        Ok(GraphCounts {
            nodes: 5,
            relationships: 4,
        })
    }
}

/// Query responder returning a fixed answer.
pub struct MockResponder;

#[async_trait]
impl QueryResponder for MockResponder {
    async fn answer(&self, _question: &str) -> LoreResult<String> {
        Ok(MOCK_ANSWER.to_string())
    }
}

/// A router wired to mocks, plus handles into those mocks.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MockStore>,
    pub chat: Arc<MockChat>,
    pub scripts: ScriptStore,
}

fn build_app(source: MockSource, chat_responses: Vec<&str>) -> TestApp {
    let chat = Arc::new(MockChat::new(chat_responses));
    let store = Arc::new(MockStore::default());

    let pipeline = Arc::new(GraphPipeline::new(
        Arc::new(source),
        chat.clone(),
        Arc::new(MockEmbedder),
        PipelineConfig::default(),
    ));

    let state = AppState::new(pipeline, store.clone(), Arc::new(MockResponder));
    let scripts = state.scripts.clone();
    let router = crate::create_router(state);

    TestApp {
        router,
        store,
        chat,
        scripts,
    }
}

/// App whose document source returns `document_text` and whose chat
/// model replays `chat_responses` in order.
pub fn test_app(document_text: &str, chat_responses: Vec<&str>) -> TestApp {
    build_app(MockSource::ok(document_text), chat_responses)
}

/// App whose document fetch always fails with a 404.
pub fn failing_fetch_app() -> TestApp {
    build_app(MockSource::failing("HTTP 404 Not Found"), vec!["unused"])
}

/// POST a JSON body and return (status, parsed JSON body or null).
pub async fn post_json(
    router: Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// GET a route and return (status, parsed JSON body or null).
pub async fn get(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}
