//! Mock clients for pipeline and handler tests.
//!
//! Available to downstream crates via the `testing` feature.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lore_core::{LoreError, LoreResult};

use crate::fetch::DocumentSource;
use crate::openai::{ChatClient, EmbeddingClient, ModelTier};

/// Chat client that replays scripted responses and records every call.
pub struct MockChat {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(ModelTier, String, String)>>,
    delay: Option<Duration>,
}

impl MockChat {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Delay every completion, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All calls made so far: (tier, system, prompt).
    pub fn calls(&self) -> Vec<(ModelTier, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for MockChat {
    async fn complete(&self, tier: ModelTier, system: &str, prompt: &str) -> LoreResult<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls
            .lock()
            .unwrap()
            .push((tier, system.to_string(), prompt.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LoreError::llm("mock chat ran out of responses"))
    }
}

/// Document source returning a fixed text or a fixed failure.
pub struct MockSource {
    result: Result<String, String>,
    fetches: Mutex<usize>,
}

impl MockSource {
    pub fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            fetches: Mutex::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            fetches: Mutex::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl DocumentSource for MockSource {
    async fn fetch_text(&self, _url: &str) -> LoreResult<String> {
        *self.fetches.lock().unwrap() += 1;
        match &self.result {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(LoreError::Fetch(message.clone())),
        }
    }
}

/// Deterministic embedder: a cheap byte-sum hash per text.
pub struct MockEmbedder;

#[async_trait]
impl EmbeddingClient for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = [0.0f32; 4];
                for (i, byte) in text.bytes().enumerate() {
                    vector[i % 4] += f32::from(byte) / 255.0;
                }
                vector.to_vec()
            })
            .collect())
    }
}
