//! OpenAI-compatible HTTP client for chat completions and embeddings.
//!
//! Works against api.openai.com or any compatible endpoint (configured
//! via `OPENAI_BASE_URL`). Two model tiers are configured: a summary
//! tier for cheap text work and a script tier for Cypher generation.

use async_trait::async_trait;
use lore_core::config::LlmSettings;
use lore_core::{LoreError, LoreResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which configured model a completion should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Cheaper model for summaries and answer phrasing.
    Summary,
    /// Higher-capability model for Cypher generation and merging.
    Script,
}

/// Chat completion provider.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Run a single system+user prompt and return the assistant text.
    async fn complete(&self, tier: ModelTier, system: &str, prompt: &str) -> LoreResult<String>;
}

/// Embedding provider.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed each input text into a vector.
    async fn embed(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>>;
}

/// Client for an OpenAI-compatible API.
#[derive(Clone)]
pub struct OpenAiClient {
    settings: LlmSettings,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl OpenAiClient {
    /// Create a client from LLM settings.
    pub fn new(mut settings: LlmSettings) -> LoreResult<Self> {
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(settings.stage_timeout)
            .build()
            .map_err(|e| LoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { settings, client })
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Summary => &self.settings.summary_model,
            ModelTier::Script => &self.settings.script_model,
        }
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> LoreResult<R> {
        let response = self
            .client
            .post(format!("{}{}", self.settings.base_url, path))
            .bearer_auth(&self.settings.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LoreError::llm(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoreError::llm(format!("{path} returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| LoreError::llm(format!("failed to parse {path} response: {e}")))
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, tier: ModelTier, system: &str, prompt: &str) -> LoreResult<String> {
        let model = self.model_for(tier);
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
        };

        let response: ChatResponse = self.post_json("/chat/completions", &request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LoreError::llm(format!("{model} returned no content")))?;

        debug!(model, chars = content.len(), "Chat completion");
        Ok(content)
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiClient {
    async fn embed(&self, texts: &[String]) -> LoreResult<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.settings.embed_model,
            input: texts,
        };

        let response: EmbeddingResponse = self.post_json("/embeddings", &request).await?;

        if response.data.len() != texts.len() {
            return Err(LoreError::llm(format!(
                "embedding count mismatch: {} inputs, {} vectors",
                texts.len(),
                response.data.len()
            )));
        }

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}
