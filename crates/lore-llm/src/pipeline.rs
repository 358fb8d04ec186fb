//! Staged LLM pipelines: summarize, convert, merge.
//!
//! Each stage is a typed step (document text -> summary -> script ->
//! merged script) and runs under its own timeout, so a hung upstream
//! service fails the request instead of hanging it.

use std::future::Future;
use std::sync::Arc;

use lore_core::{GraphScript, LoreError, LoreResult};
use tracing::{debug, info};

use crate::fetch::DocumentSource;
use crate::index::{chunk_text, VectorIndex};
use crate::openai::{ChatClient, EmbeddingClient, ModelTier};
use crate::prompts;

/// Tuning knobs for the pipelines.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Timeout applied to each stage individually.
    pub stage_timeout: std::time::Duration,
    /// Maximum characters per document chunk.
    pub chunk_chars: usize,
    /// Number of chunks retrieved from the per-request index.
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout: std::time::Duration::from_secs(120),
            chunk_chars: 1500,
            top_k: 6,
        }
    }
}

/// The summarize/convert/merge pipelines over a document source and an
/// LLM provider.
pub struct GraphPipeline {
    source: Arc<dyn DocumentSource>,
    chat: Arc<dyn ChatClient>,
    embedder: Arc<dyn EmbeddingClient>,
    config: PipelineConfig,
}

impl GraphPipeline {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        chat: Arc<dyn ChatClient>,
        embedder: Arc<dyn EmbeddingClient>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            chat,
            embedder,
            config,
        }
    }

    /// Two-stage chain: summarize the linked document, then convert the
    /// summary into a graph-construction script.
    pub async fn script_from_link(&self, url: &str) -> LoreResult<GraphScript> {
        let text = self.stage("fetch", self.source.fetch_text(url)).await?;
        let summary = self.stage("summarize", self.summarize(&text)).await?;
        let script = self.stage("convert", self.convert(&summary)).await?;
        info!(url, statements = script.statements().len(), "Built graph script");
        Ok(script)
    }

    /// Three-stage chain: summarize and convert the linked document,
    /// then merge the fresh script with `existing` into one graph.
    pub async fn merged_script_from_link(
        &self,
        url: &str,
        existing: &GraphScript,
    ) -> LoreResult<GraphScript> {
        let text = self.stage("fetch", self.source.fetch_text(url)).await?;
        let summary = self.stage("summarize", self.summarize(&text)).await?;
        let fresh = self.stage("convert", self.convert(&summary)).await?;
        let merged = self.stage("merge", self.merge(&fresh, existing)).await?;
        info!(
            url,
            statements = merged.statements().len(),
            "Built merged graph script"
        );
        Ok(merged)
    }

    /// Build a graph script directly from a text concept, no document.
    pub async fn script_from_concept(&self, concept: &str) -> LoreResult<GraphScript> {
        let script = self
            .stage("convert", async {
                let raw = self
                    .chat
                    .complete(
                        ModelTier::Script,
                        prompts::SCRIPT_SYSTEM,
                        &prompts::concept_prompt(concept),
                    )
                    .await?;
                GraphScript::parse(&raw)
            })
            .await?;
        info!(statements = script.statements().len(), "Built graph script from concept");
        Ok(script)
    }

    /// Generate a targeted update script for an existing graph from a
    /// natural-language update sentence.
    pub async fn update_script(
        &self,
        existing: &GraphScript,
        update: &str,
    ) -> LoreResult<GraphScript> {
        self.stage("update", async {
            let raw = self
                .chat
                .complete(
                    ModelTier::Script,
                    prompts::SCRIPT_SYSTEM,
                    &prompts::update_prompt(existing.as_str(), update),
                )
                .await?;
            GraphScript::parse(&raw)
        })
        .await
    }

    /// Stage 1: retrieve the most relevant chunks and summarize them.
    async fn summarize(&self, text: &str) -> LoreResult<String> {
        let chunks = chunk_text(text, self.config.chunk_chars);
        if chunks.is_empty() {
            return Err(LoreError::Fetch("document contains no text".to_string()));
        }

        let context = if chunks.len() <= self.config.top_k {
            chunks.join("\n\n")
        } else {
            let index = VectorIndex::build(self.embedder.as_ref(), chunks).await?;
            index
                .top_k(
                    self.embedder.as_ref(),
                    prompts::MAIN_IDEAS_QUERY,
                    self.config.top_k,
                )
                .await?
                .join("\n\n")
        };

        debug!(chars = context.len(), "Selected summarization context");

        self.chat
            .complete(
                ModelTier::Summary,
                prompts::SUMMARY_SYSTEM,
                &prompts::summary_prompt(&context),
            )
            .await
    }

    /// Stage 2: convert a summary into a validated graph script.
    async fn convert(&self, summary: &str) -> LoreResult<GraphScript> {
        let raw = self
            .chat
            .complete(
                ModelTier::Script,
                prompts::SCRIPT_SYSTEM,
                &prompts::script_prompt(summary),
            )
            .await?;
        GraphScript::parse(&raw)
    }

    /// Stage 3: merge the fresh script with the existing graph script.
    async fn merge(
        &self,
        fresh: &GraphScript,
        existing: &GraphScript,
    ) -> LoreResult<GraphScript> {
        let raw = self
            .chat
            .complete(
                ModelTier::Script,
                prompts::SCRIPT_SYSTEM,
                &prompts::merge_prompt(fresh.as_str(), existing.as_str()),
            )
            .await?;
        GraphScript::parse(&raw)
    }

    async fn stage<T, F>(&self, name: &str, fut: F) -> LoreResult<T>
    where
        F: Future<Output = LoreResult<T>>,
    {
        match tokio::time::timeout(self.config.stage_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(LoreError::StageTimeout {
                stage: name.to_string(),
                seconds: self.config.stage_timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockChat, MockEmbedder, MockSource};
    use std::time::Duration;

    fn pipeline(source: MockSource, chat: MockChat) -> (GraphPipeline, Arc<MockChat>) {
        let chat = Arc::new(chat);
        let pipeline = GraphPipeline::new(
            Arc::new(source),
            chat.clone(),
            Arc::new(MockEmbedder),
            PipelineConfig::default(),
        );
        (pipeline, chat)
    }

    #[tokio::test]
    async fn test_create_chain_produces_script() {
        let (pipeline, chat) = pipeline(
            MockSource::ok("An academic paper about spin glasses."),
            MockChat::new(vec![
                "- spin glasses\n- annealing",
                "```cypher\nCREATE (a:Concept {name: 'Spin Glass'});\n```",
            ]),
        );

        let script = pipeline.script_from_link("http://example.com/paper.pdf").await.unwrap();
        assert_eq!(script.statements().len(), 1);
        assert!(script.as_str().starts_with("CREATE"));

        let calls = chat.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, ModelTier::Summary);
        assert!(calls[0].2.contains("spin glasses"));
        assert_eq!(calls[1].0, ModelTier::Script);
        assert!(calls[1].2.contains("annealing"));
    }

    #[tokio::test]
    async fn test_update_chain_passes_existing_to_merge() {
        let existing =
            GraphScript::parse("CREATE (x:Concept {name: 'Old Theory'})").unwrap();
        let (pipeline, chat) = pipeline(
            MockSource::ok("A new paper."),
            MockChat::new(vec![
                "- new ideas",
                "CREATE (y:Concept {name: 'New Theory'})",
                "CREATE (x:Concept {name: 'Old Theory'})-[:SUPERSEDED_BY]->(y:Concept {name: 'New Theory'})",
            ]),
        );

        let merged = pipeline
            .merged_script_from_link("http://example.com/new.pdf", &existing)
            .await
            .unwrap();
        assert!(merged.as_str().contains("SUPERSEDED_BY"));

        let calls = chat.calls();
        assert_eq!(calls.len(), 3);
        let merge_prompt = &calls[2].2;
        assert!(merge_prompt.contains("Graph 1: CREATE (y:Concept {name: 'New Theory'})"));
        assert!(merge_prompt.contains("Graph 2: CREATE (x:Concept {name: 'Old Theory'})"));
    }

    #[tokio::test]
    async fn test_fetch_failure_short_circuits() {
        let (pipeline, chat) = pipeline(
            MockSource::failing("HTTP 404 Not Found"),
            MockChat::new(vec!["unused"]),
        );

        let err = pipeline.script_from_link("http://example.com/missing").await.unwrap_err();
        assert!(matches!(err, LoreError::Fetch(_)));
        assert!(chat.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_model_output_rejected() {
        let (pipeline, _) = pipeline(
            MockSource::ok("A paper."),
            MockChat::new(vec!["- ideas", "Sure! Here is your graph."]),
        );

        let err = pipeline.script_from_link("http://example.com/p.pdf").await.unwrap_err();
        assert!(matches!(err, LoreError::InvalidScript(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stage_timeout() {
        let chat = Arc::new(
            MockChat::new(vec!["- ideas"]).with_delay(Duration::from_secs(10)),
        );
        let pipeline = GraphPipeline::new(
            Arc::new(MockSource::ok("A paper.")),
            chat,
            Arc::new(MockEmbedder),
            PipelineConfig {
                stage_timeout: Duration::from_secs(1),
                ..PipelineConfig::default()
            },
        );

        let err = pipeline.script_from_link("http://example.com/p.pdf").await.unwrap_err();
        match err {
            LoreError::StageTimeout { stage, seconds } => {
                assert_eq!(stage, "summarize");
                assert_eq!(seconds, 1);
            }
            other => panic!("expected StageTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concept_script() {
        let (pipeline, chat) = pipeline(
            MockSource::ok("unused"),
            MockChat::new(vec!["CREATE (n:Concept {name: 'Dark Matter'})"]),
        );

        let script = pipeline.script_from_concept("dark matter").await.unwrap();
        assert_eq!(script.statements().len(), 1);

        let calls = chat.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, ModelTier::Script);
        assert!(calls[0].2.contains("dark matter"));
    }

    #[tokio::test]
    async fn test_update_script_includes_existing_graph() {
        let existing = GraphScript::parse("CREATE (n:Concept {name: 'Entropy'})").unwrap();
        let (pipeline, chat) = pipeline(
            MockSource::ok("unused"),
            MockChat::new(vec![
                "MATCH (n:Concept {name: 'Entropy'}) SET n.name = 'Thermodynamic Entropy'",
            ]),
        );

        let script = pipeline
            .update_script(&existing, "rename entropy to thermodynamic entropy")
            .await
            .unwrap();
        assert!(script.as_str().starts_with("MATCH"));

        let calls = chat.calls();
        assert!(calls[0].2.contains("CREATE (n:Concept {name: 'Entropy'})"));
        assert!(calls[0].2.contains("rename entropy"));
    }
}
