//! # Lore LLM
//!
//! Document fetching and the LLM pipelines that turn documents into
//! Cypher graph scripts: an OpenAI-compatible chat/embedding client,
//! a per-request in-memory vector index for summarization context,
//! and the staged summarize/convert/merge pipelines.

pub mod fetch;
pub mod index;
pub mod openai;
pub mod pipeline;
pub mod prompts;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use fetch::{DocumentSource, HttpDocumentSource};
pub use index::{chunk_text, VectorIndex};
pub use openai::{ChatClient, EmbeddingClient, ModelTier, OpenAiClient};
pub use pipeline::{GraphPipeline, PipelineConfig};
