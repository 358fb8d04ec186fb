//! Centralized error types for Lore.

use thiserror::Error;

/// Main error type for Lore operations.
#[derive(Error, Debug)]
pub enum LoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document fetch failed: {0}")]
    Fetch(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Invalid graph script: {0}")]
    InvalidScript(String),

    #[error("Model call failed: {0}")]
    Llm(String),

    #[error("Graph store error: {0}")]
    Graph(String),

    #[error("Pipeline stage '{stage}' timed out after {seconds}s")]
    StageTimeout { stage: String, seconds: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Lore operations.
pub type LoreResult<T> = Result<T, LoreError>;

impl LoreError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a model-call error.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a graph-store error.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }
}
