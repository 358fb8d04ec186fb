//! Document fetching and text extraction.

use async_trait::async_trait;
use lore_core::{LoreError, LoreResult};
use tracing::debug;

/// Fetch timeout for document downloads.
const FETCH_TIMEOUT_SECS: u64 = 60;

/// Source of document text, keyed by URL.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Retrieve the document at `url` and return its plain text.
    async fn fetch_text(&self, url: &str) -> LoreResult<String>;
}

/// HTTP document source with PDF text extraction.
#[derive(Clone)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
}

impl HttpDocumentSource {
    pub fn new() -> LoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| LoreError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_text(&self, url: &str) -> LoreResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoreError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoreError::Fetch(format!("{url}: HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoreError::Fetch(format!("{url}: {e}")))?;

        debug!(url, bytes = bytes.len(), "Fetched document");

        if bytes.starts_with(b"%PDF") {
            extract_pdf_text(bytes.to_vec()).await
        } else {
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Run the blocking PDF extraction off the async runtime.
async fn extract_pdf_text(bytes: Vec<u8>) -> LoreResult<String> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| LoreError::Pdf(format!("extraction task failed: {e}")))?
        .map_err(|e| LoreError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(LoreError::Pdf("document contains no text".to_string()));
    }
    Ok(text)
}
