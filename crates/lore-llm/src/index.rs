//! Per-request in-memory vector index.
//!
//! Each create/update request builds a throwaway index over the fetched
//! document's chunks, then retrieves the chunks most relevant to the
//! summarization query. Nothing is cached across requests.

use lore_core::LoreResult;
use tracing::debug;

use crate::openai::EmbeddingClient;

/// Split text into chunks of at most `max_chars`, preferring paragraph
/// boundaries. Overlong paragraphs are cut at character boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if current.len() + paragraph.len() + 2 > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if paragraph.len() > max_chars {
            // Flush and hard-split the oversized paragraph.
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = paragraph.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// In-memory vector index over document chunks.
pub struct VectorIndex {
    chunks: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Embed all chunks and build the index.
    pub async fn build(
        embedder: &dyn EmbeddingClient,
        chunks: Vec<String>,
    ) -> LoreResult<Self> {
        let vectors = embedder.embed(&chunks).await?;
        debug!(chunks = chunks.len(), "Built document index");
        Ok(Self { chunks, vectors })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Retrieve the `k` chunks most similar to `query`, best first.
    pub async fn top_k(
        &self,
        embedder: &dyn EmbeddingClient,
        query: &str,
        k: usize,
    ) -> LoreResult<Vec<&str>> {
        let query_input = [query.to_string()];
        let query_vec = embedder
            .embed(&query_input)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(self
            .rank(&query_vec, k)
            .into_iter()
            .map(|i| self.chunks[i].as_str())
            .collect())
    }

    /// Indices of the `k` most similar chunks, best first.
    fn rank(&self, query_vec: &[f32], k: usize) -> Vec<usize> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query_vec, v)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(k).map(|(i, _)| i).collect()
    }
}

/// Cosine similarity between two vectors; 0.0 for zero or mismatched vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_respects_paragraphs() {
        let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let chunks = chunk_text(text, 40);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].contains("First"));
        assert!(chunks[0].contains("Second"));
        assert!(chunks[1].contains("Third"));
    }

    #[test]
    fn test_chunk_splits_oversized_paragraph() {
        let text = "x".repeat(250);
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 100));
    }

    #[test]
    fn test_chunk_skips_blank_input() {
        assert!(chunk_text("\n\n   \n\n", 100).is_empty());
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let index = VectorIndex {
            chunks: vec!["a".into(), "b".into(), "c".into()],
            vectors: vec![
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![0.7, 0.7],
            ],
        };
        let order = index.rank(&[1.0, 0.0], 2);
        assert_eq!(order, vec![1, 2]);
    }
}
