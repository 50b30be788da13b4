//! Embedding collaborator.
//!
//! `Embedder` abstracts over the text → fixed-length vector service. The
//! shipped implementation talks to Ollama's `/api/embeddings` endpoint;
//! tests substitute in-memory fakes.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use schemarag_core::{Error, IndexingConfig, Result};

/// Text → vector collaborator. Failures surface as `Error::Embedding` and
/// abort the indexing run they occur in.
#[allow(async_fn_in_trait)]
pub trait Embedder {
    /// The vector length this embedder is configured for.
    fn vector_size(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Force a vector to `size`: truncate from the end if longer, right-pad with
/// zeros if shorter. Deterministic, no interpolation.
pub fn normalize_vector(mut vector: Vec<f32>, size: usize) -> Vec<f32> {
    vector.truncate(size);
    vector.resize(size, 0.0);
    vector
}

/// Ollama embedding client.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    vector_size: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    pub fn new(config: &IndexingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.ollama_base_url.clone(),
            model: config.embedding_model.clone(),
            vector_size: config.vector_size,
        }
    }
}

impl Embedder for OllamaEmbedder {
    fn vector_size(&self) -> usize {
        self.vector_size
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        debug!(model = %self.model, chars = text.len(), "requesting embedding");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "model": self.model, "prompt": text }))
            .send()
            .await
            .map_err(|err| Error::Embedding(format!("request to {url} failed: {err}")))?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "embedding API returned {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| Error::Embedding(format!("invalid embedding response: {err}")))?;

        if body.embedding.is_empty() {
            return Err(Error::Embedding(
                "embedding model returned an empty vector".to_string(),
            ));
        }
        Ok(body.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_vector;

    #[test]
    fn longer_vectors_truncate_from_the_end() {
        assert_eq!(normalize_vector(vec![1.0, 2.0, 3.0, 4.0], 2), vec![1.0, 2.0]);
    }

    #[test]
    fn shorter_vectors_pad_with_zeros() {
        assert_eq!(normalize_vector(vec![1.0], 3), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn exact_size_is_untouched() {
        assert_eq!(normalize_vector(vec![1.0, 2.0], 2), vec![1.0, 2.0]);
    }
}
