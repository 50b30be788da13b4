//! Configuration for the indexing pipeline and its collaborators.

use serde::{Deserialize, Serialize};

/// Endpoints and sizing for the embedding and vector-store collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Ollama base URL (`OLLAMA_BASE_URL`).
    pub ollama_base_url: String,
    /// Embedding model name (`EMBEDDING_MODEL`).
    pub embedding_model: String,
    /// Qdrant base URL (`QDRANT_URL`).
    pub qdrant_url: String,
    /// Destination collection name (`QDRANT_COLLECTION`).
    pub collection_name: String,
    /// Fixed embedding dimension (`QDRANT_VECTOR_SIZE`). Vectors of any other
    /// length are truncated or zero-padded to this size before upsert.
    pub vector_size: usize,
    /// Distance metric passed to collection creation (`QDRANT_DISTANCE`).
    pub distance: String,
}

impl IndexingConfig {
    /// Build configuration from environment variables with the stock defaults.
    pub fn from_env() -> Self {
        Self {
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            embedding_model: env_or("EMBEDDING_MODEL", "nomic-embed-text"),
            qdrant_url: env_or("QDRANT_URL", "http://localhost:6333"),
            collection_name: env_or("QDRANT_COLLECTION", "schema_knowledge"),
            vector_size: std::env::var("QDRANT_VECTOR_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(768),
            distance: env_or("QDRANT_DISTANCE", "Cosine"),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            qdrant_url: "http://localhost:6333".to_string(),
            collection_name: "schema_knowledge".to_string(),
            vector_size: 768,
            distance: "Cosine".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
