//! Token-aware chunking and the embed-and-persist indexing pipeline.

pub mod chunking;
pub mod embedder;
pub mod pipeline;
pub mod qdrant;

pub use chunking::{estimate_tokens, DocumentChunk, TokenChunker};
pub use embedder::{normalize_vector, Embedder, OllamaEmbedder};
pub use pipeline::{IndexReport, SchemaIndexer};
pub use qdrant::{IndexPoint, PointPayload, QdrantStore, VectorStore};
