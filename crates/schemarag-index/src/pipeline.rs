//! Indexing pipeline: chunk, embed, upsert.
//!
//! Chunks are embedded sequentially, one at a time, deliberately bounding
//! concurrent load on the embedding service. Any collaborator failure aborts
//! the whole run; points gathered so far are discarded, never partially
//! committed.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use schemarag_core::{IndexingConfig, KnowledgeDocument, Result};

use crate::chunking::TokenChunker;
use crate::embedder::{normalize_vector, Embedder};
use crate::qdrant::{IndexPoint, PointPayload, VectorStore};

/// Summary of one indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed_points: usize,
    pub documents_indexed: usize,
}

/// Collection-existence cache owned by one pipeline instance.
///
/// Set on first successful `ensure_collection`, never re-verified per call.
/// If the collection is deleted externally afterwards, upserts fail until
/// the caller invalidates the cache; this staleness is a known risk, not
/// self-healing.
#[derive(Debug, Default)]
struct CollectionLifecycle {
    ready: bool,
}

impl CollectionLifecycle {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn mark_ready(&mut self) {
        self.ready = true;
    }

    fn invalidate(&mut self) {
        self.ready = false;
    }
}

/// Embeds knowledge documents and persists them to the vector store.
pub struct SchemaIndexer<E, S> {
    embedder: E,
    store: S,
    config: IndexingConfig,
    chunker: TokenChunker,
    collection: CollectionLifecycle,
}

impl<E: Embedder, S: VectorStore> SchemaIndexer<E, S> {
    pub fn new(embedder: E, store: S, config: IndexingConfig) -> Self {
        Self {
            embedder,
            store,
            config,
            chunker: TokenChunker::default(),
            collection: CollectionLifecycle::default(),
        }
    }

    /// Drop the cached "collection exists" state, forcing the next run to
    /// re-verify (e.g. after the collection was deleted externally).
    pub fn invalidate_collection_cache(&mut self) {
        self.collection.invalidate();
    }

    /// Index a batch of documents: chunk each, embed every chunk, then
    /// upsert all points at once. An empty input returns a zeroed report
    /// without touching any collaborator.
    pub async fn index_documents(&mut self, documents: &[KnowledgeDocument]) -> Result<IndexReport> {
        if documents.is_empty() {
            return Ok(IndexReport {
                indexed_points: 0,
                documents_indexed: 0,
            });
        }

        if !self.collection.is_ready() {
            self.store
                .ensure_collection(
                    &self.config.collection_name,
                    self.config.vector_size,
                    &self.config.distance,
                )
                .await?;
            self.collection.mark_ready();
        }

        let created_at = Utc::now().to_rfc3339();
        let mut points = Vec::new();

        for document in documents {
            for chunk in self.chunker.chunk_document(&document.text) {
                let vector = self.embedder.embed(&chunk.text).await?;
                points.push(IndexPoint {
                    id: Uuid::new_v4().to_string(),
                    vector: normalize_vector(vector, self.config.vector_size),
                    payload: PointPayload {
                        table_name: document.table_name.clone(),
                        schema: document.schema.clone(),
                        document_type: document.document_type,
                        related_tables: document.related_tables.clone(),
                        chunk_index: chunk.chunk_index,
                        chunks_total: chunk.chunks_total,
                        created_at: created_at.clone(),
                        text: chunk.text,
                    },
                });
            }
        }

        self.store
            .upsert(&self.config.collection_name, &points)
            .await?;

        info!(
            points = points.len(),
            documents = documents.len(),
            collection = %self.config.collection_name,
            "indexed schema documents"
        );
        Ok(IndexReport {
            indexed_points: points.len(),
            documents_indexed: documents.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use schemarag_core::{DocumentType, Error};
    use std::sync::Arc;

    struct MockEmbedder {
        dim: usize,
        returned: Vec<f32>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Embedder for MockEmbedder {
        fn vector_size(&self) -> usize {
            self.dim
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.lock().push(text.to_string());
            Ok(self.returned.clone())
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn vector_size(&self) -> usize {
            4
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::Embedding("model offline".to_string()))
        }
    }

    #[derive(Default, Clone)]
    struct MockStore {
        ensures: Arc<Mutex<usize>>,
        upserts: Arc<Mutex<Vec<Vec<IndexPoint>>>>,
    }

    impl VectorStore for MockStore {
        async fn ensure_collection(
            &self,
            _name: &str,
            _vector_size: usize,
            _distance: &str,
        ) -> Result<()> {
            *self.ensures.lock() += 1;
            Ok(())
        }

        async fn upsert(&self, _collection: &str, points: &[IndexPoint]) -> Result<()> {
            self.upserts.lock().push(points.to_vec());
            Ok(())
        }
    }

    fn doc(text: &str) -> KnowledgeDocument {
        KnowledgeDocument {
            schema: "PUBLIC".to_string(),
            table_name: "ORDERS".to_string(),
            document_type: DocumentType::Overview,
            related_tables: vec!["PUBLIC.CUSTOMERS".to_string()],
            text: text.to_string(),
        }
    }

    fn config(vector_size: usize) -> IndexingConfig {
        IndexingConfig {
            vector_size,
            ..IndexingConfig::default()
        }
    }

    #[tokio::test]
    async fn empty_input_touches_no_collaborators() {
        let store = MockStore::default();
        let embedder = MockEmbedder {
            dim: 4,
            returned: vec![0.5; 4],
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let mut indexer = SchemaIndexer::new(embedder, store.clone(), config(4));

        let report = indexer.index_documents(&[]).await.unwrap();
        assert_eq!(report.indexed_points, 0);
        assert_eq!(report.documents_indexed, 0);
        assert_eq!(*store.ensures.lock(), 0);
        assert!(store.upserts.lock().is_empty());
    }

    #[tokio::test]
    async fn points_carry_payload_and_unique_ids() {
        let store = MockStore::default();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let embedder = MockEmbedder {
            dim: 4,
            returned: vec![0.5; 4],
            calls: calls.clone(),
        };
        let mut indexer = SchemaIndexer::new(embedder, store.clone(), config(4));

        let docs = vec![doc("overview text"), doc("constraints text")];
        let report = indexer.index_documents(&docs).await.unwrap();

        assert_eq!(report.documents_indexed, 2);
        assert_eq!(report.indexed_points, 2);
        assert_eq!(calls.lock().len(), 2);

        let upserts = store.upserts.lock();
        assert_eq!(upserts.len(), 1, "single batch upsert per run");
        let batch = &upserts[0];
        assert_ne!(batch[0].id, batch[1].id);
        assert_eq!(batch[0].payload.table_name, "ORDERS");
        assert_eq!(batch[0].payload.chunk_index, 0);
        assert_eq!(batch[0].payload.chunks_total, 1);
        assert_eq!(batch[0].payload.created_at, batch[1].payload.created_at);
    }

    #[tokio::test]
    async fn vectors_are_normalized_to_configured_size() {
        let store = MockStore::default();
        let embedder = MockEmbedder {
            dim: 4,
            returned: vec![1.0; 6],
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let mut indexer = SchemaIndexer::new(embedder, store.clone(), config(4));
        indexer.index_documents(&[doc("text")]).await.unwrap();
        assert_eq!(store.upserts.lock()[0][0].vector, vec![1.0; 4]);

        let store = MockStore::default();
        let embedder = MockEmbedder {
            dim: 4,
            returned: vec![1.0; 2],
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let mut indexer = SchemaIndexer::new(embedder, store.clone(), config(4));
        indexer.index_documents(&[doc("text")]).await.unwrap();
        assert_eq!(store.upserts.lock()[0][0].vector, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn collection_check_is_cached_until_invalidated() {
        let store = MockStore::default();
        let embedder = MockEmbedder {
            dim: 4,
            returned: vec![0.5; 4],
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let mut indexer = SchemaIndexer::new(embedder, store.clone(), config(4));

        indexer.index_documents(&[doc("a")]).await.unwrap();
        indexer.index_documents(&[doc("b")]).await.unwrap();
        assert_eq!(*store.ensures.lock(), 1);

        indexer.invalidate_collection_cache();
        indexer.index_documents(&[doc("c")]).await.unwrap();
        assert_eq!(*store.ensures.lock(), 2);
    }

    #[tokio::test]
    async fn embedding_failure_aborts_run_without_upsert() {
        let store = MockStore::default();
        let mut indexer = SchemaIndexer::new(FailingEmbedder, store.clone(), config(4));

        let err = indexer.index_documents(&[doc("text")]).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
        assert!(store.upserts.lock().is_empty(), "no partial commit");
    }

    #[tokio::test]
    async fn large_document_indexes_every_chunk() {
        let store = MockStore::default();
        let embedder = MockEmbedder {
            dim: 4,
            returned: vec![0.5; 4],
            calls: Arc::new(Mutex::new(Vec::new())),
        };
        let mut indexer = SchemaIndexer::new(embedder, store.clone(), config(4));

        let big = (0..8000).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let report = indexer.index_documents(&[doc(&big)]).await.unwrap();

        assert!(report.indexed_points > 1);
        assert_eq!(report.documents_indexed, 1);
        let upserts = store.upserts.lock();
        let batch = &upserts[0];
        assert_eq!(batch.len(), report.indexed_points);
        for (i, point) in batch.iter().enumerate() {
            assert_eq!(point.payload.chunk_index, i);
            assert_eq!(point.payload.chunks_total, batch.len());
        }
    }
}
