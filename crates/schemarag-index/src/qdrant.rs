//! Vector-store collaborator (Qdrant HTTP API).

use serde::{Deserialize, Serialize};
use tracing::info;

use schemarag_core::{DocumentType, Error, Result};

/// Payload persisted alongside each vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPayload {
    pub table_name: String,
    pub schema: String,
    pub document_type: DocumentType,
    pub related_tables: Vec<String>,
    pub chunk_index: usize,
    pub chunks_total: usize,
    /// Run timestamp. Belongs only here, never in document text.
    pub created_at: String,
    pub text: String,
}

/// One point ready for upsert.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// Vector-store collaborator. `ensure_collection` is idempotent and
/// tolerates "already exists"; `upsert` is all-or-nothing per call.
#[allow(async_fn_in_trait)]
pub trait VectorStore {
    async fn ensure_collection(&self, name: &str, vector_size: usize, distance: &str)
        -> Result<()>;

    async fn upsert(&self, collection: &str, points: &[IndexPoint]) -> Result<()>;
}

/// Qdrant client over its plain HTTP API.
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
}

impl QdrantStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl VectorStore for QdrantStore {
    async fn ensure_collection(
        &self,
        name: &str,
        vector_size: usize,
        distance: &str,
    ) -> Result<()> {
        let url = format!("{}/collections/{}", self.base_url, name);
        let probe = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::VectorStore(format!("collection probe failed: {err}")))?;

        if probe.status().is_success() {
            return Ok(());
        }
        if probe.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(Error::VectorStore(format!(
                "collection probe returned {}",
                probe.status()
            )));
        }

        let body = serde_json::json!({
            "vectors": { "size": vector_size, "distance": distance }
        });
        let created = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| Error::VectorStore(format!("collection create failed: {err}")))?;

        if !created.status().is_success() {
            return Err(Error::VectorStore(format!(
                "collection create returned {}",
                created.status()
            )));
        }
        info!(collection = name, "created vector collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: &[IndexPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let url = format!("{}/collections/{}/points", self.base_url, collection);
        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "points": points }))
            .send()
            .await
            .map_err(|err| Error::VectorStore(format!("upsert failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::VectorStore(format!(
                "upsert returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}
