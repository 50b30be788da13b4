//! Schema indexing entry point.
//!
//! Reads a DDL script, parses it into table definitions, generates knowledge
//! documents, and either prints them (`--dry-run`) or embeds and upserts
//! them into the configured vector store.
//!
//! Usage: `schemarag [path/to/schema.sql] [--dry-run]`
//! The path falls back to `SCHEMA_SQL_PATH`, then `./docs/schema.sql`.

use anyhow::Context;
use tracing::info;

use schemarag_core::IndexingConfig;
use schemarag_index::{OllamaEmbedder, QdrantStore, SchemaIndexer};
use schemarag_parse::parse_ddl;
use schemarag_transform::transform_tables;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut dry_run = false;
    let mut path: Option<String> = None;
    for arg in std::env::args().skip(1) {
        if arg == "--dry-run" {
            dry_run = true;
        } else {
            path = Some(arg);
        }
    }
    let path = path
        .or_else(|| std::env::var("SCHEMA_SQL_PATH").ok())
        .unwrap_or_else(|| "./docs/schema.sql".to_string());

    let sql = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read DDL script at {path}"))?;

    let parsed = parse_ddl(&sql);
    info!(tables = parsed.tables.len(), path = %path, "parsed DDL script");

    let documents = transform_tables(&parsed.tables);
    if documents.is_empty() {
        info!("no tables found; nothing to index");
        return Ok(());
    }

    if dry_run {
        for document in &documents {
            println!(
                "=== {} / {} / {} ===",
                document.schema,
                document.table_name,
                document.document_type.as_str()
            );
            println!("{}\n", document.text);
        }
        return Ok(());
    }

    let config = IndexingConfig::from_env();
    let embedder = OllamaEmbedder::new(&config);
    let store = QdrantStore::new(config.qdrant_url.clone());
    let mut indexer = SchemaIndexer::new(embedder, store, config);

    let report = indexer.index_documents(&documents).await?;
    info!(
        points = report.indexed_points,
        documents = report.documents_indexed,
        "indexing run complete"
    );
    Ok(())
}
