//! Error types for SchemaRAG.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A single DDL statement could not be parsed. Scoped to that statement;
    /// the rest of the script still parses.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
