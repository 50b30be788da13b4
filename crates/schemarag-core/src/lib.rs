//! SchemaRAG core — error taxonomy, configuration, document contract types.

pub mod config;
pub mod document;
pub mod error;

pub use config::IndexingConfig;
pub use document::{DocumentType, KnowledgeDocument};
pub use error::{Error, Result};
