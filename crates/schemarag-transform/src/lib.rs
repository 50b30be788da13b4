//! Semantic knowledge-document generation from parsed table definitions.

pub mod generator;
pub mod purpose;

pub use generator::{documents_for_table, transform_tables};
pub use purpose::infer_purpose;
