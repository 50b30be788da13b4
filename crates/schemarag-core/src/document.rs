//! Knowledge-document contract types.
//!
//! `KnowledgeDocument` is the boundary between schema parsing and everything
//! downstream (chunking, embedding, persistence). Consumers build on this
//! shape; how the text was produced is the generator's business.

use serde::{Deserialize, Serialize};

/// Purpose of a generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Table identity, inferred purpose, primary key, main columns.
    Overview,
    /// CHECK constraints and validations.
    Constraints,
    /// One per trigger (or a single "no triggers" document).
    Triggers,
    /// Foreign-key relationships.
    Relationships,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Overview => "overview",
            DocumentType::Constraints => "constraints",
            DocumentType::Triggers => "triggers",
            DocumentType::Relationships => "relationships",
        }
    }
}

/// A finished natural-language document describing one aspect of one table.
///
/// Generation is a pure function of a fully-attached table definition, so
/// parsing the same script twice yields byte-identical document texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub schema: String,
    pub table_name: String,
    pub document_type: DocumentType,
    /// Tables this one relates to, deduplicated, first-seen order.
    pub related_tables: Vec<String>,
    pub text: String,
}
