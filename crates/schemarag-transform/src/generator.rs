//! Semantic document generation from finished table definitions.
//!
//! Each table yields an overview, a constraints document, one document per
//! trigger (or a "no triggers" placeholder) and a relationships document.
//! Generation is a pure function of the table definition: same input, byte
//! identical text. It must only run after the attachment pass completed;
//! anything attached later would be silently lost.

use schemarag_core::{DocumentType, KnowledgeDocument};
use schemarag_parse::{impacted_tables, TableDefinition};

use crate::purpose::infer_purpose;

/// How many columns the overview document lists.
const OVERVIEW_COLUMN_LIMIT: usize = 8;
/// Trigger body summaries are cut at this many characters.
const TRIGGER_SUMMARY_LIMIT: usize = 520;

/// Generate documents for every table, preserving table order.
pub fn transform_tables(tables: &[TableDefinition]) -> Vec<KnowledgeDocument> {
    tables.iter().flat_map(documents_for_table).collect()
}

/// Generate the document set for one finished table.
pub fn documents_for_table(table: &TableDefinition) -> Vec<KnowledgeDocument> {
    let related = related_tables(table);
    let mut documents = vec![
        overview_document(table, &related),
        constraints_document(table, &related),
    ];
    documents.extend(trigger_documents(table, &related));
    documents.push(relationships_document(table, &related));
    documents
}

/// Foreign-key targets as `schema.table`, deduplicated, first-seen order.
fn related_tables(table: &TableDefinition) -> Vec<String> {
    let mut related: Vec<String> = Vec::new();
    for fk in &table.foreign_keys {
        let full = format!("{}.{}", fk.references.schema, fk.references.table_name);
        if !related.iter().any(|r| r.eq_ignore_ascii_case(&full)) {
            related.push(full);
        }
    }
    related
}

fn overview_document(table: &TableDefinition, related: &[String]) -> KnowledgeDocument {
    let mut lines = vec![
        format!("Table: {}", table.full_name()),
        format!("Inferred purpose: {}", infer_purpose(&table.table_name)),
        format!(
            "Primary key: {}",
            if table.primary_key.is_empty() {
                "not defined".to_string()
            } else {
                table.primary_key.join(", ")
            }
        ),
        "Main columns:".to_string(),
    ];

    if table.columns.is_empty() {
        lines.push("- none identified".to_string());
    } else {
        for column in table.columns.iter().take(OVERVIEW_COLUMN_LIMIT) {
            match table.comments_on_columns.get(&column.name) {
                Some(comment) => lines.push(format!(
                    "- {} ({}): {}",
                    column.name, column.data_type, comment
                )),
                None => lines.push(format!("- {} ({})", column.name, column.data_type)),
            }
        }
    }

    lines.push("Related tables:".to_string());
    push_list_or_placeholder(&mut lines, related, "- none identified");

    document(table, DocumentType::Overview, related, lines)
}

fn constraints_document(table: &TableDefinition, related: &[String]) -> KnowledgeDocument {
    let mut lines = vec![
        format!("Table: {}", table.full_name()),
        "CHECK constraints and validations:".to_string(),
    ];

    if table.check_constraints.is_empty() {
        lines.push("- no CHECK constraints detected".to_string());
    } else {
        for check in &table.check_constraints {
            lines.push(format!(
                "- {}: {}",
                check.name.as_deref().unwrap_or("CHECK"),
                check.expression
            ));
        }
    }

    document(table, DocumentType::Constraints, related, lines)
}

fn trigger_documents(table: &TableDefinition, related: &[String]) -> Vec<KnowledgeDocument> {
    if table.triggers.is_empty() {
        let lines = vec![
            format!("Table: {}", table.full_name()),
            "Triggers:".to_string(),
            "- no triggers found for this table".to_string(),
        ];
        return vec![document(table, DocumentType::Triggers, related, lines)];
    }

    table
        .triggers
        .iter()
        .map(|trigger| {
            let impacted = impacted_tables(&trigger.body, &table.table_name);
            let mut lines = vec![
                format!("Trigger: {}", trigger.name),
                format!("Target table: {}", table.full_name()),
                format!("Timing: {}", trigger.timing),
                format!("Event: {}", trigger.event),
                "Impacted tables:".to_string(),
            ];
            push_list_or_placeholder(&mut lines, &impacted, "- none identified");
            lines.push("Main rules summarized:".to_string());
            lines.push(summarize_trigger(&trigger.body));

            // Trigger documents relate to both FK targets and impacted tables.
            let mut combined = related.to_vec();
            for name in impacted {
                if !combined.iter().any(|r| r.eq_ignore_ascii_case(&name)) {
                    combined.push(name);
                }
            }
            document(table, DocumentType::Triggers, &combined, lines)
        })
        .collect()
}

fn relationships_document(table: &TableDefinition, related: &[String]) -> KnowledgeDocument {
    let mut lines = vec![
        format!("Table: {}", table.full_name()),
        "Foreign key relationships:".to_string(),
    ];

    if table.foreign_keys.is_empty() {
        lines.push("- no foreign keys detected".to_string());
    } else {
        for fk in &table.foreign_keys {
            lines.push(format!(
                "- ({}) -> {}.{} ({})",
                fk.columns.join(", "),
                fk.references.schema,
                fk.references.table_name,
                fk.references.columns.join(", ")
            ));
        }
    }

    document(table, DocumentType::Relationships, related, lines)
}

/// Collapse trigger-body whitespace and cut to the summary limit.
fn summarize_trigger(body: &str) -> String {
    let compact = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.is_empty() {
        return "- body not available".to_string();
    }
    let summary: String = compact.chars().take(TRIGGER_SUMMARY_LIMIT).collect();
    if compact.chars().count() > TRIGGER_SUMMARY_LIMIT {
        format!("- {summary}...")
    } else {
        format!("- {summary}")
    }
}

fn push_list_or_placeholder(lines: &mut Vec<String>, items: &[String], placeholder: &str) {
    if items.is_empty() {
        lines.push(placeholder.to_string());
    } else {
        for item in items {
            lines.push(format!("- {item}"));
        }
    }
}

fn document(
    table: &TableDefinition,
    document_type: DocumentType,
    related: &[String],
    lines: Vec<String>,
) -> KnowledgeDocument {
    KnowledgeDocument {
        schema: table.schema.clone(),
        table_name: table.table_name.clone(),
        document_type,
        related_tables: related.to_vec(),
        text: lines.join("\n"),
    }
}
