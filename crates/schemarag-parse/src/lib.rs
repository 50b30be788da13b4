//! Heuristic DDL parsing: CREATE TABLE blocks, cross-statement constraint
//! attachment, trigger impacted-table inference.
//!
//! The whole module is pure and synchronous over in-memory text. Per-table
//! parse failures never abort the script; they drop the offending statement
//! with a warning.

pub mod attach;
pub mod clause;
pub mod extract;
pub mod model;
pub mod strategy;
pub mod table;
pub mod trigger;

use tracing::warn;

pub use model::{
    CheckConstraint, ColumnDefinition, ForeignKey, ForeignKeyTarget, IndexDef, QualifiedName,
    TableDefinition, TableLookup, TableMap, TriggerDef, TriggerTiming,
};
pub use strategy::{parse_with_fallback, HeuristicParser, ParseStrategy};
pub use trigger::impacted_tables;

/// Everything extracted from one script.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSchema {
    /// Declaration-ordered, fully attached table definitions.
    pub tables: Vec<TableDefinition>,
}

/// Parse a full DDL script.
///
/// Extracts each CREATE TABLE block, parses it, then runs the whole-script
/// attachment pass (ALTER TABLE / CREATE INDEX / CREATE TRIGGER / COMMENT ON
/// COLUMN). A script that yields zero tables is a valid outcome, not an
/// error.
pub fn parse_ddl(sql: &str) -> ParsedSchema {
    let blocks = extract::extract_create_table_blocks(sql);
    let mut map = TableMap::new();

    for block in blocks {
        match table::parse_create_table_block(block) {
            Ok(table) => map.insert(table),
            Err(err) => warn!("dropping unparsable CREATE TABLE statement: {err}"),
        }
    }

    attach::attach_script_constraints(sql, &mut map);
    ParsedSchema {
        tables: map.into_tables(),
    }
}
