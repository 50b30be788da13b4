//! Structured table model produced by the DDL parser.
//!
//! A `TableDefinition` is created exactly once per CREATE TABLE block and is
//! the single mutation target for all later attachment passes in one parse
//! run. Tables are held in a `TableMap` that preserves declaration order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clause::clean_identifier;

/// Default schema for unqualified table names.
pub const DEFAULT_SCHEMA: &str = "PUBLIC";

/// A possibly schema-qualified identifier as it appeared in the source.
///
/// `schema` stays `None` when the source omitted it, so callers can tell an
/// explicit `PUBLIC.ORDERS` apart from a bare `ORDERS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedName {
    pub schema: Option<String>,
    pub name: String,
}

impl QualifiedName {
    /// Parse a raw identifier, stripping double quotes and whitespace.
    pub fn parse(raw: &str) -> Self {
        let cleaned = clean_identifier(raw);
        match cleaned.split_once('.') {
            Some((schema, name)) => Self {
                schema: Some(schema.to_string()),
                name: name.to_string(),
            },
            None => Self {
                schema: None,
                name: cleaned,
            },
        }
    }

    /// The schema, defaulted to `PUBLIC` when the source omitted it.
    pub fn schema_or_public(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema_or_public(), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    /// Raw type token including length/precision, e.g. `VARCHAR2(120)`.
    pub data_type: String,
    /// Raw DEFAULT expression, captured up to the next recognized keyword.
    pub default: Option<String>,
    pub not_null: bool,
}

/// Target side of a foreign key. Always carries an explicit schema
/// (defaulted to `PUBLIC`) so downstream consumers never see a bare name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyTarget {
    pub schema: String,
    pub table_name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Local column names, declaration order.
    pub columns: Vec<String>,
    pub references: ForeignKeyTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

/// When a trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    #[serde(rename = "BEFORE")]
    Before,
    #[serde(rename = "AFTER")]
    After,
    #[serde(rename = "INSTEAD OF")]
    InsteadOf,
}

impl TriggerTiming {
    /// Parse a timing keyword, tolerating arbitrary internal whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_uppercase().as_str() {
            "BEFORE" => Some(Self::Before),
            "AFTER" => Some(Self::After),
            "INSTEAD OF" => Some(Self::InsteadOf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::InsteadOf => "INSTEAD OF",
        }
    }
}

impl fmt::Display for TriggerTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDef {
    pub name: String,
    pub timing: TriggerTiming,
    /// INSERT/UPDATE/DELETE, possibly combined (`INSERT OR UPDATE`).
    pub event: String,
    /// Raw trigger source, used for impacted-table inference and summaries.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub name: Option<String>,
    /// Raw boolean expression text.
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub schema: String,
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
    /// Primary key column names, deduplicated, first-seen order. Empty means
    /// no primary key was declared (DDL cannot declare an empty one).
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<IndexDef>,
    pub triggers: Vec<TriggerDef>,
    pub check_constraints: Vec<CheckConstraint>,
    pub comments_on_columns: BTreeMap<String, String>,
}

impl TableDefinition {
    pub fn new(schema: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table_name: table_name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            triggers: Vec::new(),
            check_constraints: Vec::new(),
            comments_on_columns: BTreeMap::new(),
        }
    }

    /// Identity key, `SCHEMA.TABLE`, compared case-insensitively.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.table_name)
    }

    /// Add columns to the primary key, skipping duplicates. Keeps the
    /// inline-then-table-level declaration case from doubling entries.
    pub fn add_primary_key_columns<I>(&mut self, columns: I)
    where
        I: IntoIterator<Item = String>,
    {
        for column in columns {
            if column.is_empty() {
                continue;
            }
            if !self
                .primary_key
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&column))
            {
                self.primary_key.push(column);
            }
        }
    }
}

/// Outcome of resolving a (possibly unqualified) table reference.
///
/// When an unqualified name matches tables in several schemas the first
/// declared one is chosen, but the ambiguity is surfaced rather than hidden:
/// the source DDL does not disambiguate further and neither do we.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLookup {
    Exact(usize),
    Ambiguous { chosen: usize, candidates: Vec<String> },
    NotFound,
}

/// Declaration-ordered collection of parsed tables, keyed by
/// case-insensitive `schema.table`.
#[derive(Debug, Default, Clone)]
pub struct TableMap {
    tables: Vec<TableDefinition>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, replacing any earlier definition with the same
    /// qualified name.
    pub fn insert(&mut self, table: TableDefinition) {
        let full = table.full_name();
        match self
            .tables
            .iter()
            .position(|t| t.full_name().eq_ignore_ascii_case(&full))
        {
            Some(idx) => self.tables[idx] = table,
            None => self.tables.push(table),
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&TableDefinition> {
        self.tables.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut TableDefinition> {
        self.tables.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableDefinition> {
        self.tables.iter()
    }

    /// Resolve a raw table reference from an ALTER/INDEX/TRIGGER/COMMENT
    /// statement. Qualified names match exactly first; a qualified miss and
    /// any unqualified name fall back to matching the bare table segment.
    pub fn resolve(&self, raw: &str) -> TableLookup {
        let name = QualifiedName::parse(raw);

        if name.schema.is_some() {
            let full = name.to_string();
            if let Some(idx) = self
                .tables
                .iter()
                .position(|t| t.full_name().eq_ignore_ascii_case(&full))
            {
                return TableLookup::Exact(idx);
            }
        }

        let matches: Vec<usize> = self
            .tables
            .iter()
            .enumerate()
            .filter(|(_, t)| t.table_name.eq_ignore_ascii_case(&name.name))
            .map(|(idx, _)| idx)
            .collect();

        match matches.as_slice() {
            [] => TableLookup::NotFound,
            [only] => TableLookup::Exact(*only),
            [first, ..] => TableLookup::Ambiguous {
                chosen: *first,
                candidates: matches
                    .iter()
                    .map(|&idx| self.tables[idx].full_name())
                    .collect(),
            },
        }
    }

    pub fn into_tables(self) -> Vec<TableDefinition> {
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_defaults_schema() {
        let name = QualifiedName::parse("ORDERS");
        assert_eq!(name.schema, None);
        assert_eq!(name.schema_or_public(), "PUBLIC");
        assert_eq!(name.to_string(), "PUBLIC.ORDERS");
    }

    #[test]
    fn qualified_name_keeps_explicit_schema() {
        let name = QualifiedName::parse("\"APP\".\"ORDERS\"");
        assert_eq!(name.schema.as_deref(), Some("APP"));
        assert_eq!(name.name, "ORDERS");
    }

    #[test]
    fn primary_key_dedup_is_case_insensitive() {
        let mut table = TableDefinition::new("PUBLIC", "ORDERS");
        table.add_primary_key_columns(["ID".to_string()]);
        table.add_primary_key_columns(["id".to_string(), "REF".to_string()]);
        assert_eq!(table.primary_key, vec!["ID", "REF"]);
    }

    #[test]
    fn resolve_prefers_exact_qualified_match() {
        let mut map = TableMap::new();
        map.insert(TableDefinition::new("APP", "ORDERS"));
        map.insert(TableDefinition::new("PUBLIC", "ORDERS"));

        assert_eq!(map.resolve("PUBLIC.ORDERS"), TableLookup::Exact(1));
    }

    #[test]
    fn resolve_unqualified_ambiguity_is_surfaced() {
        let mut map = TableMap::new();
        map.insert(TableDefinition::new("APP", "ORDERS"));
        map.insert(TableDefinition::new("LEGACY", "ORDERS"));

        match map.resolve("ORDERS") {
            TableLookup::Ambiguous { chosen, candidates } => {
                assert_eq!(chosen, 0);
                assert_eq!(candidates, vec!["APP.ORDERS", "LEGACY.ORDERS"]);
            }
            other => panic!("expected ambiguous lookup, got {other:?}"),
        }
    }

    #[test]
    fn resolve_missing_table() {
        let map = TableMap::new();
        assert_eq!(map.resolve("NOWHERE"), TableLookup::NotFound);
    }

    #[test]
    fn insert_replaces_same_qualified_name() {
        let mut map = TableMap::new();
        map.insert(TableDefinition::new("PUBLIC", "ORDERS"));
        let mut replacement = TableDefinition::new("PUBLIC", "orders");
        replacement.add_primary_key_columns(["ID".to_string()]);
        map.insert(replacement);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(0).unwrap().primary_key, vec!["ID"]);
    }

    #[test]
    fn trigger_timing_parses_with_noisy_whitespace() {
        assert_eq!(
            TriggerTiming::parse("instead   of"),
            Some(TriggerTiming::InsteadOf)
        );
        assert_eq!(TriggerTiming::parse("BEFORE"), Some(TriggerTiming::Before));
        assert_eq!(TriggerTiming::parse("sometimes"), None);
    }
}
