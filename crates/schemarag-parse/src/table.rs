//! Parsing of one extracted CREATE TABLE block into a `TableDefinition`.
//!
//! Best-effort heuristic extraction for the supported statement subset, not
//! a general SQL grammar. Indexes, triggers, and column comments stay empty
//! here; the attachment pass over the whole script fills them in.

use once_cell::sync::Lazy;
use regex::Regex;

use schemarag_core::{Error, Result};

use crate::clause::{clean_identifier, split_top_level};
use crate::model::{
    CheckConstraint, ColumnDefinition, ForeignKey, ForeignKeyTarget, QualifiedName,
    TableDefinition,
};

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)create\s+table\s+([^\s(]+)").unwrap());
static TABLE_PK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(constraint\s+\S+\s+)?primary\s+key").unwrap());
static TABLE_FK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(constraint\s+\S+\s+)?foreign\s+key").unwrap());
static TABLE_CHECK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(constraint\s+\S+\s+)?check\s*\(").unwrap());
static COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)^("?[\w$#]+"?)\s+(.+)$"#).unwrap());
static TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([A-Za-z][A-Za-z0-9_]*(?:\s*\([^)]*\))?)").unwrap());
static DEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bdefault\s+(.+?)(\bnot\s+null\b|\bconstraint\b|\breferences\b|\bcheck\b|$)")
        .unwrap()
});
static NOT_NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bnot\s+null\b").unwrap());
static INLINE_PK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bprimary\s+key\b").unwrap());
static REFERENCES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\breferences\s+([^\s(]+)\s*\(([^)]+)\)").unwrap());
static INLINE_CHECK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcheck\s*\(").unwrap());
static CHECK_EXPR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bcheck\s*\((.+)\)\s*$").unwrap());
static CHECK_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^constraint\s+("?[\w$#]+"?)"#).unwrap());
static PAREN_COLS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// Parse one CREATE TABLE block. A header whose table name cannot be
/// extracted rejects this block only; the rest of the script still parses.
pub fn parse_create_table_block(block: &str) -> Result<TableDefinition> {
    let header = HEADER_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            Error::Parse(format!(
                "unrecognized CREATE TABLE header: {}",
                snippet(block)
            ))
        })?;

    let name = QualifiedName::parse(header.as_str());
    if name.name.is_empty() {
        return Err(Error::Parse(format!(
            "empty table name in CREATE TABLE header: {}",
            snippet(block)
        )));
    }

    let mut table = TableDefinition::new(name.schema_or_public(), name.name.clone());

    let inside = match (block.find('('), block.rfind(')')) {
        (Some(open), Some(close)) if close > open => &block[open + 1..close],
        _ => "",
    };

    for raw in split_top_level(inside) {
        let definition = raw.trim();
        if definition.is_empty() {
            continue;
        }

        if TABLE_PK_RE.is_match(definition) {
            table.add_primary_key_columns(paren_columns(definition));
            continue;
        }

        if TABLE_FK_RE.is_match(definition) {
            if let Some(fk) = parse_foreign_key(definition) {
                table.foreign_keys.push(fk);
            }
            continue;
        }

        if TABLE_CHECK_RE.is_match(definition) {
            table.check_constraints.push(parse_check(definition));
            continue;
        }

        let Some(column) = parse_column(definition) else {
            continue;
        };

        if INLINE_PK_RE.is_match(definition) {
            table.add_primary_key_columns([column.name.clone()]);
        }
        if let Some(fk) = parse_inline_foreign_key(definition, &column.name) {
            table.foreign_keys.push(fk);
        }
        if INLINE_CHECK_RE.is_match(definition) {
            if let Some(caps) = CHECK_EXPR_RE.captures(definition) {
                table.check_constraints.push(CheckConstraint {
                    name: None,
                    expression: caps[1].trim().to_string(),
                });
            }
        }
        table.columns.push(column);
    }

    Ok(table)
}

/// Parse a column clause: name, type token (with optional precision),
/// DEFAULT expression, NOT NULL flag.
fn parse_column(definition: &str) -> Option<ColumnDefinition> {
    let caps = COLUMN_RE.captures(definition)?;
    let name = clean_identifier(&caps[1]);
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    let data_type = TYPE_RE
        .captures(rest)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let default = DEFAULT_RE
        .captures(rest)
        .map(|c| c[1].trim().to_string())
        .filter(|expr| !expr.is_empty());

    Some(ColumnDefinition {
        name,
        data_type,
        default,
        not_null: NOT_NULL_RE.is_match(rest),
    })
}

/// Parse a table-level `FOREIGN KEY (...) REFERENCES ...` clause. Also used
/// by the ALTER TABLE attachment pass.
pub(crate) fn parse_foreign_key(definition: &str) -> Option<ForeignKey> {
    let columns = paren_columns(definition);
    let target = parse_references(definition)?;
    Some(ForeignKey {
        columns,
        references: target,
    })
}

fn parse_inline_foreign_key(definition: &str, column_name: &str) -> Option<ForeignKey> {
    let target = parse_references(definition)?;
    Some(ForeignKey {
        columns: vec![column_name.to_string()],
        references: target,
    })
}

fn parse_references(definition: &str) -> Option<ForeignKeyTarget> {
    let caps = REFERENCES_RE.captures(definition)?;
    let target = QualifiedName::parse(&caps[1]);
    Some(ForeignKeyTarget {
        schema: target.schema_or_public().to_string(),
        table_name: target.name,
        columns: caps[2]
            .split(',')
            .map(|part| clean_identifier(part.trim()))
            .collect(),
    })
}

/// Parse a CHECK constraint clause. Falls back to the whole clause text when
/// the expression parens cannot be isolated. Also used by ALTER TABLE ADD.
pub(crate) fn parse_check(definition: &str) -> CheckConstraint {
    let expression = CHECK_EXPR_RE
        .captures(definition)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| definition.trim().to_string());
    let name = CHECK_NAME_RE
        .captures(definition)
        .map(|c| clean_identifier(&c[1]));
    CheckConstraint { name, expression }
}

/// Column names inside the first parenthesized group of a constraint clause.
pub(crate) fn paren_columns(definition: &str) -> Vec<String> {
    let Some(caps) = PAREN_COLS_RE.captures(definition) else {
        return Vec::new();
    };
    caps[1]
        .split(',')
        .map(|part| clean_identifier(part.trim()))
        .collect()
}

fn snippet(block: &str) -> String {
    let compact = block.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.len() > 80 {
        format!("{}...", &compact[..80])
    } else {
        compact
    }
}
