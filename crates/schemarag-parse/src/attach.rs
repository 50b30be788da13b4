//! Cross-statement constraint attachment.
//!
//! Second pass over the whole script: ALTER TABLE ADD, CREATE [UNIQUE]
//! INDEX, CREATE [OR REPLACE] TRIGGER and COMMENT ON COLUMN statements are
//! resolved to previously parsed tables and attached in place. Statements
//! referencing unknown tables are dropped with a warning, never fatal.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::clause::clean_identifier;
use crate::model::{IndexDef, TableLookup, TableMap, TriggerDef, TriggerTiming};
use crate::table::{paren_columns, parse_check, parse_foreign_key};

static ALTER_ADD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)alter\s+table\s+(\S+)\s+add\s+(.*?);").unwrap());
static PRIMARY_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)primary\s+key").unwrap());
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)foreign\s+key").unwrap());
static CHECK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)check\s*\(").unwrap());
static INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)create\s+(unique\s+)?index\s+("?[\w$#]+"?)\s+on\s+([^\s(]+)\s*\(([^)]+)\)\s*;"#)
        .unwrap()
});
static TRIGGER_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)create(?:\s+or\s+replace)?\s+trigger.*?end\s*;/?").unwrap());
static TRIGGER_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)create(?:\s+or\s+replace)?\s+trigger\s+("?[\w$#]+"?)\s+(before|after|instead\s+of)\s+([\w\s,]+?)\s+on\s+(\S+)\s"#,
    )
    .unwrap()
});
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)comment\s+on\s+column\s+(\S+)\.(\S+)\s+is\s+'([^']*)'\s*;").unwrap()
});

/// Run all four attachment scans over `sql`, mutating `tables` in place.
pub fn attach_script_constraints(sql: &str, tables: &mut TableMap) {
    attach_alter_table(sql, tables);
    attach_indexes(sql, tables);
    attach_triggers(sql, tables);
    attach_column_comments(sql, tables);
}

/// Resolve a raw table reference, logging ambiguity and misses. Returns the
/// chosen table index, or `None` when the statement must be dropped.
fn resolve_target(tables: &TableMap, raw: &str, statement_kind: &str) -> Option<usize> {
    match tables.resolve(raw) {
        TableLookup::Exact(idx) => Some(idx),
        TableLookup::Ambiguous { chosen, candidates } => {
            warn!(
                table = raw,
                ?candidates,
                "{statement_kind} references an unqualified table name present in \
                 multiple schemas; attaching to the first declared"
            );
            Some(chosen)
        }
        TableLookup::NotFound => {
            warn!(table = raw, "{statement_kind} references unknown table, dropping");
            None
        }
    }
}

fn attach_alter_table(sql: &str, tables: &mut TableMap) {
    for caps in ALTER_ADD_RE.captures_iter(sql) {
        let Some(idx) = resolve_target(tables, &caps[1], "ALTER TABLE") else {
            continue;
        };
        let clause = caps[2].trim();
        let table = tables.get_mut(idx).expect("resolved index is valid");

        if PRIMARY_KEY_RE.is_match(clause) {
            table.add_primary_key_columns(paren_columns(clause));
        }
        if FOREIGN_KEY_RE.is_match(clause) {
            if let Some(fk) = parse_foreign_key(clause) {
                table.foreign_keys.push(fk);
            }
        }
        if CHECK_RE.is_match(clause) {
            table.check_constraints.push(parse_check(clause));
        }
    }
}

fn attach_indexes(sql: &str, tables: &mut TableMap) {
    for caps in INDEX_RE.captures_iter(sql) {
        let Some(idx) = resolve_target(tables, &caps[3], "CREATE INDEX") else {
            continue;
        };
        let index = IndexDef {
            name: clean_identifier(&caps[2]),
            unique: caps.get(1).is_some(),
            columns: caps[4]
                .split(',')
                .map(|part| clean_identifier(part.trim()))
                .collect(),
        };
        tables
            .get_mut(idx)
            .expect("resolved index is valid")
            .indexes
            .push(index);
    }
}

fn attach_triggers(sql: &str, tables: &mut TableMap) {
    for block in TRIGGER_BLOCK_RE.find_iter(sql) {
        let Some(header) = TRIGGER_HEADER_RE.captures(block.as_str()) else {
            continue;
        };
        let Some(timing) = TriggerTiming::parse(&header[2]) else {
            continue;
        };
        let Some(idx) = resolve_target(tables, &header[4], "CREATE TRIGGER") else {
            continue;
        };

        let event = header[3]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        tables
            .get_mut(idx)
            .expect("resolved index is valid")
            .triggers
            .push(TriggerDef {
                name: clean_identifier(&header[1]),
                timing,
                event,
                body: block.as_str().trim().to_string(),
            });
    }
}

fn attach_column_comments(sql: &str, tables: &mut TableMap) {
    for caps in COMMENT_RE.captures_iter(sql) {
        let Some(idx) = resolve_target(tables, &caps[1], "COMMENT ON COLUMN") else {
            continue;
        };
        let column = clean_identifier(&caps[2]);
        let comment = caps[3].trim().to_string();
        tables
            .get_mut(idx)
            .expect("resolved index is valid")
            .comments_on_columns
            .insert(column, comment);
    }
}
