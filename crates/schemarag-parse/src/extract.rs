//! CREATE TABLE block extraction.
//!
//! Yields the literal substring of each CREATE TABLE statement, walking a
//! parenthesis-depth counter so nested expressions (CHECK lists, type
//! precision) do not truncate the block early.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static CREATE_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)create\s+table\s+").unwrap());

/// Extract every CREATE TABLE statement span from `sql`, in order.
///
/// Each span runs from the CREATE TABLE keyword through the statement
/// terminator (`;` when present, otherwise the closing paren). A block whose
/// parens never close before end of input is malformed and skipped.
pub fn extract_create_table_blocks(sql: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(found) = CREATE_TABLE_RE.find_at(sql, search_from) {
        let start = found.start();
        let open = match sql[found.end()..].find('(') {
            Some(rel) => found.end() + rel,
            None => break,
        };

        let mut depth = 0i32;
        let mut close = None;
        for (offset, ch) in sql[open..].char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + offset);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(close) = close else {
            warn!(offset = start, "unterminated CREATE TABLE block, skipping");
            break;
        };

        let end = match sql[close..].find(';') {
            Some(rel) => close + rel + 1,
            None => close + 1,
        };
        blocks.push(&sql[start..end]);
        search_from = end;
    }

    blocks
}
