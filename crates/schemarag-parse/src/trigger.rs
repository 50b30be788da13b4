//! Trigger impacted-table inference.
//!
//! A trigger body is scanned for `INTO|UPDATE|FROM|JOIN` followed by an
//! identifier. That is enough to document which other tables a trigger reads
//! or writes without parsing its procedural body.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clause::clean_identifier;

static IMPACTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(into|update|from|join)\s+("?[\w$#]+"?(?:\."?[\w$#]+"?)?)"#).unwrap()
});

/// Tables referenced inside `body` other than `owning_table` itself.
/// Deduplicated, first-seen order, bare table segment only.
pub fn impacted_tables(body: &str, owning_table: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for caps in IMPACTED_RE.captures_iter(body) {
        let cleaned = clean_identifier(&caps[2]);
        let table_only = cleaned.rsplit('.').next().unwrap_or("");
        if table_only.is_empty() || table_only.eq_ignore_ascii_case(owning_table) {
            continue;
        }
        if !found.iter().any(|t| t.eq_ignore_ascii_case(table_only)) {
            found.push(table_only.to_string());
        }
    }

    found
}
