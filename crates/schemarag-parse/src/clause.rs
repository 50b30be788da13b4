//! Quote-aware, depth-aware clause splitting.
//!
//! The definition list of a CREATE TABLE block is split into top-level
//! clauses by a small state machine tracking single-quote string state and
//! parenthesis depth, so commas inside quoted literals or nested parens
//! (CHECK expressions, type precision) are not split points.

/// Split `text` on commas that sit at paren depth zero outside string
/// literals. A backslash escapes a quote inside a literal.
pub fn split_top_level(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut prev = '\0';

    for ch in text.chars() {
        if ch == '\'' && prev != '\\' {
            in_quote = !in_quote;
        }
        if !in_quote {
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    parts.push(std::mem::take(&mut current));
                    prev = ch;
                    continue;
                }
                _ => {}
            }
        }
        current.push(ch);
        prev = ch;
    }

    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

/// Strip double quotes and all whitespace from an identifier.
pub fn clean_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '"' && !c.is_whitespace())
        .collect()
}
