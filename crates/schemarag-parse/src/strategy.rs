//! Parser strategy seam.
//!
//! A structured grammar-based parser may be tried first for the same input;
//! the heuristic parser in this crate is the resilient fallback. Callers of
//! a primary strategy must tolerate the reduced shape a fallback can return
//! (a fallback used behind a stricter primary may omit indexes, triggers,
//! and check constraints).

use tracing::warn;

use schemarag_core::Result;

use crate::model::TableDefinition;
use crate::parse_ddl;

/// One way of turning raw DDL into table definitions.
pub trait ParseStrategy {
    fn name(&self) -> &'static str;

    fn parse(&self, sql: &str) -> Result<Vec<TableDefinition>>;
}

/// The heuristic extractor implemented by this crate. Never fails at script
/// level: unparsable statements are dropped individually, and a script with
/// no tables yields an empty list.
#[derive(Debug, Default)]
pub struct HeuristicParser;

impl ParseStrategy for HeuristicParser {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn parse(&self, sql: &str) -> Result<Vec<TableDefinition>> {
        Ok(parse_ddl(sql).tables)
    }
}

/// Try `primary`, fall back to `fallback` on any error. The single retry
/// policy lives here rather than in nested error handling at call sites.
pub fn parse_with_fallback(
    primary: &dyn ParseStrategy,
    fallback: &dyn ParseStrategy,
    sql: &str,
) -> Result<Vec<TableDefinition>> {
    match primary.parse(sql) {
        Ok(tables) => Ok(tables),
        Err(err) => {
            warn!(
                primary = primary.name(),
                fallback = fallback.name(),
                "primary parser failed ({err}), falling back"
            );
            fallback.parse(sql)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemarag_core::Error;

    struct FailingParser;

    impl ParseStrategy for FailingParser {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn parse(&self, _sql: &str) -> Result<Vec<TableDefinition>> {
            Err(Error::Parse("grammar rejected input".to_string()))
        }
    }

    #[test]
    fn primary_success_skips_fallback() {
        let primary = HeuristicParser;
        let fallback = FailingParser;
        let tables =
            parse_with_fallback(&primary, &fallback, "CREATE TABLE T (ID NUMBER);").unwrap();
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn primary_failure_falls_back() {
        let primary = FailingParser;
        let fallback = HeuristicParser;
        let tables =
            parse_with_fallback(&primary, &fallback, "CREATE TABLE T (ID NUMBER);").unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table_name, "T");
    }

    #[test]
    fn both_failing_surfaces_fallback_error() {
        let err = parse_with_fallback(&FailingParser, &FailingParser, "whatever").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
