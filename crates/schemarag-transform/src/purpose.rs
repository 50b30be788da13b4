//! Table-purpose inference from naming heuristics.

/// Infer a one-line purpose from substrings of the table name. The match
/// order is significant: ORDER_ITEMS is line-item detail, not order
/// management.
pub fn infer_purpose(table_name: &str) -> &'static str {
    let name = table_name.to_lowercase();
    if name.contains("log") || name.contains("audit") {
        return "historical record and audit trail";
    }
    if name.contains("item") || name.contains("detail") {
        return "line-item detail for parent entities";
    }
    if name.contains("user") || name.contains("cliente") || name.contains("customer") {
        return "registry of system actors";
    }
    if name.contains("order") || name.contains("pedido") {
        return "order/transaction management";
    }
    if name.contains("cfg") || name.contains("config") {
        return "configuration and business rules";
    }
    "operational data persistence"
}
