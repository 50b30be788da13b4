//! End-to-end parsing of a realistic multi-statement DDL script.

use schemarag_parse::{parse_ddl, TriggerTiming};

const SCRIPT: &str = r#"
CREATE TABLE PUBLIC.CUSTOMERS (
    ID NUMBER NOT NULL,
    NAME VARCHAR2(120) NOT NULL,
    SEGMENT VARCHAR2(30) DEFAULT 'RETAIL',
    CONSTRAINT PK_CUSTOMERS PRIMARY KEY (ID)
);

CREATE TABLE PUBLIC.ORDERS (
    ID NUMBER NOT NULL,
    CUSTOMER_ID NUMBER,
    STATUS NUMBER DEFAULT 1 CHECK (STATUS IN (1,2,3)),
    CREATED_AT DATE DEFAULT SYSDATE NOT NULL,
    CONSTRAINT PK_ORDERS PRIMARY KEY (ID)
);

CREATE TABLE ORDER_ITEMS (
    ORDER_ID NUMBER NOT NULL,
    LINE_NO NUMBER NOT NULL,
    PRODUCT VARCHAR2(80),
    QTY NUMBER(10,2),
    PRIMARY KEY (ORDER_ID, LINE_NO)
);

ALTER TABLE ORDERS ADD CONSTRAINT FK_CUST FOREIGN KEY (CUSTOMER_ID) REFERENCES PUBLIC.CUSTOMERS(ID);
ALTER TABLE ORDER_ITEMS ADD CONSTRAINT FK_ORDER FOREIGN KEY (ORDER_ID) REFERENCES ORDERS(ID);
ALTER TABLE ORDERS ADD CONSTRAINT CK_STATUS CHECK (STATUS > 0);

CREATE UNIQUE INDEX UX_CUSTOMERS_NAME ON CUSTOMERS (NAME);
CREATE INDEX IX_ORDERS_CUSTOMER ON PUBLIC.ORDERS (CUSTOMER_ID);

CREATE OR REPLACE TRIGGER TRG_ORDERS_AUDIT
AFTER INSERT OR UPDATE ON ORDERS
FOR EACH ROW
BEGIN
    INSERT INTO ORDER_AUDIT (ORDER_ID) VALUES (:NEW.ID);
    UPDATE STOCK SET RESERVED = RESERVED + 1;
END;

COMMENT ON COLUMN PUBLIC.ORDERS.STATUS IS 'Order lifecycle state';
COMMENT ON COLUMN ORDERS.CUSTOMER_ID IS 'Owning customer';
"#;

#[test]
fn parses_all_tables_in_declaration_order() {
    let parsed = parse_ddl(SCRIPT);
    let names: Vec<String> = parsed.tables.iter().map(|t| t.full_name()).collect();
    assert_eq!(
        names,
        vec!["PUBLIC.CUSTOMERS", "PUBLIC.ORDERS", "PUBLIC.ORDER_ITEMS"]
    );
}

#[test]
fn attachment_pass_populates_all_collections() {
    let parsed = parse_ddl(SCRIPT);
    let orders = &parsed.tables[1];

    assert_eq!(orders.primary_key, vec!["ID"]);
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].references.table_name, "CUSTOMERS");
    assert_eq!(orders.foreign_keys[0].references.schema, "PUBLIC");

    // Inline check from the column plus the ALTER TABLE one.
    assert_eq!(orders.check_constraints.len(), 2);
    assert_eq!(orders.check_constraints[1].name.as_deref(), Some("CK_STATUS"));

    assert_eq!(orders.indexes.len(), 1);
    assert_eq!(orders.indexes[0].name, "IX_ORDERS_CUSTOMER");

    assert_eq!(orders.triggers.len(), 1);
    let trigger = &orders.triggers[0];
    assert_eq!(trigger.name, "TRG_ORDERS_AUDIT");
    assert_eq!(trigger.timing, TriggerTiming::After);
    assert_eq!(trigger.event, "INSERT OR UPDATE");

    assert_eq!(
        orders.comments_on_columns.get("STATUS").map(String::as_str),
        Some("Order lifecycle state")
    );
    assert_eq!(
        orders
            .comments_on_columns
            .get("CUSTOMER_ID")
            .map(String::as_str),
        Some("Owning customer")
    );
}

#[test]
fn unqualified_fk_target_gets_public_schema() {
    let parsed = parse_ddl(SCRIPT);
    let items = &parsed.tables[2];
    assert_eq!(items.foreign_keys.len(), 1);
    assert_eq!(items.foreign_keys[0].references.schema, "PUBLIC");
    assert_eq!(items.foreign_keys[0].references.table_name, "ORDERS");
}

#[test]
fn parsing_is_deterministic() {
    let first = parse_ddl(SCRIPT);
    let second = parse_ddl(SCRIPT);
    assert_eq!(first, second);
}

#[test]
fn malformed_statement_does_not_poison_the_script() {
    let sql = "CREATE TABLE GOOD (ID NUMBER);\nCREATE TABLE BAD (ID NUMBER, OPEN CHECK (X IN (1,2";
    let parsed = parse_ddl(sql);
    assert_eq!(parsed.tables.len(), 1);
    assert_eq!(parsed.tables[0].table_name, "GOOD");
}

#[test]
fn empty_script_yields_empty_table_list() {
    assert!(parse_ddl("").tables.is_empty());
    assert!(parse_ddl("-- comments only\nSELECT 1 FROM DUAL;").tables.is_empty());
}
