//! End-to-end tests for schema reconstruction
//!
//! Metadata arrives the way documents store it: column-oriented
//! `_grist_Tables` and `_grist_Tables_column` tables.

use docmeta_schema::{
    build_schema, clone_schema, schema_create_actions, Row, SchemaAction, SchemaColumn,
    SchemaError, TableData, BUILTIN_TABLES, COLUMNS_META, TABLES_META,
};
use serde_json::{json, Value};

fn tables(rows: Value) -> TableData {
    TableData::from_records(TABLES_META, &to_rows(rows)).expect("table rows")
}

fn columns(rows: Value) -> TableData {
    TableData::from_records(COLUMNS_META, &to_rows(rows)).expect("column rows")
}

fn to_rows(rows: Value) -> Vec<Row> {
    rows.as_array()
        .expect("array of rows")
        .iter()
        .map(|r| r.as_object().cloned().expect("row object"))
        .collect()
}

/// A `_grist_Tables_column` record for a data column.
fn data_col(id: i64, parent_id: i64, pos: f64, col_id: &str, ty: &str) -> Value {
    json!({
        "id": id, "parentId": parent_id, "parentPos": pos, "colId": col_id,
        "type": ty, "isFormula": false, "formula": "", "label": col_id
    })
}

/// A `_grist_Tables_column` record for a formula column.
fn formula_col(id: i64, parent_id: i64, pos: f64, col_id: &str, ty: &str, formula: &str) -> Value {
    json!({
        "id": id, "parentId": parent_id, "parentPos": pos, "colId": col_id,
        "type": ty, "isFormula": true, "formula": formula, "label": col_id
    })
}

fn orders_fixture() -> (TableData, TableData) {
    let t = tables(json!([
        {"id": 1, "tableId": "Orders", "primaryViewId": 1, "summarySourceTable": 0},
        {"id": 2, "tableId": "Customers", "primaryViewId": 2, "summarySourceTable": 0},
    ]));
    let c = columns(json!([
        formula_col(1, 1, 2.0, "Total", "Numeric", "$Qty * $Price"),
        data_col(2, 2, 1.0, "Name", "Text"),
        data_col(3, 1, 1.0, "Customer", "Ref:Customers"),
        data_col(4, 1, 1.5, "Qty", "Int"),
    ]));
    (t, c)
}

// =============================================================================
// ORDERING
// =============================================================================

#[test]
fn test_builtin_tables_come_first() {
    let (t, c) = orders_fixture();
    let schema = build_schema(&t, &c, true).unwrap();

    let ids: Vec<&str> = schema.table_ids().collect();
    let builtin_ids: Vec<&str> = BUILTIN_TABLES.iter().map(|b| b.table_id).collect();
    assert_eq!(ids.len(), builtin_ids.len() + 2);
    assert_eq!(&ids[..builtin_ids.len()], builtin_ids.as_slice());
    assert_eq!(&ids[builtin_ids.len()..], &["Orders", "Customers"]);
}

#[test]
fn test_builtin_columns_match_catalog() {
    let empty_tables = TableData::new(TABLES_META);
    let empty_columns = TableData::new(COLUMNS_META);
    let schema = build_schema(&empty_tables, &empty_columns, true).unwrap();

    for builtin in BUILTIN_TABLES {
        let table = &schema[builtin.table_id];
        let expected: Vec<&str> = builtin.columns.iter().map(|c| c.id).collect();
        assert_eq!(table.column_ids().collect::<Vec<_>>(), expected, "{}", builtin.table_id);
    }

    let parse = schema["_grist_Imports"].column("parseFormula").unwrap();
    assert!(parse.is_formula);
}

#[test]
fn test_user_columns_follow_position() {
    let (t, c) = orders_fixture();
    let schema = build_schema(&t, &c, false).unwrap();

    assert_eq!(schema.len(), 2);
    assert_eq!(
        schema["Orders"].column_ids().collect::<Vec<_>>(),
        vec!["Customer", "Qty", "Total"]
    );
    assert_eq!(
        schema["Orders"].column("Total").unwrap(),
        &SchemaColumn::new("Total", "Numeric", true, "$Qty * $Price")
    );
    assert_eq!(schema["Orders"].column("Customer").unwrap().ref_target(), Some("Customers"));
    assert_eq!(schema["Customers"].column_ids().collect::<Vec<_>>(), vec!["Name"]);
}

#[test]
fn test_build_is_deterministic() {
    let (t, c) = orders_fixture();
    let first = build_schema(&t, &c, true).unwrap();
    let second = build_schema(&t, &c, true).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_scenario_sorted_by_parent_pos() {
    let t = tables(json!([{"id": 1, "tableId": "Orders"}]));
    let c = columns(json!([
        data_col(1, 1, 2.0, "Total", "Numeric"),
        data_col(2, 1, 1.0, "Name", "Text"),
    ]));

    let schema = build_schema(&t, &c, true).unwrap();
    assert_eq!(schema["Orders"].column_ids().collect::<Vec<_>>(), vec!["Name", "Total"]);
}

#[test]
fn test_scenario_duplicate_col_id_last_wins() {
    let t = tables(json!([{"id": 1, "tableId": "T"}]));
    let c = columns(json!([
        data_col(1, 1, 1.0, "X", "Text"),
        formula_col(2, 1, 2.0, "X", "Int", "42"),
    ]));

    let schema = build_schema(&t, &c, false).unwrap();
    let table = &schema["T"];
    assert_eq!(table.columns.len(), 1);
    assert_eq!(table.column("X").unwrap(), &SchemaColumn::new("X", "Int", true, "42"));
}

#[test]
fn test_duplicate_col_id_keeps_first_slot() {
    let t = tables(json!([{"id": 1, "tableId": "T"}]));
    let c = columns(json!([
        data_col(1, 1, 1.0, "X", "Text"),
        data_col(2, 1, 2.0, "Y", "Int"),
        formula_col(3, 1, 3.0, "X", "Numeric", "$Y * 2"),
    ]));

    let schema = build_schema(&t, &c, false).unwrap();
    let table = &schema["T"];
    assert_eq!(table.column_ids().collect::<Vec<_>>(), vec!["X", "Y"]);
    assert_eq!(
        table.column("X").unwrap(),
        &SchemaColumn::new("X", "Numeric", true, "$Y * 2")
    );
}

#[test]
fn test_scenario_dangling_column_is_dropped() {
    let t = tables(json!([{"id": 1, "tableId": "T"}]));
    let c = columns(json!([
        data_col(1, 1, 1.0, "A", "Text"),
        data_col(2, 99, 1.0, "Ghost", "Text"),
    ]));

    // Dropped on purpose: this layer does not report inconsistent metadata.
    let schema = build_schema(&t, &c, true).unwrap();
    assert!(schema.iter().all(|table| table.column("Ghost").is_none()));
    assert_eq!(schema["T"].column_ids().collect::<Vec<_>>(), vec!["A"]);
}

#[test]
fn test_table_with_no_columns() {
    let t = tables(json!([{"id": 1, "tableId": "Empty"}, {"id": 2, "tableId": "Other"}]));
    let schema = build_schema(&t, &TableData::new(COLUMNS_META), false).unwrap();

    assert!(schema["Empty"].columns.is_empty());
    assert!(schema["Other"].columns.is_empty());
}

#[test]
fn test_duplicate_table_id_last_wins() {
    let t = tables(json!([{"id": 1, "tableId": "T"}, {"id": 2, "tableId": "T"}]));
    let c = columns(json!([
        data_col(1, 1, 1.0, "First", "Text"),
        data_col(2, 2, 1.0, "Second", "Text"),
    ]));

    let schema = build_schema(&t, &c, false).unwrap();
    assert_eq!(schema.len(), 1);
    assert_eq!(schema["T"].column_ids().collect::<Vec<_>>(), vec!["Second"]);
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_swapped_inputs_are_rejected() {
    let (t, c) = orders_fixture();
    let err = build_schema(&c, &t, true).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::TableIdentityMismatch { expected: "_grist_Tables", ref found }
            if found == COLUMNS_META
    ));
}

#[test]
fn test_missing_required_field_is_rejected() {
    let t = tables(json!([{"id": 1, "tableId": "T"}]));
    let c = columns(json!([
        {"id": 1, "parentId": 1, "parentPos": 1, "colId": "A", "type": "Text", "isFormula": false},
    ]));

    let err = build_schema(&t, &c, false).unwrap_err();
    // Absent in every record: the column never exists in the bulk data.
    assert!(matches!(err, SchemaError::MissingField { ref field } if field == "formula"));
}

#[test]
fn test_ragged_bulk_data_is_rejected() {
    let mut t = tables(json!([{"id": 1, "tableId": "T"}]));
    t.row_ids.push(2);

    let err = build_schema(&t, &TableData::new(COLUMNS_META), false).unwrap_err();
    assert!(matches!(err, SchemaError::ColumnLengthMismatch { .. }));
}

// =============================================================================
// SNAPSHOTS AND ACTIONS
// =============================================================================

#[test]
fn test_clone_and_recreate_actions() {
    let (t, c) = orders_fixture();
    let schema = build_schema(&t, &c, true).unwrap();
    let snapshot = clone_schema(&schema);
    assert_eq!(snapshot, schema);

    let actions = schema.create_actions();
    assert_eq!(actions.len(), schema.len());
    assert_eq!(&actions[..BUILTIN_TABLES.len()], schema_create_actions().as_slice());

    let SchemaAction::AddTable(orders) = &actions[BUILTIN_TABLES.len()];
    assert_eq!(orders.table_id, "Orders");
    let ids: Vec<&str> = orders.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["Customer", "Qty", "Total"]);
}

#[test]
fn test_bulk_data_from_json_file_shape() {
    let t: TableData = serde_json::from_value(json!({
        "tableId": "_grist_Tables",
        "rowIds": [3],
        "columns": {"tableId": ["People"]}
    }))
    .unwrap();
    let c: TableData = serde_json::from_value(json!({
        "tableId": "_grist_Tables_column",
        "rowIds": [10, 11],
        "columns": {
            "parentId": [3, 3],
            "parentPos": [2.0, 1.0],
            "colId": ["Age", "Name"],
            "type": ["Int", "Text"],
            "isFormula": [false, false],
            "formula": ["", ""]
        }
    }))
    .unwrap();

    let schema = build_schema(&t, &c, false).unwrap();
    assert_eq!(schema["People"].column_ids().collect::<Vec<_>>(), vec!["Name", "Age"]);
}
