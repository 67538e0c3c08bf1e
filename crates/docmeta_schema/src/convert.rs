//! Row <-> Column Conversion
//!
//! Persisted actions (`AddTable`, `AddColumn`) describe columns as flat JSON
//! objects: `{"id", "type", "isFormula", "formula"}`. These helpers map
//! between that shape and [`SchemaColumn`].
//!
//! Missing or mistyped required fields are errors. Nothing is defaulted.

use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::model::{ColumnMap, SchemaColumn};

/// A flat record, as used in action payloads and transposed bulk tables.
pub type Row = Map<String, Value>;

/// Convert a row to a column. `override_id`, when non-empty, is used instead
/// of the row's own `id` (which is then not read at all).
pub fn row_to_column(row: &Row, override_id: Option<&str>) -> Result<SchemaColumn> {
    let col_id = match override_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => str_field(row, "id")?,
    };
    Ok(SchemaColumn {
        col_id,
        col_type: str_field(row, "type")?,
        is_formula: truthy_field(row, "isFormula")?,
        formula: str_field(row, "formula")?,
    })
}

/// Convert a column to a row. Leave out `id` when the column id is already
/// the key the row is stored under.
pub fn column_to_row(column: &SchemaColumn, include_id: bool) -> Row {
    let mut row = Row::new();
    row.insert("type".into(), Value::String(column.col_type.clone()));
    row.insert("isFormula".into(), Value::Bool(column.is_formula));
    row.insert("formula".into(), Value::String(column.formula.clone()));
    if include_id {
        row.insert("id".into(), Value::String(column.col_id.clone()));
    }
    row
}

/// Convert rows to an ordered column map. Later duplicates overwrite earlier ones.
pub fn rows_to_columns<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Result<ColumnMap> {
    let mut columns = ColumnMap::new();
    for row in rows {
        let col = row_to_column(row, None)?;
        columns.insert(col.col_id.clone(), col);
    }
    Ok(columns)
}

/// Convert an ordered column map to rows (with ids), in map order.
pub fn columns_to_rows(columns: &ColumnMap) -> Vec<Row> {
    columns.values().map(|c| column_to_row(c, true)).collect()
}

/// Truthiness of a JSON value: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub(crate) fn field<'a>(row: &'a Row, name: &str) -> Result<&'a Value> {
    row.get(name).ok_or_else(|| SchemaError::missing(name))
}

pub(crate) fn str_field(row: &Row, name: &str) -> Result<String> {
    match field(row, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(SchemaError::invalid(name, "a string", other)),
    }
}

pub(crate) fn int_field(row: &Row, name: &str) -> Result<i64> {
    let value = field(row, name)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    // Row ids sometimes arrive as whole floats from JSON encoders.
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(SchemaError::invalid(name, "an integer", value)),
    }
}

pub(crate) fn number_field(row: &Row, name: &str) -> Result<f64> {
    let value = field(row, name)?;
    value
        .as_f64()
        .ok_or_else(|| SchemaError::invalid(name, "a number", value))
}

pub(crate) fn truthy_field(row: &Row, name: &str) -> Result<bool> {
    field(row, name).map(truthy)
}
