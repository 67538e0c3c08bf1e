//! Bulk Table Data
//!
//! Metadata tables are stored and passed around column-oriented: one vector
//! of row ids plus one value vector per column. [`TableData::records`]
//! transposes that into per-record [`Row`]s, each carrying its `id`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::convert::{int_field, Row};
use crate::error::{Result, SchemaError};

/// Column-oriented contents of one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub table_id: String,
    #[serde(default)]
    pub row_ids: Vec<i64>,
    #[serde(default)]
    pub columns: IndexMap<String, Vec<Value>>,
}

impl TableData {
    /// An empty table.
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            row_ids: Vec::new(),
            columns: IndexMap::new(),
        }
    }

    /// Build bulk data from records. Every record needs an integer `id`;
    /// columns appear in the order fields are first seen, and a record
    /// lacking a field gets `null` there.
    pub fn from_records<'a>(
        table_id: impl Into<String>,
        records: impl IntoIterator<Item = &'a Row>,
    ) -> Result<Self> {
        let records: Vec<&Row> = records.into_iter().collect();
        let mut data = Self::new(table_id);

        for record in &records {
            data.row_ids.push(int_field(record, "id")?);
            for key in record.keys().filter(|k| k.as_str() != "id") {
                if !data.columns.contains_key(key) {
                    data.columns.insert(key.clone(), Vec::with_capacity(records.len()));
                }
            }
        }

        for (col_id, values) in data.columns.iter_mut() {
            values.extend(
                records
                    .iter()
                    .map(|r| r.get(col_id).cloned().unwrap_or(Value::Null)),
            );
        }

        Ok(data)
    }

    /// Parse the JSON form: `{"tableId", "rowIds", "columns"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Transpose into one row per record, in row-id order as stored.
    pub fn records(&self) -> Result<Vec<Row>> {
        let expected = self.row_ids.len();
        for (col_id, values) in &self.columns {
            if values.len() != expected {
                return Err(SchemaError::ColumnLengthMismatch {
                    table_id: self.table_id.clone(),
                    column: col_id.clone(),
                    expected,
                    found: values.len(),
                });
            }
        }

        let records = self
            .row_ids
            .iter()
            .enumerate()
            .map(|(i, row_id)| {
                let mut row = Row::new();
                row.insert("id".into(), Value::from(*row_id));
                for (col_id, values) in &self.columns {
                    row.insert(col_id.clone(), values[i].clone());
                }
                row
            })
            .collect();
        Ok(records)
    }

    /// Check that this is the metadata table the caller expects.
    pub(crate) fn expect_table(&self, expected: &'static str) -> Result<()> {
        if self.table_id == expected {
            Ok(())
        } else {
            Err(SchemaError::TableIdentityMismatch {
                expected,
                found: self.table_id.clone(),
            })
        }
    }
}
