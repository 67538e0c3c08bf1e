//! Schema Actions
//!
//! The shape shared by the built-in catalog and table creation issued at
//! runtime. Executing these actions belongs to the action engine.

use serde::{Deserialize, Serialize};

use crate::builtin::BuiltinColumn;
use crate::convert::{columns_to_rows, rows_to_columns, Row};
use crate::error::{Result, SchemaError};
use crate::model::{ColumnMap, SchemaColumn, SchemaTable};

/// A structural action, tagged by name when serialized:
/// `{"action": "AddTable", "tableId": ..., "columns": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum SchemaAction {
    AddTable(AddTable),
}

/// Create a table with the given ordered columns.
///
/// Deserialization goes through [`AddTable::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAddTable")]
pub struct AddTable {
    pub table_id: String,
    pub columns: Vec<ColumnDecl>,
}

/// Wire form of [`AddTable`] before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddTable {
    table_id: String,
    columns: Vec<ColumnDecl>,
}

impl TryFrom<RawAddTable> for AddTable {
    type Error = SchemaError;

    fn try_from(raw: RawAddTable) -> Result<Self> {
        Self::new(raw.table_id, raw.columns)
    }
}

/// One column of an `AddTable` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDecl {
    pub id: String,
    #[serde(rename = "type")]
    pub col_type: String,
    pub is_formula: bool,
    pub formula: String,
}

impl AddTable {
    /// Validated constructor: the table id and every column id must be non-empty.
    pub fn new(table_id: impl Into<String>, columns: Vec<ColumnDecl>) -> Result<Self> {
        let action = Self {
            table_id: table_id.into(),
            columns,
        };
        action.validate()?;
        Ok(action)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_id.is_empty() {
            return Err(SchemaError::InvalidAction(
                "AddTable requires a non-empty tableId".into(),
            ));
        }
        if let Some(pos) = self.columns.iter().position(|c| c.id.is_empty()) {
            return Err(SchemaError::InvalidAction(format!(
                "AddTable '{}': column {} has an empty id",
                self.table_id, pos
            )));
        }
        Ok(())
    }

    /// Build from column rows as found in a persisted action payload.
    pub fn from_rows<'a>(
        table_id: impl Into<String>,
        rows: impl IntoIterator<Item = &'a Row>,
    ) -> Result<Self> {
        let columns = rows_to_columns(rows)?;
        Self::new(table_id, columns.values().map(ColumnDecl::from).collect())
    }

    /// The column rows of this action, for a persisted payload.
    pub fn to_rows(&self) -> Vec<Row> {
        columns_to_rows(&self.column_map())
    }

    /// Columns keyed by id; a repeated id keeps the last declaration.
    pub fn column_map(&self) -> ColumnMap {
        self.columns
            .iter()
            .map(|c| (c.id.clone(), SchemaColumn::from(c)))
            .collect()
    }
}

impl From<&ColumnDecl> for SchemaColumn {
    fn from(decl: &ColumnDecl) -> Self {
        SchemaColumn::new(&decl.id, &decl.col_type, decl.is_formula, &decl.formula)
    }
}

impl From<&SchemaColumn> for ColumnDecl {
    fn from(col: &SchemaColumn) -> Self {
        Self {
            id: col.col_id.clone(),
            col_type: col.col_type.clone(),
            is_formula: col.is_formula,
            formula: col.formula.clone(),
        }
    }
}

impl From<&BuiltinColumn> for ColumnDecl {
    fn from(col: &BuiltinColumn) -> Self {
        Self {
            id: col.id.to_string(),
            col_type: col.col_type.to_string(),
            is_formula: col.is_formula,
            formula: col.formula.to_string(),
        }
    }
}

impl From<&AddTable> for SchemaTable {
    fn from(action: &AddTable) -> Self {
        SchemaTable::new(action.table_id.clone(), action.column_map())
    }
}

impl From<&SchemaTable> for AddTable {
    fn from(table: &SchemaTable) -> Self {
        Self {
            table_id: table.table_id.clone(),
            columns: table.columns.values().map(ColumnDecl::from).collect(),
        }
    }
}
