//! Schema Value Types
//!
//! A [`Schema`] is an ordered map of tableId -> [`SchemaTable`], and each
//! table holds an ordered map of colId -> [`SchemaColumn`]. Insertion order is
//! display/evaluation order, so both levels use `IndexMap`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::ops::Index;

use crate::actions::SchemaAction;
use crate::error::SchemaError;

/// Type prefix marking a reference column, e.g. `Ref:_grist_Views`.
pub const REF_PREFIX: &str = "Ref:";

/// Ordered colId -> column mapping.
pub type ColumnMap = IndexMap<String, SchemaColumn>;

/// A single column as seen by code generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaColumn {
    /// Column identifier, unique within its table
    pub col_id: String,

    /// Type tag: a primitive name (`Text`, `Int`, ...) or `Ref:<tableId>`
    #[serde(rename = "type")]
    pub col_type: String,

    /// Whether the column is computed from `formula`
    pub is_formula: bool,

    /// Formula source; for data columns this is the default-value formula, usually empty
    pub formula: String,
}

impl SchemaColumn {
    pub fn new(
        col_id: impl Into<String>,
        col_type: impl Into<String>,
        is_formula: bool,
        formula: impl Into<String>,
    ) -> Self {
        Self {
            col_id: col_id.into(),
            col_type: col_type.into(),
            is_formula,
            formula: formula.into(),
        }
    }

    /// A plain data column with no formula.
    pub fn data(col_id: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self::new(col_id, col_type, false, "")
    }

    /// The table this column points at, if it is a reference column.
    ///
    /// The target is not resolved against any schema.
    pub fn ref_target(&self) -> Option<&str> {
        self.col_type.strip_prefix(REF_PREFIX)
    }

    pub fn is_reference(&self) -> bool {
        self.ref_target().is_some()
    }
}

/// A table and its ordered columns.
///
/// When deserialized, every column key must equal that column's colId.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSchemaTable")]
pub struct SchemaTable {
    pub table_id: String,
    pub columns: ColumnMap,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchemaTable {
    table_id: String,
    columns: ColumnMap,
}

impl TryFrom<RawSchemaTable> for SchemaTable {
    type Error = SchemaError;

    fn try_from(raw: RawSchemaTable) -> Result<Self, SchemaError> {
        for (key, col) in &raw.columns {
            SchemaError::check_key("colId", key, &col.col_id)?;
        }
        Ok(Self::new(raw.table_id, raw.columns))
    }
}

impl SchemaTable {
    pub fn new(table_id: impl Into<String>, columns: ColumnMap) -> Self {
        Self {
            table_id: table_id.into(),
            columns,
        }
    }

    /// Build a table from columns in order. A repeated colId replaces the
    /// earlier column's value and keeps the earlier slot.
    pub fn from_columns(
        table_id: impl Into<String>,
        columns: impl IntoIterator<Item = SchemaColumn>,
    ) -> Self {
        let columns = columns
            .into_iter()
            .map(|col| (col.col_id.clone(), col))
            .collect();
        Self::new(table_id, columns)
    }

    pub fn column(&self, col_id: &str) -> Option<&SchemaColumn> {
        self.columns.get(col_id)
    }

    pub fn column_ids(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// The ordered description of all tables in a document.
///
/// Rebuilt from scratch on every structural change; never patched in place.
/// Serialized as a JSON object keyed by tableId; deserializing rejects an
/// entry whose key differs from its tableId.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, SchemaTable>")]
pub struct Schema {
    tables: IndexMap<String, SchemaTable>,
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tables.serialize(serializer)
    }
}

impl TryFrom<IndexMap<String, SchemaTable>> for Schema {
    type Error = SchemaError;

    fn try_from(tables: IndexMap<String, SchemaTable>) -> Result<Self, SchemaError> {
        for (key, table) in &tables {
            SchemaError::check_key("tableId", key, &table.table_id)?;
        }
        Ok(Self { tables })
    }
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table keyed by its tableId, returning the table it replaced.
    ///
    /// A replaced table keeps its original position.
    pub fn insert(&mut self, table: SchemaTable) -> Option<SchemaTable> {
        self.tables.insert(table.table_id.clone(), table)
    }

    pub fn get(&self, table_id: &str) -> Option<&SchemaTable> {
        self.tables.get(table_id)
    }

    pub fn contains(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaTable> {
        self.tables.values()
    }

    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Independent copy, for snapshotting before a speculative edit.
    pub fn snapshot(&self) -> Self {
        clone_schema(self)
    }

    /// The `AddTable` actions that would recreate this schema, in schema order.
    pub fn create_actions(&self) -> Vec<SchemaAction> {
        self.iter().map(|t| SchemaAction::AddTable(t.into())).collect()
    }
}

impl Index<&str> for Schema {
    type Output = SchemaTable;

    fn index(&self, table_id: &str) -> &SchemaTable {
        match self.tables.get(table_id) {
            Some(table) => table,
            None => panic!("no table '{}' in schema", table_id),
        }
    }
}

impl IntoIterator for Schema {
    type Item = SchemaTable;
    type IntoIter = indexmap::map::IntoValues<String, SchemaTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_values()
    }
}

impl FromIterator<SchemaTable> for Schema {
    fn from_iter<I: IntoIterator<Item = SchemaTable>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for table in iter {
            schema.insert(table);
        }
        schema
    }
}

/// Copy a schema: new table entries, each with its own copy of the column map.
pub fn clone_schema(schema: &Schema) -> Schema {
    schema
        .iter()
        .map(|t| SchemaTable::new(t.table_id.clone(), t.columns.clone()))
        .collect()
}
