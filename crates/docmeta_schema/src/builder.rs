//! Schema Builder
//!
//! Reconciles the built-in catalog with the user tables and columns described
//! by `_grist_Tables` and `_grist_Tables_column` rows, producing one ordered
//! [`Schema`]:
//!
//! 1. Built-in tables first, in catalog order (optional).
//! 2. Column rows grouped by `parentId`, each group stably sorted by
//!    `parentPos` (ties keep input order).
//! 3. User tables in table-row order, each with its group of columns. A table
//!    with no column rows gets an empty column map.
//!
//! Column rows whose `parentId` matches no table row are dropped. Duplicate
//! colIds or tableIds are last-write-wins. Malformed rows are errors.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::builtin::{BuiltinTable, BUILTIN_TABLES, COLUMNS_META, TABLES_META};
use crate::convert::{int_field, number_field, str_field, truthy_field, Row};
use crate::error::Result;
use crate::model::{ColumnMap, Schema, SchemaColumn, SchemaTable};
use crate::table_data::TableData;

/// Build the schema from the `_grist_Tables` and `_grist_Tables_column` tables.
///
/// Fails with `TableIdentityMismatch` if the inputs are not those two tables
/// (e.g. swapped).
pub fn build_schema(
    meta_tables: &TableData,
    meta_columns: &TableData,
    include_builtin: bool,
) -> Result<Schema> {
    SchemaBuilder::new()
        .include_builtin(include_builtin)
        .build(meta_tables, meta_columns)
}

/// Build the schema from already-transposed table and column rows.
pub fn build_schema_from_rows(
    table_rows: &[Row],
    column_rows: &[Row],
    include_builtin: bool,
) -> Result<Schema> {
    SchemaBuilder::new()
        .include_builtin(include_builtin)
        .build_from_rows(table_rows, column_rows)
}

/// Schema reconciliation over a given built-in catalog.
#[derive(Debug, Clone, Copy)]
pub struct SchemaBuilder<'a> {
    builtins: &'a [BuiltinTable],
    include_builtin: bool,
}

impl SchemaBuilder<'static> {
    /// A builder seeded from [`BUILTIN_TABLES`].
    pub fn new() -> Self {
        Self::with_builtins(BUILTIN_TABLES)
    }
}

impl Default for SchemaBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SchemaBuilder<'a> {
    pub fn with_builtins(builtins: &'a [BuiltinTable]) -> Self {
        Self {
            builtins,
            include_builtin: true,
        }
    }

    pub fn include_builtin(mut self, include: bool) -> Self {
        self.include_builtin = include;
        self
    }

    pub fn build(&self, meta_tables: &TableData, meta_columns: &TableData) -> Result<Schema> {
        meta_tables.expect_table(TABLES_META)?;
        meta_columns.expect_table(COLUMNS_META)?;
        self.build_from_rows(&meta_tables.records()?, &meta_columns.records()?)
    }

    pub fn build_from_rows(&self, table_rows: &[Row], column_rows: &[Row]) -> Result<Schema> {
        let tables = table_rows
            .iter()
            .map(MetaTable::from_row)
            .collect::<Result<Vec<_>>>()?;
        let columns = column_rows
            .iter()
            .map(MetaColumn::from_row)
            .collect::<Result<Vec<_>>>()?;

        let mut schema = Schema::new();
        if self.include_builtin {
            for builtin in self.builtins {
                schema.insert(SchemaTable::from(&builtin.to_action()));
            }
        }

        let groups = group_by_parent(columns);
        for table in &tables {
            let columns: ColumnMap = groups
                .get(&table.row_id)
                .map(|group| {
                    group
                        .iter()
                        .map(|c| (c.column.col_id.clone(), c.column.clone()))
                        .collect()
                })
                .unwrap_or_default();
            schema.insert(SchemaTable::new(table.table_id.clone(), columns));
        }

        let known: HashSet<i64> = tables.iter().map(|t| t.row_id).collect();
        let dangling: usize = groups
            .iter()
            .filter(|(parent_id, _)| !known.contains(*parent_id))
            .map(|(_, group)| group.len())
            .sum();
        if dangling > 0 {
            trace!("Dropped {} column rows with no matching table row", dangling);
        }

        debug!(
            "Built schema: {} tables ({} from metadata rows, {} column rows)",
            schema.len(),
            tables.len(),
            column_rows.len()
        );
        Ok(schema)
    }
}

/// Group column rows by owning table, each group stably sorted by position.
fn group_by_parent(columns: Vec<MetaColumn>) -> HashMap<i64, Vec<MetaColumn>> {
    let mut groups: HashMap<i64, Vec<MetaColumn>> = HashMap::new();
    for col in columns {
        groups.entry(col.parent_id).or_default().push(col);
    }
    for group in groups.values_mut() {
        // sort_by is stable: equal parentPos keeps input order.
        group.sort_by(|a, b| a.parent_pos.total_cmp(&b.parent_pos));
    }
    groups
}

/// The fields of a `_grist_Tables` row that the builder reads.
#[derive(Debug)]
struct MetaTable {
    row_id: i64,
    table_id: String,
}

impl MetaTable {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            row_id: int_field(row, "id")?,
            table_id: str_field(row, "tableId")?,
        })
    }
}

/// The fields of a `_grist_Tables_column` row that the builder reads.
#[derive(Debug)]
struct MetaColumn {
    parent_id: i64,
    parent_pos: f64,
    column: SchemaColumn,
}

impl MetaColumn {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            parent_id: int_field(row, "parentId")?,
            parent_pos: number_field(row, "parentPos")?,
            column: SchemaColumn {
                col_id: str_field(row, "colId")?,
                col_type: str_field(row, "type")?,
                is_formula: truthy_field(row, "isFormula")?,
                formula: str_field(row, "formula")?,
            },
        })
    }
}
