//! Document Metadata Schema
//!
//! A document keeps its own structure (table names, column names, types,
//! formulas) as ordinary rows in two metadata tables, `_grist_Tables` and
//! `_grist_Tables_column`. This crate turns those rows back into an ordered
//! [`Schema`] and defines the built-in tables every document contains.
//!
//! # Modules
//!
//! - [`builtin`]: The fixed catalog of built-in (system) tables
//! - [`model`]: Schema value types (`Schema`, `SchemaTable`, `SchemaColumn`)
//! - [`convert`]: Conversion between flat rows and schema columns
//! - [`table_data`]: Column-oriented bulk tables and record transposition
//! - [`actions`]: The `AddTable` action shape
//! - [`builder`]: Reconciliation of built-in tables with metadata rows
//!
//! # Example
//!
//! ```rust
//! use docmeta_schema::{build_schema, TableData, COLUMNS_META, TABLES_META};
//!
//! let tables = TableData::new(TABLES_META);
//! let columns = TableData::new(COLUMNS_META);
//! let schema = build_schema(&tables, &columns, true).unwrap();
//! assert_eq!(schema.table_ids().next(), Some("_grist_DocInfo"));
//! ```

pub mod actions;
pub mod builder;
pub mod builtin;
pub mod convert;
pub mod error;
pub mod model;
pub mod table_data;

pub use actions::{AddTable, ColumnDecl, SchemaAction};
pub use builder::{build_schema, build_schema_from_rows, SchemaBuilder};
pub use builtin::{
    builtin_table, is_builtin_table, schema_create_actions, BuiltinColumn, BuiltinTable,
    BUILTIN_TABLES, COLUMNS_META, TABLES_META,
};
pub use convert::{column_to_row, columns_to_rows, row_to_column, rows_to_columns, Row};
pub use error::{Result, SchemaError};
pub use model::{clone_schema, Schema, SchemaColumn, SchemaTable};
pub use table_data::TableData;

/// Version of the built-in catalog. Stored documents carry their own
/// `schemaVersion`, which the migration layer brings up to this value.
pub const SCHEMA_VERSION: i64 = 20;
