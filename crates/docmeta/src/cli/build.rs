//! Build command - rebuild a schema from metadata table files
//!
//! Each input file holds one table in bulk form:
//!
//! ```json
//! {"tableId": "_grist_Tables", "rowIds": [1], "columns": {"tableId": ["Orders"]}}
//! ```

use anyhow::Result;
use clap::Args;
use docmeta_schema::{build_schema, Schema, TableData};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::config::Settings;
use crate::cli::output::describe_formula;
use crate::cli::{print_table, HelpfulError};

/// Arguments for the `build` command
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// JSON file with the _grist_Tables data
    #[arg(long)]
    pub tables: PathBuf,

    /// JSON file with the _grist_Tables_column data
    #[arg(long)]
    pub columns: PathBuf,

    /// Leave out the built-in tables
    #[arg(long)]
    pub no_builtin: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: BuildArgs, settings: &Settings) -> Result<()> {
    let tables = read_table_data(&args.tables)?;
    let columns = read_table_data(&args.columns)?;
    let include_builtin = settings.include_builtin && !args.no_builtin;

    let schema = build_schema(&tables, &columns, include_builtin)
        .map_err(|e| HelpfulError::schema_build_failed(&e.to_string()))?;
    info!(
        "Built schema from {} table rows and {} column rows: {} tables",
        tables.len(),
        columns.len(),
        schema.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        print_schema(&schema);
    }
    Ok(())
}

fn read_table_data(path: &Path) -> Result<TableData> {
    if !path.exists() {
        return Err(HelpfulError::file_not_found(path).into());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| HelpfulError::cannot_read_file(path, &e.to_string()))?;
    let data = TableData::from_json(&content)
        .map_err(|e| HelpfulError::json_parse_error(path, &e.to_string()))?;
    Ok(data)
}

fn print_schema(schema: &Schema) {
    for table in schema.iter() {
        println!("Table: {} ({} columns)", table.table_id, table.columns.len());
        if table.columns.is_empty() {
            println!();
            continue;
        }
        let rows: Vec<Vec<String>> = table
            .columns
            .values()
            .map(|col| {
                vec![
                    col.col_id.clone(),
                    col.col_type.clone(),
                    describe_formula(col.is_formula, &col.formula),
                ]
            })
            .collect();
        print_table(&["column", "type", "formula"], rows);
        println!();
    }
}
